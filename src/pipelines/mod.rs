//! Render pipeline definitions.
//!
//! - `mesh` builds the forward pipeline drawing the loaded model
//! - `light` owns the directional light rig uniform and its bind group

pub mod light;
pub mod mesh;

/// The pipelines a context renders with. The same pipeline serves the
/// visible surface and the off-screen sampler, which share a format.
#[derive(Debug)]
pub struct Pipelines {
    pub mesh: wgpu::RenderPipeline,
}

impl Pipelines {
    pub fn new(
        device: &wgpu::Device,
        color_format: wgpu::TextureFormat,
        material_bind_group_layout: &wgpu::BindGroupLayout,
        camera_bind_group_layout: &wgpu::BindGroupLayout,
        light_bind_group_layout: &wgpu::BindGroupLayout,
    ) -> Self {
        Self {
            mesh: mesh::mk_mesh_pipeline(
                device,
                color_format,
                material_bind_group_layout,
                camera_bind_group_layout,
                light_bind_group_layout,
            ),
        }
    }
}
