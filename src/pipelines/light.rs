//! Directional light rig.
//!
//! Up to three directional lights plus an ambient term, uploaded as one
//! uniform. The rig presets reproduce the lighting the viewer shipped with
//! over time; all of them assume a black background.

use cgmath::InnerSpace;
use wgpu::util::DeviceExt;

use crate::config::LightPreset;

#[derive(Debug)]
pub struct LightResources {
    pub uniform: LightUniform,
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
}

impl LightResources {
    pub fn new(device: &wgpu::Device, preset: LightPreset) -> Self {
        let uniform = LightUniform::from_preset(preset);
        let buffer = mk_buffer(device, uniform);
        let bind_group_layout = mk_bind_group_layout(device);
        let bind_group = mk_bind_group(device, &bind_group_layout, &buffer);
        Self {
            uniform,
            buffer,
            bind_group,
            bind_group_layout,
        }
    }
}

/// Maximum directional lights the shader iterates over.
pub const MAX_LIGHTS: usize = 3;

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightUniform {
    // Ambient colour with its intensity folded in; the trailing count packs
    // into the same 16 byte uniform slot as the vec3.
    ambient: [f32; 3],
    count: u32,
    // Normalized directions toward each light, w unused (16 byte spacing).
    directions: [[f32; 4]; MAX_LIGHTS],
    // Light colours with intensity folded in, w unused (16 byte spacing).
    colors: [[f32; 4]; MAX_LIGHTS],
}

impl LightUniform {
    pub fn from_preset(preset: LightPreset) -> Self {
        match preset {
            // White key light from the upper front right plus the classic
            // dim gray ambient.
            LightPreset::Single => Self::build(
                [0.25, 0.25, 0.25],
                0.5,
                &[([2.0, 2.0, 2.0], [1.0, 1.0, 1.0], 1.0)],
            ),
            LightPreset::Dual => Self::build(
                [0.25, 0.25, 0.25],
                0.4,
                &[
                    ([2.0, 2.0, 2.0], [1.0, 1.0, 1.0], 1.0),
                    ([-2.0, 1.0, -3.0], [0.4, 0.5, 0.8], 0.6),
                ],
            ),
            LightPreset::Studio => Self::build(
                [0.2, 0.2, 0.2],
                0.4,
                &[
                    ([2.0, 2.0, 2.0], [1.0, 1.0, 1.0], 1.0),
                    ([-3.0, 0.5, 2.0], [0.9, 0.9, 1.0], 0.4),
                    ([0.0, 3.0, -3.0], [1.0, 1.0, 0.95], 0.6),
                ],
            ),
        }
    }

    fn build(
        ambient_color: [f32; 3],
        ambient_intensity: f32,
        lights: &[([f32; 3], [f32; 3], f32)],
    ) -> Self {
        debug_assert!(lights.len() <= MAX_LIGHTS);
        let mut directions = [[0.0; 4]; MAX_LIGHTS];
        let mut colors = [[0.0; 4]; MAX_LIGHTS];
        for (i, &(direction, color, intensity)) in lights.iter().enumerate() {
            let direction = cgmath::Vector3::from(direction).normalize();
            directions[i] = [direction.x, direction.y, direction.z, 0.0];
            colors[i] = [
                color[0] * intensity,
                color[1] * intensity,
                color[2] * intensity,
                0.0,
            ];
        }
        Self {
            ambient: [
                ambient_color[0] * ambient_intensity,
                ambient_color[1] * ambient_intensity,
                ambient_color[2] * ambient_intensity,
            ],
            count: lights.len() as u32,
            directions,
            colors,
        }
    }

    pub fn light_count(&self) -> u32 {
        self.count
    }
}

pub fn mk_buffer(device: &wgpu::Device, light_uniform: LightUniform) -> wgpu::Buffer {
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("Light Buffer"),
        contents: bytemuck::cast_slice(&[light_uniform]),
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    })
}

pub fn mk_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
        label: None,
    })
}

pub fn mk_bind_group(
    device: &wgpu::Device,
    bind_group_layout: &wgpu::BindGroupLayout,
    light_buffer: &wgpu::Buffer,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        layout: bind_group_layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: light_buffer.as_entire_binding(),
        }],
        label: None,
    })
}
