use std::sync::Arc;

use anyhow::Context as _;
use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::{
    camera::{self, CameraResources, CameraUniform, Projection},
    config::ViewerConfig,
    data_structures::{model, texture},
    pipelines::{Pipelines, light::LightResources},
};

/// The window-backed presentation target. Headless contexts carry none and
/// render only through the off-screen sampler.
#[derive(Debug)]
pub struct SurfaceTarget {
    pub(crate) window: Arc<Window>,
    pub surface: wgpu::Surface<'static>,
    pub config: wgpu::SurfaceConfiguration,
    pub(crate) depth_texture: texture::Texture,
}

/// Everything one viewer session renders with. There are no module-level
/// globals; every operation that touches the GPU borrows a `Context`, so
/// several sessions can coexist in one process.
#[derive(Debug)]
pub struct Context {
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    /// Colour format shared by the surface (if present) and the sampler
    /// target, so one pipeline draws both.
    pub format: wgpu::TextureFormat,
    pub target: Option<SurfaceTarget>,
    pub camera: CameraResources,
    pub projection: Projection,
    pub light: LightResources,
    pub material_bind_group_layout: wgpu::BindGroupLayout,
    pub pipelines: Pipelines,
    pub clear_colour: wgpu::Color,
}

impl Context {
    pub async fn new(window: Arc<Window>, config: &ViewerConfig) -> anyhow::Result<Self> {
        let size = window.inner_size();

        // The instance is a handle to our GPU
        // BackendBit::PRIMARY => Vulkan + Metal + DX12 + Browser WebGPU
        log::warn!("WGPU setup");
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            #[cfg(not(target_arch = "wasm32"))]
            backends: wgpu::Backends::PRIMARY,
            #[cfg(target_arch = "wasm32")]
            backends: wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("creating render surface")?;

        let (adapter, device, queue) = request_device(&instance, Some(&surface)).await?;

        log::warn!("Surface");
        let surface_caps = surface.get_capabilities(&adapter);
        // Shader code assumes an Srgb surface texture. Using a different one
        // will result all the colors comming out darker.
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .unwrap_or(surface_caps.formats[0]);
        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: surface_caps.present_modes[0],
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &surface_config);

        let depth_texture = texture::Texture::create_depth_texture(
            &device,
            [surface_config.width, surface_config.height],
            "depth_texture",
        );

        let target = SurfaceTarget {
            window,
            surface,
            config: surface_config,
            depth_texture,
        };

        Ok(Self::assemble(
            device,
            queue,
            surface_format,
            Some(target),
            size.width.max(1),
            size.height.max(1),
            config,
        ))
    }

    /// A context without a window, rendering only into the sampler's
    /// off-screen texture. The projection takes its aspect from the sample
    /// grid instead of a surface.
    pub async fn headless(config: &ViewerConfig) -> anyhow::Result<Self> {
        log::warn!("WGPU setup");
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            #[cfg(not(target_arch = "wasm32"))]
            backends: wgpu::Backends::PRIMARY,
            #[cfg(target_arch = "wasm32")]
            backends: wgpu::Backends::GL,
            ..Default::default()
        });

        let (_adapter, device, queue) = request_device(&instance, None).await?;

        Ok(Self::assemble(
            device,
            queue,
            wgpu::TextureFormat::Rgba8UnormSrgb,
            None,
            config.grid.width,
            config.grid.height,
            config,
        ))
    }

    fn assemble(
        device: wgpu::Device,
        queue: wgpu::Queue,
        format: wgpu::TextureFormat,
        target: Option<SurfaceTarget>,
        width: u32,
        height: u32,
        config: &ViewerConfig,
    ) -> Self {
        // Looking down the Z axis at the origin until a model is framed.
        let camera = camera::Camera::new(
            (0.0, 0.0, 0.0),
            cgmath::Deg(0.0),
            cgmath::Deg(0.0),
            config.initial_distance,
        );
        let projection = camera::Projection::new(width, height, cgmath::Deg(45.0), 0.1, 1000.0);
        let camera_controller = camera::OrbitController::new(1.0, camera::DEFAULT_DAMPING);

        let mut camera_uniform = CameraUniform::new();

        camera_uniform.update_view_proj(&camera, &projection);

        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera Buffer"),
            contents: bytemuck::cast_slice(&[camera_uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let camera_bind_group_layout =
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
                label: Some("camera_bind_group_layout"),
            });

        let bind_group_layout = camera_bind_group_layout.clone();

        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &camera_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
            label: Some("camera_bind_group"),
        });

        let camera = CameraResources {
            camera,
            controller: camera_controller,
            uniform: camera_uniform,
            buffer: camera_buffer,
            bind_group: camera_bind_group,
            bind_group_layout,
        };

        let light = LightResources::new(&device, config.light_preset);

        let material_bind_group_layout = model::material_layout(&device);

        let pipelines = Pipelines::new(
            &device,
            format,
            &material_bind_group_layout,
            &camera.bind_group_layout,
            &light.bind_group_layout,
        );

        Self {
            device,
            queue,
            format,
            target,
            camera,
            projection,
            light,
            material_bind_group_layout,
            pipelines,
            clear_colour: config.clear_color,
        }
    }

    /// Reconfigure the surface and depth buffer after the window changed
    /// size. Zero extents (minimised window) are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.projection.resize(width, height);
        if let Some(target) = &mut self.target {
            target.config.width = width;
            target.config.height = height;
            target.surface.configure(&self.device, &target.config);
            target.depth_texture = texture::Texture::create_depth_texture(
                &self.device,
                [width, height],
                "depth_texture",
            );
        }
    }

    /// Push the current camera state to the GPU. Call after anything moved
    /// the camera and before encoding a pass.
    pub fn upload_camera(&mut self) {
        self.camera
            .uniform
            .update_view_proj(&self.camera.camera, &self.projection);
        self.queue.write_buffer(
            &self.camera.buffer,
            0,
            bytemuck::cast_slice(&[self.camera.uniform]),
        );
    }
}

async fn request_device(
    instance: &wgpu::Instance,
    compatible_surface: Option<&wgpu::Surface<'_>>,
) -> anyhow::Result<(wgpu::Adapter, wgpu::Device, wgpu::Queue)> {
    let adapter = instance
        .request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::default(),
            compatible_surface,
            force_fallback_adapter: false,
        })
        .await
        .context("no suitable graphics adapter")?;
    log::warn!("device and queue");
    let (device, queue) = adapter
        .request_device(&wgpu::DeviceDescriptor {
            label: None,
            required_features: wgpu::Features::empty(),
            // WebGL doesn't support all of wgpu's features, so if
            // we're building for the web we'll have to disable some.
            required_limits: if cfg!(target_arch = "wasm32") {
                wgpu::Limits::downlevel_webgl2_defaults()
            } else {
                wgpu::Limits::default()
            },
            experimental_features: Default::default(),
            memory_hints: Default::default(),
            trace: wgpu::Trace::Off,
        })
        .await
        .context("requesting graphics device")?;
    Ok((adapter, device, queue))
}
