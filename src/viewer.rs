//! The viewer application: window, event loop and live character output.
//!
//! [`run`] drives one viewer session. Each frame the orbit controller is
//! updated, the scene is drawn to the window surface and, depending on the
//! configured [`SampleMode`], re-sampled into characters and handed to the
//! sink. Model decoding runs off the event loop thread; completions come
//! back as [`ViewerEvent`]s through the winit proxy, where the scene's load
//! ticket decides whether the result is still wanted.

use std::{path::PathBuf, sync::Arc};

use instant::Instant;
use winit::{
    application::ApplicationHandler,
    event::{DeviceEvent, DeviceId, ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop, EventLoopProxy},
    keyboard::{Key, NamedKey},
    window::Window,
};

use crate::{
    config::{SampleMode, ViewerConfig},
    context::Context,
    normalize,
    resources::{self, DecodedModel, LoadError},
    sampler::FrameSampler,
    scene::{LoadTicket, Scene},
    sink::AsciiSink,
};

#[cfg(not(target_arch = "wasm32"))]
use crate::sink::TerminalSink;
#[cfg(target_arch = "wasm32")]
use crate::sink::DomSink;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// Completions of work that ran off the event loop thread.
pub enum ViewerEvent {
    /// The context finished initializing. Only the browser build takes this
    /// path; native initialization blocks inside `resumed`.
    Initialized(Context),
    Loaded {
        ticket: LoadTicket,
        decoded: DecodedModel,
    },
    LoadFailed {
        ticket: LoadTicket,
        name: String,
        error: LoadError,
    },
}

/// Everything that exists once the context is up.
struct ViewerState {
    ctx: Context,
    scene: Scene,
    sampler: FrameSampler,
    /// The view changed since the last successful sample; drives
    /// [`SampleMode::OnChange`].
    dirty: bool,
}

impl ViewerState {
    /// Put a decoded model on screen: fit it, upload it, swap it into the
    /// scene and reframe the camera onto it.
    fn commit(&mut self, config: &ViewerConfig, decoded: DecodedModel) {
        let (placement, frame) =
            normalize::fit_placement(decoded.positions(), config.orientation, config.fit_size);
        let model = resources::mesh::upload_model(
            &self.ctx.device,
            &decoded,
            config.material_color,
            &self.ctx.material_bind_group_layout,
        );
        self.scene
            .replace(&self.ctx.device, &decoded.name, model, placement.into());
        self.ctx.camera.camera.frame(frame.distance);
        self.ctx.camera.controller.reset();
        self.dirty = true;
        log::info!(
            "Loaded {} ({} triangles)",
            decoded.name,
            decoded.triangle_count()
        );
    }

    /// Draw the scene to the window surface. Headless sessions have no
    /// surface and return immediately.
    fn render_visible(&mut self) -> Result<(), wgpu::SurfaceError> {
        let Some(target) = &self.ctx.target else {
            return Ok(());
        };
        // invoke main render loop
        target.window.request_redraw();

        let output = target.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });
        {
            use crate::data_structures::model::DrawModel;

            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.ctx.clear_colour),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &target.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            if let Some(entry) = self.scene.model() {
                render_pass.set_pipeline(&self.ctx.pipelines.mesh);
                render_pass.set_vertex_buffer(1, entry.instance_buffer.slice(..));
                render_pass.draw_model_instanced(
                    &entry.model,
                    0..1,
                    &self.ctx.camera.bind_group,
                    &self.ctx.light.bind_group,
                );
            }
        }
        self.ctx.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}

pub struct Viewer {
    config: ViewerConfig,
    #[cfg(not(target_arch = "wasm32"))]
    initial_model: Option<PathBuf>,
    #[cfg(not(target_arch = "wasm32"))]
    async_runtime: tokio::runtime::Runtime,
    #[cfg(not(target_arch = "wasm32"))]
    sink: Box<dyn AsciiSink>,
    #[cfg(target_arch = "wasm32")]
    sink: DomSink,
    proxy: EventLoopProxy<ViewerEvent>,
    state: Option<ViewerState>,
    last_time: Instant,
}

impl Viewer {
    fn new(
        event_loop: &EventLoop<ViewerEvent>,
        config: ViewerConfig,
        #[cfg(not(target_arch = "wasm32"))] initial_model: Option<PathBuf>,
    ) -> anyhow::Result<Self> {
        let proxy = event_loop.create_proxy();
        #[cfg(not(target_arch = "wasm32"))]
        let async_runtime = tokio::runtime::Runtime::new()?;
        #[cfg(not(target_arch = "wasm32"))]
        let sink: Box<dyn AsciiSink> = Box::new(TerminalSink::new()?);
        #[cfg(target_arch = "wasm32")]
        let sink = DomSink::attach("ascii-output")?;
        Ok(Self {
            config,
            #[cfg(not(target_arch = "wasm32"))]
            initial_model,
            #[cfg(not(target_arch = "wasm32"))]
            async_runtime,
            sink,
            proxy,
            state: None,
            last_time: Instant::now(),
        })
    }

    /// Build per-session state around a ready context and kick off the
    /// redraw loop.
    fn install(&mut self, mut ctx: Context) {
        let sampler = FrameSampler::new(&ctx, self.config.grid);
        // Important: trigger a resize and redraw now that we are initialized
        if let Some(size) = ctx.target.as_ref().map(|t| t.window.inner_size()) {
            ctx.resize(size.width, size.height);
        }
        if let Some(target) = &ctx.target {
            target.window.request_redraw();
        }
        self.last_time = Instant::now();
        self.state = Some(ViewerState {
            ctx,
            scene: Scene::new(),
            sampler,
            dirty: false,
        });
    }

    /// Start decoding a model file off-thread. The ticket taken here makes
    /// the completion droppable if another load begins in the meantime.
    #[cfg(not(target_arch = "wasm32"))]
    fn begin_load(&mut self, path: PathBuf) {
        let Some(state) = &mut self.state else {
            return;
        };
        let ticket = state.scene.begin_load();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        log::info!("Loading {}", name);
        let proxy = self.proxy.clone();
        self.async_runtime.spawn_blocking(move || {
            let event = match resources::load_model(&path) {
                Ok(decoded) => ViewerEvent::Loaded { ticket, decoded },
                Err(error) => ViewerEvent::LoadFailed {
                    ticket,
                    name,
                    error,
                },
            };
            let _ = proxy.send_event(event);
        });
    }
}

impl ApplicationHandler<ViewerEvent> for Viewer {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        #[allow(unused_mut)]
        let mut window_attributes = Window::default_attributes().with_title("asciiview");

        #[cfg(target_arch = "wasm32")]
        {
            use wasm_bindgen::JsCast;
            use winit::platform::web::WindowAttributesExtWebSys;

            const CANVAS_ID: &str = "canvas";

            let window = wgpu::web_sys::window().unwrap_throw();
            let document = window.document().unwrap_throw();
            let canvas = document.get_element_by_id(CANVAS_ID).unwrap_throw();
            let html_canvas_element = canvas.unchecked_into();
            window_attributes = window_attributes.with_canvas(Some(html_canvas_element));
        }

        let window = Arc::new(event_loop.create_window(window_attributes).unwrap());

        #[cfg(not(target_arch = "wasm32"))]
        {
            let ctx = match self
                .async_runtime
                .block_on(Context::new(window, &self.config))
            {
                Ok(ctx) => ctx,
                Err(e) => {
                    log::error!("Viewer initialization failed: {}", e);
                    event_loop.exit();
                    return;
                }
            };
            self.install(ctx);
            if let Some(path) = self.initial_model.take() {
                self.begin_load(path);
            }
        }

        #[cfg(target_arch = "wasm32")]
        {
            let proxy = self.proxy.clone();
            let config = self.config.clone();
            wasm_bindgen_futures::spawn_local(async move {
                match Context::new(window, &config).await {
                    Ok(ctx) => {
                        assert!(proxy.send_event(ViewerEvent::Initialized(ctx)).is_ok())
                    }
                    Err(e) => log::error!("Viewer initialization failed: {}", e),
                }
            });
        }
    }

    fn user_event(&mut self, _event_loop: &ActiveEventLoop, event: ViewerEvent) {
        match event {
            ViewerEvent::Initialized(ctx) => {
                // This is the message from our wasm `spawn_local`
                self.install(ctx);
            }
            ViewerEvent::Loaded { ticket, decoded } => {
                let Some(state) = &mut self.state else {
                    return;
                };
                if !state.scene.is_current(ticket) {
                    log::debug!("Dropping superseded load of {}", decoded.name);
                    return;
                }
                state.commit(&self.config, decoded);
            }
            ViewerEvent::LoadFailed {
                ticket,
                name,
                error,
            } => {
                let Some(state) = &self.state else {
                    return;
                };
                if state.scene.is_current(ticket) {
                    // The shown model stays; a failed load never clears
                    // the scene.
                    log::error!("Unable to load {}: {}", name, error);
                } else {
                    log::debug!("Superseded load of {} failed: {}", name, error);
                }
            }
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        let Some(state) = &mut self.state else {
            return;
        };
        if let DeviceEvent::MouseMotion { delta: (dx, dy) } = event {
            state.ctx.camera.controller.handle_mouse(dx, dy);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let Some(state) = &mut self.state else {
            return;
        };

        state.ctx.camera.controller.handle_window_events(&event);

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        logical_key: Key::Named(NamedKey::Escape),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => event_loop.exit(),
            WindowEvent::Resized(size) => state.ctx.resize(size.width, size.height),
            #[cfg(not(target_arch = "wasm32"))]
            WindowEvent::DroppedFile(path) => self.begin_load(path),
            WindowEvent::RedrawRequested => {
                let dt = self.last_time.elapsed();
                self.last_time = Instant::now();

                // Update the camera
                if state
                    .ctx
                    .camera
                    .controller
                    .update(&mut state.ctx.camera.camera, dt)
                {
                    state.dirty = true;
                }
                state.ctx.upload_camera();

                match state.render_visible() {
                    Ok(()) => {}
                    // Reconfigure the surface if it's lost or outdated
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        if let Some(size) =
                            state.ctx.target.as_ref().map(|t| t.window.inner_size())
                        {
                            state.ctx.resize(size.width, size.height);
                        }
                    }
                    Err(e) => log::error!("Unable to render {}", e),
                }

                let sample_now = match self.config.sample_mode {
                    SampleMode::PerFrame => true,
                    SampleMode::OnChange => state.dirty,
                };
                if sample_now {
                    #[cfg(not(target_arch = "wasm32"))]
                    {
                        if let Some(frame) = self
                            .async_runtime
                            .block_on(state.sampler.sample(&state.ctx, &state.scene))
                        {
                            if let Err(e) = self.sink.present(&frame) {
                                log::error!("Unable to present frame {}", e);
                            }
                            state.dirty = false;
                        }
                    }
                    #[cfg(target_arch = "wasm32")]
                    {
                        if state.sampler.render(&state.ctx, &state.scene) {
                            let read_back = state.sampler.read_back(&state.ctx);
                            let mut sink = self.sink.clone();
                            wasm_bindgen_futures::spawn_local(async move {
                                if let Some(frame) = read_back.await {
                                    if let Err(e) = sink.present(&frame) {
                                        log::error!("Unable to present frame {}", e);
                                    }
                                }
                            });
                            state.dirty = false;
                        }
                    }
                }
            }
            _ => {}
        }
    }
}

/// Run a viewer session until its window closes.
///
/// `initial_model` is decoded and shown as soon as the context is up;
/// further models can be dropped onto the window at any time.
pub fn run(config: ViewerConfig, initial_model: Option<PathBuf>) -> anyhow::Result<()> {
    config.validate()?;

    #[cfg(not(target_arch = "wasm32"))]
    {
        if let Err(e) = env_logger::try_init() {
            println!("Warning: Could not initialize logger: {}", e);
        };
    }

    #[cfg(target_arch = "wasm32")]
    {
        console_log::init_with_level(log::Level::Info).unwrap_throw();
        if initial_model.is_some() {
            log::warn!("File paths are not loadable in the browser build");
        }
    }

    #[cfg(all(feature = "integration-tests", target_os = "linux"))]
    let event_loop: EventLoop<ViewerEvent> = {
        use winit::platform::wayland::EventLoopBuilderExtWayland;

        winit::event_loop::EventLoop::with_user_event()
            .with_any_thread(true)
            .build()
            .expect("Failed to create an event loop")
    };

    #[cfg(all(feature = "integration-tests", target_os = "windows"))]
    let event_loop: EventLoop<ViewerEvent> = {
        use winit::platform::windows::EventLoopBuilderExtWindows;

        winit::event_loop::EventLoop::with_user_event()
            .with_any_thread(true)
            .build()
            .expect("Failed to create an event loop")
    };

    #[cfg(not(feature = "integration-tests"))]
    let event_loop: EventLoop<ViewerEvent> = EventLoop::with_user_event().build()?;

    let mut viewer = Viewer::new(
        &event_loop,
        config,
        #[cfg(not(target_arch = "wasm32"))]
        initial_model,
    )?;

    event_loop.run_app(&mut viewer)?;

    Ok(())
}
