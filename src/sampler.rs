//! Off-screen rendering and frame read-back for the glyph converter.
//!
//! The sampler owns a colour target at the character grid's resolution, a
//! matching depth buffer and a persistent read-back buffer. Each sample
//! renders the scene with the context's pipeline and camera, copies the
//! colour target into the buffer, maps it and hands the pixels to
//! [`crate::ascii`]. Rows come back top row first, so emitted lines run
//! top to bottom. A failed read-back drops that frame's output instead of
//! failing the caller.

use std::{
    future::Future,
    iter,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

#[cfg(not(target_arch = "wasm32"))]
use instant::Duration;

use crate::{
    ascii::AsciiFrame,
    config::GridSize,
    context::Context,
    data_structures::{model::DrawModel, texture},
    scene::Scene,
};

/// Copies out of a texture must have rows aligned to
/// `wgpu::COPY_BYTES_PER_ROW_ALIGNMENT`; the padding is stripped again
/// during glyph conversion.
fn align_bytes_per_row(width: u32) -> u32 {
    (width * 4).next_multiple_of(wgpu::COPY_BYTES_PER_ROW_ALIGNMENT)
}

#[derive(Debug)]
pub struct FrameSampler {
    grid: GridSize,
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    depth_texture: texture::Texture,
    output_buffer: wgpu::Buffer,
    padded_bytes_per_row: u32,
    /// Set while a read-back is outstanding; renders are skipped until the
    /// mapping resolves so the buffer is never copied into while mapped.
    in_flight: Arc<AtomicBool>,
}

impl FrameSampler {
    pub fn new(ctx: &Context, grid: GridSize) -> Self {
        let texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Sample texture"),
            size: wgpu::Extent3d {
                width: grid.width,
                height: grid.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: ctx.format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let depth_texture = texture::Texture::create_depth_texture(
            &ctx.device,
            [grid.width, grid.height],
            "sample_depth_texture",
        );

        let padded_bytes_per_row = align_bytes_per_row(grid.width);
        let output_buffer = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Sample read-back buffer"),
            size: padded_bytes_per_row as wgpu::BufferAddress
                * grid.height as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        Self {
            grid,
            texture,
            view,
            depth_texture,
            output_buffer,
            padded_bytes_per_row,
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn grid(&self) -> GridSize {
        self.grid
    }

    /// Render the scene into the off-screen target and queue the copy into
    /// the read-back buffer. Returns false without touching the GPU when
    /// the scene is empty or the previous read-back has not resolved yet.
    pub fn render(&self, ctx: &Context, scene: &Scene) -> bool {
        let Some(entry) = scene.model() else {
            return false;
        };
        if self.in_flight.swap(true, Ordering::Relaxed) {
            return false;
        }

        let mut encoder = ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Sample Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Sample Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &self.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(ctx.clear_colour),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            render_pass.set_pipeline(&ctx.pipelines.mesh);
            render_pass.set_vertex_buffer(1, entry.instance_buffer.slice(..));
            render_pass.draw_model_instanced(
                &entry.model,
                0..1,
                &ctx.camera.bind_group,
                &ctx.light.bind_group,
            );
        }

        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                aspect: wgpu::TextureAspect::All,
                texture: &self.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &self.output_buffer,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(self.padded_bytes_per_row),
                    rows_per_image: Some(self.grid.height),
                },
            },
            wgpu::Extent3d {
                width: self.grid.width,
                height: self.grid.height,
                depth_or_array_layers: 1,
            },
        );

        ctx.queue.submit(iter::once(encoder.finish()));
        true
    }

    /// Resolve the queued read-back into a character frame. The returned
    /// future owns its handles, so the browser build can park it on the
    /// task queue while the native build blocks on it.
    pub fn read_back(&self, ctx: &Context) -> impl Future<Output = Option<AsciiFrame>> + use<> {
        let device = ctx.device.clone();
        let output_buffer = self.output_buffer.clone();
        let grid = self.grid;
        let padded_bytes_per_row = self.padded_bytes_per_row;
        let in_flight = self.in_flight.clone();
        async move {
            let frame = map_and_convert(&device, &output_buffer, grid, padded_bytes_per_row).await;
            in_flight.store(false, Ordering::Relaxed);
            match frame {
                Ok(frame) => Some(frame),
                Err(e) => {
                    log::debug!("Dropping sampled frame: {}", e);
                    None
                }
            }
        }
    }

    /// Render and read back in one go.
    pub async fn sample(&self, ctx: &Context, scene: &Scene) -> Option<AsciiFrame> {
        if !self.render(ctx, scene) {
            return None;
        }
        self.read_back(ctx).await
    }
}

async fn map_and_convert(
    device: &wgpu::Device,
    output_buffer: &wgpu::Buffer,
    grid: GridSize,
    padded_bytes_per_row: u32,
) -> anyhow::Result<AsciiFrame> {
    let buffer_slice = output_buffer.slice(..);
    // NOTE: We have to create the mapping THEN device.poll() before await
    // the future. Otherwise the application will freeze.
    let (tx, rx) = futures_intrusive::channel::shared::oneshot_channel();
    buffer_slice.map_async(wgpu::MapMode::Read, move |result| {
        let _ = tx.send(result);
    });
    #[cfg(target_arch = "wasm32")]
    let polled = device.poll(wgpu::PollType::Poll);
    #[cfg(not(target_arch = "wasm32"))]
    let polled = device.poll(wgpu::PollType::Wait {
        submission_index: None,
        timeout: Some(Duration::from_secs(3)),
    });
    if let Err(e) = polled {
        // Cancel the outstanding mapping so the buffer can be reused.
        output_buffer.unmap();
        anyhow::bail!("device poll failed: {e}");
    }
    match rx.receive().await {
        Some(Ok(())) => {}
        Some(Err(e)) => return Err(e.into()),
        None => anyhow::bail!("mapping callback dropped"),
    }

    let frame = {
        let data = buffer_slice.get_mapped_range();
        AsciiFrame::from_rgba_padded(
            &data,
            grid.width,
            grid.height,
            padded_bytes_per_row as usize,
            grid.row_stride,
        )
    };
    output_buffer.unmap();
    Ok(frame)
}
