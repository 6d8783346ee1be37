//! Scene state: the one loaded model and the load generation counter.
//!
//! The scene holds at most one model; bringing in a new one replaces the
//! old, whose GPU resources drop with it. Because decoding runs off-thread,
//! every load first takes a [`LoadTicket`]; a completion whose ticket is no
//! longer current belongs to a load the user has since superseded and must
//! be discarded, so two overlapping file selections can never interleave.

use wgpu::util::DeviceExt;

use crate::data_structures::{instance::Instance, model::Model};

/// Token identifying one load request. Stale tickets fail
/// [`Scene::is_current`] once a newer load has begun.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoadTicket(u64);

/// The loaded model together with its normalizing placement, ready to draw.
#[derive(Debug)]
pub struct SceneModel {
    pub name: String,
    pub model: Model,
    pub placement: Instance,
    pub instance_buffer: wgpu::Buffer,
}

#[derive(Debug, Default)]
pub struct Scene {
    model: Option<SceneModel>,
    generation: u64,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a load: bumps the generation, invalidating every ticket handed
    /// out before.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation += 1;
        LoadTicket(self.generation)
    }

    /// Whether `ticket` still belongs to the most recent load request.
    pub fn is_current(&self, ticket: LoadTicket) -> bool {
        ticket.0 == self.generation
    }

    /// Swap in a freshly uploaded model. The previous model, if any, is
    /// dropped here along with its buffers.
    pub fn replace(&mut self, device: &wgpu::Device, name: &str, model: Model, placement: Instance) {
        let instance_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{:?} Instance Buffer", name)),
            contents: bytemuck::cast_slice(&[placement.to_raw()]),
            usage: wgpu::BufferUsages::VERTEX,
        });
        self.model = Some(SceneModel {
            name: name.to_string(),
            model,
            placement,
            instance_buffer,
        });
    }

    pub fn clear(&mut self) {
        self.model = None;
    }

    pub fn model(&self) -> Option<&SceneModel> {
        self.model.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.model.is_none()
    }

    /// Number of models in the scene, by construction never above one.
    pub fn model_count(&self) -> usize {
        self.model.is_some() as usize
    }
}
