//! asciiview
//!
//! A cross-platform 3D model viewer that renders to text. STL and OBJ models
//! are normalized into a unit-ish box, shaded through a small wgpu pipeline
//! and sampled into a low resolution character grid, which is streamed to the
//! terminal (native) or a DOM element (web) while the user orbits, pans and
//! zooms with the mouse. The windowed render and the character output always
//! share one camera.
//!
//! High-level modules
//! - `ascii`: the brightness-to-glyph ramp and the character frame type
//! - `camera`: orbital camera, controller and uniforms for view/projection
//! - `config`: viewer configuration (grid size, lights, sampling cadence)
//! - `context`: central GPU context that owns device/queue/pipelines
//! - `data_structures`: viewer data models (meshes, instances, textures)
//! - `normalize`: bounds-based fit of a model into the view volume
//! - `pipelines`: the mesh render pipeline and light resources
//! - `resources`: STL/OBJ decoding and GPU mesh upload
//! - `sampler`: off-screen render target and frame read-back
//! - `scene`: the single displayed model and load-ticket bookkeeping
//! - `sink`: terminal and DOM outputs for character frames
//! - `viewer`: window, event loop and the live viewing session
//!

pub mod ascii;
pub mod camera;
pub mod config;
pub mod context;
pub mod data_structures;
pub mod normalize;
pub mod pipelines;
pub mod resources;
pub mod sampler;
pub mod scene;
pub mod sink;
pub mod viewer;

// Re-exports commonly used types for convenience in downstream code.
pub use ascii::AsciiFrame;
pub use config::{GridSize, LightPreset, SampleMode, ViewerConfig};
pub use viewer::run;
pub use winit::dpi::PhysicalPosition;
pub use cgmath::*;
pub use winit::event::DeviceEvent;
pub use winit::event::WindowEvent;
pub use wgpu::*;
