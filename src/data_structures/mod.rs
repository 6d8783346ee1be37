//! Core data structures shared across the renderer:
//!
//! - `model` contains mesh and material definitions, GPU resources for 3D models
//! - `texture` contains the GPU depth texture wrapper
//! - `instance` holds the model's transformation as per-instance GPU data

pub mod instance;
pub mod model;
pub mod texture;
