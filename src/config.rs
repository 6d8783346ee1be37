//! Viewer configuration.
//!
//! All the knobs that historically varied between builds of the viewer live
//! in [`ViewerConfig`]: target fit size, off-screen sampling resolution,
//! light rig and sampling trigger. The named constructors reproduce the
//! historical variants; [`ViewerConfig::default`] is the refined one.

use anyhow::ensure;
use cgmath::{Deg, Quaternion, Rotation3};

/// Off-screen sampling resolution.
///
/// `row_stride` emits every n-th row of the rendered frame; terminal cells
/// are roughly twice as tall as wide, so a stride of 2 over a taller render
/// keeps the model's proportions without losing horizontal detail.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridSize {
    pub width: u32,
    pub height: u32,
    pub row_stride: u32,
}

impl GridSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            row_stride: 1,
        }
    }

    /// Rows in the emitted character grid.
    pub fn rows(&self) -> u32 {
        self.height.div_ceil(self.row_stride.max(1))
    }
}

/// Directional light arrangements, all over a black background.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LightPreset {
    /// One white key light plus dim ambient fill.
    #[default]
    Single,
    /// Key light plus a cooler light from behind, separating silhouettes.
    Dual,
    /// Key, fill and rim lights.
    Studio,
}

/// When the off-screen frame is re-sampled into characters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SampleMode {
    /// Every redraw, whether or not anything moved.
    PerFrame,
    /// Only when the orbit controller reports movement or the model
    /// changes. Output is identical, idle frames just skip the read-back.
    #[default]
    OnChange,
}

#[derive(Clone, Debug)]
pub struct ViewerConfig {
    /// Length the model's longest axis is scaled to.
    pub fit_size: f32,
    pub grid: GridSize,
    pub light_preset: LightPreset,
    pub sample_mode: SampleMode,
    /// Rotation applied to every model before fitting, chosen so that the
    /// common STL export orientation (Z up) faces the camera pleasantly.
    pub orientation: Quaternion<f32>,
    /// Orbit distance before any model is loaded.
    pub initial_distance: f32,
    /// Flat material colour, linear RGB.
    pub material_color: [f32; 3],
    pub clear_color: wgpu::Color,
}

impl ViewerConfig {
    /// 120×60 grid, fit size 4, sampling on view change.
    pub fn new() -> Self {
        Self {
            fit_size: 4.0,
            grid: GridSize::new(120, 60),
            light_preset: LightPreset::default(),
            sample_mode: SampleMode::default(),
            orientation: default_orientation(),
            initial_distance: 5.0,
            material_color: [0.0, 1.0, 0.0],
            clear_color: wgpu::Color::BLACK,
        }
    }

    /// 80×50 grid at unit fit size, sampled every frame.
    pub fn compact() -> Self {
        Self {
            fit_size: 1.0,
            grid: GridSize::new(80, 50),
            sample_mode: SampleMode::PerFrame,
            ..Self::new()
        }
    }

    /// 120×80 render with every second row emitted, sampled every frame.
    pub fn dense() -> Self {
        Self {
            grid: GridSize {
                width: 120,
                height: 80,
                row_stride: 2,
            },
            sample_mode: SampleMode::PerFrame,
            ..Self::new()
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(self.grid.width > 0, "grid width must be at least 1");
        ensure!(self.grid.height > 0, "grid height must be at least 1");
        ensure!(self.grid.row_stride > 0, "grid row stride must be at least 1");
        ensure!(
            self.fit_size.is_finite() && self.fit_size > 0.0,
            "fit size must be positive and finite"
        );
        ensure!(
            self.initial_distance.is_finite() && self.initial_distance > 0.0,
            "initial camera distance must be positive and finite"
        );
        Ok(())
    }
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// The default reorientation: -90° about X (Z-up exports end up Y-up),
/// then 22.5° about Y for a slight three-quarter view.
pub fn default_orientation() -> Quaternion<f32> {
    Quaternion::from_angle_y(Deg(22.5)) * Quaternion::from_angle_x(Deg(-90.0))
}
