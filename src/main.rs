#[cfg(not(target_arch = "wasm32"))]
use std::path::PathBuf;

#[cfg(not(target_arch = "wasm32"))]
use asciiview::{LightPreset, SampleMode, ViewerConfig};
#[cfg(not(target_arch = "wasm32"))]
use clap::Parser;

/// Parse a configuration preset by name
#[cfg(not(target_arch = "wasm32"))]
fn parse_preset(s: &str) -> Result<ViewerConfig, String> {
    match s {
        "default" => Ok(ViewerConfig::new()),
        "compact" => Ok(ViewerConfig::compact()),
        "dense" => Ok(ViewerConfig::dense()),
        _ => Err(format!(
            "Unknown preset '{}'. Available presets: default, compact, dense",
            s
        )),
    }
}

/// Parse a light rig by name
#[cfg(not(target_arch = "wasm32"))]
fn parse_lights(s: &str) -> Result<LightPreset, String> {
    match s {
        "single" => Ok(LightPreset::Single),
        "dual" => Ok(LightPreset::Dual),
        "studio" => Ok(LightPreset::Studio),
        _ => Err(format!(
            "Unknown light rig '{}'. Available rigs: single, dual, studio",
            s
        )),
    }
}

/// Parse and validate the fit size (positive, finite)
#[cfg(not(target_arch = "wasm32"))]
fn parse_fit_size(s: &str) -> Result<f32, String> {
    let size: f32 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;
    if !size.is_finite() || size <= 0.0 {
        return Err(format!("Fit size must be positive, got {}", size));
    }
    Ok(size)
}

#[cfg(not(target_arch = "wasm32"))]
#[derive(Parser)]
#[command(name = "asciiview")]
#[command(version, about = "View STL and OBJ models as live ASCII art")]
#[command(after_help = "EXAMPLES:
    # Open a model with the default 120x60 grid
    asciiview model.stl

    # Smaller grid, sampled every frame
    asciiview model.obj --preset compact

    # Tall render with every second row emitted
    asciiview model.stl --preset dense

    # Custom grid and a three-light rig
    asciiview model.stl --width 160 --height 90 --lights studio

Drop another .stl or .obj file onto the window to switch models.")]
struct Cli {
    /// Model file to open (.stl or .obj)
    model: Option<PathBuf>,

    /// Configuration preset to start from: default, compact or dense
    #[arg(long, default_value = "default", value_parser = parse_preset)]
    preset: ViewerConfig,

    /// Character grid width
    #[arg(long, short = 'W')]
    width: Option<u32>,

    /// Character grid height (rows rendered, before any stride)
    #[arg(long, short = 'H')]
    height: Option<u32>,

    /// Emit every n-th rendered row
    #[arg(long)]
    stride: Option<u32>,

    /// World size the model's longest axis is scaled to
    #[arg(long, value_parser = parse_fit_size)]
    fit_size: Option<f32>,

    /// Light rig: single, dual or studio
    #[arg(long, value_parser = parse_lights)]
    lights: Option<LightPreset>,

    /// Re-sample every frame instead of only after view changes
    #[arg(long)]
    per_frame: bool,
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    let cli = Cli::parse();

    let mut config = cli.preset;
    if let Some(width) = cli.width {
        config.grid.width = width;
    }
    if let Some(height) = cli.height {
        config.grid.height = height;
    }
    if let Some(stride) = cli.stride {
        config.grid.row_stride = stride;
    }
    if let Some(fit_size) = cli.fit_size {
        config.fit_size = fit_size;
    }
    if let Some(lights) = cli.lights {
        config.light_preset = lights;
    }
    if cli.per_frame {
        config.sample_mode = SampleMode::PerFrame;
    }

    if let Err(e) = asciiview::run(config, cli.model) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

// The web build is driven through the library; there is no CLI to run.
#[cfg(target_arch = "wasm32")]
fn main() {}
