use asciiview::config::{GridSize, LightPreset, SampleMode, ViewerConfig};

#[test]
fn should_default_to_on_change_sampling() {
    let config = ViewerConfig::new();

    assert_eq!(config.sample_mode, SampleMode::OnChange);
    assert_eq!(config.grid.width, 120);
    assert_eq!(config.grid.height, 60);
    assert_eq!(config.grid.row_stride, 1);
    assert_eq!(config.light_preset, LightPreset::Single);
}

#[test]
fn should_validate_every_preset() {
    for config in [
        ViewerConfig::new(),
        ViewerConfig::compact(),
        ViewerConfig::dense(),
    ] {
        config.validate().unwrap();
    }
}

#[test]
fn should_sample_every_frame_in_the_dense_preset() {
    let config = ViewerConfig::dense();

    assert_eq!(config.sample_mode, SampleMode::PerFrame);
    assert_eq!(config.grid.row_stride, 2);
    assert_eq!(config.grid.rows(), 40);
}

#[test]
fn should_reject_empty_grids() {
    let mut config = ViewerConfig::new();
    config.grid.width = 0;
    assert!(config.validate().is_err());

    let mut config = ViewerConfig::new();
    config.grid.height = 0;
    assert!(config.validate().is_err());
}

#[test]
fn should_reject_zero_row_strides() {
    let mut config = ViewerConfig::new();
    config.grid.row_stride = 0;
    assert!(config.validate().is_err());
}

#[test]
fn should_reject_degenerate_fit_sizes() {
    for fit_size in [0.0, -1.0, f32::NAN, f32::INFINITY] {
        let mut config = ViewerConfig::new();
        config.fit_size = fit_size;
        assert!(config.validate().is_err(), "accepted fit size {}", fit_size);
    }
}

#[test]
fn should_reject_degenerate_initial_distances() {
    let mut config = ViewerConfig::new();
    config.initial_distance = 0.0;
    assert!(config.validate().is_err());
}

#[test]
fn should_count_rows_after_striding() {
    assert_eq!(GridSize::new(80, 50).rows(), 50);
    assert_eq!(
        GridSize {
            width: 120,
            height: 80,
            row_stride: 2
        }
        .rows(),
        40
    );
    // Partial trailing groups still emit a row.
    assert_eq!(
        GridSize {
            width: 10,
            height: 5,
            row_stride: 2
        }
        .rows(),
        3
    );
}
