#![cfg(feature = "integration-tests")]

use asciiview::{
    config::ViewerConfig,
    context::Context,
    normalize,
    resources::{self, decode_model},
    sampler::FrameSampler,
    scene::Scene,
};

/// A unit cube with all faces wound counter-clockwise seen from outside,
/// so nothing is lost to back-face culling.
const CUBE_OBJ: &str = "\
v -1 -1 -1
v 1 -1 -1
v 1 1 -1
v -1 1 -1
v -1 -1 1
v 1 -1 1
v 1 1 1
v -1 1 1
f 5 6 7 8
f 1 4 3 2
f 1 2 6 5
f 4 8 7 3
f 2 3 7 6
f 1 5 8 4
";

const PYRAMID_STL: &str = "\
solid pyramid
  facet normal 0 0 1
    outer loop
      vertex -1 -1 0
      vertex 1 -1 0
      vertex 0 1 0
    endloop
  endfacet
endsolid pyramid
";

/// Decode, normalize, upload and swap a model into the scene, then aim the
/// camera at it the way the viewer does after a load completes.
fn show(ctx: &mut Context, scene: &mut Scene, config: &ViewerConfig, name: &str, bytes: &[u8]) {
    let decoded = decode_model(name, bytes).unwrap();
    let (placement, frame) =
        normalize::fit_placement(decoded.positions(), config.orientation, config.fit_size);
    let model = resources::mesh::upload_model(
        &ctx.device,
        &decoded,
        config.material_color,
        &ctx.material_bind_group_layout,
    );
    scene.replace(&ctx.device, &decoded.name, model, placement.into());
    ctx.camera.camera.frame(frame.distance);
    ctx.upload_camera();
}

#[tokio::test]
async fn should_sample_a_loaded_model_into_characters() {
    let config = ViewerConfig::new();
    let mut ctx = Context::headless(&config).await.unwrap();
    let mut scene = Scene::new();
    show(&mut ctx, &mut scene, &config, "cube.obj", CUBE_OBJ.as_bytes());

    let sampler = FrameSampler::new(&ctx, config.grid);
    let frame = sampler.sample(&ctx, &scene).await.expect("a sampled frame");

    assert_eq!(frame.width(), config.grid.width);
    assert_eq!(frame.height(), config.grid.rows());

    let lines: Vec<&str> = frame.lines().collect();
    assert_eq!(lines.len(), config.grid.rows() as usize);

    // The camera frames the whole model with margin, so the grid corners
    // stay background while the center shows the model.
    let top = lines.first().unwrap();
    let bottom = lines.last().unwrap();
    assert!(top.starts_with(' ') && top.ends_with(' '));
    assert!(bottom.starts_with(' ') && bottom.ends_with(' '));

    let middle = lines[lines.len() / 2];
    let center = middle.chars().nth((frame.width() / 2) as usize).unwrap();
    assert_ne!(center, ' ');
}

#[tokio::test]
async fn should_skip_sampling_while_no_model_is_loaded() {
    let config = ViewerConfig::new();
    let ctx = Context::headless(&config).await.unwrap();
    let scene = Scene::new();
    let sampler = FrameSampler::new(&ctx, config.grid);

    assert!(sampler.sample(&ctx, &scene).await.is_none());
}

#[tokio::test]
async fn should_repeat_identical_frames_for_a_still_camera() {
    let config = ViewerConfig::new();
    let mut ctx = Context::headless(&config).await.unwrap();
    let mut scene = Scene::new();
    show(&mut ctx, &mut scene, &config, "cube.obj", CUBE_OBJ.as_bytes());

    let sampler = FrameSampler::new(&ctx, config.grid);
    let first = sampler.sample(&ctx, &scene).await.unwrap();
    let second = sampler.sample(&ctx, &scene).await.unwrap();

    assert_eq!(first.text(), second.text());
}

#[tokio::test]
async fn should_show_only_the_latest_model() {
    let config = ViewerConfig::new();
    let mut ctx = Context::headless(&config).await.unwrap();
    let mut scene = Scene::new();

    show(&mut ctx, &mut scene, &config, "cube.obj", CUBE_OBJ.as_bytes());
    show(&mut ctx, &mut scene, &config, "pyramid.stl", PYRAMID_STL.as_bytes());

    assert_eq!(scene.model_count(), 1);
    assert_eq!(scene.model().unwrap().name, "pyramid.stl");
}

#[tokio::test]
async fn should_apply_the_row_stride_to_sampled_frames() {
    let config = ViewerConfig::dense();
    let mut ctx = Context::headless(&config).await.unwrap();
    let mut scene = Scene::new();
    show(&mut ctx, &mut scene, &config, "cube.obj", CUBE_OBJ.as_bytes());

    let sampler = FrameSampler::new(&ctx, config.grid);
    let frame = sampler.sample(&ctx, &scene).await.unwrap();

    // 80 rendered rows, every second one emitted.
    assert_eq!(frame.width(), 120);
    assert_eq!(frame.height(), 40);
}
