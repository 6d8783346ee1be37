use std::time::Duration;

use asciiview::camera::{Camera, DEFAULT_DAMPING, OrbitController, Projection};
use cgmath::{Deg, Point3, Rad};

fn close(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-4
}

#[test]
fn should_sit_on_the_z_axis_at_rest() {
    let camera = Camera::new(Point3::new(0.0, 0.0, 0.0), Rad(0.0), Rad(0.0), 5.0);
    let position = camera.position();

    assert!(close(position.x, 0.0));
    assert!(close(position.y, 0.0));
    assert!(close(position.z, 5.0));
}

#[test]
fn should_orbit_sideways_with_yaw() {
    let camera = Camera::new(Point3::new(0.0, 0.0, 0.0), Deg(90.0), Rad(0.0), 2.0);
    let position = camera.position();

    assert!(close(position.x, 2.0));
    assert!(close(position.y, 0.0));
    assert!(close(position.z, 0.0));
}

#[test]
fn should_rise_with_pitch() {
    let camera = Camera::new(Point3::new(0.0, 0.0, 0.0), Rad(0.0), Deg(90.0), 3.0);
    let position = camera.position();

    assert!(close(position.y, 3.0));
    assert!(close(position.z, 0.0));
}

#[test]
fn should_orbit_around_the_target() {
    let camera = Camera::new(Point3::new(1.0, 2.0, 3.0), Rad(0.0), Rad(0.0), 5.0);
    let position = camera.position();

    assert!(close(position.x, 1.0));
    assert!(close(position.y, 2.0));
    assert!(close(position.z, 8.0));
}

#[test]
fn should_reframe_head_on_at_the_origin() {
    let mut camera = Camera::new(Point3::new(1.0, 2.0, 3.0), Deg(45.0), Deg(-30.0), 9.0);
    camera.frame(4.0);

    assert_eq!(camera.target, Point3::new(0.0, 0.0, 0.0));
    let position = camera.position();
    assert!(close(position.x, 0.0));
    assert!(close(position.y, 0.0));
    assert!(close(position.z, 4.0));
}

#[test]
fn should_stand_still_without_input() {
    let mut camera = Camera::new(Point3::new(0.0, 0.0, 0.0), Rad(0.0), Rad(0.0), 5.0);
    let mut controller = OrbitController::new(1.0, DEFAULT_DAMPING);

    let moved = controller.update(&mut camera, Duration::from_millis(16));

    assert!(!moved);
    assert!(close(camera.yaw.0, 0.0));
    assert!(close(camera.pitch.0, 0.0));
    assert!(close(camera.distance, 5.0));
}

#[test]
fn should_ignore_motion_while_no_button_is_held() {
    let mut camera = Camera::new(Point3::new(0.0, 0.0, 0.0), Rad(0.0), Rad(0.0), 5.0);
    let mut controller = OrbitController::new(1.0, DEFAULT_DAMPING);

    controller.handle_mouse(40.0, -25.0);
    let moved = controller.update(&mut camera, Duration::from_millis(16));

    assert!(!moved);
    assert!(close(camera.yaw.0, 0.0));
}

#[test]
fn should_discard_pending_motion_on_reset() {
    let mut camera = Camera::new(Point3::new(0.0, 0.0, 0.0), Rad(0.0), Rad(0.0), 5.0);
    let mut controller = OrbitController::new(1.0, DEFAULT_DAMPING);

    // reset after input must leave the camera untouched on the next update
    controller.handle_mouse(500.0, 500.0);
    controller.reset();
    let moved = controller.update(&mut camera, Duration::from_millis(16));

    assert!(!moved);
}

#[test]
fn should_keep_the_projection_aspect_on_zero_sized_resizes() {
    let mut projection = Projection::new(100, 50, Deg(45.0), 0.1, 1000.0);
    let before = projection.calc_matrix();

    projection.resize(0, 0);

    assert_eq!(projection.calc_matrix(), before);
}

#[test]
fn should_change_the_projection_aspect_on_real_resizes() {
    let mut projection = Projection::new(100, 50, Deg(45.0), 0.1, 1000.0);
    let before = projection.calc_matrix();

    projection.resize(50, 50);

    assert_ne!(projection.calc_matrix(), before);
}
