use asciiview::normalize::{Aabb, FRAMING_FACTOR, fit_placement};
use cgmath::{Deg, Point3, Quaternion, Rotation3};

fn close(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-3
}

fn identity() -> Quaternion<f32> {
    Quaternion::from_angle_y(Deg(0.0))
}

#[test]
fn should_compute_bounds_of_a_point_set() {
    let aabb = Aabb::from_points([
        Point3::new(1.0, 5.0, -2.0),
        Point3::new(-3.0, 2.0, 4.0),
        Point3::new(0.0, 3.0, 0.0),
    ])
    .unwrap();

    assert_eq!(aabb.min, Point3::new(-3.0, 2.0, -2.0));
    assert_eq!(aabb.max, Point3::new(1.0, 5.0, 4.0));
    assert!(close(aabb.max_dim(), 6.0));
    assert_eq!(aabb.center(), Point3::new(-1.0, 3.5, 1.0));
}

#[test]
fn should_report_no_bounds_for_no_points() {
    assert!(Aabb::from_points(std::iter::empty::<Point3<f32>>()).is_none());
}

#[test]
fn should_scale_the_longest_axis_to_the_fit_size() {
    let points = [[0.0, 0.0, 0.0], [2.0, 1.0, 0.5]];
    let (placement, _) = fit_placement(points, identity(), 4.0);

    assert!(close(placement.scale, 2.0));
}

#[test]
fn should_center_the_fitted_model_at_the_origin() {
    let points = [[1.0, 1.0, 1.0], [3.0, 2.0, 1.5]];
    let (placement, _) = fit_placement(points, identity(), 4.0);

    // Longest axis 2 at fit size 4 doubles the model; the scaled box center
    // (4, 3, 2.5) moves back to the origin.
    assert!(close(placement.translation.x, -4.0));
    assert!(close(placement.translation.y, -3.0));
    assert!(close(placement.translation.z, -2.5));
}

#[test]
fn should_frame_the_camera_from_the_bounding_radius() {
    let points = [[-1.0, -1.0, -1.0], [1.0, 1.0, 1.0]];
    let (_, frame) = fit_placement(points, identity(), 2.0);

    // The cube keeps its size; half its diagonal is sqrt(3).
    assert!(close(frame.distance, FRAMING_FACTOR * 3.0f32.sqrt()));
}

#[test]
fn should_fall_back_for_empty_point_sets() {
    let (placement, frame) = fit_placement(std::iter::empty(), identity(), 4.0);

    assert!(close(placement.scale, 1.0));
    assert!(close(placement.translation.x, 0.0));
    assert!(close(placement.translation.y, 0.0));
    assert!(close(placement.translation.z, 0.0));
    assert!(close(frame.distance, FRAMING_FACTOR));
}

#[test]
fn should_keep_scale_for_single_point_models() {
    let points = [[5.0, 0.0, 0.0], [5.0, 0.0, 0.0]];
    let (placement, frame) = fit_placement(points, identity(), 4.0);

    assert!(close(placement.scale, 1.0));
    assert!(close(placement.translation.x, -5.0));
    assert!(close(frame.distance, FRAMING_FACTOR));
}

#[test]
fn should_measure_bounds_after_the_orientation_is_applied() {
    let points = [[0.0, 0.0, 0.0], [10.0, 0.0, 0.0]];
    let quarter_turn = Quaternion::from_angle_y(Deg(90.0));
    let (placement, _) = fit_placement(points, quarter_turn, 1.0);

    // The X extent lands on -Z; the fitted box spans z in [-1, 0].
    assert!(close(placement.scale, 0.1));
    assert!(close(placement.translation.x, 0.0));
    assert!(close(placement.translation.z, 0.5));
}

#[test]
fn should_carry_the_orientation_into_the_placement() {
    let quarter_turn = Quaternion::from_angle_y(Deg(90.0));
    let (placement, _) = fit_placement([[0.0, 0.0, 0.0], [1.0, 1.0, 1.0]], quarter_turn, 1.0);

    assert_eq!(placement.rotation, quarter_turn);
}
