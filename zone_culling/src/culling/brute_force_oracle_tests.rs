use glam::{Mat4, Vec3};
use crate::camera::Camera;
use crate::culling::oracle::{ReferencePoint, TrackedPosition};
use super::*;

// ============================================================================
// Helpers
// ============================================================================

fn at(x: f32) -> BoundingSphere {
    BoundingSphere::new(Vec3::new(x, 0.0, 0.0), 0.0)
}

fn origin_oracle(thresholds: &[f32], count: usize) -> BruteForceOracle {
    let mut oracle = BruteForceOracle::new();
    oracle.set_distance_reference(ReferenceSource::Override(ReferencePoint::Fixed(Vec3::ZERO)));
    oracle.set_bounding_distances(thresholds);
    oracle.set_bounding_sphere_count(count);
    oracle
}

fn evaluate(oracle: &mut BruteForceOracle, spheres: &[BoundingSphere]) -> Vec<CullingEvent> {
    let mut events = Vec::new();
    oracle.evaluate(spheres, &mut events).unwrap();
    events
}

// ============================================================================
// Classification
// ============================================================================

#[test]
fn test_bands_from_distance() {
    let mut oracle = origin_oracle(&[50.0, 80.0], 3);
    evaluate(&mut oracle, &[at(40.0), at(65.0), at(90.0)]);

    assert_eq!(oracle.distance_band(0), 0);
    assert_eq!(oracle.distance_band(1), 1);
    assert_eq!(oracle.distance_band(2), 2);
    assert!(oracle.is_visible(0), "no camera: everything is visible");
}

#[test]
fn test_distance_is_measured_to_sphere_surface() {
    let mut oracle = origin_oracle(&[50.0], 1);
    evaluate(&mut oracle, &[BoundingSphere::new(Vec3::new(55.0, 0.0, 0.0), 10.0)]);

    assert_eq!(oracle.distance_band(0), 0);
}

#[test]
fn test_camera_frustum_drives_visibility_and_position() {
    // Camera at z = 5 looking down -Z
    let view = Mat4::look_at_rh(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::Y);
    let projection = Mat4::perspective_rh(std::f32::consts::FRAC_PI_2, 1.0, 0.1, 100.0);
    let camera = Camera::from_matrices(view, projection).into_shared();

    let mut oracle = BruteForceOracle::with_camera(camera);
    oracle.set_bounding_distances(&[10.0]);
    oracle.set_bounding_sphere_count(2);

    let spheres = [
        BoundingSphere::new(Vec3::ZERO, 1.0),
        BoundingSphere::new(Vec3::new(0.0, 0.0, 30.0), 1.0), // behind the camera
    ];
    evaluate(&mut oracle, &spheres);

    assert!(oracle.is_visible(0));
    assert_eq!(oracle.distance_band(0), 0);
    assert!(!oracle.is_visible(1));
    assert_eq!(oracle.distance_band(1), 1);
}

#[test]
fn test_tracked_reference_point_is_read_each_evaluation() {
    let tracked = TrackedPosition::new(Vec3::ZERO);
    let mut oracle = BruteForceOracle::new();
    oracle.set_distance_reference(ReferenceSource::Override(ReferencePoint::Tracked(tracked.clone())));
    oracle.set_bounding_distances(&[10.0]);
    oracle.set_bounding_sphere_count(1);

    evaluate(&mut oracle, &[at(5.0)]);
    assert_eq!(oracle.distance_band(0), 0);

    tracked.set(Vec3::new(-20.0, 0.0, 0.0));
    evaluate(&mut oracle, &[at(5.0)]);
    assert_eq!(oracle.distance_band(0), 1);
}

// ============================================================================
// Change events
// ============================================================================

#[test]
fn test_events_only_for_changed_elements_in_index_order() {
    let mut oracle = origin_oracle(&[10.0], 3);

    let first = evaluate(&mut oracle, &[at(20.0), at(1.0), at(30.0)]);
    // Initial state is (invisible, band 0): all three change visibility
    assert_eq!(first.iter().map(|e| e.index).collect::<Vec<_>>(), vec![0, 1, 2]);

    let second = evaluate(&mut oracle, &[at(20.0), at(15.0), at(30.0)]);
    assert_eq!(second.len(), 1);
    assert_eq!(second[0].index, 1);
    assert_eq!(second[0].previous_band, 0);
    assert_eq!(second[0].current_band, 1);
    assert!(second[0].was_visible && second[0].is_visible);

    assert!(evaluate(&mut oracle, &[at(20.0), at(15.0), at(30.0)]).is_empty());
}

#[test]
fn test_disabled_oracle_emits_nothing() {
    let mut oracle = origin_oracle(&[10.0], 1);
    oracle.set_enabled(false);

    assert!(!oracle.is_enabled());
    assert!(evaluate(&mut oracle, &[at(20.0)]).is_empty());
    assert_eq!(oracle.distance_band(0), 0);
}

// ============================================================================
// Lockstep bookkeeping
// ============================================================================

#[test]
fn test_erase_swap_back_relocates_last_state() {
    let mut oracle = origin_oracle(&[10.0, 20.0], 3);
    evaluate(&mut oracle, &[at(1.0), at(15.0), at(25.0)]);

    oracle.erase_swap_back(0);

    assert_eq!(oracle.len(), 2);
    assert_eq!(oracle.distance_band(0), 2);
    assert_eq!(oracle.distance_band(1), 1);
}

#[test]
fn test_mismatched_sphere_count_is_an_error() {
    let mut oracle = origin_oracle(&[10.0], 2);
    let mut events = Vec::new();

    assert!(oracle.evaluate(&[at(1.0)], &mut events).is_err());
}

#[test]
fn test_target_camera_without_camera_is_an_error() {
    let mut oracle = BruteForceOracle::new();
    oracle.set_bounding_sphere_count(1);
    let mut events = Vec::new();

    assert!(!oracle.has_target_camera());
    assert!(oracle.evaluate(&[at(1.0)], &mut events).is_err());
}

#[test]
#[should_panic]
fn test_query_out_of_range_is_fatal() {
    let oracle = origin_oracle(&[10.0], 1);
    oracle.is_visible(1);
}

#[test]
fn test_dispose_releases_state() {
    let camera = Camera::from_matrices(Mat4::IDENTITY, Mat4::IDENTITY).into_shared();
    let mut oracle = BruteForceOracle::with_camera(camera);
    oracle.set_bounding_sphere_count(4);

    oracle.dispose();

    assert!(oracle.is_empty());
    assert!(!oracle.has_target_camera());
}
