use glam::Vec3;
use super::*;

fn event(was_visible: bool, is_visible: bool, previous_band: usize, current_band: usize) -> CullingEvent {
    CullingEvent { index: 0, was_visible, is_visible, previous_band, current_band }
}

// ============================================================================
// CullingEvent
// ============================================================================

#[test]
fn test_event_changes_flags() {
    assert_eq!(event(false, true, 0, 0).changes(), StateChange::VISIBILITY);
    assert_eq!(event(true, true, 0, 2).changes(), StateChange::DISTANCE_BAND);
    assert_eq!(
        event(true, false, 1, 2).changes(),
        StateChange::VISIBILITY | StateChange::DISTANCE_BAND
    );
    assert!(event(true, true, 1, 1).changes().is_empty());
}

#[test]
fn test_event_visibility_transitions() {
    assert!(event(false, true, 0, 0).has_become_visible());
    assert!(!event(false, true, 0, 0).has_become_invisible());
    assert!(event(true, false, 0, 0).has_become_invisible());
    assert!(!event(true, true, 0, 1).has_become_visible());
}

// ============================================================================
// Reference points
// ============================================================================

#[test]
fn test_tracked_position_is_shared_between_clones() {
    let owner = TrackedPosition::new(Vec3::ZERO);
    let reader = ReferencePoint::Tracked(owner.clone());

    owner.set(Vec3::new(1.0, 2.0, 3.0));

    assert_eq!(reader.position(), Vec3::new(1.0, 2.0, 3.0));
}

#[test]
fn test_fixed_reference_point() {
    let point = ReferencePoint::Fixed(Vec3::new(-4.0, 0.0, 9.0));
    assert_eq!(point.position(), Vec3::new(-4.0, 0.0, 9.0));
}

#[test]
fn test_reference_source_defaults_to_target_camera() {
    assert!(matches!(ReferenceSource::default(), ReferenceSource::TargetCamera));
}
