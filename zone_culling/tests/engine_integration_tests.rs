//! Integration tests for Engine lifecycle and management
//!
//! These tests verify the complete Engine workflow: named culling systems
//! created, ticked together, and destroyed through the public API.
//!
//! Run with: cargo test --test engine_integration_tests

use zone_culling::glam::{Mat4, Vec3};
use zone_culling::zonecull::Engine;
use zone_culling::zonecull::camera::Camera;
use zone_culling::zonecull::culling::{
    BoundingSphere, BruteForceOracle, ComponentCull, CullingConfig,
};
use serial_test::serial;

// ============================================================================
// ENGINE LIFECYCLE TESTS
// ============================================================================

#[test]
#[serial]
fn test_integration_engine_full_lifecycle() {
    // Step 1: Initialize engine
    Engine::initialize().unwrap();

    // Step 2: Create one culling system per zone
    let view = Mat4::look_at_rh(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO, Vec3::Y);
    let projection = Mat4::perspective_rh(std::f32::consts::FRAC_PI_2, 1.0, 0.1, 500.0);
    let camera = Camera::from_matrices(view, projection).into_shared();

    let overworld = Engine::create_culling_system("lifecycle_overworld", CullingConfig::default()).unwrap();
    let dungeon = Engine::create_culling_system("lifecycle_dungeon", CullingConfig::default()).unwrap();
    for system in [&overworld, &dungeon] {
        system.lock().unwrap()
            .activate(Box::new(BruteForceOracle::with_camera(camera.clone())))
            .unwrap();
    }
    assert_eq!(Engine::culling_system_names(), vec!["lifecycle_dungeon", "lifecycle_overworld"]);

    // Step 3: Register elements and tick every zone
    let near = ComponentCull::new(Vec::new()).into_shared();
    let far = ComponentCull::with_band_range(Vec::new(), 1, 2).into_shared();
    {
        let mut overworld = overworld.lock().unwrap();
        ComponentCull::register(&near, &mut overworld, BoundingSphere::new(Vec3::ZERO, 1.0)).unwrap();
    }
    {
        let mut dungeon = dungeon.lock().unwrap();
        ComponentCull::register(&far, &mut dungeon, BoundingSphere::new(Vec3::new(0.0, 0.0, -400.0), 1.0)).unwrap();
    }

    Engine::tick_all().unwrap();

    // Default thresholds are 134 and 200
    assert_eq!(near.lock().unwrap().distance_band(), 0);
    assert!(near.lock().unwrap().is_visible());
    assert_eq!(far.lock().unwrap().distance_band(), 2);
    assert!(far.lock().unwrap().is_visible());
    assert!(!far.lock().unwrap().components_active());

    // Step 4: Camera moves close to the far element
    let view = Mat4::look_at_rh(Vec3::new(0.0, 0.0, -390.0), Vec3::new(0.0, 0.0, -400.0), Vec3::Y);
    *camera.write().unwrap() = Camera::from_matrices(view, projection);
    Engine::tick_all().unwrap();
    assert_eq!(far.lock().unwrap().distance_band(), 0);
    assert!(far.lock().unwrap().components_active());

    // Step 5: Destroy one zone, then shut down
    Engine::destroy_culling_system("lifecycle_dungeon").unwrap();
    assert!(dungeon.lock().unwrap().is_disposed());
    assert_eq!(Engine::culling_system_count(), 1);

    Engine::shutdown();
    assert_eq!(Engine::culling_system_count(), 0);
    assert!(overworld.lock().unwrap().is_disposed());
}

#[test]
#[serial]
fn test_integration_unknown_system_lookup_fails() {
    Engine::initialize().unwrap();

    assert!(Engine::culling_system("integration_unknown").is_err());
    assert!(Engine::destroy_culling_system("integration_unknown").is_err());
}
