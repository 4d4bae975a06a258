use super::*;

#[test]
fn test_shape_packing() {
    let sphere = BoundingSphere::from(Vec4::new(1.0, 2.0, 3.0, 4.0));

    assert_eq!(sphere.position, Vec3::new(1.0, 2.0, 3.0));
    assert_eq!(sphere.radius, 4.0);
    assert_eq!(sphere.shape(), Vec4::new(1.0, 2.0, 3.0, 4.0));
}

#[test]
fn test_layout_matches_packed_vec4() {
    assert_eq!(std::mem::size_of::<BoundingSphere>(), 16);

    let spheres = [BoundingSphere::new(Vec3::X, 0.5)];
    let floats: &[f32] = bytemuck::cast_slice(&spheres);
    assert_eq!(floats, &[1.0, 0.0, 0.0, 0.5]);
}

#[test]
fn test_distance_to_surface() {
    let sphere = BoundingSphere::new(Vec3::ZERO, 2.0);

    assert_eq!(sphere.distance_to(Vec3::new(5.0, 0.0, 0.0)), 3.0);
    assert_eq!(sphere.distance_to(Vec3::new(1.0, 0.0, 0.0)), 0.0, "inside the sphere");
}
