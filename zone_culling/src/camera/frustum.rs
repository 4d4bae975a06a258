/// Frustum — six clipping planes for visibility tests.
///
/// Each plane is represented as a Vec4 (A, B, C, D) where:
/// - (A, B, C) is the inward-pointing unit normal
/// - D is the signed distance
/// - A point P is inside the frustum if dot(plane, P_homogeneous) >= 0 for all planes
///
/// The caller is responsible for computing and setting the frustum.
/// `from_view_projection()` is provided as a utility.

use glam::{Mat4, Vec3, Vec4};
use crate::culling::BoundingSphere;

/// Six frustum planes.
///
/// Each plane is (A, B, C, D) where Ax + By + Cz + D = 0.
/// Works with both perspective and orthographic projections.
/// Expects [0, 1] clip depth, as produced by glam's `*_rh`/`*_lh` projections.
#[derive(Debug, Clone, Copy)]
pub struct Frustum {
    /// Frustum planes: left, right, bottom, top, near, far
    pub planes: [Vec4; 6],
}

impl Frustum {
    /// Extract frustum planes from a view-projection matrix.
    ///
    /// Uses the Gribb & Hartmann method.
    pub fn from_view_projection(vp: &Mat4) -> Self {
        let m = vp.to_cols_array_2d();

        let mut planes = [
            // Left:   row3 + row0
            Vec4::new(m[0][3] + m[0][0], m[1][3] + m[1][0], m[2][3] + m[2][0], m[3][3] + m[3][0]),
            // Right:  row3 - row0
            Vec4::new(m[0][3] - m[0][0], m[1][3] - m[1][0], m[2][3] - m[2][0], m[3][3] - m[3][0]),
            // Bottom: row3 + row1
            Vec4::new(m[0][3] + m[0][1], m[1][3] + m[1][1], m[2][3] + m[2][1], m[3][3] + m[3][1]),
            // Top:    row3 - row1
            Vec4::new(m[0][3] - m[0][1], m[1][3] - m[1][1], m[2][3] - m[2][1], m[3][3] - m[3][1]),
            // Near:   row2 ([0, 1] depth, row3 + row2 would be the [-1, 1] form)
            Vec4::new(m[0][2], m[1][2], m[2][2], m[3][2]),
            // Far:    row3 - row2
            Vec4::new(m[0][3] - m[0][2], m[1][3] - m[1][2], m[2][3] - m[2][2], m[3][3] - m[3][2]),
        ];

        // Sphere tests need unit normals so that D is a true distance
        for plane in &mut planes {
            let normal_len = Vec3::new(plane.x, plane.y, plane.z).length();
            if normal_len > 0.0 {
                *plane /= normal_len;
            }
        }

        Self { planes }
    }

    /// Test if a bounding sphere intersects this frustum.
    ///
    /// Conservative: may return false positives near frustum corners,
    /// never false negatives.
    pub fn intersects_sphere(&self, sphere: &BoundingSphere) -> bool {
        self.planes.iter().all(|plane| {
            Self::signed_distance(plane, sphere.position) >= -sphere.radius
        })
    }

    fn signed_distance(plane: &Vec4, point: Vec3) -> f32 {
        Vec3::new(plane.x, plane.y, plane.z).dot(point) + plane.w
    }
}

#[cfg(test)]
#[path = "frustum_tests.rs"]
mod tests;
