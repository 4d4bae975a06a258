/// Bounding sphere used for coarse visibility and distance tests.
///
/// Laid out as a packed `Vec4` (xyz = position, w = radius) so that
/// GPU-backed oracles can upload the live sphere buffer as raw bytes.

use bytemuck::{Pod, Zeroable};
use glam::{Vec3, Vec4};

/// Position + radius approximation of an element's extent.
///
/// Has no identity of its own: it is identified only by its registry index.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
pub struct BoundingSphere {
    /// World-space center
    pub position: Vec3,
    /// Radius (fixed at registration time)
    pub radius: f32,
}

impl BoundingSphere {
    pub fn new(position: Vec3, radius: f32) -> Self {
        Self { position, radius }
    }

    /// Build a sphere from a packed shape (xyz = position, w = radius).
    pub fn from_shape(shape: Vec4) -> Self {
        Self {
            position: shape.truncate(),
            radius: shape.w,
        }
    }

    /// Packed shape (xyz = position, w = radius).
    pub fn shape(&self) -> Vec4 {
        self.position.extend(self.radius)
    }

    /// Distance from `point` to the sphere surface, zero if `point` is inside.
    pub fn distance_to(&self, point: Vec3) -> f32 {
        (self.position.distance(point) - self.radius).max(0.0)
    }
}

impl From<Vec4> for BoundingSphere {
    fn from(shape: Vec4) -> Self {
        Self::from_shape(shape)
    }
}

#[cfg(test)]
#[path = "bounding_sphere_tests.rs"]
mod tests;
