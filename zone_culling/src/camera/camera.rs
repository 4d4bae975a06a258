/// Camera — low-level passive data container.
///
/// The caller (game loop) is responsible for computing and setting the
/// view matrix, projection matrix and frustum. The only derived value is
/// the world-space position, read back from the view matrix because it is
/// the default distance reference point of a culling system.

use std::sync::{Arc, RwLock};
use glam::{Mat4, Vec3};
use super::frustum::Frustum;

/// Camera shared between the game loop (writer) and a visibility oracle (reader).
pub type SharedCamera = Arc<RwLock<Camera>>;

/// Low-level camera. A passive data container.
#[derive(Debug, Clone)]
pub struct Camera {
    view_matrix: Mat4,
    projection_matrix: Mat4,
    frustum: Frustum,
}

impl Camera {
    /// Create a new camera with the given parameters.
    pub fn new(view: Mat4, projection: Mat4, frustum: Frustum) -> Self {
        Self {
            view_matrix: view,
            projection_matrix: projection,
            frustum,
        }
    }

    /// Create a camera whose frustum is extracted from `projection * view`.
    pub fn from_matrices(view: Mat4, projection: Mat4) -> Self {
        let frustum = Frustum::from_view_projection(&(projection * view));
        Self::new(view, projection, frustum)
    }

    /// Wrap this camera for sharing with an oracle.
    pub fn into_shared(self) -> SharedCamera {
        Arc::new(RwLock::new(self))
    }

    // ===== GETTERS =====

    /// View matrix (inverse of the camera's world transform).
    pub fn view_matrix(&self) -> &Mat4 {
        &self.view_matrix
    }

    /// Projection matrix (perspective or orthographic).
    pub fn projection_matrix(&self) -> &Mat4 {
        &self.projection_matrix
    }

    /// Combined view-projection matrix (projection * view).
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix * self.view_matrix
    }

    /// Frustum planes.
    pub fn frustum(&self) -> &Frustum {
        &self.frustum
    }

    /// World-space position (translation of the inverse view matrix).
    pub fn position(&self) -> Vec3 {
        self.view_matrix.inverse().w_axis.truncate()
    }

    // ===== SETTERS — store, compute nothing =====

    /// Set the view matrix.
    pub fn set_view(&mut self, matrix: Mat4) {
        self.view_matrix = matrix;
    }

    /// Set the projection matrix.
    pub fn set_projection(&mut self, matrix: Mat4) {
        self.projection_matrix = matrix;
    }

    /// Set the frustum.
    pub fn set_frustum(&mut self, frustum: Frustum) {
        self.frustum = frustum;
    }
}

#[cfg(test)]
#[path = "camera_tests.rs"]
mod tests;
