/// Brute-force visibility oracle, O(n) tests on every live sphere.
///
/// Visibility is a sphere/frustum test against the target camera (every
/// sphere is visible without a camera). The distance band is computed
/// from the sphere surface to the resolved reference point.
///
/// Suitable for the small, fixed-capacity element sets culling systems
/// are sized for, and as a baseline for backend oracles.

use glam::Vec3;
use crate::camera::{Frustum, SharedCamera};
use crate::error::{Error, Result};
use crate::{engine_bail, engine_fatal};
use super::bounding_sphere::BoundingSphere;
use super::distance_bands::classify_distance;
use super::oracle::{CullingEvent, ReferenceSource, VisibilityOracle};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct SphereState {
    visible: bool,
    band: usize,
}

pub struct BruteForceOracle {
    camera: Option<SharedCamera>,
    reference: ReferenceSource,
    thresholds: Vec<f32>,
    /// One entry per live sphere
    states: Vec<SphereState>,
    enabled: bool,
}

impl BruteForceOracle {
    /// Oracle without a target camera: everything is visible and the
    /// reference point must come from a `ReferenceSource::Override`.
    pub fn new() -> Self {
        Self {
            camera: None,
            reference: ReferenceSource::TargetCamera,
            thresholds: Vec::new(),
            states: Vec::new(),
            enabled: true,
        }
    }

    /// Oracle testing visibility against `camera`.
    pub fn with_camera(camera: SharedCamera) -> Self {
        Self {
            camera: Some(camera),
            ..Self::new()
        }
    }

    pub fn set_camera(&mut self, camera: Option<SharedCamera>) {
        self.camera = camera;
    }

    /// Number of live states (mirrors the culling system's live count)
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn bounding_distances(&self) -> &[f32] {
        &self.thresholds
    }

    /// Snapshot the camera frustum and resolve the reference point.
    fn frame_inputs(&self) -> Result<(Option<Frustum>, Vec3)> {
        let camera = match &self.camera {
            Some(camera) => {
                let guard = camera.read()
                    .map_err(|_| Error::LockPoisoned("target camera".to_string()))?;
                Some((*guard.frustum(), guard.position()))
            }
            None => None,
        };

        let reference = match (&self.reference, camera) {
            (ReferenceSource::Override(point), _) => point.position(),
            (ReferenceSource::TargetCamera, Some((_, position))) => position,
            (ReferenceSource::TargetCamera, None) => {
                engine_bail!("zonecull::BruteForceOracle",
                    "Reference source is the target camera but no camera is set");
            }
        };

        Ok((camera.map(|(frustum, _)| frustum), reference))
    }

    fn state(&self, index: usize) -> SphereState {
        match self.states.get(index) {
            Some(state) => *state,
            None => engine_fatal!("zonecull::BruteForceOracle",
                "Index {} out of range (live count {})", index, self.states.len()),
        }
    }
}

impl Default for BruteForceOracle {
    fn default() -> Self {
        Self::new()
    }
}

impl VisibilityOracle for BruteForceOracle {
    fn has_target_camera(&self) -> bool {
        self.camera.is_some()
    }

    fn set_bounding_sphere_count(&mut self, count: usize) {
        self.states.resize(count, SphereState::default());
    }

    fn set_bounding_distances(&mut self, distances: &[f32]) {
        self.thresholds = distances.to_vec();
    }

    fn set_distance_reference(&mut self, source: ReferenceSource) {
        self.reference = source;
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn evaluate(&mut self, spheres: &[BoundingSphere], events: &mut Vec<CullingEvent>) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }
        if spheres.len() != self.states.len() {
            engine_bail!("zonecull::BruteForceOracle",
                "Sphere buffer holds {} live spheres but the oracle tracks {}",
                spheres.len(), self.states.len());
        }

        let (frustum, reference) = self.frame_inputs()?;

        for (index, (sphere, state)) in spheres.iter().zip(self.states.iter_mut()).enumerate() {
            let current = SphereState {
                visible: frustum.map_or(true, |frustum| frustum.intersects_sphere(sphere)),
                band: classify_distance(&self.thresholds, sphere.distance_to(reference)),
            };

            if current != *state {
                events.push(CullingEvent {
                    index,
                    was_visible: state.visible,
                    is_visible: current.visible,
                    previous_band: state.band,
                    current_band: current.band,
                });
                *state = current;
            }
        }

        Ok(())
    }

    fn erase_swap_back(&mut self, index: usize) {
        if index >= self.states.len() {
            engine_fatal!("zonecull::BruteForceOracle",
                "Cannot erase index {} (live count {})", index, self.states.len());
        }
        self.states.swap_remove(index);
    }

    fn is_visible(&self, index: usize) -> bool {
        self.state(index).visible
    }

    fn distance_band(&self, index: usize) -> usize {
        self.state(index).band
    }

    fn dispose(&mut self) {
        self.camera = None;
        self.states.clear();
    }
}

#[cfg(test)]
#[path = "brute_force_oracle_tests.rs"]
mod tests;
