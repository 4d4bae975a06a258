/// Visibility oracle contract.
///
/// A VisibilityOracle evaluates the live bounding spheres of a culling
/// system against a reference point and a threshold table, once per tick,
/// and reports which elements changed visibility or distance band.
/// Implementations range from brute-force CPU tests (`BruteForceOracle`)
/// to GPU or engine-provided queries.
///
/// The oracle keeps its own per-index state buffer. The culling system
/// keeps it in lockstep with the bounding registry through
/// `set_bounding_sphere_count` and `erase_swap_back`.

use std::sync::{Arc, RwLock};
use bitflags::bitflags;
use glam::Vec3;
use crate::error::Result;
use super::bounding_sphere::BoundingSphere;

bitflags! {
    /// What changed for one element between two evaluations.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct StateChange: u8 {
        const VISIBILITY    = 1 << 0;
        const DISTANCE_BAND = 1 << 1;
    }
}

/// One element's classification change, emitted by an oracle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CullingEvent {
    /// Registry index at the time of evaluation
    pub index: usize,
    pub was_visible: bool,
    pub is_visible: bool,
    pub previous_band: usize,
    pub current_band: usize,
}

impl CullingEvent {
    pub fn changes(&self) -> StateChange {
        let mut changes = StateChange::empty();
        if self.was_visible != self.is_visible {
            changes |= StateChange::VISIBILITY;
        }
        if self.previous_band != self.current_band {
            changes |= StateChange::DISTANCE_BAND;
        }
        changes
    }

    pub fn has_become_visible(&self) -> bool {
        !self.was_visible && self.is_visible
    }

    pub fn has_become_invisible(&self) -> bool {
        self.was_visible && !self.is_visible
    }
}

/// Position shared between its owner (writer) and an oracle (reader).
///
/// Stands in for a tracked transform: the owner moves it, the oracle
/// reads it at every evaluation.
#[derive(Debug, Clone, Default)]
pub struct TrackedPosition(Arc<RwLock<Vec3>>);

impl TrackedPosition {
    pub fn new(position: Vec3) -> Self {
        Self(Arc::new(RwLock::new(position)))
    }

    pub fn set(&self, position: Vec3) {
        match self.0.write() {
            Ok(mut guard) => *guard = position,
            Err(poisoned) => *poisoned.into_inner() = position,
        }
    }

    pub fn get(&self) -> Vec3 {
        match self.0.read() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}

/// Point from which distances to elements are measured.
#[derive(Debug, Clone)]
pub enum ReferencePoint {
    Fixed(Vec3),
    Tracked(TrackedPosition),
}

impl ReferencePoint {
    pub fn position(&self) -> Vec3 {
        match self {
            ReferencePoint::Fixed(position) => *position,
            ReferencePoint::Tracked(tracked) => tracked.get(),
        }
    }
}

/// Where the reference point comes from.
#[derive(Debug, Clone, Default)]
pub enum ReferenceSource {
    /// The oracle's target camera position
    #[default]
    TargetCamera,
    /// An explicit point or tracked position
    Override(ReferencePoint),
}

/// Strategy evaluating bounding spheres into visibility and distance bands.
///
/// Out-of-range indices passed to the synchronous queries are programming
/// errors; implementations may panic.
pub trait VisibilityOracle: Send {
    /// Whether a target camera is available for `ReferenceSource::TargetCamera`.
    fn has_target_camera(&self) -> bool;

    /// Resize the per-index state buffer to the live count.
    fn set_bounding_sphere_count(&mut self, count: usize);

    /// Replace the ascending distance thresholds.
    fn set_bounding_distances(&mut self, distances: &[f32]);

    fn set_distance_reference(&mut self, source: ReferenceSource);

    /// A disabled oracle emits no events and keeps its last state.
    fn set_enabled(&mut self, enabled: bool);

    fn is_enabled(&self) -> bool;

    /// Evaluate `spheres` (exactly the live count) and append one event per
    /// changed element, in increasing index order.
    fn evaluate(&mut self, spheres: &[BoundingSphere], events: &mut Vec<CullingEvent>) -> Result<()>;

    /// Move the last live state into `index` and shrink the live count by one.
    fn erase_swap_back(&mut self, index: usize);

    /// Visibility computed by the last evaluation.
    fn is_visible(&self, index: usize) -> bool;

    /// Distance band computed by the last evaluation.
    fn distance_band(&self, index: usize) -> usize;

    /// Release backend resources. Called once on culling system teardown.
    fn dispose(&mut self) {}
}

#[cfg(test)]
#[path = "oracle_tests.rs"]
mod tests;
