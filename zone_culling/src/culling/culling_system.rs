/// Culling system: distance-band visibility culling for one scene or zone.
///
/// Owns a fixed-capacity `BoundingRegistry` and a `DistanceBandTable`,
/// drives an injected `VisibilityOracle` once per tick, and routes the
/// oracle's change events to the registered `CullingElement`s by index.
///
/// Lifecycle:
///
/// ```text
/// new() ──► Inactive ──activate(oracle)──► Active ──dispose()──► Disposed
/// ```
///
/// Elements may register while Inactive. Their baseline state is delivered
/// through `CullingElement::initial_state` at the end of the first tick
/// after activation; elements registered later get theirs at the end of
/// the first tick following their registration.

use glam::Vec3;
use crate::error::{Error, Result};
use crate::{engine_debug, engine_error, engine_fatal, engine_info, engine_trace, engine_warn};
use super::bounding_sphere::BoundingSphere;
use super::config::CullingConfig;
use super::distance_bands::{BandLayout, DistanceBandTable};
use super::element::{CullingElement, ElementHandle};
use super::oracle::{CullingEvent, ReferenceSource, StateChange, VisibilityOracle};
use super::registry::BoundingRegistry;

const SOURCE: &str = "zonecull::CullingSystem";

enum SystemState {
    /// Created, no oracle yet
    Inactive,
    Active(Box<dyn VisibilityOracle>),
    /// Oracle disposed, registry dropped. Unregistration is a no-op.
    Disposed,
}

pub struct CullingSystem {
    registry: BoundingRegistry,
    bands: DistanceBandTable,
    reference_source: ReferenceSource,
    state: SystemState,
    enabled: bool,
    /// Reused event buffer, drained every tick
    events: Vec<CullingEvent>,
}

impl CullingSystem {
    /// Create an inactive culling system.
    ///
    /// A negative max culling distance is clamped to zero.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidConfig` if the capacity is zero.
    pub fn new(config: CullingConfig) -> Result<Self> {
        if config.capacity == 0 {
            let error = Error::InvalidConfig("Culling system capacity must be greater than zero".to_string());
            engine_error!(SOURCE, "{}", error);
            return Err(error);
        }
        if config.max_culling_distance < 0.0 {
            engine_warn!(SOURCE, "Negative max culling distance {} clamped to 0", config.max_culling_distance);
        }

        let bands = DistanceBandTable::new(
            config.distance_bands,
            config.band_layout,
            config.max_culling_distance,
        );

        Ok(Self {
            registry: BoundingRegistry::with_capacity(config.capacity),
            bands,
            reference_source: config.reference_source,
            state: SystemState::Inactive,
            enabled: true,
            events: Vec::with_capacity(config.capacity),
        })
    }

    // ===== LIFECYCLE =====

    /// Install and configure the oracle.
    ///
    /// # Errors
    ///
    /// Returns `Error::InitializationFailed` if:
    /// - The system is already active or disposed
    /// - The reference source is the target camera and the oracle has none
    pub fn activate(&mut self, mut oracle: Box<dyn VisibilityOracle>) -> Result<()> {
        match self.state {
            SystemState::Active(_) => {
                return Err(Self::init_error("Culling system is already active"));
            }
            SystemState::Disposed => {
                return Err(Self::init_error("Culling system has been disposed"));
            }
            SystemState::Inactive => {}
        }
        if matches!(self.reference_source, ReferenceSource::TargetCamera) && !oracle.has_target_camera() {
            return Err(Self::init_error("Reference source is the target camera but the oracle has no camera"));
        }

        oracle.set_bounding_sphere_count(self.registry.len());
        oracle.set_bounding_distances(self.bands.thresholds());
        oracle.set_distance_reference(self.reference_source.clone());
        oracle.set_enabled(self.enabled);
        self.state = SystemState::Active(oracle);

        engine_info!(SOURCE, "Activated with {} element(s), {} distance band(s)",
            self.registry.len(), self.bands.top_band() + 1);
        Ok(())
    }

    /// Dispose the oracle and drop every element reference.
    ///
    /// Elements are not notified. Later `unregister` calls are no-ops.
    pub fn dispose(&mut self) {
        if let SystemState::Active(oracle) = &mut self.state {
            oracle.dispose();
        }
        if !matches!(self.state, SystemState::Disposed) {
            engine_info!(SOURCE, "Disposed ({} element(s) still registered)", self.registry.len());
        }
        self.state = SystemState::Disposed;
        self.registry.clear();
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, SystemState::Active(_))
    }

    pub fn is_disposed(&self) -> bool {
        matches!(self.state, SystemState::Disposed)
    }

    // ===== REGISTRATION =====

    /// Register an element with its initial bounding sphere.
    ///
    /// Returns the element's index. The system keeps only a weak
    /// reference: the caller owns the element and must unregister it.
    ///
    /// # Panics
    ///
    /// If the system is at capacity or disposed (fatal precondition).
    pub fn register(&mut self, element: &ElementHandle, shape: BoundingSphere) -> usize {
        if self.is_disposed() {
            engine_fatal!(SOURCE, "Cannot register an element on a disposed culling system");
        }
        let index = match self.registry.push(std::sync::Arc::downgrade(element), shape) {
            Some(index) => index,
            None => engine_fatal!(SOURCE,
                "Capacity exceeded: {} elements already registered", self.registry.capacity()),
        };

        if let SystemState::Active(oracle) = &mut self.state {
            oracle.set_bounding_sphere_count(self.registry.len());
        }

        engine_trace!(SOURCE, "Registered element at index {}", index);
        index
    }

    /// Unregister the element at `index` by swap-back removal.
    ///
    /// If another element is moved into `index`, it receives
    /// `index_reassigned(index)` before this call returns. No-op once the
    /// system is disposed.
    ///
    /// # Panics
    ///
    /// If `index` is not a live index.
    pub fn unregister(&mut self, index: usize) {
        if self.is_disposed() {
            engine_debug!(SOURCE, "Ignored unregister({}) after dispose", index);
            return;
        }
        self.check_index(index, "unregister");

        if let SystemState::Active(oracle) = &mut self.state {
            oracle.erase_swap_back(index);
        }
        let moved = self.registry.swap_remove(index);

        if moved.is_some() {
            engine_trace!(SOURCE, "Element at index {} moved into {}", self.registry.len(), index);
            Self::notify(&self.registry, index, |element| element.index_reassigned(index));
        }
    }

    /// Move the bounding sphere at `index`. The radius is left unchanged.
    ///
    /// Takes effect at the next tick. No-op once the system is disposed.
    pub fn update_position(&mut self, index: usize, position: Vec3) {
        if self.is_disposed() {
            engine_debug!(SOURCE, "Ignored update_position({}) after dispose", index);
            return;
        }
        self.check_index(index, "update_position");
        self.registry.set_position(index, position);
    }

    /// Last computed `(visible, band)` for `index`.
    ///
    /// Only meaningful once the element received its initial state.
    ///
    /// # Panics
    ///
    /// If the system is not active or `index` is not a live index.
    pub fn query_state(&self, index: usize) -> (bool, usize) {
        self.check_index(index, "query_state");
        match &self.state {
            SystemState::Active(oracle) => (oracle.is_visible(index), oracle.distance_band(index)),
            _ => engine_fatal!(SOURCE, "query_state({}) on a culling system without an active oracle", index),
        }
    }

    // ===== EVALUATION =====

    /// Run one scheduling cycle.
    ///
    /// Evaluates every live sphere, routes change events to their
    /// elements in increasing index order, then delivers the initial state
    /// of every element that has not received it yet, in registry order.
    /// Does nothing while inactive, disabled, or disposed.
    ///
    /// # Errors
    ///
    /// Propagates oracle evaluation errors. No notification is delivered
    /// for a failed tick.
    pub fn tick(&mut self) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }
        let oracle = match &mut self.state {
            SystemState::Active(oracle) => oracle,
            _ => return Ok(()),
        };

        let mut events = std::mem::take(&mut self.events);
        events.clear();
        let result = oracle.evaluate(self.registry.spheres(), &mut events);
        if let Err(error) = result {
            self.events = events;
            return Err(error);
        }

        for event in &events {
            // Baseline evaluation: covered by the initial state flush below
            if !self.registry.is_initialized(event.index) {
                continue;
            }
            Self::route_event(&self.registry, event);
        }
        self.events = events;

        for index in 0..self.registry.len() {
            if self.registry.is_initialized(index) {
                continue;
            }
            let (visible, band) = (oracle.is_visible(index), oracle.distance_band(index));
            Self::notify(&self.registry, index, |element| element.initial_state(visible, band));
            self.registry.mark_initialized(index);
        }

        Ok(())
    }

    fn route_event(registry: &BoundingRegistry, event: &CullingEvent) {
        let changes = event.changes();
        engine_trace!(SOURCE, "Element {} changed: {:?}", event.index, changes);

        Self::notify(registry, event.index, |element| {
            if event.has_become_visible() {
                element.visibility_changed(true);
            } else if event.has_become_invisible() {
                element.visibility_changed(false);
            }
            if changes.contains(StateChange::DISTANCE_BAND) {
                element.band_changed(event.previous_band, event.current_band);
            }
        });
    }

    fn notify(registry: &BoundingRegistry, index: usize, f: impl FnOnce(&mut dyn CullingElement)) {
        let Some(element) = registry.element(index) else {
            if cfg!(debug_assertions) {
                engine_fatal!(SOURCE, "Element at index {} was dropped without unregistering", index);
            }
            engine_error!(SOURCE, "Element at index {} was dropped without unregistering", index);
            return;
        };

        match element.lock() {
            Ok(mut guard) => f(&mut *guard),
            Err(_) => engine_error!(SOURCE, "Element at index {} is poisoned, notification skipped", index),
        };
    }

    // ===== CONFIGURATION =====

    /// Pause or resume evaluation.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if let SystemState::Active(oracle) = &mut self.state {
            oracle.set_enabled(enabled);
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Replace the band fractions, recomputing thresholds.
    pub fn set_distance_bands(&mut self, fractions: Vec<f32>, layout: BandLayout) {
        self.bands.set_fractions(fractions, layout);
        self.push_thresholds();
    }

    /// Replace the max culling distance (negative values clamp to zero).
    pub fn set_max_culling_distance(&mut self, max_distance: f32) {
        if max_distance < 0.0 {
            engine_warn!(SOURCE, "Negative max culling distance {} clamped to 0", max_distance);
        }
        self.bands.set_max_distance(max_distance);
        self.push_thresholds();
    }

    fn push_thresholds(&mut self) {
        if let SystemState::Active(oracle) = &mut self.state {
            oracle.set_bounding_distances(self.bands.thresholds());
        }
    }

    /// Switch between the target camera and an override reference point.
    ///
    /// # Errors
    ///
    /// Returns `Error::InitializationFailed` when switching an active
    /// system to the target camera while its oracle has none.
    pub fn set_reference_source(&mut self, source: ReferenceSource) -> Result<()> {
        if let SystemState::Active(oracle) = &mut self.state {
            if matches!(source, ReferenceSource::TargetCamera) && !oracle.has_target_camera() {
                return Err(Self::init_error("Reference source is the target camera but the oracle has no camera"));
            }
            oracle.set_distance_reference(source.clone());
        }
        self.reference_source = source;
        Ok(())
    }

    pub fn reference_source(&self) -> &ReferenceSource {
        &self.reference_source
    }

    // ===== ACCESSORS =====

    /// Highest distance band index (the number of thresholds).
    pub fn top_distance_band(&self) -> usize {
        self.bands.top_band()
    }

    /// Absolute distance thresholds, in band order.
    pub fn bounding_distances(&self) -> &[f32] {
        self.bands.thresholds()
    }

    pub fn max_culling_distance(&self) -> f32 {
        self.bands.max_distance()
    }

    pub fn bounding_sphere(&self, index: usize) -> &BoundingSphere {
        self.check_index(index, "bounding_sphere");
        self.registry.sphere(index)
    }

    /// Live spheres as raw bytes, for GPU-backed oracles.
    pub fn bounding_sphere_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.registry.spheres())
    }

    /// Number of registered elements.
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.registry.capacity()
    }

    // ===== INTERNAL =====

    fn check_index(&self, index: usize, operation: &str) {
        if index >= self.registry.len() {
            engine_fatal!(SOURCE, "{}: index {} out of range (live count {})",
                operation, index, self.registry.len());
        }
    }

    fn init_error(message: &str) -> Error {
        engine_error!(SOURCE, "Initialization failed: {}", message);
        Error::InitializationFailed(message.to_string())
    }
}

impl Drop for CullingSystem {
    fn drop(&mut self) {
        if let SystemState::Active(oracle) = &mut self.state {
            oracle.dispose();
        }
    }
}

#[cfg(test)]
#[path = "culling_system_tests.rs"]
mod tests;
