/// Component cull: switches simulation components on and off by band.
///
/// A `ComponentCull` is a `CullingElement` controlling a list of
/// components. With a band range `[low, high)`:
///
/// ```text
/// band <  low          → components active
/// low <= band < high   → components active only while visible
/// band >= high         → components inactive
/// ```
///
/// Components are toggled only when the desired state actually changes.

use std::sync::{Arc, Mutex, Weak};
use glam::Vec3;
use crate::error::{Error, Result};
use crate::engine_trace;
use super::bounding_sphere::BoundingSphere;
use super::culling_system::CullingSystem;
use super::element::{CullingElement, ElementHandle};

/// Default band range: active closer than band 1, inactive from band 4.
pub const DEFAULT_BAND_RANGE: (usize, usize) = (1, 4);

/// Physics body that can be taken out of the simulation.
pub trait RigidBody: Send {
    /// Kinematic bodies are not driven by the simulation
    fn set_kinematic(&mut self, kinematic: bool);
}

/// Collision shape that can be switched off.
pub trait Collider: Send {
    fn set_enabled(&mut self, enabled: bool);
}

/// Any other per-frame behaviour.
pub trait Behaviour: Send {
    fn set_enabled(&mut self, enabled: bool);
}

/// A component under culling control.
///
/// Held weakly: the owner may drop a component at any time, it is then
/// skipped.
#[derive(Clone)]
pub enum CulledComponent {
    RigidBody(Weak<Mutex<dyn RigidBody>>),
    Collider(Weak<Mutex<dyn Collider>>),
    Behaviour(Weak<Mutex<dyn Behaviour>>),
}

impl CulledComponent {
    pub fn rigid_body(body: &Arc<Mutex<dyn RigidBody>>) -> Self {
        Self::RigidBody(Arc::downgrade(body))
    }

    pub fn collider(collider: &Arc<Mutex<dyn Collider>>) -> Self {
        Self::Collider(Arc::downgrade(collider))
    }

    pub fn behaviour(behaviour: &Arc<Mutex<dyn Behaviour>>) -> Self {
        Self::Behaviour(Arc::downgrade(behaviour))
    }

    /// Apply `active`. Returns false if the component is gone or poisoned.
    fn apply(&self, active: bool) -> bool {
        match self {
            Self::RigidBody(body) => with_live(body, |body| body.set_kinematic(!active)),
            Self::Collider(collider) => with_live(collider, |collider| collider.set_enabled(active)),
            Self::Behaviour(behaviour) => with_live(behaviour, |behaviour| behaviour.set_enabled(active)),
        }
    }
}

fn with_live<T: ?Sized>(component: &Weak<Mutex<T>>, f: impl FnOnce(&mut T)) -> bool {
    let Some(component) = component.upgrade() else {
        return false;
    };
    let Ok(mut guard) = component.lock() else {
        return false;
    };
    f(&mut *guard);
    true
}

pub struct ComponentCull {
    low_band: usize,
    high_band: usize,
    components: Vec<CulledComponent>,
    components_active: bool,
    /// Own registry index, `None` while unregistered
    index: Option<usize>,
    visible: bool,
    band: usize,
    toggle_count: usize,
}

impl ComponentCull {
    pub fn new(components: Vec<CulledComponent>) -> Self {
        let (low_band, high_band) = DEFAULT_BAND_RANGE;
        Self::with_band_range(components, low_band, high_band)
    }

    /// # Panics
    ///
    /// If `low_band > high_band`.
    pub fn with_band_range(components: Vec<CulledComponent>, low_band: usize, high_band: usize) -> Self {
        assert!(low_band <= high_band, "band range [{}, {}) is inverted", low_band, high_band);
        Self {
            low_band,
            high_band,
            components,
            components_active: true,
            index: None,
            visible: false,
            band: 0,
            toggle_count: 0,
        }
    }

    /// Wrap into a shared handle, ready for `register`.
    pub fn into_shared(self) -> Arc<Mutex<ComponentCull>> {
        Arc::new(Mutex::new(self))
    }

    // ===== REGISTRATION HELPERS =====

    /// Register `handle` with `system` and cache the returned index.
    pub fn register(
        handle: &Arc<Mutex<ComponentCull>>,
        system: &mut CullingSystem,
        shape: BoundingSphere,
    ) -> Result<usize> {
        let element: ElementHandle = handle.clone();
        let index = system.register(&element, shape);
        Self::lock(handle)?.index = Some(index);
        Ok(index)
    }

    /// Unregister `handle` from `system`. No-op if it is not registered.
    pub fn unregister(handle: &Arc<Mutex<ComponentCull>>, system: &mut CullingSystem) -> Result<()> {
        // The guard must be released before the system notifies the moved element
        let index = Self::lock(handle)?.index.take();
        if let Some(index) = index {
            system.unregister(index);
        }
        Ok(())
    }

    /// Move the bounding sphere of a registered `handle`.
    pub fn move_to(handle: &Arc<Mutex<ComponentCull>>, system: &mut CullingSystem, position: Vec3) -> Result<()> {
        let index = Self::lock(handle)?.index;
        match index {
            Some(index) => {
                system.update_position(index, position);
                Ok(())
            }
            None => Err(Error::NotFound("ComponentCull is not registered".to_string())),
        }
    }

    fn lock(handle: &Arc<Mutex<ComponentCull>>) -> Result<std::sync::MutexGuard<'_, ComponentCull>> {
        handle.lock().map_err(|_| Error::LockPoisoned("ComponentCull".to_string()))
    }

    // ===== ACCESSORS =====

    pub fn band_range(&self) -> (usize, usize) {
        (self.low_band, self.high_band)
    }

    pub fn index(&self) -> Option<usize> {
        self.index
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn distance_band(&self) -> usize {
        self.band
    }

    pub fn components_active(&self) -> bool {
        self.components_active
    }

    /// Number of times the components were actually switched
    pub fn toggle_count(&self) -> usize {
        self.toggle_count
    }

    pub fn add_component(&mut self, component: CulledComponent) {
        self.components.push(component);
    }

    // ===== POLICY =====

    fn desired_state(&self) -> bool {
        if self.band < self.low_band {
            true
        } else if self.band >= self.high_band {
            false
        } else {
            self.visible
        }
    }

    fn refresh(&mut self) {
        let active = self.desired_state();
        if active == self.components_active {
            return;
        }

        let applied = self.components.iter().filter(|component| component.apply(active)).count();
        engine_trace!("zonecull::ComponentCull", "Components {} ({} of {} applied)",
            if active { "activated" } else { "deactivated" }, applied, self.components.len());

        self.components_active = active;
        self.toggle_count += 1;
    }
}

impl CullingElement for ComponentCull {
    fn initial_state(&mut self, visible: bool, band: usize) {
        self.visible = visible;
        self.band = band;
        self.refresh();
    }

    fn visibility_changed(&mut self, visible: bool) {
        self.visible = visible;
        self.refresh();
    }

    fn band_changed(&mut self, _previous_band: usize, new_band: usize) {
        self.band = new_band;
        self.refresh();
    }

    fn index_reassigned(&mut self, new_index: usize) {
        self.index = Some(new_index);
    }
}

#[cfg(test)]
#[path = "component_cull_tests.rs"]
mod tests;
