/// Culling element contract.
///
/// Any participant registered with a `CullingSystem` implements this
/// trait. The system only keeps a non-owning `ElementRef` to it: element
/// lifetime belongs to the caller, who must unregister before dropping.

use std::sync::{Arc, Mutex, Weak};

/// Owning handle to a culling element, held by the caller.
pub type ElementHandle = Arc<Mutex<dyn CullingElement>>;

/// Non-owning reference stored by the bounding registry.
pub type ElementRef = Weak<Mutex<dyn CullingElement>>;

/// Notifications delivered by a `CullingSystem`.
///
/// All notifications are delivered on the thread calling `tick()` or
/// `unregister()`, never concurrently for the same element.
pub trait CullingElement: Send {
    /// Baseline state, delivered exactly once at the end of the first tick
    /// following registration (or activation), before any state change.
    fn initial_state(&mut self, visible: bool, band: usize);

    /// The oracle flipped this element's visibility flag.
    fn visibility_changed(&mut self, visible: bool);

    /// The oracle classified this element into a different distance band.
    fn band_changed(&mut self, previous_band: usize, new_band: usize);

    /// This element was relocated by swap-back removal of another element.
    ///
    /// Delivered synchronously, before that `unregister()` returns. Any
    /// cached index must be replaced with `new_index`.
    fn index_reassigned(&mut self, new_index: usize);
}
