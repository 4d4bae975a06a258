/// Fixed-capacity bounding registry.
///
/// Parallel arrays mapping a live index `0..len` to a bounding sphere and
/// a non-owning element reference. Storage is allocated once, up front:
/// the registry never grows past its capacity.
///
/// Indices are stable until removed or relocated: `swap_remove(i)` moves
/// the last live slot into `i`, so the relocated element must be told its
/// new index by the owner of the registry.
///
/// # Example
///
/// ```ignore
/// let mut registry = BoundingRegistry::with_capacity(3);
/// let a = registry.push(elem_a, sphere_a).unwrap(); // 0
/// let b = registry.push(elem_b, sphere_b).unwrap(); // 1
/// let c = registry.push(elem_c, sphere_c).unwrap(); // 2
/// registry.swap_remove(a);                          // c moves into 0
/// ```

use glam::Vec3;
use super::bounding_sphere::BoundingSphere;
use super::element::{ElementHandle, ElementRef};

pub struct BoundingRegistry {
    spheres: Vec<BoundingSphere>,
    elements: Vec<Option<ElementRef>>,
    /// Whether the slot's element already received its initial state
    initialized: Vec<bool>,
    len: usize,
}

impl BoundingRegistry {
    /// Create a registry with all `capacity` slots pre-allocated
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            spheres: vec![BoundingSphere::default(); capacity],
            elements: vec![None; capacity],
            initialized: vec![false; capacity],
            len: 0,
        }
    }

    /// Append a slot at index `len`.
    ///
    /// Returns `None` when the registry is full; the caller decides how
    /// fatal that is.
    pub fn push(&mut self, element: ElementRef, sphere: BoundingSphere) -> Option<usize> {
        if self.is_full() {
            return None;
        }
        let index = self.len;
        self.spheres[index] = sphere;
        self.elements[index] = Some(element);
        self.initialized[index] = false;
        self.len += 1;
        Some(index)
    }

    /// Remove slot `index` by moving the last live slot into it.
    ///
    /// Returns the element that was relocated into `index`, or `None` if
    /// `index` was the last live slot (nothing moved).
    pub fn swap_remove(&mut self, index: usize) -> Option<ElementRef> {
        debug_assert!(index < self.len, "removing a dead slot: {} (len {})", index, self.len);
        let last = self.len - 1;

        self.spheres.swap(index, last);
        self.elements.swap(index, last);
        self.initialized.swap(index, last);

        self.spheres[last] = BoundingSphere::default();
        self.elements[last] = None;
        self.initialized[last] = false;
        self.len = last;

        if index == last {
            None
        } else {
            self.elements[index].clone()
        }
    }

    /// Drop every element reference and reset the live count
    pub fn clear(&mut self) {
        for slot in 0..self.len {
            self.spheres[slot] = BoundingSphere::default();
            self.elements[slot] = None;
            self.initialized[slot] = false;
        }
        self.len = 0;
    }

    /// Live spheres, `0..len`
    pub fn spheres(&self) -> &[BoundingSphere] {
        &self.spheres[..self.len]
    }

    pub fn sphere(&self, index: usize) -> &BoundingSphere {
        debug_assert!(index < self.len, "reading a dead slot: {}", index);
        &self.spheres[index]
    }

    pub fn set_position(&mut self, index: usize, position: Vec3) {
        debug_assert!(index < self.len, "moving a dead slot: {}", index);
        self.spheres[index].position = position;
    }

    /// Upgrade the element reference at `index`.
    ///
    /// `None` means the element was dropped without unregistering.
    pub fn element(&self, index: usize) -> Option<ElementHandle> {
        self.elements[index].as_ref().and_then(|element| element.upgrade())
    }

    pub fn is_initialized(&self, index: usize) -> bool {
        self.initialized[index]
    }

    pub fn mark_initialized(&mut self, index: usize) {
        self.initialized[index] = true;
    }

    /// Fixed number of slots
    pub fn capacity(&self) -> usize {
        self.spheres.len()
    }

    /// Number of live slots
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full(&self) -> bool {
        self.len == self.capacity()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
