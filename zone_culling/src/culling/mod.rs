//! Distance-band culling
//!
//! Registry of bounding spheres, visibility oracles, the culling system
//! driving them, and element-side reactors.

mod bounding_sphere;
mod brute_force_oracle;
mod component_cull;
mod config;
mod culling_system;
mod distance_bands;
mod element;
mod oracle;
mod registry;

pub use bounding_sphere::BoundingSphere;
pub use brute_force_oracle::BruteForceOracle;
pub use component_cull::{
    ComponentCull, CulledComponent, RigidBody, Collider, Behaviour, DEFAULT_BAND_RANGE,
};
pub use config::{CullingConfig, DEFAULT_CAPACITY, DEFAULT_MAX_CULLING_DISTANCE};
pub use culling_system::CullingSystem;
pub use distance_bands::{BandLayout, DistanceBandTable, compute_bounding_distances, classify_distance};
pub use element::{CullingElement, ElementHandle, ElementRef};
pub use oracle::{
    CullingEvent, ReferencePoint, ReferenceSource, StateChange, TrackedPosition, VisibilityOracle,
};
pub use registry::BoundingRegistry;
