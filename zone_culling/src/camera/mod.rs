//! Camera module — low-level camera and frustum.
//!
//! Passive data containers used by visibility oracles. The culling
//! system does NOT drive cameras. They are owned and updated by the
//! caller, and shared with an oracle through `SharedCamera`.

mod camera;
mod frustum;

pub use camera::{Camera, SharedCamera};
pub use frustum::Frustum;
