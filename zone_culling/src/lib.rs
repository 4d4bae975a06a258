/*!
# Zone Culling

Distance-band visibility culling for scene elements.

A culling system tracks a fixed-capacity set of bounding spheres, asks a
pluggable visibility oracle once per tick which elements changed visibility
or distance band, and notifies exactly those elements. Elements react by
switching expensive behaviour (physics, scripts, colliders) on and off.

## Architecture

- **CullingSystem**: Registry, band table and event routing for one zone
- **VisibilityOracle**: Strategy trait evaluating spheres (`BruteForceOracle` on the CPU)
- **CullingElement**: Notification trait implemented by registered participants
- **ComponentCull**: Ready-made element toggling components by band range
- **Camera / Frustum**: Target camera data used for visibility and distance
- **Engine**: Named culling systems and the global logger
*/

// Internal modules
mod error;
mod engine;
pub mod log;
pub mod camera;
pub mod culling;

// Main zonecull namespace module
pub mod zonecull {
    // Error types
    pub use crate::error::{Error, Result};

    // Engine singleton
    pub use crate::engine::Engine;

    // Logging sub-module (types only, NOT macros)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};
    }

    // Camera sub-module
    pub mod camera {
        pub use crate::camera::*;
    }

    // Culling sub-module
    pub mod culling {
        pub use crate::culling::*;
    }
}

// Re-export math library at crate root
pub use glam;
