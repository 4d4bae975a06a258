/// Culling system configuration.

use super::distance_bands::BandLayout;
use super::oracle::ReferenceSource;

/// Default number of simultaneously registered elements.
pub const DEFAULT_CAPACITY: usize = 50;

/// Default maximum culling distance.
pub const DEFAULT_MAX_CULLING_DISTANCE: f32 = 200.0;

/// Configuration supplied when creating a `CullingSystem`.
#[derive(Debug, Clone)]
pub struct CullingConfig {
    /// Hard upper bound on simultaneously registered elements.
    /// Storage is allocated once for this many slots.
    pub capacity: usize,

    /// Ordered band fractions, read according to `band_layout`
    pub distance_bands: Vec<f32>,

    pub band_layout: BandLayout,

    /// Maximum culling distance. Negative values are clamped to zero.
    pub max_culling_distance: f32,

    pub reference_source: ReferenceSource,
}

impl Default for CullingConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            distance_bands: vec![0.67, 1.0],
            band_layout: BandLayout::Cumulative,
            max_culling_distance: DEFAULT_MAX_CULLING_DISTANCE,
            reference_source: ReferenceSource::TargetCamera,
        }
    }
}
