/// Distance band table.
///
/// Converts an ordered list of band fractions and a maximum culling
/// distance into absolute distance thresholds. `N` thresholds define
/// `N + 1` bands: band `0` is closer than the first threshold, band `N`
/// is farther than the last one (including "beyond max distance").

/// How the band fraction list is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BandLayout {
    /// Each fraction is already cumulative: `threshold_i = fraction_i * max`.
    ///
    /// `[0.5, 0.8]` with max 100 gives `[50, 80]`.
    #[default]
    Cumulative,
    /// Each fraction is the width of one band: thresholds accumulate a
    /// running sum, `threshold_i = (fraction_0 + .. + fraction_i) * max`.
    ///
    /// `[0.67, 0.33]` with max 200 gives `[134, 200]`.
    Widths,
}

/// Compute absolute thresholds from band fractions.
///
/// Pure and deterministic. Ascending input (or non-negative widths) gives
/// ascending thresholds; anything else is the caller's responsibility.
pub fn compute_bounding_distances(
    fractions: &[f32],
    layout: BandLayout,
    max_distance: f32,
) -> Vec<f32> {
    match layout {
        BandLayout::Cumulative => fractions
            .iter()
            .map(|fraction| fraction * max_distance)
            .collect(),
        BandLayout::Widths => {
            let mut cumulated = 0.0;
            fractions
                .iter()
                .map(|fraction| {
                    cumulated += fraction;
                    cumulated * max_distance
                })
                .collect()
        }
    }
}

/// Band index for a distance: the index of the first threshold strictly
/// greater than `distance`, or `thresholds.len()` if there is none.
pub fn classify_distance(thresholds: &[f32], distance: f32) -> usize {
    thresholds
        .iter()
        .position(|&threshold| distance < threshold)
        .unwrap_or(thresholds.len())
}

/// Fractions, layout and max distance, with the derived thresholds.
#[derive(Debug, Clone)]
pub struct DistanceBandTable {
    fractions: Vec<f32>,
    layout: BandLayout,
    max_distance: f32,
    thresholds: Vec<f32>,
}

impl DistanceBandTable {
    /// Build a table. A negative `max_distance` is clamped to zero.
    pub fn new(fractions: Vec<f32>, layout: BandLayout, max_distance: f32) -> Self {
        let max_distance = max_distance.max(0.0);
        let thresholds = compute_bounding_distances(&fractions, layout, max_distance);
        Self {
            fractions,
            layout,
            max_distance,
            thresholds,
        }
    }

    /// Replace the fractions and their layout, recomputing thresholds.
    pub fn set_fractions(&mut self, fractions: Vec<f32>, layout: BandLayout) {
        self.fractions = fractions;
        self.layout = layout;
        self.recompute();
    }

    /// Replace the max distance (clamped to zero), recomputing thresholds.
    pub fn set_max_distance(&mut self, max_distance: f32) {
        self.max_distance = max_distance.max(0.0);
        self.recompute();
    }

    fn recompute(&mut self) {
        self.thresholds = compute_bounding_distances(&self.fractions, self.layout, self.max_distance);
    }

    pub fn thresholds(&self) -> &[f32] {
        &self.thresholds
    }

    pub fn fractions(&self) -> &[f32] {
        &self.fractions
    }

    pub fn layout(&self) -> BandLayout {
        self.layout
    }

    pub fn max_distance(&self) -> f32 {
        self.max_distance
    }

    /// Highest band index (`N`, the number of thresholds).
    pub fn top_band(&self) -> usize {
        self.thresholds.len()
    }

    pub fn band_for_distance(&self, distance: f32) -> usize {
        classify_distance(&self.thresholds, distance)
    }
}

#[cfg(test)]
#[path = "distance_bands_tests.rs"]
mod tests;
