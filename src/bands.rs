use std::ops::Range;

use crate::horizon::SLOTS_PER_DAY;

/// Constant value over a half-open range of slots.
#[derive(Debug, Clone, PartialEq)]
pub struct Band {
    pub slots: Range<usize>,
    pub value: f64,
}

impl Band {
    pub const fn new(slots: Range<usize>, value: f64) -> Self {
        Self { slots, value }
    }
}

/// Piecewise-constant table over the slots of a day.
///
/// Bands are evaluated in order, the first one containing the slot wins.
/// Slots not covered by any band take the fallback value.
#[derive(Debug, Clone, PartialEq)]
pub struct Bands {
    bands: Vec<Band>,
    fallback: f64,
}

impl Bands {
    pub fn new(bands: Vec<Band>, fallback: f64) -> Self {
        Self { bands, fallback }
    }

    pub fn flat(value: f64) -> Self {
        Self::new(Vec::new(), value)
    }

    pub fn value_at(&self, slot: usize) -> f64 {
        self.bands
            .iter()
            .find(|band| band.slots.contains(&slot))
            .map_or(self.fallback, |band| band.value)
    }

    /// Every band value multiplied by `factor`, fallback included.
    #[must_use]
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            bands: self
                .bands
                .iter()
                .map(|band| Band::new(band.slots.clone(), band.value * factor))
                .collect(),
            fallback: self.fallback * factor,
        }
    }

    /// Materialize one value per slot of a day.
    pub fn table(&self) -> Vec<f64> {
        (0..SLOTS_PER_DAY).map(|slot| self.value_at(slot)).collect()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    fn sample() -> Bands {
        Bands::new(
            vec![Band::new(0..32, 0.06), Band::new(32..64, 0.03), Band::new(64..80, 0.07)],
            0.10,
        )
    }

    #[test]
    fn lookup_hits_band_edges() {
        let bands = sample();
        assert_abs_diff_eq!(bands.value_at(0), 0.06);
        assert_abs_diff_eq!(bands.value_at(31), 0.06);
        assert_abs_diff_eq!(bands.value_at(32), 0.03);
        assert_abs_diff_eq!(bands.value_at(79), 0.07);
        assert_abs_diff_eq!(bands.value_at(80), 0.10);
        assert_abs_diff_eq!(bands.value_at(95), 0.10);
    }

    #[test]
    fn first_matching_band_wins() {
        let bands = Bands::new(vec![Band::new(10..20, 1.0), Band::new(0..96, 2.0)], 0.0);
        assert_abs_diff_eq!(bands.value_at(15), 1.0);
        assert_abs_diff_eq!(bands.value_at(5), 2.0);
    }

    #[test]
    fn scaled_keeps_ranges() {
        let bands = Bands::new(vec![Band::new(16..32, 0.1)], 0.0).scaled(4.8);
        assert_abs_diff_eq!(bands.value_at(16), 0.48, epsilon = 1e-12);
        assert_abs_diff_eq!(bands.value_at(32), 0.0);
    }

    #[test]
    fn table_covers_whole_day() {
        let table = Bands::flat(0.12).table();
        assert_eq!(table.len(), SLOTS_PER_DAY);
        assert!(table.iter().all(|value| (*value - 0.12).abs() < f64::EPSILON));
    }
}
