use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::{
    bands::{Band, Bands},
    horizon::{SLOTS_PER_DAY, SlotIndex},
    prelude::*,
};

/// Nameplate power of the sample PV installation.
pub const PV_PEAK_KW: f64 = 4.8;

pub const DEFAULT_BATTERY_CAPACITY_KWH: f64 = 10.0;

/// Inputs of one optimization run.
///
/// Load and feed-in tariff are shared by every day of the horizon, PV yield is per day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub battery_capacity_kwh: f64,

    /// Per-slot grid import limit, unlimited when absent.
    #[serde(default)]
    pub max_grid_import_kwh: Option<f64>,

    pub load_kwh: Vec<f64>,
    pub feed_in_tariff: Vec<f64>,

    /// One row of PV yield per day.
    pub pv_kwh: Vec<Vec<f64>>,
}

impl Scenario {
    /// Single summer day with a banded feed-in tariff.
    pub fn one_day() -> Self {
        Self {
            battery_capacity_kwh: DEFAULT_BATTERY_CAPACITY_KWH,
            max_grid_import_kwh: None,
            load_kwh: Bands::flat(1.0).table(),
            feed_in_tariff: Bands::new(
                vec![Band::new(0..32, 0.06), Band::new(32..64, 0.03), Band::new(64..80, 0.07)],
                0.10,
            )
            .table(),
            pv_kwh: vec![pv_yield([0.1, 0.7, 0.9, 0.4]).table()],
        }
    }

    /// Today plus the next-day forecast, with a flat feed-in tariff.
    pub fn two_days() -> Self {
        Self {
            battery_capacity_kwh: DEFAULT_BATTERY_CAPACITY_KWH,
            max_grid_import_kwh: None,
            load_kwh: Bands::flat(1.0).table(),
            feed_in_tariff: Bands::flat(0.12).table(),
            pv_kwh: vec![
                pv_yield([0.1, 0.7, 0.9, 0.4]).table(),
                pv_yield([0.2, 0.8, 0.6, 0.3]).table(),
            ],
        }
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read scenario file `{}`", path.display()))?;
        let scenario: Self = serde_json::from_str(&text)
            .with_context(|| format!("failed to parse scenario file `{}`", path.display()))?;
        scenario.validate()?;
        Ok(scenario)
    }

    pub fn with_battery_capacity(mut self, capacity_kwh: f64) -> Self {
        self.battery_capacity_kwh = capacity_kwh;
        self
    }

    pub fn with_max_grid_import(mut self, max_grid_import_kwh: Option<f64>) -> Self {
        self.max_grid_import_kwh = max_grid_import_kwh;
        self
    }

    pub fn n_days(&self) -> usize {
        self.pv_kwh.len()
    }

    pub fn n_slots(&self) -> usize {
        self.n_days() * SLOTS_PER_DAY
    }

    pub fn pv(&self, index: SlotIndex) -> f64 {
        self.pv_kwh[index.day][index.slot]
    }

    pub fn load(&self, index: SlotIndex) -> f64 {
        self.load_kwh[index.slot]
    }

    pub fn tariff(&self, index: SlotIndex) -> f64 {
        self.feed_in_tariff[index.slot]
    }

    pub fn validate(&self) -> Result {
        ensure!(
            self.battery_capacity_kwh.is_finite() && self.battery_capacity_kwh > 0.0,
            "battery capacity must be positive, got {}",
            self.battery_capacity_kwh,
        );
        if let Some(limit) = self.max_grid_import_kwh {
            ensure!(
                limit.is_finite() && limit >= 0.0,
                "grid import limit must be non-negative, got {limit}",
            );
        }
        ensure!(!self.pv_kwh.is_empty(), "the horizon must contain at least one day");
        check_table("load", &self.load_kwh)?;
        check_table("feed-in tariff", &self.feed_in_tariff)?;
        for (day, row) in self.pv_kwh.iter().enumerate() {
            check_table(&format!("PV yield of day {day}"), row)?;
        }
        Ok(())
    }
}

/// Stylized sunrise-to-sunset curve: zero before 04:00 and after 20:00.
fn pv_yield(fractions: [f64; 4]) -> Bands {
    let [morning, forenoon, afternoon, evening] = fractions;
    Bands::new(
        vec![
            Band::new(16..32, morning),
            Band::new(32..48, forenoon),
            Band::new(48..64, afternoon),
            Band::new(64..81, evening),
        ],
        0.0,
    )
    .scaled(PV_PEAK_KW)
}

fn check_table(name: &str, table: &[f64]) -> Result {
    ensure!(
        table.len() == SLOTS_PER_DAY,
        "{name} must have {SLOTS_PER_DAY} slots, got {}",
        table.len(),
    );
    if let Some((slot, value)) =
        table.iter().enumerate().find(|(_, value)| !value.is_finite() || **value < 0.0)
    {
        bail!("{name} at slot {slot} must be finite and non-negative, got {value}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn pv_is_zero_outside_daylight() {
        for scenario in [Scenario::one_day(), Scenario::two_days()] {
            for row in &scenario.pv_kwh {
                assert!(row[..16].iter().all(|pv| *pv == 0.0));
                assert!(row[81..].iter().all(|pv| *pv == 0.0));
                assert!(row[16..=80].iter().all(|pv| *pv > 0.0));
            }
        }
    }

    #[test]
    fn one_day_tables() {
        let scenario = Scenario::one_day();
        scenario.validate().unwrap();
        assert_eq!(scenario.n_days(), 1);
        assert_abs_diff_eq!(scenario.pv_kwh[0][16], 0.48, epsilon = 1e-12);
        assert_abs_diff_eq!(scenario.pv_kwh[0][40], 3.36, epsilon = 1e-12);
        assert_abs_diff_eq!(scenario.pv_kwh[0][63], 4.32, epsilon = 1e-12);
        assert_abs_diff_eq!(scenario.pv_kwh[0][80], 1.92, epsilon = 1e-12);
        assert_abs_diff_eq!(scenario.feed_in_tariff[31], 0.06);
        assert_abs_diff_eq!(scenario.feed_in_tariff[63], 0.03);
        assert_abs_diff_eq!(scenario.feed_in_tariff[79], 0.07);
        assert_abs_diff_eq!(scenario.feed_in_tariff[80], 0.10);
        assert!(scenario.load_kwh.iter().all(|load| (*load - 1.0).abs() < f64::EPSILON));
    }

    #[test]
    fn two_days_has_different_forecast_and_flat_tariff() {
        let scenario = Scenario::two_days();
        scenario.validate().unwrap();
        assert_eq!(scenario.n_days(), 2);
        assert_eq!(scenario.n_slots(), 192);
        assert_abs_diff_eq!(scenario.pv(SlotIndex::new(1, 20)), 0.96, epsilon = 1e-12);
        assert_abs_diff_eq!(scenario.pv(SlotIndex::new(1, 50)), 2.88, epsilon = 1e-12);
        assert_ne!(scenario.pv_kwh[0], scenario.pv_kwh[1]);
        assert!(scenario.feed_in_tariff.iter().all(|tariff| (*tariff - 0.12).abs() < f64::EPSILON));
    }

    #[test]
    fn rejects_non_positive_capacity() {
        let error = Scenario::one_day().with_battery_capacity(0.0).validate().unwrap_err();
        assert!(error.to_string().contains("battery capacity"));
    }

    #[test]
    fn rejects_short_table() {
        let mut scenario = Scenario::one_day();
        scenario.load_kwh.pop();
        let error = scenario.validate().unwrap_err();
        assert!(error.to_string().contains("load must have 96 slots"));
    }

    #[test]
    fn rejects_negative_pv() {
        let mut scenario = Scenario::two_days();
        scenario.pv_kwh[1][30] = -1.0;
        let error = scenario.validate().unwrap_err();
        assert!(error.to_string().contains("PV yield of day 1 at slot 30"));
    }

    #[test]
    fn rejects_empty_horizon() {
        let mut scenario = Scenario::one_day();
        scenario.pv_kwh.clear();
        assert!(scenario.validate().is_err());
    }

    #[test]
    fn json_file_ok() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        serde_json::to_writer(&mut file, &Scenario::two_days()).unwrap();
        let scenario = Scenario::from_json_file(file.path()).unwrap();
        assert_eq!(scenario, Scenario::two_days());
    }

    #[test]
    fn json_file_without_import_limit_ok() {
        let mut value = serde_json::to_value(Scenario::one_day()).unwrap();
        value.as_object_mut().unwrap().remove("max_grid_import_kwh");
        let file = tempfile::NamedTempFile::new().unwrap();
        fs::write(file.path(), value.to_string()).unwrap();
        let scenario = Scenario::from_json_file(file.path()).unwrap();
        assert_eq!(scenario.max_grid_import_kwh, None);
    }
}
