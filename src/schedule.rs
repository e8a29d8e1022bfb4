use std::{fs, path::Path};

use chrono::NaiveTime;
use serde::Serialize;

use crate::{
    horizon::{SLOTS_PER_DAY, SlotIndex, previous_storage},
    prelude::*,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduledSlot {
    pub day: usize,
    pub slot: usize,
    pub time: NaiveTime,
    pub pv_kwh: f64,
    pub load_kwh: f64,
    pub feed_in_tariff: f64,

    /// Battery level at the end of the slot.
    pub battery_kwh: f64,

    pub grid_import_kwh: f64,
    pub grid_export_kwh: f64,
}

impl ScheduledSlot {
    pub const fn index(&self) -> SlotIndex {
        SlotIndex::new(self.day, self.slot)
    }
}

/// Solved battery schedule, day-major.
///
/// Only an optimal solve produces one, see [`crate::problem::SolveOutcome`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Schedule {
    pub slots: Vec<ScheduledSlot>,
    pub objective: f64,
    pub solve_time_ms: f64,
}

impl Schedule {
    pub fn n_days(&self) -> usize {
        self.slots.len() / SLOTS_PER_DAY
    }

    pub fn slot(&self, index: SlotIndex) -> &ScheduledSlot {
        &self.slots[index.flat()]
    }

    pub fn days(&self) -> impl Iterator<Item = &[ScheduledSlot]> {
        self.slots.chunks(SLOTS_PER_DAY)
    }

    pub fn total_grid_import(&self) -> f64 {
        self.slots.iter().map(|slot| slot.grid_import_kwh).sum()
    }

    pub fn total_grid_export(&self) -> f64 {
        self.slots.iter().map(|slot| slot.grid_export_kwh).sum()
    }

    /// Tariff-weighted export, the revenue term of the objective.
    pub fn export_revenue(&self) -> f64 {
        self.slots.iter().map(|slot| slot.feed_in_tariff * slot.grid_export_kwh).sum()
    }

    /// Battery level carried into the slot, zero at the start of the horizon.
    pub fn carried_storage(&self, index: SlotIndex) -> f64 {
        previous_storage(index).map_or(0.0, |previous| self.slot(previous).battery_kwh)
    }

    /// Supply minus demand of the slot, zero for an exact energy balance.
    pub fn balance_residual(&self, index: SlotIndex) -> f64 {
        let slot = self.slot(index);
        slot.pv_kwh + slot.grid_import_kwh - slot.grid_export_kwh + self.carried_storage(index)
            - slot.load_kwh
            - slot.battery_kwh
    }

    pub fn max_balance_residual(&self) -> f64 {
        self.slots
            .iter()
            .map(|slot| self.balance_residual(slot.index()).abs())
            .fold(0.0, f64::max)
    }

    pub fn write_json(&self, path: &Path) -> Result {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)
            .with_context(|| format!("failed to write schedule to `{}`", path.display()))?;
        info!(path = %path.display(), "schedule written");
        Ok(())
    }
}
