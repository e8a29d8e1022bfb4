use chrono::{NaiveTime, TimeDelta};

pub const SLOTS_PER_DAY: usize = 96;
pub const SLOT_MINUTES: usize = 15;

/// A 15-minute slot within a given day of the horizon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SlotIndex {
    pub day: usize,
    pub slot: usize,
}

impl SlotIndex {
    pub const fn new(day: usize, slot: usize) -> Self {
        Self { day, slot }
    }

    /// Position of the slot in a flat, day-major vector.
    pub const fn flat(self) -> usize {
        self.day * SLOTS_PER_DAY + self.slot
    }

    pub fn clock_time(self) -> NaiveTime {
        clock_time(self.slot)
    }
}

/// All slots of an `n_days` horizon in solve order.
pub fn slots(n_days: usize) -> impl Iterator<Item = SlotIndex> {
    (0..n_days).flat_map(|day| (0..SLOTS_PER_DAY).map(move |slot| SlotIndex::new(day, slot)))
}

/// The slot whose battery level carries into `index`.
///
/// The battery chains through the whole horizon: the first slot of a day continues from
/// the last slot of the previous day. Only the very first slot has no predecessor,
/// the battery starts empty there.
pub const fn previous_storage(index: SlotIndex) -> Option<SlotIndex> {
    if index.slot > 0 {
        Some(SlotIndex::new(index.day, index.slot - 1))
    } else if index.day > 0 {
        Some(SlotIndex::new(index.day - 1, SLOTS_PER_DAY - 1))
    } else {
        None
    }
}

/// Wall-clock start of the slot.
#[allow(clippy::cast_possible_wrap)]
pub fn clock_time(slot: usize) -> NaiveTime {
    NaiveTime::MIN + TimeDelta::minutes((slot * SLOT_MINUTES) as i64)
}
