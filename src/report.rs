use std::fmt::Write;

use crate::schedule::{Schedule, ScheduledSlot};

/// Render the schedule as plain text, one line per slot.
///
/// Multi-day schedules get a header per day with indented slot lines.
pub fn render(schedule: &Schedule) -> String {
    let mut report = String::new();
    if schedule.n_days() <= 1 {
        for slot in &schedule.slots {
            render_slot(&mut report, "", slot);
        }
    } else {
        for (day, slots) in schedule.days().enumerate() {
            let _ = writeln!(report, "Day {}:", day + 1);
            for slot in slots {
                render_slot(&mut report, "  ", slot);
            }
        }
    }
    report
}

fn render_slot(report: &mut String, indent: &str, slot: &ScheduledSlot) {
    let _ = writeln!(
        report,
        "{indent}Time {}: PV yield {:.2} kWh, battery {:.2} kWh, \
         grid import {:.2} kWh, grid export {:.2} kWh",
        slot.time.format("%H:%M"),
        slot.pv_kwh,
        slot.battery_kwh,
        slot.grid_import_kwh,
        slot.grid_export_kwh,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::horizon::{clock_time, slots};

    fn schedule(n_days: usize) -> Schedule {
        let slots = slots(n_days)
            .map(|index| ScheduledSlot {
                day: index.day,
                slot: index.slot,
                time: clock_time(index.slot),
                pv_kwh: if index.slot == 40 { 3.36 } else { 0.0 },
                load_kwh: 1.0,
                feed_in_tariff: 0.12,
                battery_kwh: 2.0 / 3.0,
                grid_import_kwh: 1.0,
                grid_export_kwh: 0.004,
            })
            .collect();
        Schedule { slots, objective: 0.0, solve_time_ms: 0.0 }
    }

    #[test]
    fn one_day_has_no_headers() {
        let report = render(&schedule(1));
        let lines: Vec<_> = report.lines().collect();
        assert_eq!(lines.len(), 96);
        assert_eq!(
            lines[0],
            "Time 00:00: PV yield 0.00 kWh, battery 0.67 kWh, \
             grid import 1.00 kWh, grid export 0.00 kWh",
        );
        assert!(lines[40].starts_with("Time 10:00: PV yield 3.36 kWh"));
        assert!(lines[95].starts_with("Time 23:45:"));
    }

    #[test]
    fn two_days_are_grouped() {
        let report = render(&schedule(2));
        let lines: Vec<_> = report.lines().collect();
        assert_eq!(lines.len(), 2 + 192);
        assert_eq!(lines[0], "Day 1:");
        assert!(lines[1].starts_with("  Time 00:00:"));
        assert_eq!(lines[97], "Day 2:");
        assert!(lines[193].starts_with("  Time 23:45:"));
    }
}
