use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::scenario::DEFAULT_BATTERY_CAPACITY_KWH;

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Optimise the sample summer day with the banded feed-in tariff.
    #[clap(name = "one-day")]
    OneDay(PresetArgs),

    /// Optimise today and tomorrow's forecast jointly, with a flat feed-in tariff.
    #[clap(name = "two-days")]
    TwoDays(PresetArgs),

    /// Optimise a scenario read from a JSON file.
    #[clap(name = "solve")]
    Solve(SolveArgs),
}

#[derive(Parser)]
pub struct PresetArgs {
    /// Battery capacity in kilowatt-hours.
    #[clap(
        long = "battery-capacity-kwh",
        default_value_t = DEFAULT_BATTERY_CAPACITY_KWH,
        env = "BATTERY_CAPACITY_KWH"
    )]
    pub battery_capacity: f64,

    /// Maximum grid import per 15-minute slot in kilowatt-hours, unlimited by default.
    #[clap(long = "max-grid-import-kwh", env = "MAX_GRID_IMPORT_KWH")]
    pub max_grid_import: Option<f64>,

    #[clap(flatten)]
    pub output: OutputArgs,
}

#[derive(Parser)]
pub struct SolveArgs {
    /// Scenario JSON file.
    #[clap(long, short)]
    pub input: PathBuf,

    #[clap(flatten)]
    pub output: OutputArgs,
}

#[derive(Parser)]
pub struct OutputArgs {
    /// Also write the solved schedule to this JSON file.
    #[clap(long = "output", short = 'o')]
    pub path: Option<PathBuf>,
}
