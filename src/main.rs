use clap::Parser;
use pv_battery_lp::{
    cli::{Args, Command, OutputArgs, PresetArgs},
    error::ExitCode,
    logging,
    prelude::*,
    problem::optimise,
    report,
    scenario::Scenario,
    schedule::Schedule,
};

fn main() {
    logging::init();
    info!(version = env!("CARGO_PKG_VERSION"), "starting…");

    let exit_code = match run(Args::parse()) {
        Ok(()) => ExitCode::Success,
        Err(error) => {
            error!("{error:#}");
            ExitCode::from_error(&error)
        }
    };
    std::process::exit(exit_code as i32);
}

fn run(args: Args) -> Result {
    let (scenario, output) = match args.command {
        Command::OneDay(args) => (preset(Scenario::one_day(), &args), args.output),
        Command::TwoDays(args) => (preset(Scenario::two_days(), &args), args.output),
        Command::Solve(args) => (Scenario::from_json_file(&args.input)?, args.output),
    };
    info!(
        n_days = scenario.n_days(),
        battery_capacity_kwh = scenario.battery_capacity_kwh,
        "loaded the scenario",
    );

    let schedule = optimise(&scenario)?;
    write_output(&output, &schedule)?;
    print!("{}", report::render(&schedule));
    Ok(())
}

fn preset(scenario: Scenario, args: &PresetArgs) -> Scenario {
    scenario.with_battery_capacity(args.battery_capacity).with_max_grid_import(args.max_grid_import)
}

fn write_output(output: &OutputArgs, schedule: &Schedule) -> Result {
    match &output.path {
        Some(path) => schedule.write_json(path),
        None => Ok(()),
    }
}
