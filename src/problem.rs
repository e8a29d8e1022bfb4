use std::time::Instant;

use good_lp::{
    Constraint,
    Expression,
    IntoAffineExpression,
    ProblemVariables,
    ResolutionError,
    Solution,
    SolverModel,
    Variable,
    constraint,
    highs,
    variable,
};

use crate::{
    error::SolveError,
    horizon::{self, previous_storage},
    prelude::*,
    scenario::Scenario,
    schedule::{Schedule, ScheduledSlot},
};

/// Battery schedule as a linear program, ready to be handed over to the solver.
///
/// Variables, day-major, one per slot of the horizon:
///
/// - `battery`: energy stored at the end of the slot, within `[0, capacity]`
/// - `grid_import`: energy drawn from the grid, non-negative and optionally limited
/// - `grid_export`: energy fed into the grid, non-negative
///
/// Objective: minimise `Σ grid_import − Σ tariff · grid_export`.
pub struct Problem {
    scenario: Scenario,
    variables: ProblemVariables,
    objective: Expression,
    constraints: Vec<Constraint>,
    battery: Vec<Variable>,
    grid_import: Vec<Variable>,
    grid_export: Vec<Variable>,
}

impl Problem {
    pub fn build(scenario: &Scenario) -> Result<Self> {
        scenario.validate().context("invalid scenario")?;
        let n_slots = scenario.n_slots();

        let mut variables = ProblemVariables::new();
        let battery =
            variables.add_vector(variable().min(0.0).max(scenario.battery_capacity_kwh), n_slots);
        let grid_import = variables.add_vector(
            match scenario.max_grid_import_kwh {
                Some(limit) => variable().min(0.0).max(limit),
                None => variable().min(0.0),
            },
            n_slots,
        );
        let grid_export = variables.add_vector(variable().min(0.0), n_slots);

        let mut objective = Expression::from(0.0);
        for index in horizon::slots(scenario.n_days()) {
            let i = index.flat();
            objective = objective + grid_import[i];
            objective = objective - (grid_export[i] * scenario.tariff(index));
        }

        let constraints = horizon::slots(scenario.n_days())
            .map(|index| {
                let i = index.flat();
                let carried = previous_storage(index).map_or_else(
                    || Expression::from(0.0),
                    |previous| battery[previous.flat()].into_expression(),
                );
                constraint!(
                    scenario.pv(index) + grid_import[i] - grid_export[i] + carried
                        == scenario.load(index) + battery[i]
                )
            })
            .collect();

        Ok(Self {
            scenario: scenario.clone(),
            variables,
            objective,
            constraints,
            battery,
            grid_import,
            grid_export,
        })
    }

    pub fn n_variables(&self) -> usize {
        self.battery.len() + self.grid_import.len() + self.grid_export.len()
    }

    pub fn n_constraints(&self) -> usize {
        self.constraints.len()
    }

    /// Run HiGHS on the problem.
    #[instrument(
        skip_all,
        fields(n_variables = self.n_variables(), n_constraints = self.n_constraints()),
    )]
    pub fn solve(self) -> SolveOutcome {
        let Self {
            scenario,
            variables,
            objective,
            constraints,
            battery,
            grid_import,
            grid_export,
        } = self;

        let solve_start = Instant::now();
        let model = constraints
            .into_iter()
            .fold(variables.minimise(objective.clone()).using(highs), |model, constraint| {
                model.with(constraint)
            });
        let result = model.solve();
        let solve_time_ms = solve_start.elapsed().as_secs_f64() * 1000.0;

        let solution = match result {
            Ok(solution) => solution,
            Err(ResolutionError::Infeasible) => return Self::classify_infeasible(&scenario),
            Err(ResolutionError::Unbounded) => return SolveOutcome::Unbounded,
            Err(error) => return SolveOutcome::Failed(error.to_string()),
        };

        let slots = horizon::slots(scenario.n_days())
            .map(|index| {
                let i = index.flat();
                ScheduledSlot {
                    day: index.day,
                    slot: index.slot,
                    time: index.clock_time(),
                    pv_kwh: scenario.pv(index),
                    load_kwh: scenario.load(index),
                    feed_in_tariff: scenario.tariff(index),
                    battery_kwh: solution.value(battery[i]),
                    grid_import_kwh: solution.value(grid_import[i]),
                    grid_export_kwh: solution.value(grid_export[i]),
                }
            })
            .collect();
        let objective = solution.eval(objective);
        debug!(solve_time_ms, objective, "optimal");

        SolveOutcome::Optimal(Schedule { slots, objective, solve_time_ms })
    }

    /// Tell an infeasible problem from an unbounded one.
    ///
    /// HiGHS presolve may only conclude "unbounded or infeasible", which `good_lp` reports as
    /// infeasible. With a zero objective the constraints alone decide: feasible means the
    /// original objective was unbounded.
    fn classify_infeasible(scenario: &Scenario) -> SolveOutcome {
        let problem = match Self::build(scenario) {
            Ok(problem) => problem,
            Err(error) => return SolveOutcome::Failed(format!("{error:#}")),
        };
        match problem.find_feasible() {
            Ok(()) => {
                debug!("constraints are feasible, the objective is unbounded");
                SolveOutcome::Unbounded
            }
            Err(ResolutionError::Infeasible) => SolveOutcome::Infeasible,
            Err(error) => SolveOutcome::Failed(error.to_string()),
        }
    }

    /// Solve the constraints alone, ignoring the objective.
    fn find_feasible(self) -> Result<(), ResolutionError> {
        let model = self.variables.minimise(Expression::from(0.0)).using(highs);
        self.constraints
            .into_iter()
            .fold(model, |model, constraint| model.with(constraint))
            .solve()
            .map(|_| ())
    }
}

/// Solver verdict. Solved values are only reachable through [`SolveOutcome::Optimal`].
#[derive(Debug)]
pub enum SolveOutcome {
    Optimal(Schedule),
    Infeasible,
    Unbounded,
    Failed(String),
}

impl SolveOutcome {
    pub const fn status(&self) -> &'static str {
        match self {
            Self::Optimal(_) => "optimal",
            Self::Infeasible => "infeasible",
            Self::Unbounded => "unbounded",
            Self::Failed(_) => "error",
        }
    }

    pub const fn is_optimal(&self) -> bool {
        matches!(self, Self::Optimal(_))
    }

    pub fn into_schedule(self) -> Result<Schedule, SolveError> {
        match self {
            Self::Optimal(schedule) => Ok(schedule),
            Self::Infeasible => Err(SolveError::Infeasible),
            Self::Unbounded => Err(SolveError::Unbounded),
            Self::Failed(message) => Err(SolveError::Solver(message)),
        }
    }
}

/// Build and solve in one go.
pub fn optimise(scenario: &Scenario) -> Result<Schedule> {
    let problem = Problem::build(scenario)?;
    info!(
        n_days = scenario.n_days(),
        n_variables = problem.n_variables(),
        n_constraints = problem.n_constraints(),
        "built the problem",
    );
    let outcome = problem.solve();
    info!(status = outcome.status(), "solved");
    let schedule = outcome.into_schedule()?;
    info!(
        objective = schedule.objective,
        grid_import_kwh = schedule.total_grid_import(),
        grid_export_kwh = schedule.total_grid_export(),
        solve_time_ms = schedule.solve_time_ms,
        "optimised",
    );

    let residual = schedule.max_balance_residual();
    if residual > 1e-6 {
        warn!(residual, "energy balance is off beyond the solver tolerance");
    }
    Ok(schedule)
}
