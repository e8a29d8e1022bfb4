use thiserror::Error;

/// Process exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    Success = 0,
    /// Unreadable or invalid scenario, bad arguments.
    InvalidInput = 1,
    Infeasible = 2,
    Unbounded = 3,
    /// The solver backend failed or is unavailable.
    SolverError = 4,
}

impl ExitCode {
    /// Classify an error chain, falling back to invalid input.
    pub fn from_error(error: &anyhow::Error) -> Self {
        error.downcast_ref::<SolveError>().map_or(Self::InvalidInput, Self::from)
    }
}

impl From<&SolveError> for ExitCode {
    fn from(error: &SolveError) -> Self {
        match error {
            SolveError::Infeasible => Self::Infeasible,
            SolveError::Unbounded => Self::Unbounded,
            SolveError::Solver(_) => Self::SolverError,
        }
    }
}

/// A solve that did not end with an optimal schedule.
#[derive(Debug, Error)]
pub enum SolveError {
    #[error("no battery schedule satisfies the energy balance for these inputs (infeasible)")]
    Infeasible,

    #[error("the grid cost has no lower bound for these inputs (unbounded)")]
    Unbounded,

    #[error("solver failed: {0}")]
    Solver(String),
}
