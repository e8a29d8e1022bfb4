pub mod bands;
pub mod cli;
pub mod error;
pub mod horizon;
pub mod logging;
pub mod prelude;
pub mod problem;
pub mod report;
pub mod scenario;
pub mod schedule;
