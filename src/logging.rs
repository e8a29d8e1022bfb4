use std::{env, io};

use tracing_subscriber::EnvFilter;

/// Filter from `RUST_LOG`-style directives, `info` when absent or unparsable.
pub fn env_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .filter(|directives| !directives.trim().is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

/// Compact logs to stderr, stdout is reserved for the report.
pub fn init() {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(env::var("RUST_LOG").ok().as_deref()))
        .with_writer(io::stderr)
        .without_time()
        .compact()
        .init();
}
