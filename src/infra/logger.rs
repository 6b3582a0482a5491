// src/infra/logger.rs — tracing setup for the rubric CLI

use tracing_subscriber::{fmt, EnvFilter};

/// Initialize logging. `RUBRIC_LOG` takes precedence, then `RUST_LOG`,
/// then the supplied default level.
pub fn init_logging(level: &str) {
    let filter = std::env::var("RUBRIC_LOG")
        .ok()
        .map(EnvFilter::new)
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new(level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}
