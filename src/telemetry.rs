//! Logging setup

use crate::config::LoggingConfig;
use crate::error::{OrchestratorError, OrchestratorResult};

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Filter used when neither `RUST_LOG` nor the config sets one
pub const DEFAULT_FILTER: &str = "info,interchain_orchestrator=debug,hyper=warn";

/// Install the global subscriber. `RUST_LOG` overrides the configured filter.
pub fn init_logging(config: &LoggingConfig) -> OrchestratorResult<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(config.filter.as_deref().unwrap_or(DEFAULT_FILTER))
    });

    let registry = tracing_subscriber::registry().with(filter);
    let result = if config.json {
        registry
            .with(fmt::layer().json().with_current_span(true).with_target(true))
            .try_init()
    } else {
        registry
            .with(fmt::layer().with_target(true).with_thread_ids(true))
            .try_init()
    };

    result.map_err(|e| OrchestratorError::Config(format!("logging already initialized: {}", e)))
}
