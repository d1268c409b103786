//! Logging setup for the reminder service.
//!
//! The output format follows the deployment environment: compact text for
//! local runs, JSON lines everywhere else.

use anyhow::Result;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::Environment;

/// Default filter level for an environment.
fn default_level(env: Environment) -> &'static str {
    match env {
        Environment::Local | Environment::Dev => "debug",
        Environment::Prod => "info",
    }
}

/// Initialize logging for the given environment
///
/// `RUST_LOG` overrides the default level when set.
pub fn init(env: Environment) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level(env)));

    let registry = tracing_subscriber::registry().with(filter);
    match env {
        Environment::Local => registry.with(fmt::layer().compact()).try_init()?,
        Environment::Dev | Environment::Prod => registry
            .with(fmt::layer().json().with_current_span(false))
            .try_init()?,
    }

    Ok(())
}

/// Initialize logging for testing (captures logs for test output)
#[cfg(test)]
pub fn init_test() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(EnvFilter::new("debug"))
        .try_init();
}
