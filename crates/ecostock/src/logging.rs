//! Logging for the CLI and the REST server.
//!
//! Store and service operations log under the `ecostock` target; request
//! spans from the HTTP layer follow the same level. Framework crates stay at
//! `warn` unless tracing is requested.

use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Verbosity level for logging output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Verbosity {
    /// Errors only.
    Quiet,
    /// Notices, alerts and startup messages.
    #[default]
    Normal,
    /// Store operations and handled requests as well.
    Verbose,
    /// Everything, including axum and hyper internals.
    Trace,
}

impl Verbosity {
    /// Level applied to this crate's own events.
    #[must_use]
    pub fn to_level_filter(&self) -> Level {
        match self {
            Self::Quiet => Level::ERROR,
            Self::Normal => Level::INFO,
            Self::Verbose => Level::DEBUG,
            Self::Trace => Level::TRACE,
        }
    }

    /// Filter used when `RUST_LOG` is not set.
    #[must_use]
    pub fn default_directive(&self) -> String {
        let frameworks = if *self == Self::Trace { "trace" } else { "warn" };
        format!(
            "ecostock={},axum={frameworks},hyper={frameworks}",
            self.to_level_filter()
        )
    }
}

/// Install the global subscriber. `RUST_LOG` overrides `verbosity`.
pub fn init_logging(verbosity: Verbosity) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.default_directive()));

    let subscriber = tracing_subscriber::registry().with(env_filter).with(
        fmt::layer()
            .with_target(verbosity >= Verbosity::Verbose)
            .with_file(false)
            .with_line_number(false),
    );

    // A subscriber may already be installed
    let _ = subscriber.try_init();
}

/// Warnings and errors only, routed through the test writer.
#[cfg(test)]
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("ecostock=warn")
        .with_test_writer()
        .try_init();
}
