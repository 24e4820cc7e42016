//! Logging setup utilities for the pika binaries.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber with the specified default log level.
///
/// Every crate listed in `targets` gets `default_level`. The directives can be
/// overridden entirely using the `RUST_LOG` environment variable.
///
/// # Arguments
///
/// * `targets` - Crate names to enable (e.g., `["pika_server", "tower_http"]`)
/// * `default_level` - The default log level (e.g., "debug", "info", "warn", "error")
///
/// # Examples
///
/// ```no_run
/// use pika_shared::logger::setup_logger;
///
/// setup_logger(&["pika_server"], "debug");
/// ```
pub fn setup_logger(targets: &[&str], default_level: &str) {
    let directives = default_directives(targets, default_level);
    let (filter, source) = match tracing_subscriber::EnvFilter::try_from_default_env() {
        Ok(filter) => (filter, "RUST_LOG"),
        Err(_) => (directives.as_str().into(), "defaults"),
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
    tracing::debug!("Logger initialized from {} (defaults: {})", source, directives);
}

fn default_directives(targets: &[&str], default_level: &str) -> String {
    targets
        .iter()
        .map(|target| format!("{}={}", target.replace('-', "_"), default_level))
        .collect::<Vec<_>>()
        .join(",")
}
