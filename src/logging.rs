//! Logging initialization and configuration.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter applied when `RUST_LOG` is not set.
const DEFAULT_FILTER: &str = "session_meter=info";

fn env_filter(fallback: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
}

/// Initialize the logging system.
///
/// Uses the `RUST_LOG` environment variable for filtering, falling back to
/// `session_meter=info`.
///
/// # Panics
///
/// Panics if called more than once, or if another tracing subscriber has
/// already been set.
pub fn init() {
    tracing_subscriber::registry()
        .with(env_filter(DEFAULT_FILTER))
        .with(tracing_subscriber::fmt::layer().compact())
        .init();
}

/// Try to initialize the logging system.
///
/// Returns `Err` if a subscriber has already been installed.
pub fn try_init() -> Result<(), tracing_subscriber::util::TryInitError> {
    tracing_subscriber::registry()
        .with(env_filter(DEFAULT_FILTER))
        .with(tracing_subscriber::fmt::layer().compact())
        .try_init()
}

/// Initialize logging at an explicit level for this crate.
///
/// `RUST_LOG` still wins when set; otherwise `level` (e.g. `"debug"`) is
/// applied to `session_meter` targets. Pairs with
/// [`MeterConfig::log_filter`](crate::config::MeterConfig::log_filter).
pub fn init_with_level(level: &str) {
    let fallback = format!("session_meter={}", level);
    tracing_subscriber::registry()
        .with(env_filter(&fallback))
        .with(tracing_subscriber::fmt::layer().compact())
        .init();
}
