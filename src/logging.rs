//! Log filter setup shared by the binary and tests

use tracing_subscriber::EnvFilter;

/// Level used when `RUST_LOG` is unset or unparsable
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Filter from `RUST_LOG`, falling back to [`DEFAULT_LOG_LEVEL`]
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL))
}
