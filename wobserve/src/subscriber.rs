//! Process-wide `tracing` subscriber setup.
//!
//! ```rust
//! // A second call reports that a subscriber is already installed.
//! let _ = wobserve::init_tracing(wobserve::DEFAULT_FILTER);
//! assert!(wobserve::init_tracing("debug").is_err());
//! ```

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};

pub const DEFAULT_FILTER: &str = "info";

/// Installs a formatted subscriber filtered by `RUST_LOG`, falling back to
/// `default_filter` when the variable is unset or invalid.
pub fn init_tracing(default_filter: &str) -> Result<(), TryInitError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .try_init()
}
