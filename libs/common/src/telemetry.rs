//! Logging setup shared by the service binaries

use tracing_subscriber::EnvFilter;

/// Install the global fmt subscriber
///
/// Honours `RUST_LOG`; defaults to `info`.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
