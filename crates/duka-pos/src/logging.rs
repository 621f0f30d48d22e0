//! # Logging Setup
//!
//! Tracing subscriber initialization for binaries and examples embedding
//! the engine. Libraries only *emit* tracing events; installing a
//! subscriber is the host application's call, so this is opt-in.

use tracing_subscriber::{fmt, EnvFilter};

/// Installs a global tracing subscriber.
///
/// Filter comes from `RUST_LOG` (e.g. `RUST_LOG=duka_pos=debug`), with
/// `info` as the default. Calling twice is a no-op rather than a panic.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}
