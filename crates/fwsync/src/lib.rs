//! Shared plumbing for the fwsync agent binaries.
//!
//! Both `fwsync-agent` (the reconciliation run) and `fwsync-provision`
//! (the boundary lifecycle hook) are event-driven: configuration comes
//! from `FWSYNC_`-prefixed environment variables and the invocation
//! payload arrives as JSON on stdin. There is no CLI surface and no
//! persisted local state.

pub mod config;
pub mod error;
pub mod payload;

use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise the configured filter applies.
pub fn init_tracing(default_filter: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_target(false)
        .init();
}
