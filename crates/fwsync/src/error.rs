//! Agent error types with exit-code mapping.
//!
//! The invoking framework only sees the process exit status; the run
//! report (logged before exit) carries the per-segment detail.

use thiserror::Error;

use crate::config::ConfigError;

/// Exit codes surfaced to the invoking framework.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const PAYLOAD: i32 = 2;
    pub const CONFIG: i32 = 3;
    pub const AUTH: i32 = 4;
}

#[derive(Debug, Error)]
pub enum AgentError {
    // ── Invocation ───────────────────────────────────────────────────
    #[error("failed to read invocation payload: {0}")]
    PayloadIo(#[from] std::io::Error),

    #[error("invalid invocation payload: {0}")]
    Payload(#[from] serde_json::Error),

    // ── Configuration ────────────────────────────────────────────────
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Catalog(#[from] fwsync_core::CatalogError),

    // ── Provider / engine ────────────────────────────────────────────
    /// Client construction failed (bad URL, TLS setup, header value).
    #[error(transparent)]
    Client(#[from] fwsync_api::Error),

    #[error(transparent)]
    Sync(#[from] fwsync_core::SyncError),

    // ── Partial success ──────────────────────────────────────────────
    /// The run finished but some segments or rules did not reconcile.
    /// Details are in the logged report; the exit status stays a single
    /// pass/fail signal.
    #[error("run completed with failures in {failed_segments} of {total_segments} segment(s)")]
    Unclean {
        failed_segments: usize,
        total_segments: usize,
    },
}

impl AgentError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::PayloadIo(_) | Self::Payload(_) => exit_code::PAYLOAD,
            Self::Config(_) => exit_code::CONFIG,
            Self::Client(fwsync_api::Error::InvalidApiKey)
            | Self::Sync(fwsync_core::SyncError::Api(fwsync_api::Error::InvalidApiKey)) => {
                exit_code::AUTH
            }
            _ => exit_code::GENERAL,
        }
    }
}
