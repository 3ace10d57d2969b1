// ── Engine error types ──
//
// Scope matters more than kind here: resolution and catalog failures are
// fatal to the whole run, a missing boundary is fatal to one segment only,
// and per-rule apply failures never surface as errors at all -- they are
// recorded in the run report (report::RuleFailure) so the rest of the
// segment still proceeds.

use thiserror::Error;

use fwsync_api::types::SegmentId;

/// Failure loading the rule template catalog. Always run-fatal.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("rule catalog not readable at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("rule catalog is malformed: {0}")]
    Malformed(#[from] csv::Error),
}

/// Unified error type for the reconciliation engine.
#[derive(Debug, Error)]
pub enum SyncError {
    // ── Run-fatal ────────────────────────────────────────────────────
    /// DNS lookup failed for one domain. Resolution failure is never
    /// partially tolerated: no domain is skipped silently.
    #[error("DNS resolution failed for {domain}: {source}")]
    Resolution {
        domain: String,
        #[source]
        source: hickory_resolver::error::ResolveError,
    },

    /// The resolver itself could not be constructed (unreadable system
    /// configuration).
    #[error("resolver construction failed: {0}")]
    ResolverInit(#[source] hickory_resolver::error::ResolveError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    // ── Segment-scoped ───────────────────────────────────────────────
    /// No boundary matched the name+segment filters. Aborts this segment
    /// only; other segments still reconcile.
    #[error("no boundary named '{boundary_name}' in segment {segment_id}")]
    BoundaryNotFound {
        segment_id: SegmentId,
        boundary_name: String,
    },

    // ── Provider API ─────────────────────────────────────────────────
    /// Transport or provider failure outside a per-rule mutation. Scope
    /// follows where it occurs: run-fatal during segment enumeration,
    /// segment-fatal during a segment's state read.
    #[error(transparent)]
    Api(#[from] fwsync_api::Error),
}
