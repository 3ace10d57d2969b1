// Run reporting.
//
// The report is the partial-success indicator: the process exit status is
// a single pass/fail signal, but the report says which segments
// reconciled, which rules were added, and exactly where application
// stopped being clean.

use chrono::{DateTime, Utc};
use serde::Serialize;

use fwsync_api::types::{BoundaryId, PermissionId, SegmentId};

use crate::model::RuleKey;

/// Which half of the two-step create-then-describe mutation failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplyStage {
    Create,
    Describe,
}

/// One rule that could not be fully applied.
///
/// `stage == Describe` with a `permission_id` means the entry exists on
/// the boundary but carries no description — the visible signature of
/// partial application. A re-run will not repair it: the key is already
/// present, so idempotence skips it.
#[derive(Debug, Clone, Serialize)]
pub struct RuleFailure {
    pub key: RuleKey,
    pub stage: ApplyStage,
    pub permission_id: Option<PermissionId>,
    pub error: String,
}

/// Terminal state of one segment's reconciliation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum SegmentResult {
    /// The segment was read and diffed; individual rules may still have
    /// failed (see `failures`).
    Reconciled {
        boundary_id: BoundaryId,
        added: Vec<RuleKey>,
        already_present: usize,
        failures: Vec<RuleFailure>,
    },
    /// The segment could not be reconciled at all (boundary missing,
    /// state read failed). Other segments are unaffected.
    Failed { error: String },
}

#[derive(Debug, Serialize)]
pub struct SegmentOutcome {
    pub segment_id: SegmentId,
    #[serde(flatten)]
    pub result: SegmentResult,
}

/// Outcome of one full reconciliation run.
#[derive(Debug, Serialize)]
pub struct SyncReport {
    pub timestamp: DateTime<Utc>,
    pub expected_rules: usize,
    pub segments: Vec<SegmentOutcome>,
}

impl SyncReport {
    /// `true` when every segment reconciled and every missing rule was
    /// fully applied.
    pub fn is_clean(&self) -> bool {
        self.segments.iter().all(|s| match &s.result {
            SegmentResult::Reconciled { failures, .. } => failures.is_empty(),
            SegmentResult::Failed { .. } => false,
        })
    }

    /// Total number of rules added across all segments.
    pub fn total_added(&self) -> usize {
        self.segments
            .iter()
            .map(|s| match &s.result {
                SegmentResult::Reconciled { added, .. } => added.len(),
                SegmentResult::Failed { .. } => 0,
            })
            .sum()
    }
}
