// The reconciler: current-state reading, diffing, and incremental
// application.
//
// Per segment: Resolve → BuildExpected → ReadCurrent → {create each
// missing key} — linear, no retries, no backtracking. Entries already
// present are never touched; nothing is ever deleted. Concurrent runs are
// not coordinated here: callers serialize invocations externally, and the
// provider's own duplicate-rule rejection is the only safety net.

use std::collections::{BTreeMap, BTreeSet};

use chrono::Utc;
use tracing::{debug, error, info, warn};

use fwsync_api::ProviderClient;
use fwsync_api::types::{BoundaryId, IngressCreate, SegmentId};

use crate::error::SyncError;
use crate::expected::build_expected;
use crate::model::{ExpectedRule, ResolvedAddresses, RuleKey, RuleTemplate};
use crate::report::{ApplyStage, RuleFailure, SegmentOutcome, SegmentResult, SyncReport};
use crate::resolver::DomainResolver;

/// One reconciliation run against a named boundary.
///
/// Holds the provider client by reference: the client is constructed once
/// per run by the caller and scoped to it — no ambient shared instance.
pub struct Syncer<'a> {
    client: &'a ProviderClient,
    boundary_name: String,
}

impl<'a> Syncer<'a> {
    pub fn new(client: &'a ProviderClient, boundary_name: impl Into<String>) -> Self {
        Self {
            client,
            boundary_name: boundary_name.into(),
        }
    }

    /// Full pipeline: resolve the domains, build the expected state, then
    /// reconcile every segment of the account sequentially.
    pub async fn run(
        &self,
        domains: &[String],
        templates: &[RuleTemplate],
    ) -> Result<SyncReport, SyncError> {
        let resolver = DomainResolver::from_system_conf()?;
        let resolved = resolver.resolve_all(domains).await?;
        self.run_with_resolved(&resolved, templates).await
    }

    /// Run against an already-resolved address mapping.
    ///
    /// Split out from [`run`](Self::run) so the engine is exercisable
    /// without live DNS.
    pub async fn run_with_resolved(
        &self,
        resolved: &ResolvedAddresses,
        templates: &[RuleTemplate],
    ) -> Result<SyncReport, SyncError> {
        let expected = build_expected(templates, resolved);
        info!(rules = expected.len(), "expected state built");

        // Enumeration failure is run-fatal: without the segment list there
        // is nothing to process independently.
        let segments = self.client.list_segments().await?;
        info!(segments = segments.len(), "reconciling all segments");

        let mut outcomes = Vec::with_capacity(segments.len());
        for segment in &segments {
            let result = match self.reconcile_segment(&segment.id, &expected).await {
                Ok(result) => result,
                Err(e) => {
                    error!(segment = %segment.id, error = %e, "segment reconciliation failed");
                    SegmentResult::Failed {
                        error: e.to_string(),
                    }
                }
            };
            outcomes.push(SegmentOutcome {
                segment_id: segment.id.clone(),
                result,
            });
        }

        Ok(SyncReport {
            timestamp: Utc::now(),
            expected_rules: expected.len(),
            segments: outcomes,
        })
    }

    /// Diff one segment's boundary against the expected state and create
    /// the missing entries.
    async fn reconcile_segment(
        &self,
        segment_id: &SegmentId,
        expected: &BTreeMap<RuleKey, ExpectedRule>,
    ) -> Result<SegmentResult, SyncError> {
        let (boundary_id, current) = self.read_current(segment_id).await?;

        let mut added = Vec::new();
        let mut failures = Vec::new();
        let mut already_present = 0usize;

        for (key, rule) in expected {
            if current.contains(key) {
                debug!(%key, boundary = %boundary_id, "rule already present, skipping");
                already_present += 1;
                continue;
            }

            info!(%key, boundary = %boundary_id, segment = %segment_id, "adding missing rule");
            match self.apply_rule(&boundary_id, key, rule).await {
                Ok(()) => added.push(key.clone()),
                Err(failure) => failures.push(failure),
            }
        }

        info!(
            segment = %segment_id,
            boundary = %boundary_id,
            added = added.len(),
            already_present,
            failed = failures.len(),
            "segment reconciled"
        );

        Ok(SegmentResult::Reconciled {
            boundary_id,
            added,
            already_present,
            failures,
        })
    }

    /// Locate the named boundary in a segment and reduce its live ingress
    /// permissions to canonical keys.
    ///
    /// Every address range of every protocol/port grouping contributes its
    /// own key. Richer metadata is dropped here — diffing only ever sees
    /// keys.
    async fn read_current(
        &self,
        segment_id: &SegmentId,
    ) -> Result<(BoundaryId, BTreeSet<RuleKey>), SyncError> {
        let boundaries = self
            .client
            .find_boundaries(segment_id, &self.boundary_name)
            .await?;

        // Names are unique per segment by provisioner construction; if
        // out-of-band drift produced duplicates, the first match wins.
        let Some(boundary) = boundaries.into_iter().next() else {
            return Err(SyncError::BoundaryNotFound {
                segment_id: segment_id.clone(),
                boundary_name: self.boundary_name.clone(),
            });
        };

        let groupings = self.client.list_ingress(&boundary.id).await?;

        let mut current = BTreeSet::new();
        for grouping in &groupings {
            for range in &grouping.ip_ranges {
                current.insert(RuleKey::from_live(
                    &grouping.protocol,
                    grouping.from_port,
                    grouping.to_port,
                    &range.cidr,
                ));
            }
        }

        debug!(boundary = %boundary.id, keys = current.len(), "current state read");
        Ok((boundary.id, current))
    }

    /// Apply one missing rule: create the tagged entry, then set its
    /// description.
    ///
    /// The two steps are not atomic. A failed description update leaves
    /// the entry tagged-but-undescribed; that state is recorded (not
    /// repaired) so operators can spot partial application.
    async fn apply_rule(
        &self,
        boundary_id: &BoundaryId,
        key: &RuleKey,
        rule: &ExpectedRule,
    ) -> Result<(), RuleFailure> {
        let created = self
            .client
            .add_ingress(
                boundary_id,
                &IngressCreate {
                    protocol: rule.protocol.clone(),
                    from_port: rule.from_port,
                    to_port: rule.to_port,
                    cidr: rule.cidr(),
                    name: rule.tag_name(),
                },
            )
            .await
            .map_err(|e| {
                warn!(%key, error = %e, "rule creation rejected");
                RuleFailure {
                    key: key.clone(),
                    stage: ApplyStage::Create,
                    permission_id: None,
                    error: e.to_string(),
                }
            })?;

        self.client
            .set_ingress_description(boundary_id, &created.id, &rule.description)
            .await
            .map_err(|e| {
                warn!(
                    %key,
                    permission = %created.id,
                    error = %e,
                    "description update failed after creation"
                );
                RuleFailure {
                    key: key.clone(),
                    stage: ApplyStage::Describe,
                    permission_id: Some(created.id.clone()),
                    error: e.to_string(),
                }
            })
    }
}
