// Wire types for the provider API.
//
// These mirror the provider's JSON shapes one-to-one; domain semantics
// (canonical rule keys, diffing) live in fwsync-core.

use serde::{Deserialize, Serialize};

// ── Identifiers ──────────────────────────────────────────────────────

/// Provider-assigned network segment id (e.g. `"seg-0f3a9c"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SegmentId(pub String);

/// Provider-assigned security boundary id (e.g. `"bnd-82c1d4"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BoundaryId(pub String);

/// Provider-assigned ingress permission id (e.g. `"perm-5b77e0"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionId(pub String);

impl std::fmt::Display for SegmentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::fmt::Display for BoundaryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::fmt::Display for PermissionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// ── Segments ─────────────────────────────────────────────────────────

/// An isolated network segment of the account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Segment {
    pub id: SegmentId,
    #[serde(default)]
    pub cidr_block: Option<String>,
    #[serde(default)]
    pub is_default: bool,
}

// ── Boundaries ───────────────────────────────────────────────────────

/// A security boundary: the firewall object holding ingress permissions
/// for one segment. At most one boundary of a given name exists per
/// segment (provisioner invariant).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Boundary {
    pub id: BoundaryId,
    pub name: String,
    pub segment_id: SegmentId,
    #[serde(default)]
    pub description: Option<String>,
}

/// Body for `POST v1/segments/{segment_id}/boundaries`.
#[derive(Debug, Clone, Serialize)]
pub struct BoundaryCreate {
    pub name: String,
    pub description: String,
}

// ── Ingress permissions ──────────────────────────────────────────────

/// One protocol/port grouping of a boundary's ingress permission set.
///
/// The provider groups several address ranges under a single grouping;
/// every range is an independently addressable permission entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngressGrouping {
    pub protocol: String,
    pub from_port: u16,
    pub to_port: u16,
    #[serde(default)]
    pub ip_ranges: Vec<IpRange>,
}

/// A single address range within a grouping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IpRange {
    pub cidr: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Body for `POST v1/boundaries/{boundary_id}/ingress`.
///
/// `name` is the operator-facing tag attached to the created entry.
#[derive(Debug, Clone, Serialize)]
pub struct IngressCreate {
    pub protocol: String,
    pub from_port: u16,
    pub to_port: u16,
    pub cidr: String,
    pub name: String,
}

/// Response to an ingress creation: the provider-assigned entry id,
/// needed for the follow-up description update.
#[derive(Debug, Clone, Deserialize)]
pub struct IngressCreated {
    pub id: PermissionId,
}

/// Body for `PUT v1/boundaries/{boundary_id}/ingress/{permission_id}/description`.
#[derive(Debug, Clone, Serialize)]
pub struct DescriptionUpdate {
    pub description: String,
}
