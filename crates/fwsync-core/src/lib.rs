//! Reconciliation engine between trusted-domain DNS state and a cloud
//! firewall's allow-list.
//!
//! The engine is a straight pipeline, recomputed from scratch on every
//! invocation — the live firewall state is the only persisted state:
//!
//! - **[`DomainResolver`]** — resolves the trusted domains to their current
//!   IPv4 address sets. Built fresh per run with caching disabled; rotating
//!   addresses are the whole reason reconciliation exists.
//! - **[`catalog`]** — loads the ordered protocol/port rule templates from
//!   the CSV catalog, re-read on every invocation.
//! - **[`expected`]** — pure cross-product of templates × resolved
//!   addresses into a map keyed by canonical [`RuleKey`].
//! - **[`Syncer`]** — per segment: locates the named boundary, reduces its
//!   live ingress permissions to the same canonical keys, and creates
//!   exactly the missing entries. Present entries are never touched;
//!   nothing is ever deleted.
//!
//! Segments are processed sequentially and independently: a missing
//! boundary in one segment fails that segment's outcome without stopping
//! the others. The run's [`SyncReport`] carries every per-segment and
//! per-rule outcome so the invoking framework can distinguish partial
//! success from a no-op.

pub mod catalog;
pub mod error;
pub mod expected;
pub mod model;
pub mod reconcile;
pub mod report;
pub mod resolver;

pub use catalog::load_catalog;
pub use error::{CatalogError, SyncError};
pub use expected::build_expected;
pub use model::{ExpectedRule, ResolvedAddresses, RuleKey, RuleTemplate};
pub use reconcile::Syncer;
pub use report::{ApplyStage, RuleFailure, SegmentOutcome, SegmentResult, SyncReport};
pub use resolver::DomainResolver;
