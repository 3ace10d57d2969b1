// ── Reconciliation domain types ──

use std::net::Ipv4Addr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Domain → current IPv4 addresses, in input order.
///
/// A domain may map to zero or many addresses. Addresses are not
/// deduplicated across domains; identical addresses collapse later at the
/// [`RuleKey`] level.
pub type ResolvedAddresses = IndexMap<String, Vec<Ipv4Addr>>;

/// Canonical rule identity: `"{protocol}-{from_port}-{to_port}-{cidr}"`,
/// e.g. `tcp-443-443-1.1.1.1/32`.
///
/// The sole unit of comparison between expected and live state. Stable and
/// order-independent: the same protocol/ports/address always yields the
/// same key, regardless of template or domain ordering.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleKey(String);

impl RuleKey {
    /// Key for an expected rule; the address is widened to a single-host
    /// `/32` prefix.
    pub fn new(protocol: &str, from_port: u16, to_port: u16, address: Ipv4Addr) -> Self {
        Self(format!("{protocol}-{from_port}-{to_port}-{address}/32"))
    }

    /// Key for a live permission entry, whose range already carries its
    /// prefix.
    pub fn from_live(protocol: &str, from_port: u16, to_port: u16, cidr: &str) -> Self {
        Self(format!("{protocol}-{from_port}-{to_port}-{cidr}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RuleKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One row of the rule catalog.
///
/// Template uniqueness is NOT enforced here — colliding templates collapse
/// last-wins during expansion, which is the catalog author's
/// responsibility to avoid.
#[derive(Debug, Clone, Deserialize)]
pub struct RuleTemplate {
    pub protocol: String,
    pub from_port: u16,
    pub to_port: u16,
    /// Description template; `{domain}` and `{address}` are substituted at
    /// expansion time.
    pub description: String,
}

/// A fully expanded rule for one (template, domain, address) triple.
///
/// Derived, never persisted — recomputed on every run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpectedRule {
    pub protocol: String,
    pub from_port: u16,
    pub to_port: u16,
    pub address: Ipv4Addr,
    pub domain: String,
    pub description: String,
}

impl ExpectedRule {
    pub fn key(&self) -> RuleKey {
        RuleKey::new(&self.protocol, self.from_port, self.to_port, self.address)
    }

    /// The single-host prefix sent to the provider.
    pub fn cidr(&self) -> String {
        format!("{}/32", self.address)
    }

    /// Operator-facing tag name for the created entry, tying it back to
    /// the originating domain.
    pub fn tag_name(&self) -> String {
        format!(
            "{}-{}-{}-{}",
            self.domain, self.protocol, self.from_port, self.to_port
        )
    }
}
