// Name resolution for the trusted domain list.
//
// A resolver is constructed per run with its internal cache disabled:
// addresses rotate between runs, and a cached answer would make the
// reconciliation diff a no-op against stale state.

use std::net::Ipv4Addr;

use hickory_resolver::TokioAsyncResolver;
use hickory_resolver::config::{ResolverConfig, ResolverOpts};
use indexmap::IndexMap;
use tracing::debug;

use crate::error::SyncError;
use crate::model::ResolvedAddresses;

/// IPv4 resolver over the trusted domain list.
pub struct DomainResolver {
    inner: TokioAsyncResolver,
}

impl DomainResolver {
    /// Build a resolver from the host's system configuration
    /// (`/etc/resolv.conf`).
    pub fn from_system_conf() -> Result<Self, SyncError> {
        let (config, opts) =
            hickory_resolver::system_conf::read_system_conf().map_err(SyncError::ResolverInit)?;
        Ok(Self::with_config(config, opts))
    }

    /// Build a resolver from an explicit configuration. Caching is
    /// disabled regardless of what `opts` requests.
    pub fn with_config(config: ResolverConfig, mut opts: ResolverOpts) -> Self {
        opts.cache_size = 0;
        Self {
            inner: TokioAsyncResolver::tokio(config, opts),
        }
    }

    /// Resolve every domain to its current IPv4 address set, preserving
    /// input order.
    ///
    /// Any lookup failure (timeout, NXDOMAIN, malformed response) aborts
    /// the whole resolution with the offending domain named in the error;
    /// no domain is skipped silently.
    pub async fn resolve_all(&self, domains: &[String]) -> Result<ResolvedAddresses, SyncError> {
        let mut resolved = IndexMap::with_capacity(domains.len());

        for domain in domains {
            let lookup =
                self.inner
                    .ipv4_lookup(domain.as_str())
                    .await
                    .map_err(|source| SyncError::Resolution {
                        domain: domain.clone(),
                        source,
                    })?;

            let addresses: Vec<Ipv4Addr> = lookup.iter().map(|a| a.0).collect();
            debug!(domain, addresses = addresses.len(), "domain resolved");
            resolved.insert(domain.clone(), addresses);
        }

        Ok(resolved)
    }
}
