/*!
Reverse-DNS display names.

Lookups are best effort and independently failable per node: a timeout or a
missing PTR record for one address never aborts the run, the node just keeps
its raw identifier as display name. The `--no-lookup` mode swaps in
`StaticResolver`, which answers every query with the identifier itself.
*/

use std::collections::BTreeMap;
use std::net::{IpAddr, Ipv4Addr};

use async_trait::async_trait;
use hickory_resolver::TokioAsyncResolver;
use hickory_resolver::error::ResolveError;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::lsdb::db::Lsdb;
use crate::lsdb::lsa::RouterId;
use crate::topology::graph::{NodeKind, network_node_id, router_node_id};

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("'{0}' is not an IPv4 address")]
    NotAnIpv4(String),
    #[error("no PTR record")]
    NoPtrRecord,
    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

/// Name resolution capability for topology nodes.
#[async_trait]
pub trait Resolve: Send + Sync {
    async fn resolve(&self, id: &RouterId) -> Result<String, LookupError>;
}

/// PTR lookups through the system resolver configuration.
pub struct DnsResolver {
    resolver: TokioAsyncResolver,
}

impl DnsResolver {
    pub fn from_system_conf() -> Result<Self, ResolveError> {
        Ok(Self {
            resolver: TokioAsyncResolver::tokio_from_system_conf()?,
        })
    }
}

#[async_trait]
impl Resolve for DnsResolver {
    async fn resolve(&self, id: &RouterId) -> Result<String, LookupError> {
        let addr: Ipv4Addr = id
            .as_str()
            .parse()
            .map_err(|_| LookupError::NotAnIpv4(id.to_string()))?;
        let response = self.resolver.reverse_lookup(IpAddr::V4(addr)).await?;
        let name = response.iter().next().ok_or(LookupError::NoPtrRecord)?;
        Ok(name.to_utf8().trim_end_matches('.').to_string())
    }
}

/// Lookup-disabled mode: every node keeps its raw identifier.
pub struct StaticResolver;

#[async_trait]
impl Resolve for StaticResolver {
    async fn resolve(&self, id: &RouterId) -> Result<String, LookupError> {
        Ok(id.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArpaEntry {
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub hostname: String,
}

/// Resolve a display name for every router and network node, keyed by the
/// namespaced node id used in `graph_info`.
pub async fn arpa_info(lsdb: &Lsdb, resolver: &dyn Resolve) -> BTreeMap<String, ArpaEntry> {
    let mut table = BTreeMap::new();
    for lsa in lsdb.routers() {
        table.insert(
            router_node_id(&lsa.id),
            ArpaEntry {
                kind: NodeKind::Router,
                hostname: resolve_or_fallback(resolver, &lsa.id).await,
            },
        );
    }
    for lsa in lsdb.networks() {
        table.insert(
            network_node_id(&lsa.id),
            ArpaEntry {
                kind: NodeKind::Network,
                hostname: resolve_or_fallback(resolver, &lsa.id).await,
            },
        );
    }
    table
}

async fn resolve_or_fallback(resolver: &dyn Resolve, id: &RouterId) -> String {
    match resolver.resolve(id).await {
        Ok(hostname) => hostname,
        Err(err) => {
            debug!(%id, %err, "reverse lookup failed, keeping identifier");
            id.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lsdb::db::build_from_lines;

    struct FailingResolver;

    #[async_trait]
    impl Resolve for FailingResolver {
        async fn resolve(&self, id: &RouterId) -> Result<String, LookupError> {
            Err(LookupError::NotAnIpv4(id.to_string()))
        }
    }

    struct SuffixResolver;

    #[async_trait]
    impl Resolve for SuffixResolver {
        async fn resolve(&self, id: &RouterId) -> Result<String, LookupError> {
            Ok(format!("{id}.example.net"))
        }
    }

    #[tokio::test]
    async fn test_static_resolver_answers_with_the_identifier() {
        let id = RouterId::from("10.0.0.1");
        assert_eq!(StaticResolver.resolve(&id).await.unwrap(), "10.0.0.1");
    }

    #[tokio::test]
    async fn test_arpa_table_covers_both_namespaces() {
        let dump = include_str!("../test_data/lsadump_current.txt");
        let (lsdb, _) = build_from_lines(dump.lines()).unwrap();

        let table = arpa_info(&lsdb, &SuffixResolver).await;
        assert_eq!(table.len(), 4);
        assert_eq!(
            table["rtr:10.0.0.1"],
            ArpaEntry {
                kind: NodeKind::Router,
                hostname: "10.0.0.1.example.net".to_string(),
            }
        );
        assert_eq!(table["net:192.168.0.3"].kind, NodeKind::Network);
    }

    #[tokio::test]
    async fn test_lookup_failure_falls_back_per_node() {
        let dump = include_str!("../test_data/lsadump_current.txt");
        let (lsdb, _) = build_from_lines(dump.lines()).unwrap();

        let table = arpa_info(&lsdb, &FailingResolver).await;
        assert_eq!(table["rtr:10.0.0.2"].hostname, "10.0.0.2");
        assert_eq!(table["net:192.168.0.3"].hostname, "192.168.0.3");
    }
}
