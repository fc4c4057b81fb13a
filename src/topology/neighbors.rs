use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::lsdb::db::Lsdb;
use crate::lsdb::lsa::{LinkType, RouterId};

/// How two routers are adjacent. Serialized with the names the adjacency
/// matrix front end colors by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NeighborKind {
    #[serde(rename = "p2p")]
    PointToPoint,
    #[serde(rename = "vlink")]
    Virtual,
    #[serde(rename = "network")]
    TransitNetwork,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Neighbor {
    pub router_id: RouterId,
    #[serde(rename = "type")]
    pub kind: NeighborKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouterNeighbors {
    pub router_id: RouterId,
    pub neighbors: Vec<Neighbor>,
}

/// Deduplicated, kind-erased neighbor sets; the Snapshot Differ's input.
pub type NeighborSets = BTreeMap<RouterId, BTreeSet<RouterId>>;

/// Derive the adjacency model.
///
/// Point-to-point and virtual links assert a neighbor directly. Transit and
/// stub links do not: a transit link names the DR interface address, not a
/// router, so transit adjacency comes only from the segment's Network-LSA,
/// whose attached-router list expands into a full mesh. Routers and each
/// router's entries are ordered by the dotted-quad comparator.
pub fn adjacency_model(lsdb: &Lsdb) -> Vec<RouterNeighbors> {
    let mut model: BTreeMap<RouterId, Vec<Neighbor>> = BTreeMap::new();

    for lsa in lsdb.routers() {
        let entries = model.entry(lsa.adv_router.clone()).or_default();
        for link in lsa.links() {
            let kind = match link.link_type {
                LinkType::PointToPoint => NeighborKind::PointToPoint,
                LinkType::Virtual => NeighborKind::Virtual,
                LinkType::Transit | LinkType::Stub => continue,
            };
            entries.push(Neighbor {
                router_id: link.link_id.clone(),
                kind,
            });
        }
    }

    for lsa in lsdb.networks() {
        let attached = lsa.attached_routers();
        for src in attached {
            for dst in attached {
                if src == dst {
                    continue;
                }
                model.entry(src.clone()).or_default().push(Neighbor {
                    router_id: dst.clone(),
                    kind: NeighborKind::TransitNetwork,
                });
            }
        }
    }

    model
        .into_iter()
        .map(|(router_id, mut neighbors)| {
            neighbors.sort_by(|a, b| a.router_id.cmp(&b.router_id));
            RouterNeighbors {
                router_id,
                neighbors,
            }
        })
        .collect()
}

/// Same traversal as `adjacency_model`, collapsed to identifier sets.
pub fn neighbor_sets(lsdb: &Lsdb) -> NeighborSets {
    let mut sets: NeighborSets = BTreeMap::new();

    for lsa in lsdb.routers() {
        let set = sets.entry(lsa.adv_router.clone()).or_default();
        for link in lsa.links() {
            match link.link_type {
                LinkType::PointToPoint | LinkType::Virtual => {
                    set.insert(link.link_id.clone());
                }
                LinkType::Transit | LinkType::Stub => {}
            }
        }
    }

    for lsa in lsdb.networks() {
        let attached = lsa.attached_routers();
        for src in attached {
            for dst in attached {
                if src == dst {
                    continue;
                }
                sets.entry(src.clone()).or_default().insert(dst.clone());
            }
        }
    }

    sets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lsdb::db::build_from_lines;

    fn rid(s: &str) -> RouterId {
        RouterId::from(s)
    }

    fn lsdb_from(lines: &[&str]) -> Lsdb {
        let (lsdb, _) = build_from_lines(lines.iter().copied()).unwrap();
        lsdb
    }

    #[test]
    fn test_reciprocal_p2p_adjacency() {
        let lsdb = lsdb_from(&[
            "LSATYPE=1 LSAID=1.1.1.1 ADVROUTER=1.1.1.1 LINKTYPE=1 LINKID=2.2.2.2 DATA=10.0.0.1",
            "LSATYPE=1 LSAID=2.2.2.2 ADVROUTER=2.2.2.2 LINKTYPE=1 LINKID=1.1.1.1 DATA=10.0.0.2",
        ]);
        let model = adjacency_model(&lsdb);

        assert_eq!(model.len(), 2);
        assert_eq!(model[0].router_id, rid("1.1.1.1"));
        assert_eq!(
            model[0].neighbors,
            [Neighbor {
                router_id: rid("2.2.2.2"),
                kind: NeighborKind::PointToPoint,
            }]
        );
        assert_eq!(model[1].router_id, rid("2.2.2.2"));
        assert_eq!(model[1].neighbors[0].router_id, rid("1.1.1.1"));
    }

    #[test]
    fn test_transit_and_stub_links_do_not_assert_adjacency() {
        let lsdb = lsdb_from(&[
            "LSATYPE=1 LSAID=1.1.1.1 ADVROUTER=1.1.1.1 LINKTYPE=2 LINKID=192.168.0.3 DATA=192.168.0.1",
            "LSATYPE=1 LSAID=1.1.1.1 ADVROUTER=1.1.1.1 LINKTYPE=3 LINKID=192.168.1.0 DATA=255.255.255.0",
            "LSATYPE=1 LSAID=1.1.1.1 ADVROUTER=1.1.1.1 LINKTYPE=4 LINKID=3.3.3.3 DATA=10.0.0.1",
        ]);
        let model = adjacency_model(&lsdb);

        assert_eq!(model.len(), 1);
        assert_eq!(
            model[0].neighbors,
            [Neighbor {
                router_id: rid("3.3.3.3"),
                kind: NeighborKind::Virtual,
            }]
        );
    }

    #[test]
    fn test_network_lsa_expands_to_full_mesh() {
        let lsdb = lsdb_from(&[
            "LSATYPE=2 LSAID=9.9.9.9 ADVROUTER=3.3.3.3 ATTACHED=1.1.1.1",
            "LSATYPE=2 LSAID=9.9.9.9 ADVROUTER=3.3.3.3 ATTACHED=2.2.2.2",
            "LSATYPE=2 LSAID=9.9.9.9 ADVROUTER=3.3.3.3 ATTACHED=3.3.3.3",
        ]);
        let model = adjacency_model(&lsdb);

        // n members yield n * (n - 1) directed entries
        let total: usize = model.iter().map(|r| r.neighbors.len()).sum();
        assert_eq!(total, 6);
        for router in &model {
            assert_eq!(router.neighbors.len(), 2);
            for neighbor in &router.neighbors {
                assert_eq!(neighbor.kind, NeighborKind::TransitNetwork);
            }
        }

        let sets = neighbor_sets(&lsdb);
        assert_eq!(
            sets[&rid("1.1.1.1")],
            BTreeSet::from([rid("2.2.2.2"), rid("3.3.3.3")])
        );
    }

    #[test]
    fn test_single_member_segment_contributes_nothing() {
        let lsdb = lsdb_from(&["LSATYPE=2 LSAID=9.9.9.9 ADVROUTER=1.1.1.1 ATTACHED=1.1.1.1"]);
        assert!(adjacency_model(&lsdb).is_empty());
        assert!(neighbor_sets(&lsdb).is_empty());
    }

    #[test]
    fn test_neighbors_sorted_by_dotted_quad_order() {
        let lsdb = lsdb_from(&[
            "LSATYPE=1 LSAID=1.1.1.1 ADVROUTER=1.1.1.1 LINKTYPE=1 LINKID=10.1.2.10 DATA=10.0.0.1",
            "LSATYPE=1 LSAID=1.1.1.1 ADVROUTER=1.1.1.1 LINKTYPE=1 LINKID=10.1.2.9 DATA=10.0.0.2",
        ]);
        let model = adjacency_model(&lsdb);
        let order: Vec<&str> = model[0]
            .neighbors
            .iter()
            .map(|n| n.router_id.as_str())
            .collect();
        assert_eq!(order, ["10.1.2.9", "10.1.2.10"]);
    }

    #[test]
    fn test_link_target_only_router_has_no_entry() {
        let lsdb = lsdb_from(&[
            "LSATYPE=1 LSAID=1.1.1.1 ADVROUTER=1.1.1.1 LINKTYPE=1 LINKID=2.2.2.2 DATA=10.0.0.1",
        ]);
        let model = adjacency_model(&lsdb);
        assert_eq!(model.len(), 1);
        assert_eq!(model[0].router_id, rid("1.1.1.1"));
    }

    #[test]
    fn test_derivation_is_deterministic() {
        let dump = include_str!("../../test_data/lsadump_current.txt");
        let (lsdb, _) = build_from_lines(dump.lines()).unwrap();
        let a = serde_json::to_string(&adjacency_model(&lsdb)).unwrap();
        let b = serde_json::to_string(&adjacency_model(&lsdb)).unwrap();
        assert_eq!(a, b);
    }
}
