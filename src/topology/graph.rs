use serde::Serialize;

use crate::lsdb::db::Lsdb;
use crate::lsdb::lsa::{LinkType, RouterId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Router,
    Network,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphNode {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphLink {
    pub source: String,
    pub target: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct GraphInfo {
    pub nodes: Vec<GraphNode>,
    pub links: Vec<GraphLink>,
}

/// Router and network ids share dotted-quad syntax; node ids carry a
/// namespace prefix so the two spaces cannot collide in the rendered graph.
pub fn router_node_id(id: &RouterId) -> String {
    format!("rtr:{id}")
}

pub fn network_node_id(id: &RouterId) -> String {
    format!("net:{id}")
}

/// Derive the node/link description for the force-directed layout.
///
/// Links stay directed exactly as asserted: one per point-to-point or
/// virtual router link, one per attached-router entry. The layout only
/// needs connectivity, so no full-mesh expansion happens here.
pub fn graph_info(lsdb: &Lsdb) -> GraphInfo {
    let mut info = GraphInfo::default();

    for lsa in lsdb.routers() {
        info.nodes.push(GraphNode {
            id: router_node_id(&lsa.id),
            kind: NodeKind::Router,
            name: lsa.id.to_string(),
        });
        for link in lsa.links() {
            match link.link_type {
                LinkType::PointToPoint | LinkType::Virtual => info.links.push(GraphLink {
                    source: router_node_id(&lsa.id),
                    target: router_node_id(&link.link_id),
                }),
                LinkType::Transit | LinkType::Stub => {}
            }
        }
    }

    for lsa in lsdb.networks() {
        info.nodes.push(GraphNode {
            id: network_node_id(&lsa.id),
            kind: NodeKind::Network,
            name: lsa.id.to_string(),
        });
        for attached in lsa.attached_routers() {
            info.links.push(GraphLink {
                source: network_node_id(&lsa.id),
                target: router_node_id(attached),
            });
        }
    }

    info
}
