use std::collections::BTreeMap;

use serde::Serialize;

use crate::resolve::ArpaEntry;
use crate::topology::graph::GraphInfo;
use crate::topology::neighbors::RouterNeighbors;

/// The JSON document the lsdbmon front end polls. `diff_log` is embedded
/// only when no separate log file destination is configured.
#[derive(Debug, Serialize)]
pub struct Report {
    pub timestamp: String,
    pub neighbor_info: Vec<RouterNeighbors>,
    pub graph_info: GraphInfo,
    pub arpa_info: BTreeMap<String, ArpaEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff_log: Option<Vec<String>>,
}

impl Report {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lsdb::db::build_from_lines;
    use crate::resolve::{StaticResolver, arpa_info};
    use crate::topology::{graph, neighbors};

    async fn fixture_report(diff_log: Option<Vec<String>>) -> Report {
        let dump = include_str!("../test_data/lsadump_current.txt");
        let (lsdb, _) = build_from_lines(dump.lines()).unwrap();
        Report {
            timestamp: "2025/01/02 03:04:05".to_string(),
            neighbor_info: neighbors::adjacency_model(&lsdb),
            graph_info: graph::graph_info(&lsdb),
            arpa_info: arpa_info(&lsdb, &StaticResolver).await,
            diff_log,
        }
    }

    #[tokio::test]
    async fn test_report_shape() {
        let report = fixture_report(None).await;
        let value: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();

        assert_eq!(value["timestamp"], "2025/01/02 03:04:05");
        assert_eq!(value["neighbor_info"][0]["router_id"], "10.0.0.1");
        assert_eq!(
            value["neighbor_info"][0]["neighbors"][0]["router_id"],
            "10.0.0.2"
        );
        assert_eq!(value["neighbor_info"][0]["neighbors"][0]["type"], "p2p");
        assert_eq!(
            value["neighbor_info"][0]["neighbors"][1]["type"],
            "network"
        );
        assert_eq!(value["graph_info"]["nodes"][0]["id"], "rtr:10.0.0.1");
        assert_eq!(value["graph_info"]["links"][0]["source"], "rtr:10.0.0.1");
        assert_eq!(value["graph_info"]["links"][0]["target"], "rtr:10.0.0.2");
        assert_eq!(value["arpa_info"]["net:192.168.0.3"]["type"], "network");
        assert_eq!(
            value["arpa_info"]["rtr:10.0.0.1"]["hostname"],
            "10.0.0.1"
        );

        // No log destination configured and no previous dump: field absent
        assert!(value.get("diff_log").is_none());
    }

    #[tokio::test]
    async fn test_diff_log_embedded_when_present() {
        let lines = vec!["New router 10.0.0.9".to_string()];
        let report = fixture_report(Some(lines)).await;
        let value: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(value["diff_log"][0], "New router 10.0.0.9");
    }
}
