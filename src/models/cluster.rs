use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// Cluster snapshot as produced by the external fetcher. Maps are ordered so a
// layout pass walks nodes and pods deterministically.

pub const PHASE_SUCCEEDED: &str = "Succeeded";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Cluster {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub api_server_url: String,
    #[serde(default)]
    pub nodes: BTreeMap<String, Node>,
    #[serde(default)]
    pub unassigned_pods: BTreeMap<String, Pod>,
}

impl Cluster {
    pub fn pod_count(&self) -> usize {
        self.nodes.values().map(|n| n.pods.len()).sum::<usize>() + self.unassigned_pods.len()
    }
}

// --- Node ---

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Node {
    pub name: String,
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
    #[serde(default)]
    pub status: NodeStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub pods: BTreeMap<String, Pod>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct NodeStatus {
    #[serde(default)]
    pub capacity: BTreeMap<String, String>,
    #[serde(default)]
    pub allocatable: BTreeMap<String, String>,
}

impl Node {
    /// Control-plane detection. Each role label is matched as a key/value
    /// pair; only the `node-role.kubernetes.io/master` key matches on any value.
    pub fn is_master(&self) -> bool {
        self.labels.iter().any(|(key, value)| {
            key == "node-role.kubernetes.io/master"
                || (key == "kubernetes.io/role" && value == "master")
                || (key == "master" && value == "true")
        })
    }
}

// --- Pod ---

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Pod {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub namespace: String,
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
    #[serde(default)]
    pub phase: String,
    #[serde(default)]
    pub containers: Vec<Container>,
}

impl Pod {
    pub fn is_succeeded(&self) -> bool {
        self.phase == PHASE_SUCCEEDED
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Container {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub resources: ResourceRequirements,
    #[serde(default)]
    pub ready: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ResourceRequirements {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requests: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limits: Option<BTreeMap<String, String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node_with(labels: &[(&str, &str)]) -> Node {
        Node {
            name: "n".to_string(),
            labels: labels
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_master_labels() {
        assert!(node_with(&[("node-role.kubernetes.io/master", "")]).is_master());
        assert!(node_with(&[("kubernetes.io/role", "master")]).is_master());
        assert!(node_with(&[("master", "true")]).is_master());
        assert!(node_with(&[("zone", "a"), ("master", "true")]).is_master());
    }

    #[test]
    fn test_worker_labels() {
        assert!(!node_with(&[]).is_master());
        assert!(!node_with(&[("kubernetes.io/role", "node")]).is_master());
        assert!(!node_with(&[("master", "false")]).is_master());
        // the value must sit on the matching key
        assert!(!node_with(&[("kubernetes.io/role", "true"), ("master", "master")]).is_master());
    }

    #[test]
    fn test_snapshot_json() {
        let raw = r#"{
            "id": "c1",
            "api_server_url": "https://kube.example.org",
            "nodes": {
                "n1": {
                    "name": "n1",
                    "labels": {"master": "true"},
                    "status": {"capacity": {"cpu": "4"}, "allocatable": {"cpu": "3500m"}},
                    "usage": {"cpu": "1"},
                    "pods": {
                        "default/a": {"name": "a", "namespace": "default", "phase": "Running",
                            "containers": [{"name": "c", "resources": {"requests": {"cpu": "100m"}}}]}
                    }
                }
            },
            "unassigned_pods": {}
        }"#;
        let cluster: Cluster = serde_json::from_str(raw).unwrap();
        let node = &cluster.nodes["n1"];
        assert!(node.is_master());
        assert_eq!(node.status.allocatable["cpu"], "3500m");
        assert_eq!(node.pods["default/a"].containers.len(), 1);
        assert_eq!(cluster.pod_count(), 1);
    }
}
