//! Deterministic demo clusters. Pods and one node appear and disappear on
//! fixed wall-clock periods so a live view has something to redraw.

use std::collections::BTreeMap;

use crate::models::cluster::{Cluster, Container, Node, NodeStatus, Pod, ResourceRequirements};

const NAMES: [&str; 8] = [
    "agentCooper",
    "blackLodge",
    "bob",
    "bobbyBriggs",
    "lauraPalmer",
    "lelandPalmer",
    "logLady",
    "sheriffTruman",
];

const PHASES: [&str; 3] = ["Pending", "Running", "Running"];

fn hash_int(x: u64) -> u64 {
    let x = ((x >> 16) ^ x).wrapping_mul(0x45d9f3b);
    let x = ((x >> 16) ^ x).wrapping_mul(0x45d9f3b);
    (x >> 16) ^ x
}

fn pick<T: Copy>(items: &[T], seed: u64) -> T {
    items[(hash_int(seed) % items.len() as u64) as usize]
}

fn mock_pod(index: u64, i: u64, j: u64) -> Pod {
    let phase = pick(&PHASES, (index + 1) * (i + 1) * (j + 1));
    let containers = (0..1 + j % 2)
        .map(|_| Container {
            name: "myapp".to_string(),
            image: format!("foo/bar/{}", j),
            resources: ResourceRequirements {
                requests: Some(BTreeMap::from([
                    ("cpu".to_string(), "100m".to_string()),
                    ("memory".to_string(), "100Mi".to_string()),
                ])),
                limits: Some(BTreeMap::new()),
            },
            // crash-looping containers
            ready: !(phase == "Running" && j % 13 == 0),
        })
        .collect();

    Pod {
        name: format!("{}-{}-{}", pick(&NAMES, (i + 1) * (j + 1)), i, j),
        namespace: if j < 3 { "kube-system" } else { "default" }.to_string(),
        labels: BTreeMap::new(),
        phase: phase.to_string(),
        containers,
    }
}

pub fn mock_cluster_id(index: u64) -> String {
    format!("mock-cluster-{}", index)
}

/// Build mock cluster `index` as it looks at `now_secs`.
pub fn mock_cluster(index: u64, now_secs: u64) -> Cluster {
    let mut nodes = BTreeMap::new();

    for i in 0..10 {
        // the second to last node comes and goes every 13 seconds
        if i == 8 && (now_secs / 13) % 2 == 0 {
            continue;
        }
        let mut labels = BTreeMap::new();
        if i < 2 {
            labels.insert("master".to_string(), "true".to_string());
        }
        let mut pods = BTreeMap::new();
        for j in 0..hash_int((index + 1) * (i + 1)) % 32 {
            if j % 17 == 0 && (now_secs / 7) % 2 == 0 {
                continue;
            }
            let pod = mock_pod(index, i, j);
            pods.insert(format!("{}/{}", pod.namespace, pod.name), pod);
        }
        let name = format!("node-{}", i);
        nodes.insert(
            name.clone(),
            Node {
                name,
                labels,
                status: NodeStatus {
                    capacity: BTreeMap::from([
                        ("cpu".to_string(), "4".to_string()),
                        ("memory".to_string(), "32Gi".to_string()),
                        ("pods".to_string(), "110".to_string()),
                    ]),
                    allocatable: BTreeMap::new(),
                },
                usage: None,
                pods,
            },
        );
    }

    let pod = mock_pod(index, 11, index);
    let unassigned_pods = BTreeMap::from([(format!("{}/{}", pod.namespace, pod.name), pod)]);

    Cluster {
        id: mock_cluster_id(index),
        api_server_url: format!("https://kube-{}.example.org", index),
        nodes,
        unassigned_pods,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_instant_same_cluster() {
        let a = serde_json::to_string(&mock_cluster(1, 1_000)).unwrap();
        let b = serde_json::to_string(&mock_cluster(1, 1_000)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_shape() {
        // 13 * 2 = 26: node-8 is absent in even 13-second windows
        let c = mock_cluster(0, 26);
        assert_eq!(c.id, "mock-cluster-0");
        assert_eq!(c.api_server_url, "https://kube-0.example.org");
        assert_eq!(c.nodes.len(), 9);
        assert!(!c.nodes.contains_key("node-8"));
        assert!(c.nodes["node-0"].is_master());
        assert!(c.nodes["node-1"].is_master());
        assert!(!c.nodes["node-2"].is_master());
        assert_eq!(c.unassigned_pods.len(), 1);

        let c = mock_cluster(0, 13);
        assert_eq!(c.nodes.len(), 10);
    }

    #[test]
    fn test_pods() {
        let c = mock_cluster(2, 7);
        for node in c.nodes.values() {
            assert!(node.pods.len() < 32);
            for (id, pod) in &node.pods {
                assert_eq!(id, &format!("{}/{}", pod.namespace, pod.name));
                assert!(PHASES.contains(&pod.phase.as_str()));
                assert!(!pod.containers.is_empty() && pod.containers.len() <= 2);
            }
        }
    }
}
