use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::warn;

use crate::error::{Result, TopologyError};

use super::{LoadedSnapshot, SnapshotSource};

pub struct ClusterRegistry {
    sources: RwLock<HashMap<String, Arc<SnapshotSource>>>,
}

impl ClusterRegistry {
    pub fn new(sources: Vec<SnapshotSource>) -> Self {
        let mut m = HashMap::new();
        for s in sources {
            m.insert(s.id(), Arc::new(s));
        }
        Self {
            sources: RwLock::new(m),
        }
    }

    pub async fn cluster_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.sources.read().await.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Every call reads a fresh snapshot; nothing is cached between passes.
    pub async fn load(&self, id: &str) -> Result<LoadedSnapshot> {
        let source = self
            .sources
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| TopologyError::ClusterNotFound(id.to_string()))?;
        source.load().await
    }

    /// Load all clusters concurrently, ordered by id. Failures are logged and
    /// returned alongside the successes.
    pub async fn load_all(&self) -> Vec<(String, Result<LoadedSnapshot>)> {
        let mut sources: Vec<Arc<SnapshotSource>> =
            self.sources.read().await.values().cloned().collect();
        sources.sort_by_key(|s| s.id());

        let mut handles = Vec::new();
        for source in sources {
            handles.push(tokio::spawn(async move {
                let result = source.load().await;
                if let Err(e) = &result {
                    warn!("error loading cluster {}: {}", source.id(), e);
                }
                (source.id(), result)
            }));
        }

        let mut loaded = Vec::new();
        for handle in handles {
            match handle.await {
                Ok(entry) => loaded.push(entry),
                Err(e) => warn!("snapshot load task failed: {}", e),
            }
        }
        loaded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_lookup() {
        let registry = ClusterRegistry::new(vec![
            SnapshotSource::Mock { index: 1 },
            SnapshotSource::Mock { index: 0 },
        ]);
        assert_eq!(registry.cluster_ids().await, vec!["mock-cluster-0", "mock-cluster-1"]);
        assert!(registry.load("mock-cluster-1").await.is_ok());
        assert!(matches!(
            registry.load("nope").await,
            Err(TopologyError::ClusterNotFound(id)) if id == "nope"
        ));
    }

    #[tokio::test]
    async fn test_load_all_keeps_failures() {
        let registry = ClusterRegistry::new(vec![
            SnapshotSource::Mock { index: 0 },
            SnapshotSource::File {
                id: "missing".to_string(),
                path: "/nonexistent/kube-topology/missing.json".into(),
            },
        ]);
        let loaded = registry.load_all().await;
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].0, "missing");
        assert!(loaded[0].1.is_err());
        assert!(loaded[1].1.is_ok());
    }
}
