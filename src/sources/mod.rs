pub mod registry;

use chrono::{DateTime, Utc};
use std::path::PathBuf;

use crate::error::{Result, TopologyError};
use crate::mock::{mock_cluster, mock_cluster_id};
use crate::models::cluster::Cluster;

/// Where a cluster snapshot comes from. Fetching and refreshing live data is
/// somebody else's job; a file source only reads what was last written.
#[derive(Debug, Clone)]
pub enum SnapshotSource {
    File { id: String, path: PathBuf },
    Mock { index: u64 },
}

#[derive(Debug, Clone)]
pub struct LoadedSnapshot {
    pub cluster: Cluster,
    pub refreshed_at: DateTime<Utc>,
}

impl SnapshotSource {
    pub fn id(&self) -> String {
        match self {
            SnapshotSource::File { id, .. } => id.clone(),
            SnapshotSource::Mock { index } => mock_cluster_id(*index),
        }
    }

    pub async fn load(&self) -> Result<LoadedSnapshot> {
        match self {
            SnapshotSource::File { id, path } => {
                let data = tokio::fs::read_to_string(path)
                    .await
                    .map_err(|source| TopologyError::SnapshotRead {
                        path: path.clone(),
                        source,
                    })?;
                let mut cluster: Cluster =
                    serde_json::from_str(&data).map_err(|source| TopologyError::SnapshotParse {
                        path: path.clone(),
                        source,
                    })?;
                if cluster.id.is_empty() {
                    cluster.id = id.clone();
                }

                // the file's mtime is the time of the fetcher's last successful write
                let refreshed_at = tokio::fs::metadata(path)
                    .await
                    .and_then(|m| m.modified())
                    .map(DateTime::<Utc>::from)
                    .unwrap_or_else(|_| Utc::now());

                Ok(LoadedSnapshot {
                    cluster,
                    refreshed_at,
                })
            }
            SnapshotSource::Mock { index } => {
                let now = Utc::now();
                Ok(LoadedSnapshot {
                    cluster: mock_cluster(*index, now.timestamp().max(0) as u64),
                    refreshed_at: now,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_source() {
        let source = SnapshotSource::Mock { index: 4 };
        assert_eq!(source.id(), "mock-cluster-4");
        let loaded = source.load().await.unwrap();
        assert_eq!(loaded.cluster.id, "mock-cluster-4");
        assert!(loaded.refreshed_at <= Utc::now());
    }

    #[tokio::test]
    async fn test_file_source() {
        let path = std::env::temp_dir().join(format!("kube-topology-{}.json", std::process::id()));
        tokio::fs::write(&path, r#"{"id": "", "nodes": {}}"#).await.unwrap();
        let source = SnapshotSource::File {
            id: "staging".to_string(),
            path: path.clone(),
        };
        let loaded = source.load().await.unwrap();
        assert_eq!(loaded.cluster.id, "staging");
        assert!(loaded.cluster.nodes.is_empty());

        tokio::fs::write(&path, "not json").await.unwrap();
        assert!(matches!(source.load().await, Err(TopologyError::SnapshotParse { .. })));
        tokio::fs::remove_file(&path).await.unwrap();
        assert!(matches!(source.load().await, Err(TopologyError::SnapshotRead { .. })));
    }
}
