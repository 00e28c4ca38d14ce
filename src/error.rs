use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("malformed quantity {0:?}")]
    MalformedQuantity(String),

    /// A lookup referenced a resource key that was never accounted for.
    /// Callers are expected to check presence first.
    #[error("resource {0:?} is not accounted for on this node")]
    MissingResourceKey(String),

    #[error("cluster {0:?} not found")]
    ClusterNotFound(String),

    #[error("reading snapshot {path}: {source}")]
    SnapshotRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("parsing snapshot {path}: {source}")]
    SnapshotParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("config: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, TopologyError>;
