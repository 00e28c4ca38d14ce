use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::{Result, TopologyError};
use crate::layout::LayoutSettings;
use crate::layout::bars::Thresholds;
use crate::layout::cluster::ClusterGridSettings;
use crate::layout::pods::{PodGridSettings, PodGridVariant};
use crate::sort::PodSort;
use crate::theme::Theme;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_listen_port")]
    pub listen_port: u16,
    #[serde(default)]
    pub clusters: Vec<ClusterDef>,
    #[serde(default)]
    pub mock_clusters: u64,
    #[serde(default = "default_stale_after_secs")]
    pub stale_after_secs: u64,
    #[serde(default)]
    pub layout: LayoutConfig,
    #[serde(default)]
    pub thresholds: Thresholds,
    #[serde(default)]
    pub theme: Theme,
    #[serde(default)]
    pub sort: PodSort,
}

/// A snapshot file kept current by an external fetcher.
#[derive(Debug, Clone, Deserialize)]
pub struct ClusterDef {
    pub id: String,
    pub path: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LayoutConfig {
    #[serde(default = "default_max_width")]
    pub max_width: f64,
    #[serde(default = "default_pods_per_row")]
    pub pods_per_row: usize,
    #[serde(default = "default_pod_size")]
    pub pod_size: f64,
    #[serde(default = "default_system_namespace")]
    pub system_namespace: String,
    /// Fixed node box height; unset means boxes grow with their pods.
    #[serde(default)]
    pub node_box_height: Option<f64>,
}

fn default_listen_port() -> u16 {
    9090
}

fn default_stale_after_secs() -> u64 {
    20
}

fn default_max_width() -> f64 {
    1790.0
}

fn default_pods_per_row() -> usize {
    6
}

fn default_pod_size() -> f64 {
    13.0
}

fn default_system_namespace() -> String {
    "kube-system".to_string()
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            max_width: default_max_width(),
            pods_per_row: default_pods_per_row(),
            pod_size: default_pod_size(),
            system_namespace: default_system_namespace(),
            node_box_height: None,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)
            .map_err(|e| TopologyError::Config(format!("reading {}: {}", path.display(), e)))?;
        Self::parse(&data)
    }

    pub fn parse(data: &str) -> Result<Self> {
        let cfg: Config = serde_yaml::from_str(data)
            .map_err(|e| TopologyError::Config(format!("parsing: {}", e)))?;

        if cfg.clusters.is_empty() && cfg.mock_clusters == 0 {
            return Err(TopologyError::Config(
                "at least one cluster snapshot or mock_clusters must be configured".to_string(),
            ));
        }
        if cfg.layout.pods_per_row == 0 {
            return Err(TopologyError::Config("layout.pods_per_row must be positive".to_string()));
        }
        if cfg.layout.pod_size.is_nan() || cfg.layout.pod_size <= 0.0 {
            return Err(TopologyError::Config("layout.pod_size must be positive".to_string()));
        }

        Ok(cfg)
    }

    pub fn listen_addr(&self) -> String {
        format!("0.0.0.0:{}", self.listen_port)
    }

    pub fn layout_settings(&self) -> LayoutSettings {
        let layout = &self.layout;
        LayoutSettings {
            pods: PodGridSettings {
                pods_per_row: layout.pods_per_row,
                pod_size: layout.pod_size,
                system_namespace: layout.system_namespace.clone(),
                variant: match layout.node_box_height {
                    Some(height) => PodGridVariant::Fixed { height },
                    None => PodGridVariant::Stacked,
                },
            },
            grid: ClusterGridSettings {
                max_width: layout.max_width,
                unassigned_size: layout.pod_size,
                ..Default::default()
            },
            thresholds: self.thresholds,
        }
    }
}
