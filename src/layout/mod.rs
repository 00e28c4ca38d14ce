//! One layout pass over an immutable cluster snapshot.

pub mod bars;
pub mod cluster;
pub mod pods;

use serde::Serialize;
use tracing::debug;

use crate::error::Result;
use crate::helpers::{labels_tooltip, resource_tooltip};
use crate::models::cluster::Cluster;
use crate::resources::{CPU, MEMORY, NodeResources, resource_usage};

use bars::{BarGeometry, Thresholds, bar_geometry};
use cluster::{ClusterGridSettings, NodeBox, UnassignedPlacement, pack_cluster};
use pods::{HANDLE_HEIGHT, NodeBoxGeometry, PodComparator, PodGridSettings, PodPlacement, pack_pods};

/// Gauges start below the top handle and stop short of the box bottom.
pub const GAUGE_TOP: f64 = HANDLE_HEIGHT + 3.0;
pub const GAUGE_INSET: f64 = HANDLE_HEIGHT + 8.0;
pub const CPU_GAUGE_X: f64 = 5.0;
pub const MEMORY_GAUGE_X: f64 = 14.0;

#[derive(Debug, Clone, Default)]
pub struct LayoutSettings {
    pub pods: PodGridSettings,
    pub grid: ClusterGridSettings,
    pub thresholds: Thresholds,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Gauge {
    pub resource: &'static str,
    /// Offset of the gauge column from the node box origin.
    pub x: f64,
    pub y: f64,
    pub bar: BarGeometry,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tooltip {
    pub text: String,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeLayout {
    pub name: String,
    pub master: bool,
    pub x: f64,
    pub y: f64,
    pub geometry: NodeBoxGeometry,
    pub row: usize,
    pub above: Option<String>,
    pub pods: Vec<PodPlacement>,
    pub resources: NodeResources,
    pub gauges: Vec<Gauge>,
    pub label_tooltip: Tooltip,
    pub resource_tooltip: Tooltip,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterLayout {
    pub id: String,
    pub api_server_url: String,
    pub nodes: Vec<NodeLayout>,
    pub unassigned: Vec<UnassignedPlacement>,
    pub width: f64,
    pub height: f64,
    pub master_height: f64,
    pub worker_nodes_per_row: Option<usize>,
}

/// CPU and memory gauges for a node box of `node_height`. Resources the node
/// does not report get no gauge.
pub fn node_gauges(resources: &NodeResources, node_height: f64, thresholds: &Thresholds) -> Vec<Gauge> {
    let height = (node_height - GAUGE_INSET).max(0.0);
    [(CPU, CPU_GAUGE_X, true), (MEMORY, MEMORY_GAUGE_X, false)]
        .into_iter()
        .filter_map(|(key, x, gridlines)| {
            let record = resources.get(key)?;
            Some(Gauge {
                resource: key,
                x,
                y: GAUGE_TOP,
                bar: bar_geometry(record, height, thresholds, gridlines),
            })
        })
        .collect()
}

/// Lay out every node, pod and gauge of `cluster`. Fails on the first
/// malformed quantity.
pub fn layout_cluster(
    cluster: &Cluster,
    settings: &LayoutSettings,
    compare: &PodComparator,
) -> Result<ClusterLayout> {
    let mut boxes = Vec::with_capacity(cluster.nodes.len());
    let mut partial = Vec::with_capacity(cluster.nodes.len());

    for node in cluster.nodes.values() {
        let resources = resource_usage(node)?;
        let grid = pack_pods(&node.pods, &settings.pods, compare);
        let gauges = node_gauges(&resources, grid.geometry.height, &settings.thresholds);
        boxes.push(NodeBox {
            name: node.name.clone(),
            master: node.is_master(),
            geometry: grid.geometry,
        });
        partial.push((node, grid, resources, gauges));
    }

    let unassigned: Vec<String> = cluster.unassigned_pods.keys().cloned().collect();
    let packed = pack_cluster(&boxes, &unassigned, &settings.grid);

    let nodes = partial
        .into_iter()
        .zip(packed.nodes)
        .map(|((node, grid, resources, gauges), placed)| NodeLayout {
            label_tooltip: Tooltip {
                text: labels_tooltip(node),
                x: placed.x,
                y: placed.y + HANDLE_HEIGHT,
            },
            resource_tooltip: Tooltip {
                text: resource_tooltip(&resources),
                x: placed.x + 22.0,
                y: placed.y + 16.0,
            },
            name: placed.name,
            master: placed.master,
            x: placed.x,
            y: placed.y,
            geometry: grid.geometry,
            row: placed.row,
            above: placed.above,
            pods: grid.pods,
            resources,
            gauges,
        })
        .collect::<Vec<_>>();

    debug!(
        cluster = %cluster.id,
        nodes = nodes.len(),
        pods = cluster.pod_count(),
        width = packed.width,
        height = packed.height,
        "laid out cluster"
    );

    Ok(ClusterLayout {
        id: cluster.id.clone(),
        api_server_url: cluster.api_server_url.clone(),
        nodes,
        unassigned: packed.unassigned,
        width: packed.width,
        height: packed.height,
        master_height: packed.master_height,
        worker_nodes_per_row: packed.worker_nodes_per_row,
    })
}
