//! Pod placement inside a node box.
//!
//! Ordinary pods fill a grid from the top. Pods of the system namespace get a
//! separate grid below, which never shares a row with the ordinary grid.

use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::models::cluster::Pod;

pub const NODE_WIDTH: f64 = 105.0;
pub const HANDLE_HEIGHT: f64 = 15.0;
pub const GRID_LEFT: f64 = 24.0;
pub const GRID_TOP: f64 = 20.0;
pub const BOTTOM_MARGIN: f64 = 2.0;

pub type PodComparator<'a> = dyn Fn(&Pod, &Pod) -> Ordering + 'a;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PodGridVariant {
    /// Node height follows the pod count; the system grid starts two rows
    /// below the last ordinary row.
    Stacked,
    /// Node boxes share a height; the system grid is anchored to the bottom
    /// and grows upward. Boxes grow past `height` only when the pods don't fit.
    Fixed { height: f64 },
}

#[derive(Debug, Clone)]
pub struct PodGridSettings {
    pub pods_per_row: usize,
    pub pod_size: f64,
    pub system_namespace: String,
    pub variant: PodGridVariant,
}

impl Default for PodGridSettings {
    fn default() -> Self {
        Self {
            pods_per_row: 6,
            pod_size: 13.0,
            system_namespace: "kube-system".to_string(),
            variant: PodGridVariant::Stacked,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PodGroup {
    Ordinary,
    System,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PodPlacement {
    pub id: String,
    pub group: PodGroup,
    pub row: usize,
    pub column: usize,
    /// Offset from the node box origin.
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NodeBoxGeometry {
    pub width: f64,
    pub height: f64,
    pub rows: usize,
    pub columns: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PodGrid {
    pub geometry: NodeBoxGeometry,
    pub pods: Vec<PodPlacement>,
}

pub fn pack_pods(
    pods: &BTreeMap<String, Pod>,
    settings: &PodGridSettings,
    compare: &PodComparator,
) -> PodGrid {
    let per_row = settings.pods_per_row.max(1);
    let size = settings.pod_size;

    let mut sorted: Vec<(&String, &Pod)> = pods.iter().collect();
    sorted.sort_by(|a, b| compare(a.1, b.1));
    let (system, ordinary): (Vec<_>, Vec<_>) = sorted
        .into_iter()
        .partition(|(_, pod)| pod.namespace == settings.system_namespace);

    let ordinary_rows = ordinary.len().div_ceil(per_row);
    let system_rows = system.len().div_ceil(per_row);
    // one empty row always separates the groups, and trails the ordinary grid
    let min_rows = ordinary_rows + 1 + system_rows;
    let min_height = GRID_TOP + size * min_rows as f64 + BOTTOM_MARGIN;

    let (height, rows) = match settings.variant {
        PodGridVariant::Stacked => (min_height, min_rows),
        PodGridVariant::Fixed { height } if height > min_height => {
            let rows = ((height - GRID_TOP - BOTTOM_MARGIN) / size).floor() as usize;
            (height, rows.max(min_rows))
        }
        PodGridVariant::Fixed { .. } => (min_height, min_rows),
    };

    let mut placements = Vec::with_capacity(pods.len());
    for (index, (id, _)) in ordinary.into_iter().enumerate() {
        let (row, column) = (index / per_row, index % per_row);
        placements.push(PodPlacement {
            id: id.clone(),
            group: PodGroup::Ordinary,
            row,
            column,
            x: GRID_LEFT + size * column as f64,
            y: GRID_TOP + size * row as f64,
        });
    }

    for (index, (id, _)) in system.into_iter().enumerate() {
        let (band, column) = (index / per_row, index % per_row);
        let (row, y) = match settings.variant {
            PodGridVariant::Stacked => {
                let row = ordinary_rows + 1 + band;
                (row, GRID_TOP + size * row as f64)
            }
            PodGridVariant::Fixed { .. } => (
                rows - 1 - band,
                height - BOTTOM_MARGIN - size * (band + 1) as f64,
            ),
        };
        placements.push(PodPlacement {
            id: id.clone(),
            group: PodGroup::System,
            row,
            column,
            x: GRID_LEFT + size * column as f64,
            y,
        });
    }

    PodGrid {
        geometry: NodeBoxGeometry {
            width: NODE_WIDTH,
            height,
            rows,
            columns: per_row,
        },
        pods: placements,
    }
}
