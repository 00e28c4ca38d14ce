//! Row-wrapping placement of node boxes: masters on top, workers below.

use serde::Serialize;

use super::pods::NodeBoxGeometry;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClusterGridSettings {
    pub left: f64,
    pub top: f64,
    pub padding: f64,
    pub max_width: f64,
    /// Horizontal advance per unassigned pod.
    pub unassigned_step: f64,
    pub unassigned_size: f64,
}

impl Default for ClusterGridSettings {
    fn default() -> Self {
        Self {
            left: 10.0,
            top: 20.0,
            padding: 5.0,
            max_width: 1790.0,
            unassigned_step: 20.0,
            unassigned_size: 13.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NodeBox {
    pub name: String,
    pub master: bool,
    pub geometry: NodeBoxGeometry,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodePlacement {
    pub name: String,
    pub master: bool,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Row within the node's region (masters or workers).
    pub row: usize,
    /// The box assumed to sit above: `index % nodes_per_row` once the index
    /// reaches `nodes_per_row`, which always lands in the region's first row.
    pub above: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnassignedPlacement {
    pub id: String,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterGrid {
    /// Same order as the input boxes.
    pub nodes: Vec<NodePlacement>,
    pub unassigned: Vec<UnassignedPlacement>,
    pub width: f64,
    pub height: f64,
    pub master_height: f64,
    pub worker_height: f64,
    pub master_nodes_per_row: Option<usize>,
    pub worker_nodes_per_row: Option<usize>,
}

struct Region {
    placements: Vec<NodePlacement>,
    cursor_x: f64,
    cursor_y: f64,
    width: f64,
    height: f64,
    nodes_per_row: Option<usize>,
}

// A row's height is only final once the row closes; boxes already placed in
// it are not moved when a taller sibling follows.
fn pack_region(boxes: &[&NodeBox], s: &ClusterGridSettings) -> Region {
    let mut placements: Vec<NodePlacement> = Vec::with_capacity(boxes.len());
    let (mut x, mut y) = (s.left, s.top);
    let mut row = 0;
    let mut row_height: f64 = 0.0;
    let mut closed_height = 0.0;
    let mut width: f64 = 0.0;
    // Computed at the first overflow and kept for the rest of the pass, even
    // when later boxes have other widths.
    let mut nodes_per_row: Option<usize> = None;

    for (index, node) in boxes.iter().enumerate() {
        let geometry = node.geometry;
        if x > s.left && x + geometry.width > s.max_width {
            if nodes_per_row.is_none() {
                nodes_per_row = Some(((x / (geometry.width + s.padding)).floor() as usize).max(1));
            }
            width = width.max(x);
            x = s.left;
            y += row_height + s.padding;
            closed_height += row_height + s.padding;
            row_height = 0.0;
            row += 1;
        }

        let above = nodes_per_row
            .filter(|n| index >= *n)
            .map(|n| boxes[index % n].name.clone());
        placements.push(NodePlacement {
            name: node.name.clone(),
            master: node.master,
            x,
            y,
            width: geometry.width,
            height: geometry.height,
            row,
            above,
        });

        row_height = row_height.max(geometry.height);
        x += geometry.width + s.padding;
    }

    let height = if boxes.is_empty() {
        0.0
    } else {
        closed_height + row_height + s.padding
    };

    Region {
        placements,
        cursor_x: x,
        cursor_y: y,
        width: width.max(x),
        height,
        nodes_per_row,
    }
}

/// Place name-ordered node boxes and the cluster's unassigned pods.
pub fn pack_cluster(
    boxes: &[NodeBox],
    unassigned: &[String],
    s: &ClusterGridSettings,
) -> ClusterGrid {
    let (masters, workers): (Vec<&NodeBox>, Vec<&NodeBox>) = boxes.iter().partition(|b| b.master);

    let master_region = pack_region(&masters, s);
    let mut worker_region = pack_region(&workers, s);

    let mut pod_x = master_region.cursor_x;
    let mut pods = Vec::with_capacity(unassigned.len());
    for id in unassigned {
        pods.push(UnassignedPlacement {
            id: id.clone(),
            x: pod_x,
            y: master_region.cursor_y,
        });
        pod_x += s.unassigned_step;
    }

    let mut master_height = master_region.height;
    if masters.is_empty() && !unassigned.is_empty() {
        master_height = s.unassigned_size + s.padding;
    }

    // worker rows were laid out from the top; shift them below the masters
    for placement in &mut worker_region.placements {
        placement.y += master_height;
    }

    let master_width = master_region.width.max(pod_x);
    let width = master_width.max(worker_region.width);
    let height = s.top + master_height + worker_region.height;

    let mut masters_iter = master_region.placements.into_iter();
    let mut workers_iter = worker_region.placements.into_iter();
    let nodes = boxes
        .iter()
        .filter_map(|b| {
            if b.master {
                masters_iter.next()
            } else {
                workers_iter.next()
            }
        })
        .collect();

    ClusterGrid {
        nodes,
        unassigned: pods,
        width,
        height,
        master_height,
        worker_height: worker_region.height,
        master_nodes_per_row: master_region.nodes_per_row,
        worker_nodes_per_row: worker_region.nodes_per_row,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(name: &str, master: bool, width: f64, height: f64) -> NodeBox {
        NodeBox {
            name: name.to_string(),
            master,
            geometry: NodeBoxGeometry {
                width,
                height,
                rows: 1,
                columns: 6,
            },
        }
    }

    fn settings(max_width: f64) -> ClusterGridSettings {
        ClusterGridSettings {
            max_width,
            ..Default::default()
        }
    }

    fn placed<'a>(grid: &'a ClusterGrid, name: &str) -> &'a NodePlacement {
        grid.nodes.iter().find(|n| n.name == name).unwrap()
    }

    #[test]
    fn test_empty_cluster() {
        let grid = pack_cluster(&[], &[], &settings(500.0));
        assert!(grid.nodes.is_empty());
        assert_eq!(grid.width, 10.0);
        assert_eq!(grid.height, 20.0);
    }

    #[test]
    fn test_single_row() {
        let boxes = [node("a", false, 105.0, 60.0), node("b", false, 105.0, 80.0)];
        let grid = pack_cluster(&boxes, &[], &settings(1000.0));
        assert_eq!((placed(&grid, "a").x, placed(&grid, "a").y), (10.0, 20.0));
        assert_eq!((placed(&grid, "b").x, placed(&grid, "b").y), (120.0, 20.0));
        assert_eq!(grid.worker_height, 85.0);
        assert_eq!(grid.width, 230.0);
        assert_eq!(grid.height, 105.0);
        assert_eq!(grid.worker_nodes_per_row, None);
    }

    #[test]
    fn test_wrap_advances_by_row_max_height() {
        let boxes = [
            node("a", false, 105.0, 60.0),
            node("b", false, 105.0, 90.0),
            node("c", false, 105.0, 50.0),
        ];
        let grid = pack_cluster(&boxes, &[], &settings(250.0));
        let c = placed(&grid, "c");
        assert_eq!((c.x, c.y, c.row), (10.0, 20.0 + 90.0 + 5.0, 1));
        assert_eq!(c.above.as_deref(), Some("a"));
        // earlier siblings keep their y when a taller box follows
        assert_eq!(placed(&grid, "a").y, 20.0);
        assert_eq!(grid.worker_height, 95.0 + 55.0);
        assert_eq!(grid.width, 230.0);
    }

    #[test]
    fn test_oversized_node_stays_on_its_row() {
        let boxes = [node("wide", false, 400.0, 60.0), node("next", false, 105.0, 60.0)];
        let grid = pack_cluster(&boxes, &[], &settings(200.0));
        assert_eq!((placed(&grid, "wide").x, placed(&grid, "wide").row), (10.0, 0));
        assert_eq!(placed(&grid, "next").row, 1);
        assert_eq!(grid.width, 415.0);
        assert!(grid.height > 0.0);
    }

    #[test]
    fn test_masters_above_workers() {
        let boxes = [
            node("m1", true, 105.0, 70.0),
            node("w1", false, 105.0, 40.0),
            node("m2", true, 105.0, 50.0),
        ];
        let grid = pack_cluster(&boxes, &[], &settings(1000.0));
        let names: Vec<&str> = grid.nodes.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["m1", "w1", "m2"]);
        assert_eq!(placed(&grid, "m2").x, 120.0);
        assert_eq!(grid.master_height, 75.0);
        assert_eq!(placed(&grid, "w1").y, 20.0 + 75.0);
        assert_eq!(grid.height, 20.0 + 75.0 + 45.0);
    }

    #[test]
    fn test_unassigned_pods_follow_last_master() {
        let boxes = [node("m1", true, 105.0, 70.0), node("w1", false, 105.0, 40.0)];
        let pending = vec!["default/a".to_string(), "default/b".to_string()];
        let grid = pack_cluster(&boxes, &pending, &settings(1000.0));
        assert_eq!(grid.unassigned[0].x, 120.0);
        assert_eq!(grid.unassigned[1].x, 140.0);
        assert_eq!(grid.unassigned[1].y, 20.0);
        assert_eq!(grid.width, 160.0);
    }

    #[test]
    fn test_unassigned_pods_without_masters_reserve_a_band() {
        let boxes = [node("w1", false, 105.0, 40.0)];
        let grid = pack_cluster(&boxes, &["default/a".to_string()], &settings(1000.0));
        assert_eq!((grid.unassigned[0].x, grid.unassigned[0].y), (10.0, 20.0));
        assert_eq!(placed(&grid, "w1").y, 20.0 + 18.0);
    }

    #[test]
    fn test_nodes_per_row_frozen_at_first_overflow() {
        let boxes = [
            node("n0", false, 105.0, 40.0),
            node("n1", false, 105.0, 40.0),
            node("n2", false, 105.0, 40.0),
            node("n3", false, 50.0, 40.0),
            node("n4", false, 50.0, 40.0),
            node("n5", false, 105.0, 40.0),
        ];
        let grid = pack_cluster(&boxes, &[], &settings(250.0));
        assert_eq!(grid.worker_nodes_per_row, Some(2));
        // the second row holds three boxes, but lookups still cycle by two
        assert_eq!(placed(&grid, "n4").row, 1);
        assert_eq!(placed(&grid, "n4").above.as_deref(), Some("n0"));
        assert_eq!(placed(&grid, "n5").row, 2);
        assert_eq!(placed(&grid, "n5").above.as_deref(), Some("n1"));
    }

    #[test]
    fn test_box_above_cycles_through_first_row() {
        let boxes: Vec<NodeBox> = (0..7)
            .map(|i| node(&format!("n{i}"), false, 105.0, 40.0))
            .collect();
        let grid = pack_cluster(&boxes, &[], &settings(250.0));
        assert_eq!(grid.worker_nodes_per_row, Some(2));
        let above: Vec<Option<&str>> = grid.nodes.iter().map(|n| n.above.as_deref()).collect();
        assert_eq!(
            above,
            vec![None, None, Some("n0"), Some("n1"), Some("n0"), Some("n1"), Some("n0")]
        );
    }

    #[test]
    fn test_deterministic() {
        let boxes: Vec<NodeBox> = (0..9)
            .map(|i| node(&format!("n{i}"), i < 2, 105.0, 35.0 + 13.0 * i as f64))
            .collect();
        let s = settings(400.0);
        assert_eq!(pack_cluster(&boxes, &[], &s), pack_cluster(&boxes, &[], &s));
    }
}
