use askama::Template;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use chrono::Utc;

use super::{LayoutQuery, current_opacity, error_response};
use crate::AppState;
use crate::helpers::{ellipsize, refreshed_ago};
use crate::layout::bars::BAR_WIDTH;
use crate::layout::{ClusterLayout, GAUGE_TOP, NodeLayout, layout_cluster};
use crate::models::cluster::Cluster;
use crate::models::views::*;
use crate::theme::Palette;

const NODE_LABEL_CHARS: usize = 17;
// pods are drawn slightly smaller than their cell
const POD_GAP: f64 = 3.0;

fn render_template(tmpl: &impl Template) -> Response {
    match tmpl.render() {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!("template error: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
        }
    }
}

// --- Index ---

#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate {
    title: String,
    clusters: Vec<ClusterSummary>,
    errors: Vec<String>,
}

pub async fn handle_index(State(state): State<AppState>) -> Response {
    let now = Utc::now();
    let mut clusters = Vec::new();
    let mut errors = Vec::new();

    for (id, result) in state.registry.load_all().await {
        match result {
            Ok(snapshot) => {
                let c = &snapshot.cluster;
                clusters.push(ClusterSummary {
                    id,
                    api_server_url: c.api_server_url.clone(),
                    node_count: c.nodes.len(),
                    master_count: c.nodes.values().filter(|n| n.is_master()).count(),
                    pod_count: c.pod_count(),
                    refreshed: refreshed_ago(snapshot.refreshed_at, now),
                });
            }
            Err(e) => errors.push(format!("{}: {}", id, e)),
        }
    }

    render_template(&IndexTemplate {
        title: "Clusters".to_string(),
        clusters,
        errors,
    })
}

// --- Cluster ---

#[derive(Template)]
#[template(path = "cluster.html")]
struct ClusterTemplate {
    title: String,
    cluster: ClusterView,
}

pub async fn handle_cluster(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<LayoutQuery>,
) -> Response {
    let snapshot = match state.registry.load(&id).await {
        Ok(s) => s,
        Err(e) => return error_response(e),
    };

    let sort = query.sort.unwrap_or(state.config.sort).comparator();
    let layout = match layout_cluster(&snapshot.cluster, &state.layout, &sort) {
        Ok(l) => l,
        Err(e) => return error_response(e),
    };

    let opacity = current_opacity(&state, snapshot.refreshed_at);
    let pod_size = state.layout.pods.pod_size;
    let view = build_cluster_view(&snapshot.cluster, &layout, &state.config.theme, opacity, pod_size);

    render_template(&ClusterTemplate {
        title: format!("Cluster: {}", id),
        cluster: view,
    })
}

// --- View Builders ---

fn build_cluster_view(
    cluster: &Cluster,
    layout: &ClusterLayout,
    palette: &impl Palette,
    opacity: f64,
    pod_size: f64,
) -> ClusterView {
    let unassigned = layout
        .unassigned
        .iter()
        .filter_map(|p| {
            let pod = cluster.unassigned_pods.get(&p.id)?;
            Some(PodView {
                x: p.x,
                y: p.y,
                size: pod_size - POD_GAP,
                fill: palette.phase_color(&pod.phase).to_string(),
                title: format!("{}\nPhase: {}", p.id, pod.phase),
            })
        })
        .collect();

    ClusterView {
        id: layout.id.clone(),
        api_server_url: layout.api_server_url.clone(),
        width: layout.width,
        height: layout.height,
        opacity,
        primary: palette.primary().to_string(),
        secondary: palette.secondary().to_string(),
        nodes: layout
            .nodes
            .iter()
            .map(|n| build_node_view(cluster, n, palette, pod_size))
            .collect(),
        unassigned,
    }
}

fn build_node_view(
    cluster: &Cluster,
    node: &NodeLayout,
    palette: &impl Palette,
    pod_size: f64,
) -> NodeView {
    let mut rects = Vec::new();

    if let Some(first) = node.gauges.first() {
        // faint backdrop behind both gauge columns
        rects.push(RectView {
            x: first.x,
            y: GAUGE_TOP,
            width: 14.0,
            height: first.bar.height,
            fill: palette.primary().to_string(),
            fill_opacity: 0.1,
            stroke: "none".to_string(),
            stroke_width: 0.0,
        });
    }

    for gauge in &node.gauges {
        let bar = &gauge.bar;
        let filled = |r: crate::layout::bars::Rect, tier| RectView {
            x: gauge.x + r.x,
            y: gauge.y + r.y,
            width: r.width,
            height: r.height,
            fill: palette.tier_color(tier).to_string(),
            fill_opacity: 1.0,
            stroke: "none".to_string(),
            stroke_width: 0.0,
        };
        rects.push(filled(bar.requested, bar.request_tier));
        rects.push(filled(bar.used, bar.used_tier));

        let outline = |y: f64, height: f64| RectView {
            x: gauge.x,
            y: gauge.y + y,
            width: BAR_WIDTH,
            height,
            fill: "none".to_string(),
            fill_opacity: 0.0,
            stroke: palette.primary().to_string(),
            stroke_width: 1.0,
        };
        rects.push(outline(bar.reserved.y, bar.reserved.height));
        rects.push(outline(0.0, bar.height));
        // one outlined cell per capacity unit
        for line in &bar.gridlines {
            rects.push(outline(*line, bar.unit_height));
        }
    }

    let pods = cluster
        .nodes
        .get(&node.name)
        .map(|source| {
            node.pods
                .iter()
                .filter_map(|p| {
                    let pod = source.pods.get(&p.id)?;
                    Some(PodView {
                        x: p.x,
                        y: p.y,
                        size: pod_size - POD_GAP,
                        fill: palette.phase_color(&pod.phase).to_string(),
                        title: format!("{}\nPhase: {}", p.id, pod.phase),
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    NodeView {
        x: node.x,
        y: node.y,
        width: node.geometry.width,
        height: node.geometry.height,
        label: ellipsize(&node.name, NODE_LABEL_CHARS),
        label_tooltip: node.label_tooltip.text.clone(),
        resource_tooltip: node.resource_tooltip.text.clone(),
        gauge_rects: rects,
        pods,
    }
}
