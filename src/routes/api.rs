use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{LayoutQuery, current_opacity, error_response};
use crate::AppState;
use crate::layout::{ClusterLayout, layout_cluster};
use crate::resources::resource_usage;

#[derive(Debug, Serialize)]
pub struct LayoutResponse {
    #[serde(flatten)]
    pub layout: ClusterLayout,
    pub refreshed_at: DateTime<Utc>,
    pub opacity: f64,
}

pub async fn handle_list_clusters(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.registry.cluster_ids().await)
}

pub async fn handle_get_cluster(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    match state.registry.load(&id).await {
        Ok(snapshot) => Json(snapshot.cluster).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn handle_get_layout(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<LayoutQuery>,
) -> Response {
    let snapshot = match state.registry.load(&id).await {
        Ok(s) => s,
        Err(e) => return error_response(e),
    };

    let sort = query.sort.unwrap_or(state.config.sort).comparator();
    match layout_cluster(&snapshot.cluster, &state.layout, &sort) {
        Ok(layout) => Json(LayoutResponse {
            layout,
            refreshed_at: snapshot.refreshed_at,
            opacity: current_opacity(&state, snapshot.refreshed_at),
        })
        .into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn handle_get_node_resources(
    State(state): State<AppState>,
    Path((id, name)): Path<(String, String)>,
) -> Response {
    let snapshot = match state.registry.load(&id).await {
        Ok(s) => s,
        Err(e) => return error_response(e),
    };
    let Some(node) = snapshot.cluster.nodes.get(&name) else {
        return (StatusCode::NOT_FOUND, format!("node {:?} not found", name)).into_response();
    };
    match resource_usage(node) {
        Ok(resources) => Json(resources).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn handle_get_node_resource(
    State(state): State<AppState>,
    Path((id, name, key)): Path<(String, String, String)>,
) -> Response {
    let snapshot = match state.registry.load(&id).await {
        Ok(s) => s,
        Err(e) => return error_response(e),
    };
    let Some(node) = snapshot.cluster.nodes.get(&name) else {
        return (StatusCode::NOT_FOUND, format!("node {:?} not found", name)).into_response();
    };
    let record = resource_usage(node).and_then(|resources| resources.require(&key).copied());
    match record {
        Ok(record) => Json(record).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn handle_healthz() -> &'static str {
    "ok\n"
}
