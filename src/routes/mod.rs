pub mod api;
pub mod ui;

use axum::{
    Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use crate::AppState;
use crate::error::TopologyError;
use crate::helpers::pulse_opacity;
use crate::sort::PodSort;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Clusters
        .route("/api/clusters", get(api::handle_list_clusters))
        .route("/api/clusters/{id}", get(api::handle_get_cluster))
        .route("/api/clusters/{id}/layout", get(api::handle_get_layout))
        .route(
            "/api/clusters/{id}/nodes/{name}/resources",
            get(api::handle_get_node_resources),
        )
        .route(
            "/api/clusters/{id}/nodes/{name}/resources/{key}",
            get(api::handle_get_node_resource),
        )
        // Health
        .route("/healthz", get(api::handle_healthz))
        // Topology UI
        .route("/ui/", get(ui::handle_index))
        .route("/ui/clusters/{id}", get(ui::handle_cluster))
        // Root redirect
        .route(
            "/",
            get(|| async {
                axum::response::Redirect::to("/ui/")
            }),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub struct LayoutQuery {
    #[serde(default)]
    pub sort: Option<PodSort>,
}

pub fn error_response(e: TopologyError) -> Response {
    let status = match e {
        TopologyError::ClusterNotFound(_) | TopologyError::MissingResourceKey(_) => {
            StatusCode::NOT_FOUND
        }
        TopologyError::MalformedQuantity(_) => StatusCode::UNPROCESSABLE_ENTITY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, e.to_string()).into_response()
}

pub fn current_opacity(state: &AppState, refreshed_at: DateTime<Utc>) -> f64 {
    let now = Utc::now();
    let stale = (now - refreshed_at).num_milliseconds() as f64 / 1000.0;
    pulse_opacity(
        stale,
        state.config.stale_after_secs as f64,
        now.timestamp_subsec_millis() as u64,
    )
}
