mod config;
mod error;
mod helpers;
mod layout;
mod mock;
mod models;
mod quantity;
mod resources;
mod routes;
mod sort;
mod sources;
mod theme;

use std::path::PathBuf;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::signal;
use tracing::info;

use layout::LayoutSettings;
use sources::SnapshotSource;
use sources::registry::ClusterRegistry;

#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<ClusterRegistry>,
    pub config: Arc<config::Config>,
    pub layout: Arc<LayoutSettings>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("kube_topology=info")),
        )
        .init();

    let config_path = std::env::args()
        .skip(1)
        .zip(std::env::args().skip(2))
        .find_map(|(k, v)| (k == "-config" || k == "--config").then_some(v))
        .or_else(|| std::env::args().nth(1))
        .unwrap_or_else(|| "/etc/kube-topology/config.yaml".to_string());

    let cfg = config::Config::load(&PathBuf::from(&config_path)).unwrap_or_else(|e| {
        eprintln!("error loading config: {}", e);
        std::process::exit(1);
    });

    let mut sources = Vec::new();
    for c in &cfg.clusters {
        sources.push(SnapshotSource::File {
            id: c.id.clone(),
            path: c.path.clone(),
        });
    }
    for index in 0..cfg.mock_clusters {
        sources.push(SnapshotSource::Mock { index });
    }
    info!(
        "serving {} snapshot clusters and {} mock clusters",
        cfg.clusters.len(),
        cfg.mock_clusters
    );

    let state = AppState {
        registry: Arc::new(ClusterRegistry::new(sources)),
        layout: Arc::new(cfg.layout_settings()),
        config: Arc::new(cfg),
    };
    let listen_addr = state.config.listen_addr();

    let router = routes::build_router(state);

    let listener = TcpListener::bind(&listen_addr).await.unwrap_or_else(|e| {
        eprintln!("failed to bind {}: {}", listen_addr, e);
        std::process::exit(1);
    });

    info!("kube-topology listening on {}", listen_addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap_or_else(|e| {
            eprintln!("server error: {}", e);
            std::process::exit(1);
        });
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("failed to listen for ctrl+c: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut s) => {
                s.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutting down");
}
