// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc};
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::application::dashlets::BuiltinDashlets;
use crate::application::host::{self, HostHandle};
use crate::application::lifecycle::LifecycleManager;
use crate::application::preferences::PreferenceStore;
use crate::application::registry::Toolkit;
use crate::infrastructure::chart_engine::MemoryChartEngine;
use crate::infrastructure::config::{load_dashboard_config, DEFAULT_CONFIG_PATH};
use crate::infrastructure::preference_file::{MemoryPreferenceStore, TomlPreferenceStore};
use crate::infrastructure::request_channel::BroadcastRequestSink;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    dashboard, health_check, navigate, page_status, post_event, resize, stream_requests,
    toggle_theme,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let config_path =
        std::env::var("DASHLETS_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let config = load_dashboard_config(&config_path)?;
    let landing = config
        .landing_anchor()
        .map(str::to_string)
        .ok_or_else(|| anyhow::anyhow!("no pages configured"))?;

    // Create adapters (infrastructure layer)
    let requests = BroadcastRequestSink::new();
    let preferences: Box<dyn PreferenceStore> = if config.preferences.path.is_empty() {
        tracing::warn!("No preferences path configured, theme will not survive restarts");
        Box::new(MemoryPreferenceStore::default())
    } else {
        Box::new(TomlPreferenceStore::open(&config.preferences.path)?)
    };
    let charts = MemoryChartEngine::new();
    let toolkit = Toolkit {
        dashlets: Arc::new(BuiltinDashlets),
        charts: Arc::new(charts.clone()),
    };

    // Create the page lifecycle (application layer) and mount the landing page
    let mut lifecycle = LifecycleManager::new(
        config.pages.clone(),
        toolkit,
        Arc::new(requests.clone()),
        preferences,
    );
    lifecycle.navigate(&landing)?;

    let (handle, commands) = HostHandle::channel();
    let host_task = tokio::spawn(host::run(lifecycle, commands, config.ticker.interval()));

    let state = Arc::new(AppState {
        host: handle.clone(),
        requests,
        charts,
    });

    // Build router (presentation layer)
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/dashboard", get(dashboard))
        .route("/status", get(page_status))
        .route("/events", post(post_event))
        .route("/navigate/:anchor", post(navigate))
        .route("/theme", post(toggle_theme))
        .route("/resize", post(resize))
        .route("/requests", get(stream_requests))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr: SocketAddr = config.server.bind.parse()?;
    tracing::info!("Starting dashlet host on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    handle.shutdown().await;
    host_task.await?;

    Ok(())
}
