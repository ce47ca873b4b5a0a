// HTTP request handlers
use crate::application::lifecycle::LifecycleError;
use crate::infrastructure::request_channel::stream_from_receiver;
use crate::presentation::app_state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Json},
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

#[derive(Deserialize)]
pub struct ResizeQuery {
    pub width: u32,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Render the mounted page
pub async fn dashboard(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.host.snapshot().await {
        Ok(snapshot) => Html(snapshot.html).into_response(),
        Err(e) => (StatusCode::SERVICE_UNAVAILABLE, e.to_string()).into_response(),
    }
}

/// Accept one raw event from the collector. Parsing and routing happen
/// on the host task; bad events are dropped there.
pub async fn post_event(State(state): State<Arc<AppState>>, body: String) -> StatusCode {
    match state.host.inbound(body).await {
        Ok(()) => StatusCode::ACCEPTED,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}

/// Mounted page, lifecycle state and live chart count
pub async fn page_status(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.host.snapshot().await {
        Ok(snapshot) => (
            StatusCode::OK,
            Json(json!({
                "page": snapshot.anchor,
                "state": snapshot.state.as_str(),
                "theme": snapshot.theme.as_str(),
                "generation": snapshot.generation,
                "live_charts": state.charts.live_charts(),
            })),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "error": e.to_string() })),
        ),
    }
}

pub async fn navigate(
    Path(anchor): Path<String>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    match state.host.navigate(&anchor).await {
        Ok(Ok(())) => (StatusCode::OK, Json(json!({ "page": anchor }))),
        Ok(Err(e @ LifecycleError::UnknownAnchor(_))) => {
            (StatusCode::NOT_FOUND, Json(json!({ "error": e.to_string() })))
        }
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "error": e.to_string() })),
        ),
    }
}

pub async fn toggle_theme(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.host.toggle_theme().await {
        Ok(theme) => (StatusCode::OK, Json(json!({ "theme": theme.as_str() }))),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "error": e.to_string() })),
        ),
    }
}

pub async fn resize(
    Query(query): Query<ResizeQuery>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    match state.host.resize(query.width).await {
        Ok(rebuilt) => (StatusCode::OK, Json(json!({ "rebuilt": rebuilt }))),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "error": e.to_string() })),
        ),
    }
}

/// Stream outbound requests to the collector as they are issued
pub async fn stream_requests(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    stream_from_receiver(state.requests.subscribe())
}
