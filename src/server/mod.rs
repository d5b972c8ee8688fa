//! HTTP transport for the export service.
//!
//! Three read-only endpoints: `/export` (the inventory snapshot),
//! `/version` (build metadata) and `/healthz` (liveness). The export
//! endpoint returns 200 with best-effort content; only a failed namespace
//! listing or a snapshot deadline produces a server error.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use tokio::time::timeout;
use tower_http::trace::{self, TraceLayer};
use tracing::{Level, error};

use crate::config::Settings;
use crate::export::aggregator::Aggregator;

#[derive(Clone)]
pub struct AppState {
    pub aggregator: Arc<Aggregator>,
    pub settings: Arc<Settings>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/export", get(export_handler))
        .route("/version", get(version_handler))
        .route("/healthz", get(health_handler))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(trace::DefaultMakeSpan::new().level(Level::INFO))
                .on_response(trace::DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}

async fn export_handler(State(state): State<AppState>) -> Response {
    let snapshot = timeout(
        state.settings.request_timeout,
        state.aggregator.snapshot(&state.settings.excludes),
    )
    .await;

    match snapshot {
        Ok(Ok(snapshot)) => Json(snapshot).into_response(),
        Ok(Err(err)) => {
            error!("snapshot failed: {err}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": err.to_string() })),
            )
                .into_response()
        }
        Err(_) => {
            error!(
                "snapshot deadline of {:?} exceeded",
                state.settings.request_timeout
            );
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "snapshot deadline exceeded" })),
            )
                .into_response()
        }
    }
}

async fn version_handler() -> impl IntoResponse {
    Json(json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "description": env!("CARGO_PKG_DESCRIPTION"),
        "source": env!("CARGO_PKG_REPOSITORY"),
        "os_arch": format!("{}/{}", std::env::consts::OS, std::env::consts::ARCH),
    }))
}

async fn health_handler() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
