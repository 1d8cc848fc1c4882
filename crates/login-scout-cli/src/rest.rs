// Copyright 2026 Login Scout Contributors
// SPDX-License-Identifier: Apache-2.0

//! HTTP REST API for login-scout.
//!
//! `POST /scrape` runs one scrape and always answers 200 with an envelope:
//! `{ success, data, error }`. Failures, including panics inside the scrape
//! task, are reported as data rather than HTTP errors.

use axum::extract::State;
use axum::response::{Html, IntoResponse};
use axum::routing::{get, post};
use axum::{Json, Router};
use login_scout::{ErrorCode, ErrorInfo, ExtractionResult, Scout};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

/// Shared state for all handlers.
pub struct AppState {
    scout: Scout,
}

impl AppState {
    pub fn new(scout: Scout) -> Self {
        Self { scout }
    }
}

/// Body of `POST /scrape`.
#[derive(Debug, Deserialize)]
pub struct ScrapeRequest {
    pub url: String,
    /// Skip the static fetch and render in the browser straight away.
    #[serde(default)]
    pub force_dynamic: bool,
}

/// Error half of the response envelope.
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub success: bool,
    pub error: String,
    pub error_code: ErrorCode,
    pub details: Option<String>,
}

impl From<ErrorInfo> for ApiError {
    fn from(info: ErrorInfo) -> Self {
        Self {
            success: false,
            error: info.error,
            error_code: info.error_code,
            details: None,
        }
    }
}

/// Response envelope for `POST /scrape`.
#[derive(Debug, Serialize)]
pub struct ApiResponse {
    pub success: bool,
    pub data: Option<ExtractionResult>,
    pub error: Option<ApiError>,
}

impl ApiResponse {
    fn ok(data: ExtractionResult) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    fn failure(error: ApiError) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error),
        }
    }
}

/// Build the axum Router with all REST endpoints.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/scrape", post(handle_scrape))
        .layer(cors)
        .with_state(state)
}

/// Serve the REST API on `addr` until Ctrl-C.
pub async fn start(addr: SocketAddr, state: Arc<AppState>) -> anyhow::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("REST API listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("received shutdown signal");
        })
        .await?;
    Ok(())
}

// ── Handlers ────────────────────────────────────────────────────

/// Serve the embedded single-page UI.
async fn index() -> impl IntoResponse {
    Html(include_str!("index.html"))
}

async fn health() -> Json<Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn handle_scrape(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ScrapeRequest>,
) -> Json<ApiResponse> {
    let scout = state.scout.clone();
    let url = req.url.clone();

    // Run in its own task so a panic is contained and reported.
    let outcome =
        tokio::task::spawn(async move { scout.scrape(&req.url, req.force_dynamic).await }).await;

    let response = match outcome {
        Ok(Ok(result)) => ApiResponse::ok(result),
        Ok(Err(e)) => {
            info!(url = %url, code = %e.code(), "scrape failed: {e}");
            ApiResponse::failure(ErrorInfo::from(e).into())
        }
        Err(e) => {
            error!(url = %url, "scrape task failed: {e}");
            ApiResponse::failure(ApiError {
                success: false,
                error: "An unexpected error occurred".to_string(),
                error_code: ErrorCode::InternalError,
                details: Some(e.to_string()),
            })
        }
    };

    Json(response)
}
