//! HTTP 介面
//!
//! - `POST /api/generate-anime`
//! - `GET /api/download?frames=...`
//! - `GET /api/effects`
//! - `GET /api/health`

use crate::core::animation::handle_generate;
use crate::core::export::{frames_from_query, Exporter};
use crate::domain::model::EffectCatalog;
use crate::domain::ports::{Clock, ConfigProvider};
use crate::utils::error::AppError;
use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, RawQuery, State},
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

#[derive(Clone, Debug, Serialize)]
struct ApiError {
    error: String,
}

impl ApiError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

fn error_response(status: StatusCode, err: ApiError) -> Response {
    (status, Json(err)).into_response()
}

/// 只有缺少欄位回 400，其他錯誤記錄後回通用的 500 訊息
fn failure_response(err: AppError, context: &str, generic: &str) -> Response {
    if err.is_client_error() {
        return error_response(
            StatusCode::BAD_REQUEST,
            ApiError::new(err.user_friendly_message()),
        );
    }
    tracing::error!("❌ {}: {}", context, err);
    error_response(StatusCode::INTERNAL_SERVER_ERROR, ApiError::new(generic))
}

#[derive(Clone)]
pub struct AppState {
    exporter: Arc<Exporter>,
}

impl AppState {
    pub fn new(clock: Arc<dyn Clock>, export_filename_prefix: &str) -> Self {
        Self {
            exporter: Arc::new(Exporter::new(clock, export_filename_prefix)),
        }
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

pub fn build_router<C: ConfigProvider>(config: &C, clock: Arc<dyn Clock>) -> Router {
    let state = AppState::new(clock, config.export_filename_prefix());

    let allow_origin = config
        .allow_origin()
        .and_then(|origin| origin.parse::<HeaderValue>().ok())
        .unwrap_or_else(|| HeaderValue::from_static("*"));

    Router::new()
        .route("/api/generate-anime", post(generate_handler))
        .route("/api/download", get(download_handler))
        .route("/api/effects", get(effects_handler))
        .route("/api/health", get(health_handler))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(config.max_body_bytes()))
        .layer(
            CorsLayer::new()
                .allow_origin(allow_origin)
                .allow_methods([Method::GET, Method::POST])
                .allow_headers([header::CONTENT_TYPE]),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve<C: ConfigProvider>(config: &C, clock: Arc<dyn Clock>) -> anyhow::Result<()> {
    let app = build_router(config, clock);
    let addr = format!("{}:{}", config.host(), config.port());

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("🚀 Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

async fn generate_handler(body: Bytes) -> Response {
    match handle_generate(&body) {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(err) => failure_response(
            err,
            "Error generating animation",
            "Failed to generate animation",
        ),
    }
}

async fn download_handler(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Response {
    // 自行解析查詢字串，重複的 frames 只取第一個
    let frames = frames_from_query(query.as_deref());
    let download = match state.exporter.export(frames.as_deref()) {
        Ok(download) => download,
        Err(err) => {
            return failure_response(err, "Error creating download", "Failed to create download")
        }
    };

    let body = match download.to_pretty_json() {
        Ok(body) => body,
        Err(err) => {
            return failure_response(err, "Error creating download", "Failed to create download")
        }
    };

    let disposition = match HeaderValue::from_str(&download.content_disposition()) {
        Ok(value) => value,
        Err(e) => {
            return failure_response(
                AppError::processing(format!("invalid Content-Disposition: {}", e)),
                "Error creating download",
                "Failed to create download",
            )
        }
    };

    tracing::info!(
        "📁 Export {} with {} frames",
        download.filename,
        download.document.frame_count
    );

    (
        StatusCode::OK,
        [
            (
                header::CONTENT_TYPE,
                HeaderValue::from_static("application/json"),
            ),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response()
}

async fn effects_handler() -> Json<EffectCatalog> {
    Json(EffectCatalog::current())
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
