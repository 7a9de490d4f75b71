//! HTTP server for the co2watch API.
//!
//! Provides REST endpoints for spreadsheet upload, remote fetch and
//! live progress logs. Chart rendering happens server-side; the
//! frontend receives finished SVG documents.
//!
//! # API Endpoints
//!
//! | Method | Path          | Description                              |
//! |--------|---------------|------------------------------------------|
//! | GET    | `/health`     | Health check                             |
//! | POST   | `/api/upload` | Upload a spreadsheet, get the dashboard  |
//! | POST   | `/api/remote` | Fetch the configured URL, get the same   |
//! | GET    | `/api/logs`   | SSE stream for real-time progress logs   |

use axum::{
    extract::{Multipart, State},
    http::{header, Method, StatusCode},
    response::{sse::Event, Json, Sse},
    routing::{get, post},
    Router,
};
use futures::stream::Stream;
use serde_json::{json, Value};
use std::{convert::Infallible, net::SocketAddr, time::Duration};
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt as _;
use tower_http::cors::CorsLayer;

use super::logs::{log_error, log_info, log_success, LOG_BROADCASTER};
use super::types::{error_response, DashboardResponse};
use crate::charts::render_all;
use crate::config::AppConfig;
use crate::error::{LoadError, PipelineError};
use crate::pipeline::{run_from_source, PipelineConfig};
use crate::source::{DataSource, RemoteSource, UploadSource};

/// Shared server state.
#[derive(Clone)]
struct AppState {
    config: AppConfig,
    client: reqwest::Client,
}

/// Start the HTTP server.
pub async fn start_server(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let port = config.port;

    // Permissive CORS for local development.
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([header::CONTENT_TYPE]);

    let state = AppState {
        config,
        client: reqwest::Client::new(),
    };

    let app = Router::new()
        .route("/", get(health))
        .route("/health", get(health))
        .route("/api/upload", post(upload_sheet))
        .route("/api/remote", post(fetch_remote))
        .route("/api/logs", get(sse_logs))
        .layer(cors)
        .with_state(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    println!("🚀 co2watch server running on http://localhost:{}", port);
    println!("   POST /api/upload - Upload spreadsheet");
    println!("   POST /api/remote - Fetch configured remote sheet");
    println!("   GET  /api/logs   - SSE log stream");
    println!("   GET  /health     - Health check");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Health check endpoint.
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "co2watch",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "upload": "POST /api/upload",
            "remote": "POST /api/remote",
            "logs": "GET /api/logs (SSE)"
        }
    }))
}

/// SSE endpoint for real-time log streaming.
async fn sse_logs() -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = LOG_BROADCASTER.subscribe();

    let stream = BroadcastStream::new(rx).filter_map(|result| match result {
        Ok(entry) => {
            let json = serde_json::to_string(&entry).ok()?;
            Some(Ok(Event::default().data(json)))
        }
        Err(_) => None,
    });

    Sse::new(stream).keep_alive(
        axum::response::sse::KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}

/// Upload endpoint: multipart spreadsheet in, full dashboard out.
async fn upload_sheet(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<DashboardResponse>, (StatusCode, Json<Value>)> {
    let mut file_data: Option<Vec<u8>> = None;
    let mut file_name: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            Json(error_response(&format!("Multipart error: {}", e))),
        )
    })? {
        let name = field.name().unwrap_or("").to_string();

        if name == "file" {
            file_name = field.file_name().map(|s| s.to_string());
            file_data = Some(
                field
                    .bytes()
                    .await
                    .map_err(|e| {
                        (
                            StatusCode::BAD_REQUEST,
                            Json(error_response(&format!("Read error: {}", e))),
                        )
                    })?
                    .to_vec(),
            );
        }
    }

    let source = match file_data {
        Some(bytes) => UploadSource::new(bytes, file_name.clone()),
        None => UploadSource::empty(),
    };

    log_info(format!(
        "📄 New upload: {}",
        file_name.as_deref().unwrap_or("(unnamed)")
    ));

    run_dashboard(&source, file_name, &state.config).await
}

/// Remote-fetch endpoint: one attempt against the configured URL.
async fn fetch_remote(
    State(state): State<AppState>,
) -> Result<Json<DashboardResponse>, (StatusCode, Json<Value>)> {
    let url = state.config.remote_url.clone().ok_or_else(|| {
        (
            StatusCode::BAD_REQUEST,
            Json(error_response("CO2_REMOTE_URL is not configured")),
        )
    })?;

    log_info(format!("🌐 Fetching remote sheet: {}", url));

    let name = url.rsplit('/').next().map(String::from);
    let source = RemoteSource::with_client(url, state.client.clone());

    run_dashboard(&source, name, &state.config).await
}

/// Shared handler body: run the pipeline, render charts, map errors to
/// HTTP statuses. Every failure aborts the run with no partial output.
async fn run_dashboard<S: DataSource>(
    source: &S,
    file_name: Option<String>,
    config: &AppConfig,
) -> Result<Json<DashboardResponse>, (StatusCode, Json<Value>)> {
    let pipeline_config = PipelineConfig {
        threshold_ppm: config.threshold_ppm,
    };

    let (parsed, artifacts) = run_from_source(source, &pipeline_config)
        .await
        .map_err(|e| {
            log_error(format!("Pipeline failed: {}", e));
            (status_for(&e), Json(error_response(&e.to_string())))
        })?;

    log_success(format!(
        "Parsed {} rows across {} AHU columns",
        parsed.info.row_count,
        parsed.info.ahu_ids.len()
    ));
    log_success(format!(
        "{} tidy observations, {} exceedances over {} ppm",
        artifacts.long.len(),
        artifacts.exceedances.len(),
        artifacts.threshold_ppm
    ));

    let charts = render_all(&artifacts).map_err(|e| {
        log_error(format!("Chart rendering failed: {}", e));
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(error_response(&e.to_string())),
        )
    })?;
    log_success("Charts rendered");

    Ok(Json(DashboardResponse::new(
        file_name,
        parsed.info,
        artifacts,
        charts,
    )))
}

/// Map pipeline failures to HTTP statuses.
///
/// `NoInput` is the expected idle state of the upload variant and gets
/// a plain 400 with its message; the frontend shows it as "waiting",
/// not as an error banner.
fn status_for(error: &PipelineError) -> StatusCode {
    match error {
        PipelineError::Load(LoadError::NoInput) => StatusCode::BAD_REQUEST,
        PipelineError::Load(LoadError::FetchFailed(_)) => StatusCode::BAD_GATEWAY,
        PipelineError::Load(LoadError::IoError(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        PipelineError::Parse(_) => StatusCode::UNPROCESSABLE_ENTITY,
        PipelineError::Chart(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParseError;

    #[test]
    fn test_status_mapping() {
        let no_input = PipelineError::Load(LoadError::NoInput);
        assert_eq!(status_for(&no_input), StatusCode::BAD_REQUEST);

        let fetch = PipelineError::Load(LoadError::FetchFailed("down".into()));
        assert_eq!(status_for(&fetch), StatusCode::BAD_GATEWAY);

        let parse = PipelineError::Parse(ParseError::EmptySheet);
        assert_eq!(status_for(&parse), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
