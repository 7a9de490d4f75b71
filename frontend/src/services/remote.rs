//! HTTP service for the remote-fetch variant.
//!
//! Asks the backend to pull the spreadsheet from its configured URL;
//! the backend makes exactly one fetch attempt per request.

use gloo_net::http::Request;

use super::upload::parse_dashboard_response;
use crate::types::{AppError, AppResult, DashboardResponse};

/// Trigger a remote fetch and get back the full dashboard payload.
pub async fn fetch_remote(backend_url: &str) -> AppResult<DashboardResponse> {
    let url = format!("{}/api/remote", backend_url);

    let response = Request::post(&url)
        .send()
        .await
        .map_err(|e| AppError::Http(format!("HTTP request failed: {}", e)))?;

    parse_dashboard_response(response).await
}
