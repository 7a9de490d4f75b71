//! HTTP service for uploading spreadsheets to the backend.

use gloo_net::http::Request;
use web_sys::{File, FormData};

use crate::types::{AppError, AppResult, DashboardResponse};

/// Upload a spreadsheet file and get back the full dashboard payload.
pub async fn upload_sheet(file: File, backend_url: &str) -> AppResult<DashboardResponse> {
    let form_data =
        FormData::new().map_err(|e| AppError::Http(format!("Failed to create FormData: {:?}", e)))?;

    form_data
        .append_with_blob("file", &file)
        .map_err(|e| AppError::Http(format!("Failed to append file: {:?}", e)))?;

    let url = format!("{}/api/upload", backend_url);
    let request = Request::post(&url)
        .body(form_data)
        .map_err(|e| AppError::Http(format!("Failed to build request: {}", e)))?;

    let response = request
        .send()
        .await
        .map_err(|e| AppError::Http(format!("HTTP request failed: {}", e)))?;

    parse_dashboard_response(response).await
}

/// Decode the backend response, surfacing its error body on failure.
pub(crate) async fn parse_dashboard_response(
    response: gloo_net::http::Response,
) -> AppResult<DashboardResponse> {
    if !response.ok() {
        let status = response.status();
        let message = response
            .json::<serde_json::Value>()
            .await
            .ok()
            .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(String::from))
            .unwrap_or_else(|| format!("HTTP {}", status));
        return Err(AppError::Http(message));
    }

    response
        .json::<DashboardResponse>()
        .await
        .map_err(|e| AppError::BadPayload(e.to_string()))
}
