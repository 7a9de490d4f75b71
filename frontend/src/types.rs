//! Common types used across the frontend application.
//!
//! These mirror the backend's camelCase wire types. Timestamps stay
//! strings on this side; the UI only displays them.
//!
//! # Categories
//!
//! - **API Types** - Backend response structures
//! - **Log Types** - Real-time log streaming
//! - **Error Types** - Frontend error handling

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// API Types
// =============================================================================

/// One tidy observation above the threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExceedanceRow {
    pub timestamp: String,
    pub hour: u32,
    pub ahu: String,
    pub co2_ppm: f64,
}

/// Per-AHU exceedance aggregate (management summary table row).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryRow {
    pub ahu: String,
    pub max_co2: f64,
    pub avg_co2: f64,
    pub exceed_count: usize,
}

/// Per-AHU exceedance count (bar chart data).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExceedanceCount {
    pub ahu: String,
    pub count: usize,
}

/// Hour x AHU mean matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HourlyHeatmap {
    pub ahu_ids: Vec<String>,
    pub hours: Vec<u32>,
    pub cells: Vec<Vec<Option<f64>>>,
}

/// The four rendered SVG charts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSet {
    pub line_svg: String,
    pub bar_svg: String,
    pub box_svg: String,
    pub heatmap_svg: String,
}

/// Sheet parsing metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetMetadata {
    pub file_name: Option<String>,
    pub format: String,
    pub encoding: String,
    pub delimiter: Option<char>,
    pub row_count: usize,
    pub ahu_ids: Vec<String>,
}

/// Full dashboard payload from the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub job_id: String,
    pub status: String,
    pub sheet: SheetMetadata,
    pub long_row_count: usize,
    pub exceedances: Vec<ExceedanceRow>,
    pub summary: Vec<SummaryRow>,
    pub exceed_counts: Vec<ExceedanceCount>,
    pub heatmap: HourlyHeatmap,
    pub threshold_ppm: f64,
    pub charts: ChartSet,
}

// =============================================================================
// Log Types
// =============================================================================

/// Log severity for display styling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A single log line in the live panel.
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
    pub timestamp: String,
}

// =============================================================================
// Error Types
// =============================================================================

/// Frontend-side errors (HTTP failures, bad payloads).
#[derive(Debug, Clone, PartialEq)]
pub enum AppError {
    Http(String),
    BadPayload(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Http(msg) => write!(f, "HTTP error: {}", msg),
            AppError::BadPayload(msg) => write!(f, "Bad payload: {}", msg),
        }
    }
}

/// Result alias for frontend operations.
pub type AppResult<T> = Result<T, AppError>;
