//! # co2watch - AHU CO₂ exceedance analytics
//!
//! co2watch ingests a spreadsheet of CO₂ sensor readings (one timestamp
//! column plus one column per air-handling unit), reshapes it into tidy
//! form, flags threshold exceedances and produces summary tables and
//! four chart types.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌────────────┐     ┌─────────────┐     ┌────────────┐
//! │ Data Source │────▶│   Parser   │────▶│  Pipeline   │────▶│  Charts /  │
//! │ upload|URL  │     │ xlsx | csv │     │ melt+aggreg │     │  API JSON  │
//! └─────────────┘     └────────────┘     └─────────────┘     └────────────┘
//! ```
//!
//! Data flows strictly one way; everything is recomputed in full per
//! trigger and no state survives a run.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use co2watch::{run_from_source, FileSource, PipelineConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let source = FileSource::new("co2_readings.xlsx");
//!     let (sheet, artifacts) = run_from_source(&source, &PipelineConfig::default())
//!         .await
//!         .unwrap();
//!     println!("{} exceedances", artifacts.exceedances.len());
//! }
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`config`] - Environment-backed configuration
//! - [`models`] - Domain models (WideTable, LongRow, SummaryRow, ...)
//! - [`source`] - Data source abstraction (upload, remote URL, file)
//! - [`parser`] - Spreadsheet parsing with format/encoding detection
//! - [`pipeline`] - The pure transformation pipeline
//! - [`charts`] - SVG chart rendering
//! - [`api`] - HTTP API server

// Core modules
pub mod config;
pub mod error;
pub mod models;

// Ingestion
pub mod parser;
pub mod source;

// Transformation
pub mod pipeline;

// Presentation
pub mod charts;

// HTTP API
pub mod api;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{
    ChartError, LoadError, ParseError, PipelineError, ServerError,
    ChartResult, LoadResult, PipelineResult, ServerResult,
};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{
    DashboardArtifacts, ExceedanceCount, HourlyHeatmap, LongRow, SummaryRow, WideRow, WideTable,
};

// =============================================================================
// Re-exports - Configuration
// =============================================================================

pub use config::AppConfig;

// =============================================================================
// Re-exports - Data sources
// =============================================================================

pub use source::{DataSource, FileSource, RawSheet, RemoteSource, UploadSource};

// =============================================================================
// Re-exports - Parsing
// =============================================================================

pub use parser::{
    detect_delimiter, detect_encoding, parse_sheet_bytes, ParsedSheet, SheetFormat, SheetInfo,
};

// =============================================================================
// Re-exports - Pipeline
// =============================================================================

pub use pipeline::{
    exceedance_counts, filter_exceedances, hourly_heatmap, melt, run_from_source, run_pipeline,
    summarize, PipelineConfig, DEFAULT_THRESHOLD_PPM,
};

// =============================================================================
// Re-exports - Charts
// =============================================================================

pub use charts::{render_all, ChartSet};

// =============================================================================
// Re-exports - API
// =============================================================================

pub use api::types::{error_response, DashboardResponse, SheetMetadata};

// Server
pub mod server {
    pub use crate::api::server::start_server;
}
