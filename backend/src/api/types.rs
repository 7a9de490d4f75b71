//! REST API types for frontend integration.
//!
//! The response carries the dashboard artifacts in renderable shape:
//! tables as arrays of camelCase rows, the heatmap already pivoted,
//! and the four charts as standalone SVG documents.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::charts::ChartSet;
use crate::models::{DashboardArtifacts, ExceedanceCount, HourlyHeatmap, LongRow, SummaryRow};
use crate::parser::SheetInfo;

/// Response sent to the frontend after a successful pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    /// Unique job identifier.
    pub job_id: String,

    /// Status: "ready" or "clear" (no exceedances found).
    pub status: String,

    /// Sheet parsing metadata.
    pub sheet: SheetMetadata,

    /// Number of tidy observations after the melt.
    pub long_row_count: usize,

    /// Every reading above the threshold.
    pub exceedances: Vec<LongRow>,

    /// Per-AHU exceedance aggregates (management summary table).
    pub summary: Vec<SummaryRow>,

    /// Per-AHU exceedance counts (bar chart data).
    pub exceed_counts: Vec<ExceedanceCount>,

    /// Hour x AHU mean matrix.
    pub heatmap: HourlyHeatmap,

    /// Threshold used for this run, ppm.
    pub threshold_ppm: f64,

    /// Rendered SVG charts.
    pub charts: ChartSet,
}

/// Sheet parsing metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetMetadata {
    /// Uploaded or fetched file name, when known.
    pub file_name: Option<String>,

    /// Format, encoding, delimiter and column info from the parser.
    #[serde(flatten)]
    pub info: SheetInfo,
}

impl DashboardResponse {
    /// Assemble a response from the pipeline outputs.
    pub fn new(
        file_name: Option<String>,
        info: SheetInfo,
        artifacts: DashboardArtifacts,
        charts: ChartSet,
    ) -> Self {
        let status = if artifacts.exceedances.is_empty() {
            "clear"
        } else {
            "ready"
        };

        Self {
            job_id: Uuid::new_v4().to_string(),
            status: status.to_string(),
            sheet: SheetMetadata { file_name, info },
            long_row_count: artifacts.long.len(),
            exceedances: artifacts.exceedances,
            summary: artifacts.summary,
            exceed_counts: artifacts.exceed_counts,
            heatmap: artifacts.heatmap,
            threshold_ppm: artifacts.threshold_ppm,
            charts,
        }
    }
}

/// Create an error response body.
pub fn error_response(error: &str) -> Value {
    json!({
        "jobId": Uuid::new_v4().to_string(),
        "status": "error",
        "error": error,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::render_all;
    use crate::models::{WideRow, WideTable};
    use crate::parser::{SheetFormat, SheetInfo};
    use crate::pipeline::{run_pipeline, PipelineConfig};
    use chrono::NaiveDate;

    fn sample_response() -> DashboardResponse {
        let ts = |h: u32| {
            NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(h, 0, 0)
                .unwrap()
        };
        let table = WideTable {
            ahu_ids: vec!["AHU1".into(), "AHU2".into()],
            rows: vec![
                WideRow {
                    timestamp: ts(8),
                    cells: vec![Some(1200.0), Some(800.0)],
                },
                WideRow {
                    timestamp: ts(9),
                    cells: vec![Some(950.0), Some(1500.0)],
                },
            ],
        };
        let artifacts = run_pipeline(&table, &PipelineConfig::default());
        let charts = render_all(&artifacts).unwrap();
        let info = SheetInfo {
            format: SheetFormat::Delimited,
            encoding: "utf-8".into(),
            delimiter: Some(','),
            row_count: 2,
            ahu_ids: table.ahu_ids.clone(),
        };
        DashboardResponse::new(Some("co2.csv".into()), info, artifacts, charts)
    }

    #[test]
    fn test_response_shape() {
        let response = sample_response();
        assert_eq!(response.status, "ready");
        assert_eq!(response.long_row_count, 4);
        assert_eq!(response.exceedances.len(), 2);
        assert_eq!(response.summary.len(), 2);
        assert_eq!(response.threshold_ppm, 1000.0);
    }

    #[test]
    fn test_response_serializes_camel_case() {
        let response = sample_response();
        let json = serde_json::to_value(&response).unwrap();

        assert!(json.get("jobId").is_some());
        assert!(json.get("longRowCount").is_some());
        assert!(json.get("exceedCounts").is_some());
        assert!(json.get("thresholdPpm").is_some());
        // SheetInfo is flattened into the sheet object.
        assert!(json["sheet"].get("rowCount").is_some());
        assert!(json["sheet"].get("fileName").is_some());
        // Summary rows carry camelCase fields.
        assert!(json["summary"][0].get("maxCo2").is_some());
        assert!(json["summary"][0].get("exceedCount").is_some());
    }

    #[test]
    fn test_error_response_shape() {
        let body = error_response("Parse error: Missing required column: Timestamp");
        assert_eq!(body["status"], "error");
        assert!(body["error"].as_str().unwrap().contains("Timestamp"));
    }
}
