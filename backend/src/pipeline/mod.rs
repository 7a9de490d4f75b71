//! The transformation pipeline: wide sensor readings in, dashboard
//! artifacts out.
//!
//! ```text
//! ┌───────────┐    ┌──────┐    ┌───────────┐    ┌──────────────────┐
//! │ WideTable │───▶│ melt │───▶│ exceed    │───▶│ summary / counts │
//! │ (parsed)  │    │ tidy │    │ filter    │    │ hourly heatmap   │
//! └───────────┘    └──────┘    └───────────┘    └──────────────────┘
//! ```
//!
//! [`run_pipeline`] is a pure function of its input and configuration:
//! no I/O, no logging, no shared state. Everything is recomputed in
//! full per invocation, so a new trigger simply replaces the previous
//! run's artifacts wholesale.

use serde::{Deserialize, Serialize};

use crate::error::PipelineResult;
use crate::models::{DashboardArtifacts, WideTable};
use crate::parser::{parse_sheet_bytes, ParsedSheet};
use crate::source::DataSource;

pub mod heatmap;
pub mod melt;
pub mod summary;

pub use heatmap::hourly_heatmap;
pub use melt::melt;
pub use summary::{exceedance_counts, filter_exceedances, summarize};

/// Default exceedance threshold in ppm.
pub const DEFAULT_THRESHOLD_PPM: f64 = 1000.0;

/// Pipeline configuration, injected so the threshold never appears as a
/// literal inside pipeline logic.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Readings strictly above this value are exceedances.
    pub threshold_ppm: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            threshold_ppm: DEFAULT_THRESHOLD_PPM,
        }
    }
}

/// Run the full transformation pipeline over a parsed wide table.
///
/// Applies, in order: hour derivation + melt, exceedance filtering,
/// per-AHU summarization, count derivation, and the hourly heatmap
/// pivot (over the full long table, not the exceedance subset).
pub fn run_pipeline(wide: &WideTable, config: &PipelineConfig) -> DashboardArtifacts {
    let long = melt(wide);
    let exceedances = filter_exceedances(&long, config.threshold_ppm);
    let summary = summarize(&exceedances);
    let exceed_counts = exceedance_counts(&summary);
    let heatmap = hourly_heatmap(&long, &wide.ahu_ids);

    DashboardArtifacts {
        long,
        exceedances,
        summary,
        exceed_counts,
        heatmap,
        threshold_ppm: config.threshold_ppm,
    }
}

/// Load from a data source, parse, and run the pipeline.
///
/// This is the single entry point both variants share: the upload
/// handler wraps its bytes in an upload source and the remote variant
/// wraps its URL, so the transformation logic is written exactly once.
/// Any error aborts the run before artifacts exist.
pub async fn run_from_source<S: DataSource>(
    source: &S,
    config: &PipelineConfig,
) -> PipelineResult<(ParsedSheet, DashboardArtifacts)> {
    let raw = source.load().await?;
    let parsed = parse_sheet_bytes(&raw.bytes)?;
    let artifacts = run_pipeline(&parsed.table, config);
    Ok((parsed, artifacts))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WideRow;
    use chrono::{NaiveDate, NaiveDateTime};

    fn ts(h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    /// The worked example: two timestamps, two AHUs, one exceedance each.
    fn sample_table() -> WideTable {
        WideTable {
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
        }
    }

    #[test]
    fn test_worked_scenario() {
        let artifacts = run_pipeline(&sample_table(), &PipelineConfig::default());

        assert_eq!(artifacts.long.len(), 4);

        assert_eq!(artifacts.exceedances.len(), 2);
        let exceeds: Vec<(u32, &str, f64)> = artifacts
            .exceedances
            .iter()
            .map(|r| (r.hour, r.ahu.as_str(), r.co2_ppm))
            .collect();
        assert!(exceeds.contains(&(8, "AHU1", 1200.0)));
        assert!(exceeds.contains(&(9, "AHU2", 1500.0)));

        assert_eq!(artifacts.summary.len(), 2);
        let ahu1 = &artifacts.summary[0];
        assert_eq!((ahu1.ahu.as_str(), ahu1.max_co2, ahu1.exceed_count), ("AHU1", 1200.0, 1));
        assert!((ahu1.avg_co2 - 1200.0).abs() < 1e-9);
        let ahu2 = &artifacts.summary[1];
        assert_eq!((ahu2.ahu.as_str(), ahu2.max_co2, ahu2.exceed_count), ("AHU2", 1500.0, 1));
        assert!((ahu2.avg_co2 - 1500.0).abs() < 1e-9);
    }

    #[test]
    fn test_threshold_is_injected() {
        // Same table, different threshold: membership changes without
        // touching pipeline code.
        let table = sample_table();

        let strict = run_pipeline(&table, &PipelineConfig { threshold_ppm: 700.0 });
        assert_eq!(strict.exceedances.len(), 4);

        let lax = run_pipeline(&table, &PipelineConfig { threshold_ppm: 2000.0 });
        assert!(lax.exceedances.is_empty());
        assert!(lax.summary.is_empty());
        assert!(lax.exceed_counts.is_empty());
        assert_eq!(lax.threshold_ppm, 2000.0);
    }

    #[test]
    fn test_heatmap_covers_full_long_table() {
        // The heatmap averages ALL readings, not just exceedances.
        let artifacts = run_pipeline(&sample_table(), &PipelineConfig::default());

        assert_eq!(artifacts.heatmap.mean_for(8, "AHU2"), Some(800.0));
        assert_eq!(artifacts.heatmap.mean_for(9, "AHU1"), Some(950.0));
    }

    #[test]
    fn test_blank_column_absent_everywhere() {
        let table = WideTable {
            ahu_ids: vec!["AHU1".into(), "AHU_DEAD".into()],
            rows: vec![WideRow {
                timestamp: ts(8),
                cells: vec![Some(1200.0), None],
            }],
        };
        let artifacts = run_pipeline(&table, &PipelineConfig::default());

        assert!(artifacts.long.iter().all(|r| r.ahu != "AHU_DEAD"));
        assert!(artifacts.summary.iter().all(|r| r.ahu != "AHU_DEAD"));
        assert!(!artifacts.heatmap.ahu_ids.contains(&"AHU_DEAD".to_string()));
    }
}
