//! Domain models for the co2watch analytics pipeline.
//!
//! This module contains the core data structures used throughout the
//! pipeline:
//!
//! - [`WideTable`] - One row per timestamp, one column per AHU
//! - [`LongRow`] - Tidy form: one row per (timestamp, AHU, reading)
//! - [`SummaryRow`] - Per-AHU exceedance aggregate
//! - [`ExceedanceCount`] - Per-AHU exceedance count for the bar chart
//! - [`HourlyHeatmap`] - Hour-of-day x AHU matrix of mean readings
//! - [`DashboardArtifacts`] - Everything the presentation layer consumes
//!
//! All of these are recomputed in full on every run; nothing persists.

use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

// =============================================================================
// Wide Format
// =============================================================================

/// A single wide-format row: one timestamp plus one optional reading per
/// AHU column.
///
/// `cells[i]` belongs to `WideTable::ahu_ids[i]`; a `None` cell is an
/// absent reading (blank spreadsheet cell), not a zero.
#[derive(Debug, Clone, PartialEq)]
pub struct WideRow {
    /// Naive timestamp as written in the sheet; no timezone conversion.
    pub timestamp: NaiveDateTime,

    /// One optional ppm reading per AHU column, in header order.
    pub cells: Vec<Option<f64>>,
}

/// Wide-format sensor table: rows indexed by timestamp, one numeric
/// column per AHU.
#[derive(Debug, Clone, PartialEq)]
pub struct WideTable {
    /// Non-timestamp column headers, in sheet order.
    pub ahu_ids: Vec<String>,

    /// Data rows. Invariant: `row.cells.len() == ahu_ids.len()`.
    pub rows: Vec<WideRow>,
}

impl WideTable {
    /// Number of non-missing cells in the column for `ahu`.
    ///
    /// Useful for the reshape conservation check: the long table holds
    /// exactly this many rows per AHU.
    pub fn non_missing_count(&self, ahu: &str) -> usize {
        match self.ahu_ids.iter().position(|id| id == ahu) {
            Some(col) => self
                .rows
                .iter()
                .filter(|row| row.cells[col].is_some())
                .count(),
            None => 0,
        }
    }
}

// =============================================================================
// Long (tidy) Format
// =============================================================================

/// One tidy observation: a single AHU's reading at a single timestamp.
///
/// Invariants:
/// - `ahu` is one of the wide table's non-timestamp headers.
/// - `co2_ppm` is finite; missing cells never become long rows.
/// - `hour` is the hour-of-day component of `timestamp` (0-23), taken
///   from the timestamp's own naive representation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LongRow {
    /// Observation timestamp (naive, as in the sheet).
    pub timestamp: NaiveDateTime,

    /// Hour-of-day derived from `timestamp`, 0-23.
    pub hour: u32,

    /// AHU identifier (the source column header).
    pub ahu: String,

    /// CO2 concentration in parts per million.
    pub co2_ppm: f64,
}

impl LongRow {
    /// Build a long row, deriving the hour from the timestamp.
    pub fn new(timestamp: NaiveDateTime, ahu: impl Into<String>, co2_ppm: f64) -> Self {
        Self {
            hour: timestamp.hour(),
            timestamp,
            ahu: ahu.into(),
            co2_ppm,
        }
    }
}

// =============================================================================
// Aggregates
// =============================================================================

/// Per-AHU aggregate over the exceedance set.
///
/// Only AHUs with at least one exceeding reading get a row; AHUs with
/// zero exceedances are absent, not zero-filled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryRow {
    /// AHU identifier.
    pub ahu: String,

    /// Highest exceeding reading, ppm.
    pub max_co2: f64,

    /// Arithmetic mean of the exceeding readings, ppm.
    pub avg_co2: f64,

    /// Number of exceeding readings.
    pub exceed_count: usize,
}

/// Per-AHU exceedance count, derived from the summary for the bar chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExceedanceCount {
    /// AHU identifier.
    pub ahu: String,

    /// Number of exceeding readings.
    pub count: usize,
}

/// Hour-of-day x AHU matrix of mean readings over the FULL long table
/// (not just exceedances).
///
/// `cells[r][c]` is the mean ppm for `hours[r]` and `ahu_ids[c]`, or
/// `None` when that (hour, AHU) pair has no observations. Empty cells
/// stay `None`; they are never zero-filled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HourlyHeatmap {
    /// Column labels: AHUs with at least one observation, in sheet order.
    pub ahu_ids: Vec<String>,

    /// Row labels: hours (0-23) with at least one observation, ascending.
    pub hours: Vec<u32>,

    /// `cells[r][c]` = mean ppm for (hours[r], ahu_ids[c]).
    pub cells: Vec<Vec<Option<f64>>>,
}

impl HourlyHeatmap {
    /// Look up the mean for an (hour, AHU) pair, if observed.
    pub fn mean_for(&self, hour: u32, ahu: &str) -> Option<f64> {
        let r = self.hours.iter().position(|&h| h == hour)?;
        let c = self.ahu_ids.iter().position(|id| id == ahu)?;
        self.cells[r][c]
    }
}

// =============================================================================
// Dashboard Artifacts
// =============================================================================

/// Everything the presentation layer consumes, already in renderable
/// shape (the heatmap is pre-pivoted, the counts pre-grouped).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardArtifacts {
    /// The full tidy table.
    pub long: Vec<LongRow>,

    /// Long rows strictly above the threshold.
    pub exceedances: Vec<LongRow>,

    /// Per-AHU exceedance aggregates, sorted by AHU id.
    pub summary: Vec<SummaryRow>,

    /// Per-AHU exceedance counts (bar chart input), sorted by AHU id.
    pub exceed_counts: Vec<ExceedanceCount>,

    /// Hourly mean heatmap over the full long table.
    pub heatmap: HourlyHeatmap,

    /// Threshold the exceedance artifacts were computed against, ppm.
    pub threshold_ppm: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts(h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_long_row_derives_hour() {
        let row = LongRow::new(ts(8), "AHU1", 1200.0);
        assert_eq!(row.hour, 8);
        assert_eq!(row.ahu, "AHU1");
    }

    #[test]
    fn test_non_missing_count() {
        let table = WideTable {
            ahu_ids: vec!["AHU1".into(), "AHU2".into()],
            rows: vec![
                WideRow {
                    timestamp: ts(8),
                    cells: vec![Some(1200.0), None],
                },
                WideRow {
                    timestamp: ts(9),
                    cells: vec![Some(950.0), Some(1500.0)],
                },
            ],
        };
        assert_eq!(table.non_missing_count("AHU1"), 2);
        assert_eq!(table.non_missing_count("AHU2"), 1);
        assert_eq!(table.non_missing_count("AHU9"), 0);
    }

    #[test]
    fn test_heatmap_lookup() {
        let heatmap = HourlyHeatmap {
            ahu_ids: vec!["AHU1".into()],
            hours: vec![8, 9],
            cells: vec![vec![Some(1200.0)], vec![None]],
        };
        assert_eq!(heatmap.mean_for(8, "AHU1"), Some(1200.0));
        assert_eq!(heatmap.mean_for(9, "AHU1"), None);
        assert_eq!(heatmap.mean_for(10, "AHU1"), None);
    }
}
