//! Hour-of-day x AHU pivot of mean readings.
//!
//! The pivot runs over the FULL long table, not the exceedance subset.
//! Cells with no observations stay `None`; they are never zero-filled,
//! so "no data" and "mean of zero" remain distinguishable downstream.

use std::collections::HashMap;

use crate::models::{HourlyHeatmap, LongRow};

/// Pivot long rows into an hourly mean heatmap.
///
/// Column order follows `column_order` (the wide table's header order)
/// restricted to AHUs that actually have observations; rows are the
/// observed hours, ascending.
pub fn hourly_heatmap(long: &[LongRow], column_order: &[String]) -> HourlyHeatmap {
    // (hour, ahu) -> (sum, count)
    let mut buckets: HashMap<(u32, &str), (f64, usize)> = HashMap::new();

    for row in long {
        let bucket = buckets.entry((row.hour, &row.ahu)).or_insert((0.0, 0));
        bucket.0 += row.co2_ppm;
        bucket.1 += 1;
    }

    let ahu_ids: Vec<String> = column_order
        .iter()
        .filter(|ahu| long.iter().any(|r| &r.ahu == *ahu))
        .cloned()
        .collect();

    let mut hours: Vec<u32> = buckets.keys().map(|&(h, _)| h).collect();
    hours.sort_unstable();
    hours.dedup();

    let cells: Vec<Vec<Option<f64>>> = hours
        .iter()
        .map(|&hour| {
            ahu_ids
                .iter()
                .map(|ahu| {
                    buckets
                        .get(&(hour, ahu.as_str()))
                        .map(|&(sum, count)| sum / count as f64)
                })
                .collect()
        })
        .collect();

    HourlyHeatmap {
        ahu_ids,
        hours,
        cells,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    fn ts(day: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, day)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    fn row(ahu: &str, day: u32, h: u32, ppm: f64) -> LongRow {
        LongRow::new(ts(day, h), ahu, ppm)
    }

    fn cols() -> Vec<String> {
        vec!["AHU1".into(), "AHU2".into()]
    }

    #[test]
    fn test_mean_across_days() {
        // Two readings for (08, AHU1) on different days average together.
        let long = vec![
            row("AHU1", 1, 8, 1000.0),
            row("AHU1", 2, 8, 1200.0),
            row("AHU2", 1, 8, 700.0),
        ];
        let heatmap = hourly_heatmap(&long, &cols());

        assert_eq!(heatmap.hours, vec![8]);
        assert_eq!(heatmap.mean_for(8, "AHU1"), Some(1100.0));
        assert_eq!(heatmap.mean_for(8, "AHU2"), Some(700.0));
    }

    #[test]
    fn test_unobserved_cells_are_none() {
        let long = vec![row("AHU1", 1, 8, 1000.0), row("AHU2", 1, 9, 700.0)];
        let heatmap = hourly_heatmap(&long, &cols());

        assert_eq!(heatmap.hours, vec![8, 9]);
        assert_eq!(heatmap.mean_for(8, "AHU2"), None);
        assert_eq!(heatmap.mean_for(9, "AHU1"), None);
    }

    #[test]
    fn test_ahu_without_observations_excluded() {
        let long = vec![row("AHU1", 1, 8, 1000.0)];
        let heatmap = hourly_heatmap(&long, &cols());

        assert_eq!(heatmap.ahu_ids, vec!["AHU1"]);
        assert_eq!(heatmap.cells[0].len(), 1);
    }

    #[test]
    fn test_completeness() {
        // Every (hour, AHU) pair with at least one observation has a
        // defined cell equal to the mean of those observations.
        let long = vec![
            row("AHU1", 1, 8, 900.0),
            row("AHU1", 2, 8, 1100.0),
            row("AHU1", 1, 9, 800.0),
            row("AHU2", 1, 9, 1500.0),
        ];
        let heatmap = hourly_heatmap(&long, &cols());

        for r in &long {
            let cell = heatmap.mean_for(r.hour, &r.ahu);
            assert!(cell.is_some(), "missing cell for ({}, {})", r.hour, r.ahu);
        }
        assert_eq!(heatmap.mean_for(8, "AHU1"), Some(1000.0));
        assert_eq!(heatmap.mean_for(9, "AHU1"), Some(800.0));
        assert_eq!(heatmap.mean_for(9, "AHU2"), Some(1500.0));
    }

    #[test]
    fn test_empty_long_table() {
        let heatmap = hourly_heatmap(&[], &cols());
        assert!(heatmap.ahu_ids.is_empty());
        assert!(heatmap.hours.is_empty());
        assert!(heatmap.cells.is_empty());
    }
}
