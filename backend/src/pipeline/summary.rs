//! Exceedance filtering and per-AHU aggregation.
//!
//! An exceedance is a reading strictly greater than the injected
//! threshold; equality is NOT an exceedance. Aggregation accumulates
//! per-AHU state in a map and builds rows at the end, so each AHU
//! appears at most once. Rows are sorted by AHU id to keep JSON output
//! and rendered tables deterministic.

use std::collections::HashMap;

use crate::models::{ExceedanceCount, LongRow, SummaryRow};

/// Filter the long table down to readings strictly above `threshold_ppm`.
pub fn filter_exceedances(long: &[LongRow], threshold_ppm: f64) -> Vec<LongRow> {
    long.iter()
        .filter(|row| row.co2_ppm > threshold_ppm)
        .cloned()
        .collect()
}

/// Per-AHU accumulator for max / sum / count.
#[derive(Debug, Default)]
struct Accumulator {
    max: f64,
    sum: f64,
    count: usize,
}

impl Accumulator {
    fn push(&mut self, ppm: f64) {
        if self.count == 0 || ppm > self.max {
            self.max = ppm;
        }
        self.sum += ppm;
        self.count += 1;
    }

    fn build(self, ahu: String) -> SummaryRow {
        SummaryRow {
            ahu,
            max_co2: self.max,
            avg_co2: self.sum / self.count as f64,
            exceed_count: self.count,
        }
    }
}

/// Group exceedances by AHU and compute max, arithmetic mean and count.
///
/// AHUs without exceedances are absent from the output, not zero-filled.
pub fn summarize(exceedances: &[LongRow]) -> Vec<SummaryRow> {
    let mut groups: HashMap<&str, Accumulator> = HashMap::new();

    for row in exceedances {
        groups.entry(&row.ahu).or_default().push(row.co2_ppm);
    }

    let mut summary: Vec<SummaryRow> = groups
        .into_iter()
        .map(|(ahu, acc)| acc.build(ahu.to_string()))
        .collect();
    summary.sort_by(|a, b| a.ahu.cmp(&b.ahu));
    summary
}

/// Derive per-AHU counts from the summary (bar chart input).
pub fn exceedance_counts(summary: &[SummaryRow]) -> Vec<ExceedanceCount> {
    summary
        .iter()
        .map(|row| ExceedanceCount {
            ahu: row.ahu.clone(),
            count: row.exceed_count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    fn ts(h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    fn row(ahu: &str, h: u32, ppm: f64) -> LongRow {
        LongRow::new(ts(h), ahu, ppm)
    }

    #[test]
    fn test_strict_threshold_membership() {
        let long = vec![
            row("AHU1", 8, 1000.0),
            row("AHU1", 9, 1000.1),
            row("AHU2", 8, 999.9),
        ];
        let exceed = filter_exceedances(&long, 1000.0);

        // Strictly greater: equality is excluded.
        assert_eq!(exceed.len(), 1);
        assert_eq!(exceed[0].co2_ppm, 1000.1);
        assert!(exceed.iter().all(|r| r.co2_ppm > 1000.0));
    }

    #[test]
    fn test_summary_aggregates() {
        let exceed = vec![
            row("AHU1", 8, 1200.0),
            row("AHU1", 9, 1400.0),
            row("AHU2", 9, 1500.0),
        ];
        let summary = summarize(&exceed);

        assert_eq!(summary.len(), 2);
        let ahu1 = &summary[0];
        assert_eq!(ahu1.ahu, "AHU1");
        assert_eq!(ahu1.max_co2, 1400.0);
        assert!((ahu1.avg_co2 - 1300.0).abs() < 1e-9);
        assert_eq!(ahu1.exceed_count, 2);

        let ahu2 = &summary[1];
        assert_eq!(ahu2.ahu, "AHU2");
        assert_eq!(ahu2.max_co2, 1500.0);
        assert_eq!(ahu2.exceed_count, 1);
    }

    #[test]
    fn test_zero_exceedance_ahu_absent() {
        let long = vec![row("AHU1", 8, 1200.0), row("AHU2", 8, 400.0)];
        let exceed = filter_exceedances(&long, 1000.0);
        let summary = summarize(&exceed);

        assert_eq!(summary.len(), 1);
        assert!(summary.iter().all(|r| r.ahu != "AHU2"));
    }

    #[test]
    fn test_each_ahu_appears_once() {
        let exceed = vec![
            row("AHU3", 8, 1100.0),
            row("AHU1", 9, 1200.0),
            row("AHU3", 10, 1300.0),
            row("AHU1", 11, 1400.0),
        ];
        let summary = summarize(&exceed);
        let ahus: Vec<&str> = summary.iter().map(|r| r.ahu.as_str()).collect();
        assert_eq!(ahus, vec!["AHU1", "AHU3"]);
    }

    #[test]
    fn test_counts_derived_from_summary() {
        let exceed = vec![
            row("AHU1", 8, 1200.0),
            row("AHU1", 9, 1400.0),
            row("AHU2", 9, 1500.0),
        ];
        let summary = summarize(&exceed);
        let counts = exceedance_counts(&summary);

        assert_eq!(counts.len(), 2);
        for (count, summary_row) in counts.iter().zip(&summary) {
            assert_eq!(count.ahu, summary_row.ahu);
            assert_eq!(count.count, summary_row.exceed_count);
        }
    }

    #[test]
    fn test_empty_input_yields_empty_summary() {
        assert!(summarize(&[]).is_empty());
        assert!(exceedance_counts(&[]).is_empty());
    }
}
