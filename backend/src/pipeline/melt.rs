//! Wide-to-long reshape.
//!
//! For every AHU column, one long row is emitted per wide row whose cell
//! holds a reading. Missing cells are dropped entirely, never kept as
//! null, so a wide table with R rows and C AHU columns melts into at
//! most R*C long rows. The hour-of-day field is derived from each
//! timestamp's own naive representation; no timezone conversion.

use crate::models::{LongRow, WideTable};

/// Melt a wide table into tidy long rows.
///
/// Output order is row-major: all AHUs of the first wide row, then the
/// second, and so on. An AHU column whose cells are all missing simply
/// contributes no rows and vanishes from every downstream artifact.
pub fn melt(wide: &WideTable) -> Vec<LongRow> {
    let mut long = Vec::new();

    for row in &wide.rows {
        for (col, ahu) in wide.ahu_ids.iter().enumerate() {
            if let Some(ppm) = row.cells[col] {
                long.push(LongRow::new(row.timestamp, ahu.clone(), ppm));
            }
        }
    }

    long
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
    fn test_melt_emits_one_row_per_cell() {
        let long = melt(&sample_table());
        assert_eq!(long.len(), 4);
        assert_eq!(long[0].ahu, "AHU1");
        assert_eq!(long[0].co2_ppm, 1200.0);
        assert_eq!(long[0].hour, 8);
        assert_eq!(long[3].ahu, "AHU2");
        assert_eq!(long[3].co2_ppm, 1500.0);
        assert_eq!(long[3].hour, 9);
    }

    #[test]
    fn test_missing_cells_dropped() {
        let mut table = sample_table();
        table.rows[0].cells[1] = None;

        let long = melt(&table);
        assert_eq!(long.len(), 3);
        assert!(long.iter().all(|r| r.co2_ppm.is_finite()));
    }

    #[test]
    fn test_all_blank_column_vanishes() {
        let mut table = sample_table();
        for row in &mut table.rows {
            row.cells[1] = None;
        }

        let long = melt(&table);
        assert_eq!(long.len(), 2);
        assert!(long.iter().all(|r| r.ahu == "AHU1"));
    }

    #[test]
    fn test_conservation_per_ahu() {
        // Long row count per AHU equals the non-missing cell count of
        // that AHU's wide column.
        let mut table = sample_table();
        table.rows[1].cells[0] = None;

        let long = melt(&table);
        for ahu in &table.ahu_ids {
            let long_count = long.iter().filter(|r| &r.ahu == ahu).count();
            assert_eq!(long_count, table.non_missing_count(ahu));
        }
    }
}
