//! XLSX workbook parsing via calamine.
//!
//! Only sheet 1 is read, matching the input contract. Excel stores
//! timestamps either as serial date numbers or as text; both are
//! accepted. Text cells in reading columns must be numeric or blank.

use calamine::{Data, Reader, Xlsx};
use chrono::NaiveDateTime;
use std::io::Cursor;

use super::{parse_reading, parse_timestamp, timestamp_column, ParsedSheet, SheetFormat, SheetInfo};
use crate::error::{ParseError, ParseResult};
use crate::models::{WideRow, WideTable};

/// Parse an XLSX payload (sheet 1) into a wide table.
pub fn parse_xlsx_bytes(bytes: &[u8]) -> ParseResult<ParsedSheet> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))
        .map_err(|e| ParseError::BadWorkbook(e.to_string()))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| ParseError::BadWorkbook("workbook has no sheets".to_string()))?
        .map_err(|e| ParseError::BadWorkbook(e.to_string()))?;

    let mut rows_iter = range.rows();

    let headers: Vec<String> = rows_iter
        .next()
        .ok_or(ParseError::EmptySheet)?
        .iter()
        .map(cell_to_header)
        .collect();

    let ts_col = timestamp_column(&headers)?;

    let ahu_ids: Vec<String> = headers
        .iter()
        .enumerate()
        .filter(|&(i, _)| i != ts_col)
        .map(|(_, h)| h.clone())
        .collect();

    let mut rows = Vec::new();

    for (idx, record) in rows_iter.enumerate() {
        let row_num = idx + 2;

        // Trailing fully-empty rows are common in hand-edited workbooks.
        if record.iter().all(|c| matches!(c, Data::Empty)) {
            continue;
        }

        let ts_cell = record.get(ts_col).unwrap_or(&Data::Empty);
        let timestamp = timestamp_from_cell(ts_cell, row_num)?;

        let mut cells = Vec::with_capacity(ahu_ids.len());
        for (col, header) in headers.iter().enumerate() {
            if col == ts_col {
                continue;
            }
            let cell = record.get(col).unwrap_or(&Data::Empty);
            cells.push(reading_from_cell(cell, row_num, header)?);
        }

        rows.push(WideRow { timestamp, cells });
    }

    if rows.is_empty() {
        return Err(ParseError::EmptySheet);
    }

    let info = SheetInfo {
        format: SheetFormat::Xlsx,
        encoding: "binary".to_string(),
        delimiter: None,
        row_count: rows.len(),
        ahu_ids: ahu_ids.clone(),
    };

    Ok(ParsedSheet {
        table: WideTable { ahu_ids, rows },
        info,
    })
}

fn cell_to_header(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.trim().to_string(),
        other => other.to_string().trim().to_string(),
    }
}

/// Convert a timestamp cell: Excel serial dates and text are accepted.
fn timestamp_from_cell(cell: &Data, row: usize) -> ParseResult<NaiveDateTime> {
    match cell {
        Data::DateTime(dt) => dt.as_datetime().ok_or_else(|| ParseError::BadTimestamp {
            row,
            value: dt.as_f64().to_string(),
        }),
        Data::String(s) => parse_timestamp(s.trim(), row),
        Data::DateTimeIso(s) => parse_timestamp(s.trim(), row),
        other => Err(ParseError::BadTimestamp {
            row,
            value: other.to_string(),
        }),
    }
}

/// Convert a reading cell: empty is missing, numbers pass through,
/// text must be numeric or blank.
fn reading_from_cell(cell: &Data, row: usize, column: &str) -> ParseResult<Option<f64>> {
    match cell {
        Data::Empty => Ok(None),
        Data::Float(f) if f.is_finite() => Ok(Some(*f)),
        Data::Int(i) => Ok(Some(*i as f64)),
        Data::String(s) => parse_reading(s.trim(), row, column),
        other => Err(ParseError::BadNumber {
            row,
            column: column.to_string(),
            value: other.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn test_reading_cell_variants() {
        assert_eq!(reading_from_cell(&Data::Empty, 2, "AHU1").unwrap(), None);
        assert_eq!(
            reading_from_cell(&Data::Float(1200.5), 2, "AHU1").unwrap(),
            Some(1200.5)
        );
        assert_eq!(
            reading_from_cell(&Data::Int(950), 2, "AHU1").unwrap(),
            Some(950.0)
        );
        assert_eq!(
            reading_from_cell(&Data::String("  ".into()), 2, "AHU1").unwrap(),
            None
        );
        assert_eq!(
            reading_from_cell(&Data::String("800".into()), 2, "AHU1").unwrap(),
            Some(800.0)
        );
    }

    #[test]
    fn test_reading_cell_rejects_text() {
        let err = reading_from_cell(&Data::String("high".into()), 4, "AHU2").unwrap_err();
        match err {
            ParseError::BadNumber { row, column, value } => {
                assert_eq!(row, 4);
                assert_eq!(column, "AHU2");
                assert_eq!(value, "high");
            }
            other => panic!("expected BadNumber, got {other:?}"),
        }
    }

    #[test]
    fn test_reading_cell_rejects_bool() {
        assert!(matches!(
            reading_from_cell(&Data::Bool(true), 2, "AHU1"),
            Err(ParseError::BadNumber { .. })
        ));
    }

    #[test]
    fn test_timestamp_cell_text() {
        let ts = timestamp_from_cell(&Data::String("2024-01-01 08:00".into()), 2).unwrap();
        assert_eq!(ts.hour(), 8);
    }

    #[test]
    fn test_timestamp_cell_empty_fails() {
        assert!(matches!(
            timestamp_from_cell(&Data::Empty, 2),
            Err(ParseError::BadTimestamp { row: 2, .. })
        ));
    }
}
