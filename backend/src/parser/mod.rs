//! Spreadsheet parsing: raw bytes to a wide-format sensor table.
//!
//! The payload is sniffed: XLSX workbooks (ZIP magic) go through
//! [`xlsx`]; anything else is treated as delimited text with encoding
//! and delimiter auto-detection. Building-management exports are
//! routinely Windows-1252, so detection matters in practice.
//!
//! Parsing is strict: one unparseable timestamp or non-numeric reading
//! fails the whole run with row identity attached. Blank reading cells
//! are kept as missing and dropped later by the melt.

use chrono::NaiveDateTime;

use crate::error::{ParseError, ParseResult};
use crate::models::{WideRow, WideTable};

pub mod xlsx;

/// Accepted timestamp formats, tried in order.
const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];

/// Header label of the required timestamp column (matched
/// case-insensitively after trimming).
pub const TIMESTAMP_COLUMN: &str = "Timestamp";

/// Input format detected from the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SheetFormat {
    Xlsx,
    Delimited,
}

/// Metadata about the parsed sheet, reported back to the caller.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetInfo {
    /// Detected payload format.
    pub format: SheetFormat,
    /// Detected text encoding (`"binary"` for XLSX).
    pub encoding: String,
    /// Detected delimiter for delimited text, `None` for XLSX.
    pub delimiter: Option<char>,
    /// Number of data rows.
    pub row_count: usize,
    /// AHU column headers, in sheet order.
    pub ahu_ids: Vec<String>,
}

/// A parsed sheet: the wide table plus detection metadata.
#[derive(Debug, Clone)]
pub struct ParsedSheet {
    pub table: WideTable,
    pub info: SheetInfo,
}

/// Parse spreadsheet bytes of either supported format into a wide table.
pub fn parse_sheet_bytes(bytes: &[u8]) -> ParseResult<ParsedSheet> {
    if bytes.starts_with(b"PK\x03\x04") {
        xlsx::parse_xlsx_bytes(bytes)
    } else {
        parse_delimited_bytes(bytes)
    }
}

/// Detect the encoding of raw bytes using chardet.
pub fn detect_encoding(bytes: &[u8]) -> String {
    let result = chardet::detect(bytes);
    let charset = result.0;

    // Normalize charset names
    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        _ => charset,
    }
}

/// Decode bytes to string using the detected encoding.
pub fn decode_content(bytes: &[u8], encoding: &str) -> String {
    match encoding.to_lowercase().as_str() {
        "iso-8859-1" | "latin-1" | "latin1" => encoding_rs::ISO_8859_15.decode(bytes).0.to_string(),
        "windows-1252" | "cp1252" => encoding_rs::WINDOWS_1252.decode(bytes).0.to_string(),
        // UTF-8 and anything unrecognized: lossy UTF-8
        _ => String::from_utf8_lossy(bytes).to_string(),
    }
}

/// Detect the delimiter by counting occurrences in the first line.
pub fn detect_delimiter(content: &str) -> char {
    let first_line = content.lines().next().unwrap_or("");

    let separators = [';', ',', '\t', '|'];
    let mut best_sep = ',';
    let mut best_count = 0;

    for &sep in &separators {
        let count = first_line.matches(sep).count();
        if count > best_count {
            best_count = count;
            best_sep = sep;
        }
    }

    best_sep
}

/// Parse delimited-text bytes with encoding and delimiter auto-detection.
pub fn parse_delimited_bytes(bytes: &[u8]) -> ParseResult<ParsedSheet> {
    let encoding = detect_encoding(bytes);
    let content = decode_content(bytes, &encoding);
    let delimiter = detect_delimiter(&content);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter as u8)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim_matches('"').trim().to_string())
        .collect();

    if headers.is_empty() || (headers.len() == 1 && headers[0].is_empty()) {
        return Err(ParseError::EmptySheet);
    }

    let ts_col = timestamp_column(&headers)?;

    let ahu_ids: Vec<String> = headers
        .iter()
        .enumerate()
        .filter(|&(i, _)| i != ts_col)
        .map(|(_, h)| h.clone())
        .collect();

    let mut rows = Vec::new();

    for (idx, record) in reader.records().enumerate() {
        let record = record?;
        // Sheet row number: header is row 1.
        let row_num = idx + 2;

        let raw_ts = record.get(ts_col).unwrap_or("").trim();
        let timestamp = parse_timestamp(raw_ts, row_num)?;

        let mut cells = Vec::with_capacity(ahu_ids.len());
        for (col, header) in headers.iter().enumerate() {
            if col == ts_col {
                continue;
            }
            let raw = record.get(col).unwrap_or("").trim();
            cells.push(parse_reading(raw, row_num, header)?);
        }

        rows.push(WideRow { timestamp, cells });
    }

    if rows.is_empty() {
        return Err(ParseError::EmptySheet);
    }

    let info = SheetInfo {
        format: SheetFormat::Delimited,
        encoding,
        delimiter: Some(delimiter),
        row_count: rows.len(),
        ahu_ids: ahu_ids.clone(),
    };

    Ok(ParsedSheet {
        table: WideTable { ahu_ids, rows },
        info,
    })
}

/// Locate the timestamp column among the headers.
pub(crate) fn timestamp_column(headers: &[String]) -> ParseResult<usize> {
    headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case(TIMESTAMP_COLUMN))
        .ok_or_else(|| ParseError::MissingColumn(TIMESTAMP_COLUMN.to_string()))
}

/// Parse a timestamp cell, trying each accepted format in order.
pub(crate) fn parse_timestamp(value: &str, row: usize) -> ParseResult<NaiveDateTime> {
    for format in TIMESTAMP_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(ts);
        }
    }
    Err(ParseError::BadTimestamp {
        row,
        value: value.to_string(),
    })
}

/// Parse a reading cell: blank is missing, anything else must be a
/// finite number.
pub(crate) fn parse_reading(value: &str, row: usize, column: &str) -> ParseResult<Option<f64>> {
    if value.is_empty() {
        return Ok(None);
    }
    match value.parse::<f64>() {
        Ok(n) if n.is_finite() => Ok(Some(n)),
        _ => Err(ParseError::BadNumber {
            row,
            column: column.to_string(),
            value: value.to_string(),
        }),
    }
}
