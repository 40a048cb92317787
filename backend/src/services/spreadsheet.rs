//! Spreadsheet ingestion
//!
//! Turns uploaded CSV and Excel files into a `RawTable`. Exported stock
//! reports often carry a title block above the real header row, so the
//! header is located by resolving the required columns row by row.

use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Reader};
use csv::ReaderBuilder;
use shared::{ColumnMap, RawTable, ValidationError};

use crate::error::{AppError, AppResult};

/// Rows scanned for a header before giving up on a sheet
pub const HEADER_SCAN_ROWS: usize = 15;

/// Workbook sheets searched for the dataset
pub const MAX_SHEETS: usize = 5;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpreadsheetFormat {
    Csv,
    Excel,
}

impl SpreadsheetFormat {
    /// Pick the format from the file extension
    pub fn from_filename(filename: &str) -> AppResult<Self> {
        let ext = filename
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "csv" => Ok(SpreadsheetFormat::Csv),
            "xlsx" | "xlsm" | "xls" => Ok(SpreadsheetFormat::Excel),
            _ => Err(AppError::UnsupportedFormat(if ext.is_empty() {
                filename.to_string()
            } else {
                ext
            })),
        }
    }
}

/// Parse an uploaded file into a raw table
pub fn parse_spreadsheet(filename: &str, bytes: &[u8]) -> AppResult<RawTable> {
    match SpreadsheetFormat::from_filename(filename)? {
        SpreadsheetFormat::Csv => parse_csv(bytes),
        SpreadsheetFormat::Excel => parse_workbook(bytes),
    }
}

pub fn parse_csv(bytes: &[u8]) -> AppResult<RawTable> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| AppError::SpreadsheetParse(e.to_string()))?;
        rows.push(record.iter().map(|v| v.trim().to_string()).collect());
    }

    locate_header(rows).map_err(AppError::from)
}

pub fn parse_workbook(bytes: &[u8]) -> AppResult<RawTable> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
        .map_err(|e| AppError::SpreadsheetParse(e.to_string()))?;

    let sheet_names = workbook.sheet_names();
    if sheet_names.is_empty() {
        return Err(AppError::SpreadsheetParse(
            "workbook has no sheets".to_string(),
        ));
    }

    let mut first_error = None;
    for sheet_name in sheet_names.iter().take(MAX_SHEETS) {
        let range = workbook
            .worksheet_range(sheet_name)
            .map_err(|e| AppError::SpreadsheetParse(e.to_string()))?;

        let rows: Vec<Vec<String>> = range
            .rows()
            .map(|row| row.iter().map(|cell| cell.to_string().trim().to_string()).collect())
            .collect();

        match locate_header(rows) {
            Ok(table) => {
                tracing::debug!(sheet = %sheet_name, rows = table.rows.len(), "Dataset sheet found");
                return Ok(table);
            }
            Err(e) => {
                first_error.get_or_insert(e);
            }
        }
    }

    Err(first_error
        .map(AppError::from)
        .unwrap_or_else(|| AppError::SpreadsheetParse("no readable sheet".to_string())))
}

/// Split rows into header and data at the first row that names every
/// required column.
///
/// When no row within `HEADER_SCAN_ROWS` qualifies, the error is the one
/// reported for the first non-blank row.
pub fn locate_header(mut rows: Vec<Vec<String>>) -> Result<RawTable, ValidationError> {
    let mut first_error = None;

    for index in 0..rows.len().min(HEADER_SCAN_ROWS) {
        if rows[index].iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }
        match ColumnMap::resolve(&rows[index]) {
            Ok(_) => {
                let data = rows.split_off(index + 1);
                let headers = rows.pop().unwrap_or_default();
                return Ok(RawTable::new(headers, data));
            }
            Err(e) => {
                first_error.get_or_insert(e);
            }
        }
    }

    match first_error {
        Some(e) => Err(e),
        None => ColumnMap::resolve::<String>(&[]).map(|_| RawTable::default()),
    }
}
