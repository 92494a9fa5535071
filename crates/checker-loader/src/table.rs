//! First-column extraction from tabular data
//!
//! Every function here returns raw cells. Normalization happens once, in
//! [`checker_core::AddressSet::from_raw`], for both providers.

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};

use crate::error::LoaderError;

/// Read the first column of the first sheet of a spreadsheet or CSV file.
///
/// Row 0 is treated as data, not as a header. Absent and empty cells are
/// skipped; whitespace-only cells are passed through and dropped later by
/// normalization.
pub fn read_first_column(path: &Path) -> Result<Vec<String>, LoaderError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "csv" => {
            let bytes = std::fs::read(path)?;
            parse_csv_first_column(&bytes)
        }
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => read_workbook_first_column(path),
        other => Err(LoaderError::UnsupportedFormat(if other.is_empty() {
            path.display().to_string()
        } else {
            other.to_string()
        })),
    }
}

fn read_workbook_first_column(path: &Path) -> Result<Vec<String>, LoaderError> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(LoaderError::NoWorksheet)??;

    // A used range that starts right of column A means column A is empty.
    match range.start() {
        Some((_, 0)) => {}
        _ => return Ok(Vec::new()),
    }

    let cells = range
        .rows()
        .filter_map(|row| row.first())
        .filter_map(cell_text)
        .collect();

    Ok(cells)
}

fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty => None,
        Data::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// First field of each header-less CSV record
pub fn parse_csv_first_column(bytes: &[u8]) -> Result<Vec<String>, LoaderError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut cells = Vec::new();
    for record in reader.records() {
        let record = record?;
        if let Some(field) = record.get(0) {
            if !field.is_empty() {
                cells.push(field.to_string());
            }
        }
    }
    Ok(cells)
}

/// First column of a spreadsheet CSV export, with quote characters stripped.
///
/// Quotes are removed before normalization so that `"0xABC"` and `0xabc`
/// canonicalize to the same address.
pub fn parse_remote_csv(body: &str) -> Result<Vec<String>, LoaderError> {
    let cells = parse_csv_first_column(body.as_bytes())?
        .into_iter()
        .map(|cell| cell.replace('"', ""))
        .collect();
    Ok(cells)
}
