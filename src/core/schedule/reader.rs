//! Upload decoding: base64 file → raw table or text lines, by extension.

use super::table::RawTable;
use crate::errors::{AppError, AppResult};
use crate::utils::blob::decode_base64_payload;
use crate::utils::excel_date::excel_serial_to_text;
use calamine::{Data, Reader, open_workbook_auto_from_rs};
use std::io::Cursor;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadContent {
    Table(RawTable),
    Lines(String),
}

pub(crate) fn extension(filename: &str) -> String {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default()
}

/// Decode `content_b64` and read it according to the extension of `filename`.
pub fn read_upload(content_b64: &str, filename: &str) -> AppResult<UploadContent> {
    let ext = extension(filename);
    if !matches!(ext.as_str(), "xlsx" | "xls" | "csv" | "txt") {
        return Err(AppError::Validation(format!(
            "Unsupported file type: '{filename}' (expected xlsx, xls, csv or txt)"
        )));
    }

    let bytes = decode_base64_payload(content_b64)?;
    read_bytes(bytes, &ext)
}

pub(crate) fn read_bytes(bytes: Vec<u8>, ext: &str) -> AppResult<UploadContent> {
    match ext {
        "xlsx" | "xls" => read_spreadsheet(bytes).map(UploadContent::Table),
        "csv" => read_csv(&bytes).map(UploadContent::Table),
        "txt" => String::from_utf8(bytes)
            .map(UploadContent::Lines)
            .map_err(|_| AppError::Validation("text file is not valid UTF-8".to_string())),
        other => Err(AppError::Validation(format!(
            "Unsupported file type: '.{other}' (expected xlsx, xls, csv or txt)"
        ))),
    }
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty | Data::Error(_) => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => excel_serial_to_text(dt.as_f64()).unwrap_or_default(),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
    }
}

/// First worksheet; first row is the header.
fn read_spreadsheet(bytes: Vec<u8>) -> AppResult<RawTable> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| AppError::Validation("workbook has no worksheets".to_string()))??;

    let mut rows = range
        .rows()
        .map(|r| r.iter().map(cell_text).collect::<Vec<_>>());

    let headers = rows.next().unwrap_or_default();
    Ok(RawTable::new(headers, rows.collect()))
}

/// First record is the header. Ragged rows are accepted, unreadable ones skipped.
fn read_csv(bytes: &[u8]) -> AppResult<RawTable> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(bytes);

    let headers = rdr.headers()?.iter().map(str::to_string).collect();

    let mut rows = Vec::new();
    for (idx, record) in rdr.records().enumerate() {
        match record {
            Ok(r) => rows.push(r.iter().map(str::to_string).collect()),
            Err(e) => log::warn!("csv record {} skipped: {e}", idx + 2),
        }
    }

    Ok(RawTable::new(headers, rows))
}
