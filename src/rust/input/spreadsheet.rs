use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use log::debug;

use super::batch::TextBatch;
use super::error::InputError;

/// Reads the text cells of a spreadsheet workbook (xlsx or xls).
///
/// Only the first worksheet is consulted; any further sheets are ignored.
/// Cells are visited row by row, left to right, and only string cells that
/// are non-empty after trimming are kept. Numbers, booleans, dates and
/// blanks are skipped.
pub fn from_spreadsheet(bytes: &[u8]) -> Result<TextBatch, InputError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
        .map_err(|e| InputError::Spreadsheet(e.to_string()))?;

    let sheet_count = workbook.sheet_names().len();
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| InputError::Spreadsheet("workbook has no worksheets".to_string()))?
        .map_err(|e| InputError::Spreadsheet(e.to_string()))?;

    let batch = TextBatch::from_candidates(range.rows().flat_map(|row| {
        row.iter().filter_map(|cell| match cell {
            Data::String(text) => Some(text.as_str()),
            _ => None,
        })
    }));

    if sheet_count > 1 {
        debug!("Ignoring {} worksheet(s) after the first", sheet_count - 1);
    }
    debug!("Read {} entries from spreadsheet", batch.len());
    Ok(batch)
}
