//! Input normalization: manual entries, CSV and spreadsheet uploads all end
//! up as a [`TextBatch`]. Nothing in here touches the network or workflow state.

mod batch;
mod csv;
mod error;
mod spreadsheet;
mod upload;

use log::info;

pub use batch::TextBatch;
pub use csv::{from_csv, CsvEncoding};
pub use error::InputError;
pub use spreadsheet::from_spreadsheet;
pub use upload::{SourceFormat, UploadedFile};

/// Builds a batch from manually typed entries. See [`TextBatch::from_manual_entries`].
pub fn from_manual_entries<I, S>(entries: I) -> TextBatch
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    TextBatch::from_manual_entries(entries)
}

/// Normalizes an uploaded file according to its format.
///
/// `csv` files are decoded with the upload's encoding, `xlsx`/`xls` files are
/// read from their first worksheet.
pub fn from_upload(file: &UploadedFile) -> Result<TextBatch, InputError> {
    let batch = match file.format() {
        SourceFormat::Csv => from_csv(file.bytes(), file.encoding())?,
        SourceFormat::Xlsx | SourceFormat::Xls => from_spreadsheet(file.bytes())?,
    };
    info!(
        "Normalized {} ({}) into {} entries",
        file.file_name(),
        file.format(),
        batch.len()
    );
    Ok(batch)
}
