use std::io;

/// Errors raised while turning user input into a [`TextBatch`](super::TextBatch).
///
/// All of these are local validation failures: none of them is ever produced
/// by, or reported as, a remote call.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InputError {
    /// The file extension is not one of `csv`, `xlsx` or `xls`
    #[error("Unsupported file format: {0:?} (expected csv, xlsx or xls)")]
    UnsupportedFormat(String),
    /// The bytes are not valid text under the selected encoding
    #[error("Could not decode file as {encoding}: {reason}")]
    Decoding { encoding: String, reason: String },
    /// The character encoding label is not recognised
    #[error("Unknown character encoding: {0:?}")]
    UnknownEncoding(String),
    /// The spreadsheet could not be opened or has no worksheet
    #[error("Could not read spreadsheet: {0}")]
    Spreadsheet(String),
    /// Reading the file from disk failed
    #[error("Could not read file {path}: {reason}")]
    Io { path: String, reason: String },
}

impl InputError {
    pub(crate) fn io(path: impl Into<String>, err: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            reason: err.to_string(),
        }
    }
}
