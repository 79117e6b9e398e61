use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use sha2::{Digest, Sha256};

use super::csv::CsvEncoding;
use super::error::InputError;

/// File formats accepted for upload, chosen by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceFormat {
    Csv,
    Xlsx,
    Xls,
}

impl SourceFormat {
    /// Resolves the format from a file name's extension, ignoring case.
    /// Everything after the last dot counts, so `.csv` is a CSV file.
    pub fn from_file_name(file_name: &str) -> Result<Self, InputError> {
        let extension = file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "csv" => Ok(Self::Csv),
            "xlsx" => Ok(Self::Xlsx),
            "xls" => Ok(Self::Xls),
            _ => Err(InputError::UnsupportedFormat(file_name.to_string())),
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Csv => "text/csv",
            Self::Xlsx => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            Self::Xls => "application/vnd.ms-excel",
        }
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Csv => f.write_str("csv"),
            Self::Xlsx => f.write_str("xlsx"),
            Self::Xls => f.write_str("xls"),
        }
    }
}

/// A file picked by the operator, held as an immutable snapshot.
///
/// Cloning is cheap and shares the payload, so a workflow can keep its own
/// copy while the session swaps in a different file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    file_name: String,
    format: SourceFormat,
    encoding: CsvEncoding,
    bytes: Arc<[u8]>,
}

impl UploadedFile {
    /// Creates an upload, rejecting unsupported extensions.
    ///
    /// # Example
    /// ```
    /// use sdg_classify::{SourceFormat, UploadedFile};
    ///
    /// let file = UploadedFile::new("opinions.CSV", b"Good\nBad\n".to_vec())?;
    /// assert_eq!(file.format(), SourceFormat::Csv);
    /// assert!(UploadedFile::new("notes.txt", Vec::<u8>::new()).is_err());
    /// # Ok::<(), sdg_classify::InputError>(())
    /// ```
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Result<Self, InputError> {
        let file_name = file_name.into();
        let format = SourceFormat::from_file_name(&file_name)?;
        Ok(Self {
            file_name,
            format,
            encoding: CsvEncoding::default(),
            bytes: bytes.into(),
        })
    }

    /// Reads an upload from disk. The file name part of `path` decides the format.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, InputError> {
        let path = path.as_ref();
        let display = path.display().to_string();
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| InputError::UnsupportedFormat(display.clone()))?
            .to_string();
        // Reject by extension before touching the disk
        SourceFormat::from_file_name(&file_name)?;
        let bytes = fs::read(path).map_err(|e| InputError::io(display, e))?;
        Self::new(file_name, bytes)
    }

    /// Sets the character encoding used when the file is read as CSV.
    pub fn with_encoding(mut self, encoding: CsvEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn format(&self) -> SourceFormat {
        self.format
    }

    pub fn encoding(&self) -> CsvEncoding {
        self.encoding
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }

    /// SHA-256 of the payload as lowercase hex.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.bytes());
        format!("{:x}", hasher.finalize())
    }
}
