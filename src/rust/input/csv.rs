use std::fmt;
use std::str::FromStr;

use log::debug;

use super::batch::TextBatch;
use super::error::InputError;

const UTF8_BOM: char = '\u{feff}';

/// Character encodings accepted for CSV uploads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CsvEncoding {
    #[default]
    Utf8,
    /// Latin-1. Every byte maps to the code point of the same value.
    Iso8859_1,
}

impl CsvEncoding {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Utf8 => "UTF-8",
            Self::Iso8859_1 => "ISO-8859-1",
        }
    }

    /// Decodes raw bytes into text under this encoding.
    pub fn decode(&self, bytes: &[u8]) -> Result<String, InputError> {
        match self {
            Self::Utf8 => {
                let text = std::str::from_utf8(bytes).map_err(|e| InputError::Decoding {
                    encoding: self.label().to_string(),
                    reason: e.to_string(),
                })?;
                Ok(text.strip_prefix(UTF8_BOM).unwrap_or(text).to_string())
            }
            Self::Iso8859_1 => Ok(bytes.iter().map(|&b| char::from(b)).collect()),
        }
    }
}

impl fmt::Display for CsvEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for CsvEncoding {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "utf-8" | "utf8" => Ok(Self::Utf8),
            "iso-8859-1" | "iso8859-1" | "latin1" | "latin-1" => Ok(Self::Iso8859_1),
            _ => Err(InputError::UnknownEncoding(s.to_string())),
        }
    }
}

/// Reads a CSV payload as one entry per line.
///
/// Lines are trimmed and blank lines are dropped; the remaining lines keep
/// their original order. Commas are not treated as separators, an opinion
/// is the whole line.
pub fn from_csv(bytes: &[u8], encoding: CsvEncoding) -> Result<TextBatch, InputError> {
    let text = encoding.decode(bytes)?;
    let batch = TextBatch::from_candidates(text.split('\n'));
    debug!("Read {} entries from CSV ({})", batch.len(), encoding);
    Ok(batch)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_lines_and_padding_are_removed() -> Result<(), InputError> {
        let batch = from_csv(b"Good\n\nBad \n", CsvEncoding::Utf8)?;
        assert_eq!(batch.texts(), &["Good", "Bad"]);
        Ok(())
    }

    #[test]
    fn test_crlf_line_endings() -> Result<(), InputError> {
        let batch = from_csv(b"first\r\nsecond\r\n\r\n", CsvEncoding::Utf8)?;
        assert_eq!(batch.texts(), &["first", "second"]);
        Ok(())
    }

    #[test]
    fn test_commas_stay_inside_the_entry() -> Result<(), InputError> {
        let batch = from_csv(b"clean water, for everyone\n", CsvEncoding::Utf8)?;
        assert_eq!(batch.texts(), &["clean water, for everyone"]);
        Ok(())
    }

    #[test]
    fn test_utf8_bom_is_stripped() -> Result<(), InputError> {
        let batch = from_csv("\u{feff}educación\n".as_bytes(), CsvEncoding::Utf8)?;
        assert_eq!(batch.texts(), &["educación"]);
        Ok(())
    }

    #[test]
    fn test_invalid_utf8_is_a_decoding_error() {
        let result = from_csv(&[b'o', b'k', 0xff, b'\n'], CsvEncoding::Utf8);
        assert!(matches!(result, Err(InputError::Decoding { .. })));
    }

    #[test]
    fn test_latin1_decodes_every_byte() -> Result<(), InputError> {
        // "educación" with 0xF3 for 'ó'
        let bytes = b"educaci\xf3n\n";
        let batch = from_csv(bytes, CsvEncoding::Iso8859_1)?;
        assert_eq!(batch.texts(), &["educación"]);
        Ok(())
    }

    #[test]
    fn test_encoding_labels() {
        assert_eq!("UTF-8".parse::<CsvEncoding>(), Ok(CsvEncoding::Utf8));
        assert_eq!("latin1".parse::<CsvEncoding>(), Ok(CsvEncoding::Iso8859_1));
        assert_eq!("ISO-8859-1".parse::<CsvEncoding>(), Ok(CsvEncoding::Iso8859_1));
        assert!(matches!(
            "utf-16".parse::<CsvEncoding>(),
            Err(InputError::UnknownEncoding(_))
        ));
    }
}
