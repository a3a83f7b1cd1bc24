//! Error types for the xlsx2xml library.

use std::io;
use thiserror::Error;

/// Result type alias for xlsx2xml operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while converting a workbook.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input is not a recognizable spreadsheet container.
    #[error("Unknown file format")]
    UnknownFormat,

    /// The format is recognized but cannot be converted.
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Error reading the ZIP package.
    #[error("ZIP archive error: {0}")]
    ZipArchive(String),

    /// Error parsing XML content.
    #[error("XML parse error: {0}")]
    XmlParse(String),

    /// A required package part is missing.
    #[error("Missing component: {0}")]
    MissingComponent(String),

    /// The workbook lists no worksheets.
    #[error("Workbook contains no worksheets")]
    MissingSheet,

    /// Error during text encoding conversion.
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// The element tree cannot be written as markup.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Coarse classification of [`Error`] values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Reading the input failed before parsing started.
    Io,
    /// The input is not a valid spreadsheet, or its first sheet is unavailable.
    Parse,
    /// The element tree violated the container/leaf invariant.
    Serialization,
}

impl Error {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Io(_) => ErrorKind::Io,
            Error::Serialization(_) => ErrorKind::Serialization,
            Error::UnknownFormat
            | Error::UnsupportedFormat(_)
            | Error::ZipArchive(_)
            | Error::XmlParse(_)
            | Error::MissingComponent(_)
            | Error::MissingSheet
            | Error::Encoding(_) => ErrorKind::Parse,
        }
    }

    /// Whether this error means the input could not be parsed.
    pub fn is_parse_error(&self) -> bool {
        self.kind() == ErrorKind::Parse
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Error::ZipArchive(err.to_string())
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::XmlParse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::UnknownFormat;
        assert_eq!(err.to_string(), "Unknown file format");

        let err = Error::UnsupportedFormat("legacy .xls".to_string());
        assert_eq!(err.to_string(), "Unsupported format: legacy .xls");

        let err = Error::Serialization("root/row[0]".to_string());
        assert_eq!(err.to_string(), "Serialization error: root/row[0]");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
        assert_eq!(err.kind(), ErrorKind::Io);
    }

    #[test]
    fn test_error_kind() {
        assert!(Error::MissingSheet.is_parse_error());
        assert!(Error::ZipArchive("bad".into()).is_parse_error());
        assert!(Error::XmlParse("bad".into()).is_parse_error());
        assert_eq!(
            Error::Serialization("x".into()).kind(),
            ErrorKind::Serialization
        );
        assert!(!Error::Serialization("x".into()).is_parse_error());
    }
}
