//! Error types for the slidetime library.

use std::io;
use thiserror::Error;

/// Result type alias for slidetime operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while extracting slide durations.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input could not be opened as a ZIP-structured presentation.
    #[error("Cannot open presentation archive: {0}")]
    ArchiveOpen(String),

    /// A slide entry could not be read or parsed as well-formed XML.
    #[error("Slide entry {entry}: {reason}")]
    SlideParse { entry: String, reason: String },

    /// The report could not be written to its destination.
    #[error("Cannot write report: {0}")]
    ReportWrite(String),
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Error::ArchiveOpen(err.to_string())
    }
}

impl Error {
    /// Build a `SlideParse` error for a named archive entry.
    pub(crate) fn slide_parse(entry: &str, reason: impl ToString) -> Self {
        Error::SlideParse {
            entry: entry.to_string(),
            reason: reason.to_string(),
        }
    }
}
