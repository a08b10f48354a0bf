use std::path::PathBuf;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Error taxonomy
// ---------------------------------------------------------------------------

/// Every failure a user action can run into. The UI shell turns these into
/// an inline status message; nothing here is fatal to the process.
#[derive(Debug, Error)]
pub enum ReaderError {
    /// Image missing, undecodable, or with an empty pixel grid.
    #[error("invalid image: {0}")]
    InvalidImage(String),

    /// Declared features and model inputs disagree, or the data cannot be fitted.
    #[error("invalid model input: {0}")]
    InvalidModelInput(String),

    /// Malformed user input such as a dose list.
    #[error("parse error: {0}")]
    ParseError(String),

    #[error("file not found: {}", .0.display())]
    MissingFile(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("PDF error: {0}")]
    Pdf(String),
}

pub type Result<T> = std::result::Result<T, ReaderError>;

/// Map a "file not found" I/O failure on `path` to [`ReaderError::MissingFile`].
pub fn missing_or_io(path: &std::path::Path, err: std::io::Error) -> ReaderError {
    if err.kind() == std::io::ErrorKind::NotFound {
        ReaderError::MissingFile(path.to_path_buf())
    } else {
        ReaderError::Io(err)
    }
}
