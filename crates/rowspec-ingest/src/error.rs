use std::path::PathBuf;

use thiserror::Error;

use rowspec_model::Location;

/// Failure of a physical row source.
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("cannot open {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    /// The raw data does not fit the declared physical format, e.g. a
    /// fixed-width line with the wrong number of characters.
    #[error("{location}: {message}")]
    Malformed { location: Location, message: String },
    #[error("{0}")]
    Unsupported(String),
}
