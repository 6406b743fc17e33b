use std::io;
use std::path::PathBuf;

use payroll_core::StoreError;
use thiserror::Error;

/// Errors that can occur when loading employee payloads.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),

    /// The document parsed but is not a list of employees.
    #[error("payload must be a JSON array of employees, got {found}")]
    NotAnArray { found: &'static str },

    #[error("cannot read '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot tell the payload format of '{}' (expected a .json or .csv file)", .0.display())]
    UnknownFormat(PathBuf),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}
