use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DataError {
    #[error("failed to open dataset {path:?}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("malformed dataset row: {0}")]
    Malformed(#[from] csv::Error),

    #[error("required column '{0}' not found in dataset header")]
    MissingColumn(String),

    #[error("country '{0}' has no entry in the location index")]
    UnknownCountry(String),
}
