//! @ai:module:intent Define error types for the summarizer library
//! @ai:module:layer domain
//! @ai:module:public_api SummarizerError, Result
//! @ai:module:stateless true

use std::path::PathBuf;
use thiserror::Error;

/// @ai:intent Errors that abort a whole run (startup and table I/O)
#[derive(Error, Debug)]
pub enum SummarizerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read config file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to serialize config: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    #[error("{0} not set in environment")]
    MissingCredential(String),

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("CSV error in {path}: {source}")]
    Table {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Duplicate article id '{id}' in {path}")]
    DuplicateArticleId { path: PathBuf, id: String },
}

pub type Result<T> = std::result::Result<T, SummarizerError>;
