use thiserror::Error; // Use thiserror for cleaner error definitions

use crate::config::ConfigError;

// --- Domain/Infrastructure Errors ---

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Store file '{path}' does not hold a JSON object: {source}")]
    Corrupt {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Storage backend error: {0}")]
    BackendError(#[from] anyhow::Error), // Wrap Anyhow errors from the storage layer
}

#[derive(Error, Debug)]
pub enum RepoError {
    #[error("Could not encode record for key '{key}': {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Record store error: {0}")]
    Storage(#[from] StorageError),
}

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Meme API request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Meme API reported failure: {0}")]
    Unsuccessful(String),

    #[error("Malformed meme API response: {0}")]
    Decode(#[from] serde_json::Error),
}

// --- Front End Error ---

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Meme not found: {0}")]
    MemeNotFound(String),

    #[error("Could not save meme data")]
    RepositoryError(#[source] RepoError), // Source allows seeing underlying RepoError

    #[error("Configuration error: {0}")]
    ConfigError(#[from] ConfigError),

    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        tracing::error!(error.source = ?err, "Repository error occurred");
        AppError::RepositoryError(err)
    }
}
