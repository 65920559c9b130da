use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Cannot read directory {}: {source}", path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed record file {}: {message}", path.display())]
    Format { path: PathBuf, message: String },

    #[error("Remote catalog returned HTTP {status} for {url}")]
    Remote { status: u16, url: String },

    #[error("Unexpected response from {url}: {message}")]
    UnexpectedResponse { url: String, message: String },

    #[error("Remote catalog request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Failed to delete {}: {source}", path.display())]
    LocalDeletion {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl Error {
    /// Errors scoped to a single record entry. The batch logs them and moves on.
    pub fn is_item_recoverable(&self) -> bool {
        matches!(
            self,
            Error::Remote { .. }
                | Error::UnexpectedResponse { .. }
                | Error::Transport(_)
                | Error::LocalDeletion { .. }
        )
    }
}
