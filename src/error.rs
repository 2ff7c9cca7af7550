use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the movie library and its backing document
#[derive(Error, Debug)]
pub enum LibraryError {
    #[error("File '{}' not found or unreadable: {source}", path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Malformed movie document '{}': {source}", path.display())]
    Deserialization {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Movie was not found")]
    RecordNotFound { title: String },

    #[error("The collection is empty")]
    EmptyCollection,

    #[error("Failed to write '{}': {source}", path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Result type alias for library operations
pub type Result<T> = std::result::Result<T, LibraryError>;
