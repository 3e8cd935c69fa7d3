//! Error types for the core library.

use thiserror::Error;

use crate::folder::FolderOperationError;
use crate::host::HostError;

/// Errors that can occur in core operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Permission or account enumeration failed; the whole run is aborted.
    #[error("Account enumeration failed: {0}")]
    Enumeration(#[source] HostError),

    /// Listing the messages of a folder failed.
    #[error("Failed to list messages in '{folder}': {source}")]
    Listing {
        /// Path of the folder being listed.
        folder: String,
        /// Underlying host error.
        #[source]
        source: HostError,
    },

    /// Folder lookup or creation failed.
    #[error(transparent)]
    FolderOperation(#[from] FolderOperationError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
