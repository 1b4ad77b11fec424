//! Error types for configuration loading

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read (missing, permissions, other I/O fault)
    #[error("Failed to read configuration {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file is not a well-formed configuration document
    #[error("Failed to parse configuration {origin}: {source}")]
    Parse {
        origin: String,
        #[source]
        source: figment::Error,
    },

    /// A different snapshot has already been published for this process
    #[error("Configuration already published; refusing to replace it with a different snapshot from {origin}")]
    AlreadyPublished { origin: String },
}

/// Result type alias for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;
