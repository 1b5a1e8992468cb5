//! Error types and handling for the airport atlas

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the airport atlas
#[derive(Error, Debug)]
pub enum AtlasError {
    /// A reference dataset file is missing
    #[error("Dataset not found: {}", .path.display())]
    DatasetNotFound { path: PathBuf },

    /// A reference dataset exists but could not be read as CSV
    #[error("Dataset error in {dataset}: {message}")]
    Dataset { dataset: String, message: String },

    /// The weather provider failed or answered with something unusable
    #[error("Upstream error{}: {message}", .status.map(|s| format!(" (HTTP {s})")).unwrap_or_default())]
    Upstream {
        status: Option<u16>,
        message: String,
    },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl AtlasError {
    /// Create a new dataset-not-found error
    pub fn dataset_not_found<P: Into<PathBuf>>(path: P) -> Self {
        Self::DatasetNotFound { path: path.into() }
    }

    /// Create a new dataset parse error
    pub fn dataset<D: Into<String>, S: Into<String>>(dataset: D, message: S) -> Self {
        Self::Dataset {
            dataset: dataset.into(),
            message: message.into(),
        }
    }

    /// Upstream answered with a non-success HTTP status
    pub fn upstream_status<S: Into<String>>(status: u16, message: S) -> Self {
        Self::Upstream {
            status: Some(status),
            message: message.into(),
        }
    }

    /// Upstream could not be reached or sent a malformed document
    pub fn upstream<S: Into<String>>(message: S) -> Self {
        Self::Upstream {
            status: None,
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// HTTP status reported by the weather provider, if any
    #[must_use]
    pub fn upstream_status_code(&self) -> Option<u16> {
        match self {
            AtlasError::Upstream { status, .. } => *status,
            _ => None,
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            AtlasError::DatasetNotFound { .. } | AtlasError::Dataset { .. } => {
                "Airport reference data is unavailable.".to_string()
            }
            AtlasError::Upstream {
                status: Some(status),
                ..
            } => format!("Weather service error: {status}"),
            AtlasError::Upstream { status: None, .. } => {
                "Unable to reach the weather service. Please try again later.".to_string()
            }
            AtlasError::Validation { message } => format!("Invalid input: {message}"),
            AtlasError::Config { .. } => {
                "Configuration error. Please check your config file.".to_string()
            }
            AtlasError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
        }
    }
}
