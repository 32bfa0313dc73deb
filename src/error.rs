//! Error types for Hoard
//!
//! All modules use `HoardResult<T>` as their return type.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for Hoard operations
pub type HoardResult<T> = Result<T, HoardError>;

/// Coarse classification of storage faults
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Target file or record absent
    NotFound,
    /// Content exceeds a configured ceiling
    Oversize,
    /// Permission, disk or transient filesystem failure
    Io,
    /// On-disk data failed to parse
    Corrupt,
    /// Caller supplied something unusable
    Invalid,
}

/// All errors that can occur in Hoard
#[derive(Error, Debug)]
pub enum HoardError {
    // Storage errors
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    #[error("{path} exceeds its size limit ({size} > {limit})")]
    Oversize {
        path: PathBuf,
        size: u64,
        limit: u64,
    },

    #[error("Corrupt content in {path}: {reason}")]
    Corrupt { path: PathBuf, reason: String },

    #[error("Invalid cache entry name: {0}")]
    InvalidName(String),

    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Failed to create config directory {path}: {source}")]
    ConfigDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    // General errors
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("{0}")]
    User(String),
}

impl HoardError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a corrupt-content error
    pub fn corrupt(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::Corrupt {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Classify the error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound => {
                ErrorKind::NotFound
            }
            Self::Oversize { .. } => ErrorKind::Oversize,
            Self::Corrupt { .. } | Self::Json(_) | Self::TomlParse(_) => ErrorKind::Corrupt,
            Self::ConfigInvalid { .. } => ErrorKind::Corrupt,
            Self::InvalidName(_) | Self::User(_) => ErrorKind::Invalid,
            Self::Io { .. }
            | Self::ConfigDirCreate { .. }
            | Self::TomlSerialize(_)
            | Self::Internal(_) => ErrorKind::Io,
        }
    }

    /// Whether the failure just means "nothing there yet"
    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }

    /// Check if error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(self.kind(), ErrorKind::Io)
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self.kind() {
            ErrorKind::Io => Some("Please retry, or contact the operator if this keeps happening"),
            ErrorKind::Corrupt => Some("The file was edited outside hoard; restore it from a backup"),
            ErrorKind::Oversize => Some("Raise the configured size limit or remove old records"),
            ErrorKind::NotFound | ErrorKind::Invalid => None,
        }
    }
}
