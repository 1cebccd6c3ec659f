//! Error types for wikiharvest.
//!
//! Library crates use [`WikiHarvestError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all wikiharvest operations.
#[derive(Debug, thiserror::Error)]
pub enum WikiHarvestError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Network/HTTP failure or an undecodable API response.
    #[error("transport error: {0}")]
    Transport(String),

    /// The render endpoint returned no parse result for the title.
    #[error("missing parse output for page: {title}{}", info_suffix(.info))]
    MissingPage {
        title: String,
        info: Option<String>,
    },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Output serialization error.
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Data validation error (bad URL, empty user agent, etc.).
    #[error("validation error: {message}")]
    Validation { message: String },
}

fn info_suffix(info: &Option<String>) -> String {
    info.as_deref().map(|i| format!(" ({i})")).unwrap_or_default()
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, WikiHarvestError>;

impl WikiHarvestError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a transport error from any displayable message.
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Create a missing-page error, keeping the API's explanation if it sent one.
    pub fn missing_page(title: impl Into<String>, info: Option<String>) -> Self {
        Self::MissingPage {
            title: title.into(),
            info,
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
