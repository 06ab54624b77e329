//! Error types for config merging.

use std::path::PathBuf;

/// Errors that can occur while merging into a config file.
///
/// Each variant names the step that failed. The config file on disk is
/// never modified when any of these is returned.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("No Tailwind config found in {}: tried {}", .root.display(), .tried.join(", "))]
    ConfigNotFound { root: PathBuf, tried: Vec<String> },

    #[error("Failed to read {}: {source}", .path.display())]
    ConfigReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {}: {message}", .path.display())]
    ConfigParseError { path: PathBuf, message: String },

    #[error("Failed to write {}: {source}", .path.display())]
    ConfigWriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid merge patch: {0}")]
    PatchError(String),
}

impl ConfigError {
    /// Build a parse error for a file.
    pub(crate) fn parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        ConfigError::ConfigParseError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Attach a path to a parse error produced by the pure transform.
    pub(crate) fn with_path(self, path: &std::path::Path) -> Self {
        match self {
            ConfigError::ConfigParseError { message, .. } => ConfigError::ConfigParseError {
                path: path.to_path_buf(),
                message,
            },
            other => other,
        }
    }
}
