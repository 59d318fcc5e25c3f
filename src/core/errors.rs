//! Shared error types for the detector

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for detector operations.
///
/// Scanning a token stream never fails; every variant here is raised while
/// building a detector (knowledge base, configuration) or at the I/O edges.
#[derive(Debug, Error)]
pub enum Error {
    /// The function effects table could not be loaded
    #[error("Invalid function metadata: {message}")]
    FunctionTable {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    /// Configuration file could not be parsed or failed validation
    #[error("Configuration error{}: {message}", path.as_ref().map(|p| format!(" in {}", p.display())).unwrap_or_default())]
    Config {
        message: String,
        path: Option<PathBuf>,
    },

    /// File system errors with the offending path
    #[error("File system error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Generic errors with context
    #[error("{context}: {message}")]
    WithContext { context: String, message: String },

    /// Pattern errors
    #[error(transparent)]
    Pattern(#[from] glob::PatternError),
}

impl Error {
    /// Create a function table error from a parse failure
    pub fn function_table(message: impl Into<String>, source: serde_json::Error) -> Self {
        Self::FunctionTable {
            message: message.into(),
            source: Some(source),
        }
    }

    /// Create a function table error for data that parsed but is inconsistent
    pub fn invalid_function_entry(message: impl Into<String>) -> Self {
        Self::FunctionTable {
            message: message.into(),
            source: None,
        }
    }

    /// Create a configuration error without a file
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            path: None,
        }
    }

    /// Create a configuration error tied to a file
    pub fn config_at(message: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::Config {
            message: message.into(),
            path: Some(path.into()),
        }
    }

    /// Create an I/O error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        Self::WithContext {
            context: context.into(),
            message: self.to_string(),
        }
    }
}

/// Result type alias using our error type
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_mentions_path() {
        let err = Error::config_at("unknown field `foo`", "/tmp/.side-effects.toml");
        assert_eq!(
            err.to_string(),
            "Configuration error in /tmp/.side-effects.toml: unknown field `foo`"
        );
        assert_eq!(
            Error::config("bad").to_string(),
            "Configuration error: bad"
        );
    }

    #[test]
    fn test_context_wraps_message() {
        let result: Result<()> = Err(Error::invalid_function_entry("entry `abs`"));
        let err = result.context("loading table").unwrap_err();
        assert_eq!(
            err.to_string(),
            "loading table: Invalid function metadata: entry `abs`"
        );
    }
}
