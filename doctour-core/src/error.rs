//! Structured error types for doctour-core.
//!
//! Library code returns `DocTourError`; the CLI wraps it in `anyhow` for
//! context chains and reporting.

use std::io;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Main error type for doctour-core operations
#[derive(Error, Debug)]
pub enum DocTourError {
    /// I/O operation failed
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },

    /// Config file could not be parsed
    #[error("Invalid TOML in {path:?}: {source}")]
    Toml {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// Configuration value rejected
    #[error("Configuration error: {reason}")]
    Config { reason: String },

    /// Driver-level failure (connect, command, cursor)
    #[error("MongoDB error: {source}")]
    Mongo {
        #[from]
        source: mongodb::error::Error,
    },

    /// Record could not be converted to or from BSON
    #[error("BSON error at {context}: {reason}")]
    Bson { context: String, reason: String },

    /// Connect deadline elapsed
    #[error("Timed out after {elapsed:?} while {action}")]
    Timeout { action: String, elapsed: Duration },

    /// A walkthrough step failed
    #[error("{step} failed: {source}")]
    Step {
        step: &'static str,
        #[source]
        source: Box<DocTourError>,
    },
}

/// Result type alias for doctour-core operations
pub type Result<T> = std::result::Result<T, DocTourError>;

impl DocTourError {
    /// Create a config error
    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config {
            reason: reason.into(),
        }
    }

    /// Create a BSON conversion error with context
    pub fn bson(context: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::Bson {
            context: context.into(),
            reason: reason.to_string(),
        }
    }

    /// Create a timeout error
    pub fn timeout(action: impl Into<String>, elapsed: Duration) -> Self {
        Self::Timeout {
            action: action.into(),
            elapsed,
        }
    }

    /// Tag an error with the walkthrough step it came from
    pub fn in_step(step: &'static str, source: DocTourError) -> Self {
        Self::Step {
            step,
            source: Box::new(source),
        }
    }

    /// Name of the failing step, if this error came from the walkthrough
    pub fn step(&self) -> Option<&'static str> {
        match self {
            Self::Step { step, .. } => Some(step),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DocTourError::config("database name is empty");
        assert_eq!(
            err.to_string(),
            "Configuration error: database name is empty"
        );

        let err = DocTourError::timeout("connecting", Duration::from_secs(30));
        assert!(err.to_string().contains("30s"));
        assert!(err.to_string().contains("connecting"));
    }

    #[test]
    fn test_step_wraps_source() {
        let err = DocTourError::in_step("insert one", DocTourError::config("boom"));
        assert_eq!(err.step(), Some("insert one"));
        assert_eq!(
            err.to_string(),
            "insert one failed: Configuration error: boom"
        );
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: DocTourError = io_err.into();

        assert!(matches!(err, DocTourError::Io { .. }));
        assert_eq!(err.step(), None);
    }
}
