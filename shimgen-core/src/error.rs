//! Typed error handling for shimgen.
//!
//! Configuration problems and unresolved top-level names are fatal and
//! surface here. Unreadable headers and dangling references are not errors;
//! they are logged and the scan continues.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for shimgen operations.
#[derive(Error, Debug)]
pub enum ShimgenError {
    /// I/O error when reading the config file or walking the header tree
    #[error("I/O error at {path}: {message}")]
    Io {
        path: PathBuf,
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },

    /// Configuration file could not be parsed or is malformed
    #[error("Config error at {path}: {message}")]
    Config { path: PathBuf, message: String },

    /// The same macro name appears more than once across the macro lists
    #[error("Duplicate defines: {}", .names.join(", "))]
    DuplicateMacros { names: Vec<String> },

    /// Request is unusable (e.g. the tree root is not a directory)
    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    /// Requested top-level names that were not found anywhere in the tree
    #[error("{}", unresolved_message(.structs, .macros))]
    Unresolved {
        structs: Vec<String>,
        macros: Vec<String>,
    },

    /// Generic internal error
    #[error("Internal error: {message}")]
    Internal { message: String },
}

fn unresolved_message(structs: &[String], macros: &[String]) -> String {
    let mut parts = Vec::with_capacity(2);
    if !structs.is_empty() {
        parts.push(format!("Structs not found: {}", structs.join(", ")));
    }
    if !macros.is_empty() {
        parts.push(format!("Defines not found: {}", macros.join(", ")));
    }
    parts.join("; ")
}

impl ShimgenError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: err.to_string(),
            source: Some(err),
        }
    }

    /// Create a config error.
    pub fn config(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Config {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an invalid-request error.
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Check if this error was raised before any scanning started.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::Config { .. } | Self::DuplicateMacros { .. } | Self::InvalidRequest { .. }
        )
    }

    /// Get the path associated with this error, if any.
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::Io { path, .. } => Some(path),
            Self::Config { path, .. } => Some(path),
            _ => None,
        }
    }
}

/// Convenience type alias for shimgen results.
pub type ShimgenResult<T> = Result<T, ShimgenError>;

/// Extension trait for converting std::io::Error with path context.
pub trait IoResultExt<T> {
    /// Add path context to an I/O error.
    fn with_path(self, path: impl Into<PathBuf>) -> ShimgenResult<T>;
}

impl<T> IoResultExt<T> for std::io::Result<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> ShimgenResult<T> {
        self.map_err(|e| ShimgenError::io(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error() {
        let err = ShimgenError::io(
            PathBuf::from("/test/shim.toml"),
            std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
        );
        assert!(matches!(err, ShimgenError::Io { .. }));
        assert_eq!(err.path(), Some(&PathBuf::from("/test/shim.toml")));
        assert!(err.to_string().contains("/test/shim.toml"));
    }

    #[test]
    fn test_unresolved_lists_every_name() {
        let err = ShimgenError::Unresolved {
            structs: vec!["foo".into(), "bar".into()],
            macros: vec!["LIMIT".into()],
        };
        assert_eq!(
            err.to_string(),
            "Structs not found: foo, bar; Defines not found: LIMIT"
        );
    }

    #[test]
    fn test_unresolved_structs_only() {
        let err = ShimgenError::Unresolved {
            structs: vec!["ghost".into()],
            macros: Vec::new(),
        };
        assert_eq!(err.to_string(), "Structs not found: ghost");
    }

    #[test]
    fn test_duplicate_macros_message() {
        let err = ShimgenError::DuplicateMacros {
            names: vec!["A".into(), "B".into()],
        };
        assert_eq!(err.to_string(), "Duplicate defines: A, B");
        assert!(err.is_configuration());
    }

    #[test]
    fn test_io_result_ext() {
        let result: std::io::Result<()> =
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "missing"));
        let shim_result = result.with_path("/missing/shim.toml");
        assert!(matches!(shim_result, Err(ShimgenError::Io { .. })));
    }
}
