//! Typed error handling for deadbind.
//!
//! Library consumers can match on [`DeadbindError`] to tell "cannot analyze"
//! apart from per-item failures that only skip a single binding.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for deadbind operations.
#[derive(Error, Debug)]
pub enum DeadbindError {
    /// I/O error when reading/writing files
    #[error("I/O error at {path}: {message}")]
    Io {
        path: PathBuf,
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },

    /// The source text could not be parsed; no edits are produced.
    #[error("Parse error in {path}: {message}")]
    Parse {
        path: PathBuf,
        message: String,
        /// Line number (1-indexed) if available
        line: Option<usize>,
        /// Column number (1-indexed) if available
        column: Option<usize>,
    },

    /// Configuration file errors
    #[error("Config error at {path}: {message}")]
    Config { path: PathBuf, message: String },

    /// File extension is not one of js, jsx, ts, tsx
    #[error("Unsupported file type: {path}")]
    UnsupportedFile { path: PathBuf },

    /// Two planned edits touch the same text; the whole plan is rejected.
    #[error("Overlapping edits at {}..{} and {}..{}", first.0, first.1, second.0, second.1)]
    OverlappingEdits {
        first: (usize, usize),
        second: (usize, usize),
    },

    /// The exact source range of a declaration could not be located.
    #[error("Ambiguous range: {message}")]
    Range { message: String },

    /// Invalid argument provided
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },
}

impl DeadbindError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: err.to_string(),
            source: Some(err),
        }
    }

    /// Create a parse error without location.
    pub fn parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.into(),
            line: None,
            column: None,
        }
    }

    /// Create a parse error with line/column info.
    pub fn parse_at(
        path: impl Into<PathBuf>,
        message: impl Into<String>,
        line: usize,
        column: usize,
    ) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.into(),
            line: Some(line),
            column: Some(column),
        }
    }

    pub fn config(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Config {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn unsupported(path: impl Into<PathBuf>) -> Self {
        Self::UnsupportedFile { path: path.into() }
    }

    pub fn overlap(first: (usize, usize), second: (usize, usize)) -> Self {
        Self::OverlappingEdits { first, second }
    }

    pub fn range(message: impl Into<String>) -> Self {
        Self::Range {
            message: message.into(),
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Check if this error only affects a single item and analysis of the
    /// rest of the file can continue.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Range { .. } | Self::Config { .. })
    }

    /// Get the path associated with this error, if any.
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::Io { path, .. } => Some(path),
            Self::Parse { path, .. } => Some(path),
            Self::Config { path, .. } => Some(path),
            Self::UnsupportedFile { path } => Some(path),
            _ => None,
        }
    }
}

/// Convenience type alias for deadbind results.
pub type DeadbindResult<T> = Result<T, DeadbindError>;

/// Extension trait for converting std::io::Error with path context.
pub trait IoResultExt<T> {
    /// Add path context to an I/O error.
    fn with_path(self, path: impl Into<PathBuf>) -> DeadbindResult<T>;
}

impl<T> IoResultExt<T> for std::io::Result<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> DeadbindResult<T> {
        self.map_err(|e| DeadbindError::io(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error() {
        let err = DeadbindError::io(
            PathBuf::from("/src/app.ts"),
            std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
        );
        assert!(matches!(err, DeadbindError::Io { .. }));
        assert_eq!(err.path(), Some(&PathBuf::from("/src/app.ts")));
        assert!(err.to_string().contains("/src/app.ts"));
    }

    #[test]
    fn test_parse_error_with_location() {
        let err = DeadbindError::parse_at("/src/app.tsx", "Unexpected token", 3, 14);
        if let DeadbindError::Parse { line, column, .. } = &err {
            assert_eq!(*line, Some(3));
            assert_eq!(*column, Some(14));
        } else {
            panic!("Expected Parse error");
        }
    }

    #[test]
    fn test_overlap_message() {
        let err = DeadbindError::overlap((4, 10), (8, 12));
        assert_eq!(err.to_string(), "Overlapping edits at 4..10 and 8..12");
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_is_recoverable() {
        assert!(DeadbindError::range("no braces").is_recoverable());
        assert!(!DeadbindError::parse("/a.js", "error").is_recoverable());
        assert!(!DeadbindError::unsupported("/a.py").is_recoverable());
    }

    #[test]
    fn test_io_result_ext() {
        let result: std::io::Result<()> =
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "missing"));
        let mapped = result.with_path("/missing/file.js");
        assert!(matches!(mapped, Err(DeadbindError::Io { .. })));
    }
}
