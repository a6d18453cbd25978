//! Error handling types.
//!
//! Four kinds, matching the propagation policy: binder errors always abort a
//! run; I/O and parse errors are tolerable per-file under `ignore_errors`;
//! internal errors are always fatal.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("{0}")]
    Binder(String),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path:?} as {language}: {reason}")]
    Parse {
        path: Option<PathBuf>,
        language: String,
        reason: String,
    },

    #[error("internal invariant violated: {0}")]
    Internal(String),
}

impl EngineError {
    pub fn binder(message: impl Into<String>) -> Self {
        EngineError::Binder(message.into())
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        EngineError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn parse(path: Option<PathBuf>, language: impl Into<String>, reason: impl Into<String>) -> Self {
        EngineError::Parse {
            path,
            language: language.into(),
            reason: reason.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        EngineError::Internal(message.into())
    }

    /// Whether this error kind may be swallowed per-file under `ignore_errors`.
    pub fn is_tolerable(&self) -> bool {
        matches!(self, EngineError::Io { .. } | EngineError::Parse { .. })
    }
}

pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binder_errors_are_not_tolerable() {
        let err = EngineError::binder("wrong argument count");
        assert!(!err.is_tolerable());
    }

    #[test]
    fn internal_errors_are_not_tolerable() {
        let err = EngineError::internal("taxonomy code not a multiple of 4");
        assert!(!err.is_tolerable());
    }

    #[test]
    fn io_and_parse_errors_are_tolerable() {
        let io_err = EngineError::io(
            "missing.py",
            std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        );
        assert!(io_err.is_tolerable());

        let parse_err = EngineError::parse(Some(PathBuf::from("a.rs")), "rust", "no parser");
        assert!(parse_err.is_tolerable());
    }

    #[test]
    fn display_mentions_offending_path() {
        let err = EngineError::io(
            "missing.py",
            std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        );
        let message = err.to_string();
        assert!(message.contains("missing.py"));
    }
}
