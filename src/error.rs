//! Error types for casegen

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// casegen errors
///
/// Every variant is fatal to a run: the pipeline never skips a malformed
/// endpoint or report entry and carries on.
#[derive(Error, Debug)]
pub enum Error {
    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Contract parse error: {0}")]
    ContractParse(String),

    #[error("unable to determine specification format")]
    UnknownDialect,

    #[error("Schema error: {0}")]
    Schema(String),

    #[error("Report parse error: {0}")]
    ReportParse(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_norway::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

/// Coarse classification of a fatal error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Contract or report file missing or unreadable
    InputAccess,
    /// File present but not parseable, or dialect undeterminable
    Format,
    /// Contract failed internal consistency checks (dangling refs, cycles)
    Schema,
}

impl Error {
    pub fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Read {
            path: path.into(),
            source,
        }
    }

    pub fn class(&self) -> ErrorClass {
        match self {
            Error::Read { .. } | Error::Io(_) => ErrorClass::InputAccess,
            Error::Schema(_) => ErrorClass::Schema,
            Error::ContractParse(_)
            | Error::UnknownDialect
            | Error::ReportParse(_)
            | Error::Config(_)
            | Error::Yaml(_)
            | Error::Json(_)
            | Error::Other(_) => ErrorClass::Format,
        }
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Other(s.to_string())
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Other(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_error_names_path() {
        let err = Error::read(
            "missing.yaml",
            std::io::Error::new(std::io::ErrorKind::NotFound, "No such file"),
        );
        assert_eq!(err.to_string(), "cannot read missing.yaml: No such file");
        assert_eq!(err.class(), ErrorClass::InputAccess);
    }

    #[test]
    fn test_classes() {
        assert_eq!(Error::UnknownDialect.class(), ErrorClass::Format);
        assert_eq!(Error::Schema("x".into()).class(), ErrorClass::Schema);
        assert_eq!(Error::ReportParse("x".into()).class(), ErrorClass::Format);
    }
}
