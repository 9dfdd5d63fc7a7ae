//! Error types and exit codes for tugstyle.
//!
//! `TugstyleError` is the single error type the library entry points and the
//! CLI report. Errors from the other crates are bridged into it with `From`,
//! and every variant maps to a stable `OutputErrorCode`.
//!
//! ## Exit Codes
//!
//! - `0`: success
//! - `2`: invalid arguments
//! - `3`: configuration errors (unreadable or malformed XML, bad patterns)
//! - `4`: apply errors (a file could not be parsed, rewritten or written)
//! - `10`: internal errors

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tugstyle_core::ConfigError;
use tugstyle_java::{EngineError, ParserError};

/// Stable numeric codes for the process exit status and JSON errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum OutputErrorCode {
    InvalidArguments = 2,
    ConfigError = 3,
    ApplyError = 4,
    InternalError = 10,
}

impl OutputErrorCode {
    pub fn code(&self) -> u8 {
        *self as u8
    }
}

impl fmt::Display for OutputErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[derive(Debug, Error)]
pub enum TugstyleError {
    #[error("invalid arguments: {message}")]
    InvalidArguments { message: String },

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The file is not in the supported Java subset.
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ParserError,
    },

    /// A rule failed on the tree; the file is left untouched.
    #[error("rewrite failed: {0}")]
    Engine(#[from] EngineError),

    #[error("i/o error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("internal error: {message}")]
    InternalError { message: String },
}

impl From<&TugstyleError> for OutputErrorCode {
    fn from(err: &TugstyleError) -> Self {
        match err {
            TugstyleError::InvalidArguments { .. } => OutputErrorCode::InvalidArguments,
            TugstyleError::Config(_) => OutputErrorCode::ConfigError,
            TugstyleError::Parse { .. } => OutputErrorCode::ApplyError,
            TugstyleError::Io { .. } => OutputErrorCode::ApplyError,
            TugstyleError::Engine(_) => OutputErrorCode::InternalError,
            TugstyleError::InternalError { .. } => OutputErrorCode::InternalError,
        }
    }
}

impl From<TugstyleError> for OutputErrorCode {
    fn from(err: TugstyleError) -> Self {
        OutputErrorCode::from(&err)
    }
}

impl TugstyleError {
    pub fn invalid_args(message: impl Into<String>) -> Self {
        TugstyleError::InvalidArguments {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        TugstyleError::InternalError {
            message: message.into(),
        }
    }

    pub fn parse(path: impl Into<PathBuf>, source: ParserError) -> Self {
        TugstyleError::Parse {
            path: path.into(),
            source,
        }
    }

    pub fn io(path: &Path, source: io::Error) -> Self {
        TugstyleError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn error_code(&self) -> OutputErrorCode {
        OutputErrorCode::from(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_stable() {
        assert_eq!(OutputErrorCode::InvalidArguments.code(), 2);
        assert_eq!(OutputErrorCode::ConfigError.code(), 3);
        assert_eq!(OutputErrorCode::ApplyError.code(), 4);
        assert_eq!(OutputErrorCode::InternalError.code(), 10);
        assert_eq!(OutputErrorCode::ApplyError.to_string(), "4");
    }

    #[test]
    fn test_error_code_mapping() {
        assert_eq!(
            TugstyleError::invalid_args("no config").error_code(),
            OutputErrorCode::InvalidArguments
        );
        let missing = ConfigError::MissingFile {
            path: PathBuf::from("checkstyle.xml"),
        };
        assert_eq!(
            TugstyleError::from(missing).error_code(),
            OutputErrorCode::ConfigError
        );
        let io = TugstyleError::io(Path::new("A.java"), io::Error::other("disk full"));
        assert_eq!(io.error_code(), OutputErrorCode::ApplyError);
        assert_eq!(
            TugstyleError::from(EngineError::NoEnclosingScope).error_code(),
            OutputErrorCode::InternalError
        );
    }

    #[test]
    fn test_messages() {
        let err = TugstyleError::invalid_args("pass --config or --inline-config");
        assert_eq!(
            err.to_string(),
            "invalid arguments: pass --config or --inline-config"
        );
        let err = TugstyleError::from(ConfigError::MissingFile {
            path: PathBuf::from("missing.xml"),
        });
        assert_eq!(err.to_string(), "file not found: missing.xml");
    }
}
