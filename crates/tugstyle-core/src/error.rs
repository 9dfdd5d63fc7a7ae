//! Error types for configuration loading.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading a Checkstyle configuration or a
/// suppressions file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A referenced file does not exist.
    #[error("file not found: {}", path.display())]
    MissingFile { path: PathBuf },

    /// Reading a file failed.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The document is not well-formed XML.
    #[error("malformed XML: {0}")]
    Xml(#[from] roxmltree::Error),

    /// The document is XML but not a Checkstyle document.
    #[error("unexpected document structure: {0}")]
    Structure(String),

    /// A `${name}` reference has no value.
    #[error("property ${{{name}}} has not been set")]
    UnresolvedProperty { name: String },

    /// A suppression pattern is not a valid regular expression.
    #[error("invalid pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// An exclude glob could not be compiled.
    #[error("invalid glob '{pattern}': {message}")]
    InvalidGlob { pattern: String, message: String },
}

impl ConfigError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        if source.kind() == io::ErrorKind::NotFound {
            ConfigError::MissingFile { path }
        } else {
            ConfigError::Io { path, source }
        }
    }
}
