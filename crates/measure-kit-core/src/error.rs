//! Error types for measure bundle conversion

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for measure bundle conversion
#[derive(Debug, Error)]
pub enum MeasureKitError {
    /// The measure bundle is structurally unusable (empty, no measure, ...)
    #[error("Invalid measure bundle: {message}")]
    InvalidBundle { message: String },

    /// A Library has no `application/elm+json` attachment
    #[error("ELM JSON not found on {library}")]
    MissingCompiledLogic { library: String },

    /// An attachment payload could not be decoded
    #[error("Invalid {content_type} attachment on {library}: {message}")]
    InvalidAttachment {
        library: String,
        content_type: String,
        message: String,
    },

    /// JSON parse failure for an input document
    #[error("Failed to parse {path}: {message}")]
    ParseError { path: PathBuf, message: String },

    /// Configuration loading or validation errors
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// Template rendering errors
    #[error("Template error: {message}")]
    TemplateError { message: String },

    /// File system I/O errors
    #[error("IO error for path '{path}': {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Error kind enumeration for categorizing errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    Bundle,
    Library,
    Parse,
    Config,
    Template,
    Io,
}

impl MeasureKitError {
    /// Get the error kind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            MeasureKitError::InvalidBundle { .. } => ErrorKind::Bundle,
            MeasureKitError::MissingCompiledLogic { .. } => ErrorKind::Library,
            MeasureKitError::InvalidAttachment { .. } => ErrorKind::Library,
            MeasureKitError::ParseError { .. } => ErrorKind::Parse,
            MeasureKitError::ConfigError { .. } => ErrorKind::Config,
            MeasureKitError::TemplateError { .. } => ErrorKind::Template,
            MeasureKitError::IoError { .. } => ErrorKind::Io,
        }
    }

    /// Create an invalid bundle error
    pub fn invalid_bundle(message: impl Into<String>) -> Self {
        Self::InvalidBundle {
            message: message.into(),
        }
    }

    /// Create a missing compiled logic error
    pub fn missing_compiled_logic(library: impl Into<String>) -> Self {
        Self::MissingCompiledLogic {
            library: library.into(),
        }
    }

    /// Create a parse error with path context
    pub fn parse_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::ParseError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Create a template error
    pub fn template_error(message: impl Into<String>) -> Self {
        Self::TemplateError {
            message: message.into(),
        }
    }

    /// Create an IO error with path context
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::IoError {
            path: path.into(),
            source,
        }
    }
}

/// Convert from std::io::Error
impl From<std::io::Error> for MeasureKitError {
    fn from(err: std::io::Error) -> Self {
        Self::IoError {
            path: PathBuf::new(),
            source: err,
        }
    }
}
