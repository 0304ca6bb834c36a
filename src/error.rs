use std::path::PathBuf;
use thiserror::Error;

/// Infera error types
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Config validation error: {0}")]
    ConfigValidation(String),

    #[error("Archive not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to extract {path}: {message}")]
    Extraction { path: PathBuf, message: String },

    #[error("Scan error at {path}: {source}")]
    Scan {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Upload not found: {0}")]
    UploadNotFound(u64),

    #[error("Invalid upload: {0}")]
    InvalidUpload(String),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for Infera operations
pub type Result<T> = std::result::Result<T, Error>;

impl From<walkdir::Error> for Error {
    fn from(err: walkdir::Error) -> Self {
        let path = err.path().map(PathBuf::from).unwrap_or_default();
        let source = err
            .into_io_error()
            .unwrap_or_else(|| std::io::Error::other("filesystem loop detected"));
        Error::Scan { path, source }
    }
}

impl Error {
    /// Create a config validation error
    pub fn config_validation(msg: impl Into<String>) -> Self {
        Error::ConfigValidation(msg.into())
    }

    /// Create an extraction error
    pub fn extraction(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Error::Extraction {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a scan error
    pub fn scan(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Scan {
            path: path.into(),
            source,
        }
    }

    /// Create an invalid upload error
    pub fn invalid_upload(msg: impl Into<String>) -> Self {
        Error::InvalidUpload(msg.into())
    }

    /// Create a generic error
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// HTTP-style status code used when the error is reported in an envelope
    pub fn status_code(&self) -> u16 {
        match self {
            Error::NotFound(_) | Error::UploadNotFound(_) => 404,
            Error::InvalidUpload(_) | Error::ConfigValidation(_) => 400,
            _ => 500,
        }
    }
}
