use std::fmt;

/// Result type for ccnotify-runtime operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can fail a hook invocation
#[derive(Debug)]
pub enum Error {
    /// Ledger could not be opened, read or written
    Storage(ccnotify_index::Error),

    /// Payload broke the event's field contract
    Validation(ccnotify_engine::ValidationError),

    /// Stdin was not valid JSON, or a field had the wrong type
    Parse(String),

    /// IO operation failed
    Io(std::io::Error),

    /// Configuration error
    Config(String),
}

impl Error {
    /// Storage failures drop the event: there is no retry or queue.
    pub fn is_storage_unavailable(&self) -> bool {
        matches!(self, Error::Storage(_))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Storage(err) => write!(f, "Storage unavailable: {}", err),
            Error::Validation(err) => write!(f, "Validation error: {}", err),
            Error::Parse(msg) => write!(f, "JSON decode error: {}", msg),
            Error::Io(err) => write!(f, "IO error: {}", err),
            Error::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Storage(err) => Some(err),
            Error::Validation(err) => Some(err),
            Error::Io(err) => Some(err),
            Error::Parse(_) | Error::Config(_) => None,
        }
    }
}

impl From<ccnotify_index::Error> for Error {
    fn from(err: ccnotify_index::Error) -> Self {
        Error::Storage(err)
    }
}

impl From<ccnotify_engine::ValidationError> for Error {
    fn from(err: ccnotify_engine::ValidationError) -> Self {
        Error::Validation(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Parse(err.to_string())
    }
}

impl From<ccnotify_types::Error> for Error {
    fn from(err: ccnotify_types::Error) -> Self {
        match err {
            ccnotify_types::Error::UnsupportedKind(kind) => {
                Error::Validation(ccnotify_engine::ValidationError::UnsupportedKind(kind))
            }
            ccnotify_types::Error::Json(err) => Error::Parse(err.to_string()),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Config(err.to_string())
    }
}
