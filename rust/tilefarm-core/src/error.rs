// rust/tilefarm-core/src/error.rs

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TilefarmError {

    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("I/O error at '{path}': {message}")]
    Io {
        path: PathBuf,
        message: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Unknown operation for path '{path}'")]
    UnknownOperation {
        path: String,
    },

    #[error("Invalid tile id '{raw}'")]
    InvalidTileId {
        raw: String,
    },

    #[error("Malformed tile assignment: '{body}'")]
    MalformedAssignment {
        body: String,
    },

    #[error("Coordinator client error: {message}")]
    Client {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

pub type Result<T> = std::result::Result<T, TilefarmError>;

// Convenience constructors
impl TilefarmError {

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            source: None,
        }
    }

    pub fn config_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Config {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn io(path: impl Into<PathBuf>, message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: message.into(),
            source,
        }
    }

    pub fn unknown_operation(path: impl Into<String>) -> Self {
        Self::UnknownOperation { path: path.into() }
    }

    pub fn invalid_tile_id(raw: impl Into<String>) -> Self {
        Self::InvalidTileId { raw: raw.into() }
    }

    pub fn malformed_assignment(body: impl Into<String>) -> Self {
        Self::MalformedAssignment { body: body.into() }
    }

    pub fn client(message: impl Into<String>) -> Self {
        Self::Client {
            message: message.into(),
            source: None,
        }
    }

    pub fn client_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Client {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Whether this error is a protocol fault raised by a malformed request.
    pub fn is_protocol_fault(&self) -> bool {
        matches!(self, Self::UnknownOperation { .. } | Self::InvalidTileId { .. })
    }
}
