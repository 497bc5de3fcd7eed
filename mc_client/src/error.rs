use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum McError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("operation timed out after {0:?}")]
    Timeout(Duration),

    #[error("cache miss")]
    CacheMiss,

    #[error("item not stored")]
    NotStored,

    #[error("malformed key: {0:?}")]
    MalformedKey(String),

    #[error("server error: {0}")]
    Server(String),

    #[error("client error: {0}")]
    Client(String),

    #[error("unexpected response: {0:?}")]
    Protocol(String),
}

impl McError {
    /// Whether the connection is still usable after this error.
    pub fn keeps_connection(&self) -> bool {
        matches!(
            self,
            McError::CacheMiss
                | McError::NotStored
                | McError::MalformedKey(_)
                | McError::Server(_)
                | McError::Client(_)
        )
    }
}
