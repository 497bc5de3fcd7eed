use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("test method not supported!")]
    UnsupportedMode(String),

    #[error("concurrency must be greater than 0")]
    ZeroConcurrency,
}

#[derive(Debug, Error)]
pub enum RunLogError {
    #[error("cannot open log file {path:?}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },
}
