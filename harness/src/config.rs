use std::{fmt, str::FromStr, time::Duration};

use crate::error::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Write-mode: every operation is a `set` on the topic key.
    Push,
    /// Read-mode: every operation is a `get` on the `topic/line` key.
    Pop,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Push => "push",
            Mode::Pop => "pop",
        }
    }

    /// Backend operation issued in this mode, used as the log prefix.
    pub fn verb(&self) -> &'static str {
        match self {
            Mode::Push => "set",
            Mode::Pop => "get",
        }
    }
}

impl FromStr for Mode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "push" => Ok(Mode::Push),
            "pop" => Ok(Mode::Pop),
            other => Err(ConfigError::UnsupportedMode(other.to_string())),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything one benchmark run needs. Built once at startup and shared
/// read-only with the dispatcher and its workers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub host: String,
    pub port: u16,
    pub concurrency: usize,
    pub count: usize,
    pub mode: Mode,
    pub topic: String,
    pub line: String,
    /// Per-operation deadline. `None` means backend calls may block forever.
    pub op_timeout: Option<Duration>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 11211,
            concurrency: 10,
            count: 10_000,
            mode: Mode::Push,
            topic: "StressTestTool".to_string(),
            line: "Line".to_string(),
            op_timeout: None,
        }
    }
}

impl RunConfig {
    pub fn validate(self) -> Result<Self, ConfigError> {
        if self.concurrency == 0 {
            return Err(ConfigError::ZeroConcurrency);
        }
        Ok(self)
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn write_key(&self) -> &str {
        &self.topic
    }

    pub fn read_key(&self) -> String {
        format!("{}/{}", self.topic, self.line)
    }

    /// Key every worker targets in the configured mode.
    pub fn key(&self) -> String {
        match self.mode {
            Mode::Push => self.write_key().to_string(),
            Mode::Pop => self.read_key(),
        }
    }

    /// Operations per worker. The remainder of `count / concurrency` is dropped.
    pub fn per_worker(&self) -> usize {
        self.count / self.concurrency
    }

    pub fn attempted(&self) -> usize {
        self.per_worker() * self.concurrency
    }
}
