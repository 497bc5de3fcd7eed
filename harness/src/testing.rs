use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::backend::Backend;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub op: &'static str,
    pub key: String,
    pub value: Option<String>,
}

/// Shared log of every call made by the backends it hands out.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    calls: Arc<Mutex<Vec<Call>>>,
}

impl Recorder {
    pub fn backend(&self) -> RecordingBackend {
        RecordingBackend {
            calls: self.calls.clone(),
            fail_on: Vec::new(),
            fail_all: false,
            seen: 0,
        }
    }

    /// A backend whose every call fails, as if the server were unreachable.
    pub fn unreachable(&self) -> RecordingBackend {
        RecordingBackend {
            fail_all: true,
            ..self.backend()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, op: &str) -> usize {
        self.calls().iter().filter(|c| c.op == op).count()
    }
}

#[derive(Debug)]
pub struct RecordingBackend {
    calls: Arc<Mutex<Vec<Call>>>,
    fail_on: Vec<usize>,
    fail_all: bool,
    seen: usize,
}

impl RecordingBackend {
    /// Fail the calls at these positions (0-based, counted per backend).
    pub fn failing_on(mut self, calls: &[usize]) -> Self {
        self.fail_on = calls.to_vec();
        self
    }

    fn record(&mut self, op: &'static str, key: &str, value: Option<&str>) -> Result<(), String> {
        let position = self.seen;
        self.seen += 1;
        self.calls.lock().unwrap().push(Call {
            op,
            key: key.to_string(),
            value: value.map(str::to_string),
        });
        if self.fail_all || self.fail_on.contains(&position) {
            return Err(format!("{} {} refused", op, key));
        }
        Ok(())
    }
}

#[async_trait]
impl Backend for RecordingBackend {
    type Error = String;

    async fn add(&mut self, key: &str, value: &str) -> Result<(), String> {
        self.record("add", key, Some(value))
    }

    async fn set(&mut self, key: &str, value: &str) -> Result<(), String> {
        self.record("set", key, Some(value))
    }

    async fn get(&mut self, key: &str) -> Result<Vec<u8>, String> {
        self.record("get", key, None)?;
        Ok(format!("{}-payload", key).into_bytes())
    }
}
