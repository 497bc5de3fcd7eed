use std::fmt;

use async_trait::async_trait;
use mc_client::{Client, McError};

/// The remote store a worker drives. Each worker owns its backend outright,
/// so implementations never need interior locking.
#[async_trait]
pub trait Backend: Send {
    type Error: fmt::Display + Send;

    async fn add(&mut self, key: &str, value: &str) -> Result<(), Self::Error>;
    async fn set(&mut self, key: &str, value: &str) -> Result<(), Self::Error>;
    async fn get(&mut self, key: &str) -> Result<Vec<u8>, Self::Error>;
}

#[async_trait]
impl Backend for Client {
    type Error = McError;

    async fn add(&mut self, key: &str, value: &str) -> Result<(), McError> {
        Client::add(self, key, value.as_bytes()).await
    }

    async fn set(&mut self, key: &str, value: &str) -> Result<(), McError> {
        Client::set(self, key, value.as_bytes()).await
    }

    async fn get(&mut self, key: &str) -> Result<Vec<u8>, McError> {
        Client::get(self, key).await
    }
}
