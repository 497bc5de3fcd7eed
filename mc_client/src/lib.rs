mod client;
pub mod error;
pub mod protocol;

pub use client::Client;
pub use error::McError;
