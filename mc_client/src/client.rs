use std::{future::Future, io, time::Duration};

use tokio::{
    io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader},
    net::TcpStream,
};

use crate::{
    error::McError,
    protocol::{self, StorageVerb},
};

type Connection = BufReader<TcpStream>;

/// A single memcache connection, opened on first use.
///
/// The client is not shared: callers that want parallel traffic create one
/// client each. After an I/O failure or a timeout the connection is dropped
/// and the next call dials again.
#[derive(Debug)]
pub struct Client {
    addr: String,
    timeout: Option<Duration>,
    conn: Option<Connection>,
}

impl Client {
    pub fn new(addr: impl Into<String>) -> Self {
        Self {
            addr: addr.into(),
            timeout: None,
            conn: None,
        }
    }

    /// Deadline applied to every operation, connect included. `None` waits forever.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn is_connected(&self) -> bool {
        self.conn.is_some()
    }

    pub async fn set(&mut self, key: &str, value: &[u8]) -> Result<(), McError> {
        self.store(StorageVerb::Set, key, value).await
    }

    pub async fn add(&mut self, key: &str, value: &[u8]) -> Result<(), McError> {
        self.store(StorageVerb::Add, key, value).await
    }

    pub async fn get(&mut self, key: &str) -> Result<Vec<u8>, McError> {
        protocol::check_key(key)?;
        let command = protocol::get_command(key);

        let result = with_deadline(self.timeout, async {
            let conn = self.connection().await?;
            conn.get_mut().write_all(&command).await?;
            read_value(conn, key).await
        })
        .await;
        self.settle(result)
    }

    async fn store(&mut self, verb: StorageVerb, key: &str, value: &[u8]) -> Result<(), McError> {
        protocol::check_key(key)?;
        let command = protocol::storage_command(verb, key, value);

        let result = with_deadline(self.timeout, async {
            let conn = self.connection().await?;
            conn.get_mut().write_all(&command).await?;
            let reply = read_line(conn).await?;
            protocol::parse_store_reply(&reply)
        })
        .await;
        self.settle(result)
    }

    async fn connection(&mut self) -> Result<&mut Connection, McError> {
        let conn = match self.conn.take() {
            Some(conn) => conn,
            None => {
                tracing::debug!("Connecting to memcache at {}", self.addr);
                let stream = TcpStream::connect(&self.addr).await?;
                stream.set_nodelay(true)?;
                BufReader::new(stream)
            }
        };
        Ok(self.conn.insert(conn))
    }

    fn settle<T>(&mut self, result: Result<T, McError>) -> Result<T, McError> {
        if let Err(e) = &result {
            if !e.keeps_connection() && self.conn.take().is_some() {
                tracing::debug!("Dropping connection to {} after error: {}", self.addr, e);
            }
        }
        result
    }
}

async fn with_deadline<T, F>(timeout: Option<Duration>, operation: F) -> Result<T, McError>
where
    F: Future<Output = Result<T, McError>>,
{
    match timeout {
        Some(limit) => tokio::time::timeout(limit, operation)
            .await
            .map_err(|_| McError::Timeout(limit))?,
        None => operation.await,
    }
}

async fn read_line(conn: &mut Connection) -> Result<String, McError> {
    let mut line = String::new();
    if conn.read_line(&mut line).await? == 0 {
        return Err(io::Error::from(io::ErrorKind::UnexpectedEof).into());
    }
    let trimmed = line.trim_end_matches(['\r', '\n']).len();
    line.truncate(trimmed);
    Ok(line)
}

async fn read_value(conn: &mut Connection, key: &str) -> Result<Vec<u8>, McError> {
    let header = read_line(conn).await?;
    let Some(header) = protocol::parse_value_header(&header)? else {
        return Err(McError::CacheMiss);
    };
    if header.key != key {
        return Err(McError::Protocol(format!(
            "asked for {} but server returned {}",
            key, header.key
        )));
    }

    let framed = header
        .len
        .checked_add(2)
        .ok_or_else(|| McError::Protocol(format!("value length {} overflows", header.len)))?;
    let mut data = vec![0; framed];
    conn.read_exact(&mut data).await?;
    if !data.ends_with(b"\r\n") {
        return Err(McError::Protocol("corrupt value terminator".to_string()));
    }
    data.truncate(header.len);

    let end = read_line(conn).await?;
    if end != "END" {
        return Err(McError::Protocol(end));
    }
    Ok(data)
}
