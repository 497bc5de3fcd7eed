//! Framing for the memcache text protocol: the handful of commands the
//! benchmark issues and the replies it has to understand.

use crate::error::McError;

pub const MAX_KEY_LEN: usize = 250;
/// memcached's default item size limit.
pub const MAX_VALUE_LEN: usize = 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageVerb {
    Set,
    Add,
}

impl StorageVerb {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageVerb::Set => "set",
            StorageVerb::Add => "add",
        }
    }
}

/// Header line of a `get` hit: `VALUE <key> <flags> <bytes> [<cas>]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueHeader {
    pub key: String,
    pub len: usize,
}

pub fn check_key(key: &str) -> Result<(), McError> {
    if key.is_empty() || key.len() > MAX_KEY_LEN {
        return Err(McError::MalformedKey(key.to_string()));
    }
    if key.bytes().any(|b| b <= b' ' || b == 0x7f) {
        return Err(McError::MalformedKey(key.to_string()));
    }
    Ok(())
}

pub fn storage_command(verb: StorageVerb, key: &str, value: &[u8]) -> Vec<u8> {
    let header = format!("{} {} 0 0 {}\r\n", verb.as_str(), key, value.len());
    let mut buffer = Vec::with_capacity(header.len() + value.len() + 2);
    buffer.extend_from_slice(header.as_bytes());
    buffer.extend_from_slice(value);
    buffer.extend_from_slice(b"\r\n");
    buffer
}

pub fn get_command(key: &str) -> Vec<u8> {
    format!("get {}\r\n", key).into_bytes()
}

pub fn parse_store_reply(line: &str) -> Result<(), McError> {
    match line {
        "STORED" => Ok(()),
        "NOT_STORED" => Err(McError::NotStored),
        other => Err(error_reply(other)),
    }
}

/// `Ok(None)` is the `END` that terminates a miss.
pub fn parse_value_header(line: &str) -> Result<Option<ValueHeader>, McError> {
    if line == "END" {
        return Ok(None);
    }

    let parts: Vec<&str> = line.split(' ').collect();
    match parts.as_slice() {
        ["VALUE", key, flags, len] | ["VALUE", key, flags, len, _] => {
            flags
                .parse::<u32>()
                .map_err(|_| McError::Protocol(line.to_string()))?;
            let len = len
                .parse::<usize>()
                .map_err(|_| McError::Protocol(line.to_string()))?;
            if len > MAX_VALUE_LEN {
                return Err(McError::Protocol(format!(
                    "value of {} bytes exceeds {} byte limit",
                    len, MAX_VALUE_LEN
                )));
            }
            Ok(Some(ValueHeader {
                key: key.to_string(),
                len,
            }))
        }
        _ => Err(error_reply(line)),
    }
}

fn error_reply(line: &str) -> McError {
    if line == "ERROR" {
        McError::Client("nonexistent command".to_string())
    } else if let Some(msg) = line.strip_prefix("CLIENT_ERROR ") {
        McError::Client(msg.to_string())
    } else if let Some(msg) = line.strip_prefix("SERVER_ERROR ") {
        McError::Server(msg.to_string())
    } else {
        McError::Protocol(line.to_string())
    }
}
