//! Ports between the use cases and the outside world.

use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SecretKey {
    Token,
    Username,
}

impl SecretKey {
    pub const ALL: [SecretKey; 2] = [SecretKey::Token, SecretKey::Username];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Token => "token",
            Self::Username => "username",
        }
    }
}

#[derive(Debug, Error)]
pub enum SecretStoreError {
    #[error("secret store i/o failed at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("secret store at {path} is unreadable: {details}")]
    Corrupt { path: PathBuf, details: String },
}

/// Persistent key-value storage for the session secrets.
#[async_trait]
pub trait SecretStore: Send + Sync {
    async fn get(&self, key: SecretKey) -> Result<Option<String>, SecretStoreError>;
    async fn set(&self, key: SecretKey, value: &str) -> Result<(), SecretStoreError>;
    /// Deleting a missing key is not an error.
    async fn delete(&self, key: SecretKey) -> Result<(), SecretStoreError>;
}

/// Source-level failure of a call to the chat service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// 401 or 403.
    #[error("request was not authorized")]
    Unauthorized,
    /// 409.
    #[error("request conflicts with existing data")]
    Conflict,
    #[error("unexpected status {0}")]
    Status(u16),
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("invalid response payload: {0}")]
    InvalidData(String),
}

/// Coarse classification of every user-facing failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Rejected locally before any request was sent.
    Validation,
    /// Login or registration refused by the server.
    Authentication,
    /// Missing token or ownership for an authoring action.
    Authorization,
    /// Network failure, unexpected status, bad payload, or local storage failure.
    Transport,
}
