use std::collections::BTreeMap;
use std::fmt;

use weaviate_mcp_core::NonFiniteNumber;

/// Tag of a [`ClientError`], with the stable code shown to tool callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    RateLimit,
    Authentication,
    NotFound,
    Validation,
    Schema,
    Transport,
}

impl ErrorKind {
    pub fn code(self) -> &'static str {
        match self {
            ErrorKind::RateLimit => "RATE_LIMIT_ERROR",
            ErrorKind::Authentication => "AUTHENTICATION_ERROR",
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::Validation => "VALIDATION_ERROR",
            ErrorKind::Schema => "SCHEMA_ERROR",
            ErrorKind::Transport => "WEAVIATE_ERROR",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

const RETRYABLE_HINTS: [&str; 5] = ["network", "timeout", "timed out", "connect", "econnrefused"];

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Rate limit exceeded, retry after {retry_after} seconds")]
    RateLimit { retry_after: u64 },

    #[error("{message}")]
    Authentication { status: Option<u16>, message: String },

    #[error("{message}")]
    NotFound { message: String },

    #[error("Validation failed: {message}")]
    Validation {
        message: String,
        fields: BTreeMap<String, String>,
    },

    #[error("Schema error: {message}")]
    Schema { status: Option<u16>, message: String },

    #[error("Weaviate request failed: {message}")]
    Transport { status: Option<u16>, message: String },
}

impl ClientError {
    pub fn validation(message: impl Into<String>, fields: BTreeMap<String, String>) -> Self {
        ClientError::Validation {
            message: message.into(),
            fields,
        }
    }

    pub fn schema(status: Option<u16>, message: impl Into<String>) -> Self {
        ClientError::Schema {
            status,
            message: message.into(),
        }
    }

    pub(crate) fn transport(status: Option<u16>, message: impl Into<String>) -> Self {
        ClientError::Transport {
            status,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientError::RateLimit { .. } => ErrorKind::RateLimit,
            ClientError::Authentication { .. } => ErrorKind::Authentication,
            ClientError::NotFound { .. } => ErrorKind::NotFound,
            ClientError::Validation { .. } => ErrorKind::Validation,
            ClientError::Schema { .. } => ErrorKind::Schema,
            ClientError::Transport { .. } => ErrorKind::Transport,
        }
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            ClientError::RateLimit { .. } => Some(429),
            ClientError::NotFound { .. } => Some(404),
            ClientError::Validation { .. } => None,
            ClientError::Authentication { status, .. }
            | ClientError::Schema { status, .. }
            | ClientError::Transport { status, .. } => *status,
        }
    }

    /// Rate limits are always retryable. Transport failures are judged by
    /// their message, which is a heuristic.
    pub fn is_retryable(&self) -> bool {
        match self {
            ClientError::RateLimit { .. } => true,
            ClientError::Transport { message, .. } => {
                let message = message.to_lowercase();
                RETRYABLE_HINTS.iter().any(|hint| message.contains(hint))
            }
            _ => false,
        }
    }

    pub fn retry_after(&self) -> Option<u64> {
        match self {
            ClientError::RateLimit { retry_after } => Some(*retry_after),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        // reqwest keeps the useful part ("Connection refused", ...) in the
        // source chain
        let mut message = err.to_string();
        let mut source = std::error::Error::source(&err);
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        ClientError::transport(err.status().map(|s| s.as_u16()), message)
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::transport(None, format!("Invalid JSON: {}", err))
    }
}

impl From<NonFiniteNumber> for ClientError {
    fn from(err: NonFiniteNumber) -> Self {
        let mut fields = BTreeMap::new();
        fields.insert(err.field.to_string(), err.to_string());
        ClientError::validation("Invalid search parameters", fields)
    }
}
