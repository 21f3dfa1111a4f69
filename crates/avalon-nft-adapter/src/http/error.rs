/*
[INPUT]:  Error sources (login service, key import, JSON-RPC, contract reads, metadata HTTP)
[OUTPUT]: Structured error types with context and retry hints
[POS]:    Error handling layer - unified error types for entire crate
[UPDATE]: When adding new error sources or improving error messages
*/

use std::time::Duration;

use alloy_primitives::U256;
use reqwest::StatusCode;
use thiserror::Error;

use crate::http::RetryConfig;

/// Main error type for the Avalon adapter
#[derive(Error, Debug)]
pub enum AvalonError {
    /// Hosted login was cancelled, rejected or unreachable
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// Delegated login used before its one-time setup finished
    #[error("Login service is not initialized, call init() first")]
    NotInitialized,

    /// Private key is malformed (length, charset or curve range)
    #[error("Invalid private key: {0}")]
    InvalidKey(String),

    /// The session behind this provider was logged out or replaced
    #[error("Provider session is no longer valid, please connect again")]
    ProviderInvalidated,

    /// A contract read failed (transport, revert or ABI decode)
    #[error("Contract call {method} failed: {message}")]
    ContractCall { method: String, message: String },

    /// The contract reported that the token does not exist
    #[error("Token {token_id} does not exist")]
    TokenNotFound { token_id: U256 },

    /// Metadata document could not be fetched or was not JSON
    #[error("Metadata fetch from {url} failed: {message}")]
    MetadataFetch {
        url: String,
        message: String,
        transient: bool,
    },

    /// Metadata document is JSON but lacks a usable `image`
    #[error("Metadata at {url} is malformed: {message}")]
    MetadataShape { url: String, message: String },

    /// JSON-RPC endpoint returned an error object or a non-2xx status
    #[error("RPC error (code {code}): {message}")]
    Rpc {
        code: i64,
        message: String,
        data: Option<serde_json::Value>,
    },

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization/deserialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Invalid response from server
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Request timeout
    #[error("Request timed out after {duration_ms}ms")]
    Timeout { duration_ms: u64 },

    /// Local failure that is not caused by the caller's input
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AvalonError {
    /// Check if the error is worth retrying.
    ///
    /// Only transient metadata fetches qualify; chain reads and login
    /// failures surface immediately.
    pub fn is_retryable(&self) -> bool {
        matches!(self, AvalonError::MetadataFetch { transient: true, .. })
    }

    /// Delay before retrying after `attempt` failed attempts, if a retry is allowed
    pub fn retry_delay(&self, retry: &RetryConfig, attempt: u32) -> Option<Duration> {
        if self.is_retryable() && attempt < retry.max_retries {
            Some(retry.backoff(attempt))
        } else {
            None
        }
    }

    /// Check if error means the caller has to (re)connect
    pub fn is_session_error(&self) -> bool {
        matches!(
            self,
            AvalonError::Authentication { .. }
                | AvalonError::NotInitialized
                | AvalonError::ProviderInvalidated
        )
    }

    /// Create an RPC error from a non-success HTTP status
    pub fn rpc_status(status: StatusCode, message: impl Into<String>) -> Self {
        AvalonError::Rpc {
            code: i64::from(status.as_u16()),
            message: message.into(),
            data: None,
        }
    }

    /// Create a metadata fetch error from a non-success HTTP status.
    ///
    /// 429 and 5xx are transient, every other status is final.
    pub fn metadata_status(url: impl Into<String>, status: StatusCode) -> Self {
        AvalonError::MetadataFetch {
            url: url.into(),
            message: format!("unexpected HTTP status {status}"),
            transient: status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS,
        }
    }
}

/// Result type alias for Avalon operations
pub type Result<T> = std::result::Result<T, AvalonError>;
