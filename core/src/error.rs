//! Error types for the connector.
//!
//! # Design
//! Only problems the caller can act on surface as `ConnectorError`. Response
//! level trouble (timeouts, bodies that are not JSON) is folded into
//! `Outcome::Failure` by the engine instead, so a reachable-but-unhappy
//! server never shows up here. Faults below HTTP (DNS, refused connections,
//! TLS) are not normalized and arrive as `Transport`.

use thiserror::Error;

/// Result type alias for connector operations.
pub type ConnectorResult<T> = Result<T, ConnectorError>;

/// Errors returned by `ApiConnector`.
#[derive(Error, Debug)]
pub enum ConnectorError {
    /// Caller supplied a blank endpoint, no method, or an empty body for a
    /// verb that needs one. Raised before any I/O.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The transport failed below the HTTP layer.
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The request body could not be encoded as JSON.
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ConnectorError {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }
}

/// Errors reported by a `Transport` implementation.
///
/// The engine turns `Timeout` into a failure outcome and `Other` into
/// `ConnectorError::Transport`.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("request timeout")]
    Timeout,

    #[error("{0}")]
    Other(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl TransportError {
    pub fn other<E>(err: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self::Other(err.into())
    }
}
