//! Normalized call results.
//!
//! Every response that comes back from the server, and every timeout, ends
//! up as an [`Outcome`]. Only JSON decodability decides between `Success`
//! and `Failure`; the HTTP status does not, so a 404 with a JSON error
//! document is a `Success` carrying that document.

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Status string used for every engine-generated failure.
pub const FAILURE_STATUS: &str = "400";
pub const TIMEOUT_MESSAGE: &str = "request timeout";
const PARSE_FAILURE_PREFIX: &str = "failed to parse JSON: ";

/// A structured failure description.
///
/// Serializes as `{"status": "...", "message": "..."}`.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("{status}: {message}")]
pub struct Failure {
    pub status: String,
    pub message: String,
}

impl Failure {
    pub fn new(status: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            message: message.into(),
        }
    }

    pub fn timeout() -> Self {
        Self::new(FAILURE_STATUS, TIMEOUT_MESSAGE)
    }

    /// The raw body is carried in the message for diagnosis.
    pub fn unparsable(body: &str) -> Self {
        Self::new(FAILURE_STATUS, format!("{PARSE_FAILURE_PREFIX}{body}"))
    }
}

/// The result of a call: a decoded JSON payload or a failure description.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Outcome {
    Success(Value),
    Failure(Failure),
}

impl Outcome {
    /// Decode a raw response body.
    pub fn from_body(body: &str) -> Self {
        match serde_json::from_str(body) {
            Ok(value) => Outcome::Success(value),
            Err(_) => Outcome::Failure(Failure::unparsable(body)),
        }
    }

    pub fn timeout() -> Self {
        Outcome::Failure(Failure::timeout())
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    pub fn value(&self) -> Option<&Value> {
        match self {
            Outcome::Success(value) => Some(value),
            Outcome::Failure(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&Failure> {
        match self {
            Outcome::Success(_) => None,
            Outcome::Failure(failure) => Some(failure),
        }
    }

    pub fn into_result(self) -> Result<Value, Failure> {
        match self {
            Outcome::Success(value) => Ok(value),
            Outcome::Failure(failure) => Err(failure),
        }
    }
}
