//! Connection settings for an `ApiConnector`.
//!
//! A config is built once, either from a loose option map
//! (`ConnectorConfig::from_options`) or with the `with_*` builders, and is
//! never mutated by the connector afterwards. Nothing is validated here:
//! endpoint and body checks happen per call.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{ConnectorError, ConnectorResult};

pub const DEFAULT_PROTOCOL: &str = "https";
pub const DEFAULT_CONTENT_TYPE: &str = "application/json";
pub const DEFAULT_CHARSET: &str = "utf-8";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Connector configuration.
///
/// Option names from older connector setups (`connection_protocol`,
/// `api_domain`, `api_client_id`, `api_headers_token`) and camelCase
/// spellings are accepted as aliases. Keys that match no field are kept in
/// `extra` and otherwise ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectorConfig {
    /// URL scheme, e.g. `https`.
    #[serde(alias = "connection_protocol", deserialize_with = "or_default::protocol")]
    pub protocol: String,
    /// Host name; sanitized before use.
    #[serde(alias = "api_domain", deserialize_with = "or_default::empty")]
    pub domain: String,
    /// Path segment placed right after the host. May be empty.
    #[serde(deserialize_with = "or_default::empty")]
    pub prefix: String,
    /// Optional API version segment placed after the prefix.
    #[serde(with = "lenient_string")]
    pub version: Option<String>,
    /// Sent as `X-Client-Id`.
    #[serde(alias = "api_client_id", alias = "clientId", with = "lenient_string")]
    pub client_id: Option<String>,
    /// Enables `Authorization: Basic {token}`. Used verbatim, so it must be
    /// pre-encoded by the caller if the API expects base64.
    #[serde(alias = "api_headers_token", alias = "authToken", with = "lenient_string")]
    pub auth_token: Option<String>,
    #[serde(alias = "contentType", deserialize_with = "or_default::content_type")]
    pub content_type: String,
    #[serde(deserialize_with = "or_default::charset")]
    pub charset: String,
    /// Transport timeout, in whole seconds when (de)serialized.
    #[serde(with = "duration_secs")]
    pub timeout: Duration,
    /// Unrecognized options, stored for callers and never read by the engine.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        duration.as_secs().serialize(serializer)
    }

    /// `null` falls back to the default timeout.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        Ok(Option::<u64>::deserialize(deserializer)?
            .map_or(super::DEFAULT_TIMEOUT, Duration::from_secs))
    }
}

/// String options where an explicit `null` means "use the default".
mod or_default {
    use serde::{Deserialize, Deserializer};

    fn string_or<'de, D: Deserializer<'de>>(deserializer: D, default: &str) -> Result<String, D::Error> {
        Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(|| default.to_string()))
    }

    pub fn protocol<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        string_or(deserializer, super::DEFAULT_PROTOCOL)
    }

    pub fn empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        string_or(deserializer, "")
    }

    pub fn content_type<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        string_or(deserializer, super::DEFAULT_CONTENT_TYPE)
    }

    pub fn charset<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        string_or(deserializer, super::DEFAULT_CHARSET)
    }
}

/// Accepts strings, numbers and booleans (`version: 2` is common) and maps
/// `null` to `None`.
mod lenient_string {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};
    use serde_json::Value;

    pub fn serialize<S: Serializer>(value: &Option<String>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(v) => serializer.serialize_str(v),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::Null => Ok(None),
            Value::String(s) => Ok(Some(s)),
            Value::Number(n) => Ok(Some(n.to_string())),
            Value::Bool(b) => Ok(Some(b.to_string())),
            other => Err(D::Error::custom(format!("expected a scalar, got {other}"))),
        }
    }
}

impl Default for ConnectorConfig {
    fn default() -> Self {
        Self {
            protocol: DEFAULT_PROTOCOL.to_string(),
            domain: String::new(),
            prefix: String::new(),
            version: None,
            client_id: None,
            auth_token: None,
            content_type: DEFAULT_CONTENT_TYPE.to_string(),
            charset: DEFAULT_CHARSET.to_string(),
            timeout: DEFAULT_TIMEOUT,
            extra: BTreeMap::new(),
        }
    }
}

impl ConnectorConfig {
    pub fn new(protocol: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            protocol: protocol.into(),
            domain: domain.into(),
            ..Self::default()
        }
    }

    /// Build a config from a loose option map.
    ///
    /// Fails only when a recognized option has an unusable type (for example
    /// `timeout: "soon"`).
    pub fn from_options(options: Map<String, Value>) -> ConnectorResult<Self> {
        serde_json::from_value(Value::Object(options))
            .map_err(|e| ConnectorError::invalid_argument(format!("invalid configuration: {e}")))
    }

    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    #[must_use]
    pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    #[must_use]
    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    #[must_use]
    pub fn with_charset(mut self, charset: impl Into<String>) -> Self {
        self.charset = charset.into();
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Look up a passthrough option.
    pub fn extra(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }
}
