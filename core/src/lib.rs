//! Base client for JSON-over-HTTP APIs.
//!
//! # Overview
//! An [`ApiConnector`] assembles URLs from a configured protocol, domain,
//! prefix and version, composes headers (client id, optional Basic
//! authorization, content type and charset, then per-call overrides), runs
//! one blocking request through a [`Transport`], and normalizes whatever
//! comes back into an [`Outcome`].
//!
//! # Design
//! - [`ConnectorConfig`] is immutable once the connector exists.
//! - All verbs share one pipeline: `build_request` → `Transport::execute` →
//!   `parse_response`. The two ends are public for hosts doing their own I/O.
//! - Argument errors are `Err`; timeouts and non-JSON bodies are
//!   `Ok(Outcome::Failure)`; the HTTP status never decides the outcome.
//! - No retries, pooling guarantees, rate limiting or token refresh.
//!
//! ```rust,no_run
//! use api_connector::{ApiConnector, ConnectorConfig, QueryParams};
//!
//! let config = ConnectorConfig::new("https", "api.example.com")
//!     .with_prefix("v")
//!     .with_version("2")
//!     .with_client_id("c1");
//! let connector = ApiConnector::new(config);
//! let outcome = connector
//!     .get("product/get", &[], QueryParams::new().with("merchantId", "M1"))
//!     .unwrap();
//! println!("{outcome:?}");
//! ```

pub mod client;
pub mod config;
pub mod cookies;
pub mod error;
pub mod headers;
pub mod http;
pub mod outcome;
pub mod transport;
pub mod url;

pub use client::{ApiConnector, LastResponse, RequestSpec};
pub use config::ConnectorConfig;
pub use cookies::Cookie;
pub use error::{ConnectorError, ConnectorResult, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use outcome::{Failure, Outcome};
pub use transport::{Transport, UreqTransport};
pub use url::{sanitize, QueryParams, QueryValue};
