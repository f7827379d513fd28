//! Request engine.
//!
//! # Design
//! Every verb funnels into [`ApiConnector::call`], which runs one pipeline:
//! `build_request` (validate, assemble URL, compose headers, encode body),
//! `Transport::execute`, then `parse_response` (snapshot metadata, decode
//! JSON). `build_request` and `parse_response` are public so a host that
//! performs its own I/O gets identical URLs, headers and outcomes.
//!
//! The last-response snapshot is diagnostic state only. Concurrent calls on
//! one connector overwrite it in whatever order they finish.

use std::sync::{Mutex, PoisonError};

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, instrument, trace, warn};
use uuid::Uuid;

use crate::config::ConnectorConfig;
use crate::cookies::{cookie_jar, cookie_pairs, Cookie};
use crate::error::{ConnectorError, ConnectorResult, TransportError};
use crate::headers::compose_headers;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::outcome::Outcome;
use crate::transport::{Transport, UreqTransport};
use crate::url::{build_url, sanitize, QueryParams};

/// One call, before it is built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestSpec {
    /// `None` is rejected by `build_request`.
    pub method: Option<HttpMethod>,
    pub endpoint: String,
    /// Rendered into the URL for GET and DELETE, ignored otherwise.
    pub query_params: QueryParams,
    /// Sent as JSON for POST, PUT and PATCH, ignored otherwise.
    pub body: Option<Value>,
    /// Applied after every default header.
    pub header_overrides: Vec<(String, String)>,
}

impl RequestSpec {
    pub fn new(method: HttpMethod, endpoint: impl Into<String>) -> Self {
        Self {
            method: Some(method),
            endpoint: endpoint.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_query(mut self, query_params: QueryParams) -> Self {
        self.query_params = query_params;
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.header_overrides.push((name.into(), value.into()));
        self
    }

    #[must_use]
    pub fn with_headers(mut self, headers: &[(&str, &str)]) -> Self {
        self.header_overrides
            .extend(headers.iter().map(|(k, v)| (k.to_string(), v.to_string())));
        self
    }
}

/// Snapshot of the most recent response a connector received.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LastResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    /// Name/value pairs from `Set-Cookie`.
    pub cookies: Vec<(String, String)>,
    pub cookie_jar: Vec<Cookie>,
    /// The request that produced this response.
    pub request: HttpRequest,
    pub body: String,
}

/// Base client for a JSON-over-HTTP API.
///
/// Holds an immutable [`ConnectorConfig`] and a [`Transport`]. Calls block
/// until the transport returns or times out.
#[derive(Debug)]
pub struct ApiConnector<T = UreqTransport> {
    config: ConnectorConfig,
    transport: T,
    last_response: Mutex<Option<LastResponse>>,
}

impl ApiConnector<UreqTransport> {
    /// Connector using the blocking `ureq` transport with the configured
    /// timeout.
    pub fn new(config: ConnectorConfig) -> Self {
        let transport = UreqTransport::new(config.timeout);
        Self::with_transport(config, transport)
    }

    /// Connector from a loose option map; see [`ConnectorConfig::from_options`].
    pub fn from_options(options: Map<String, Value>) -> ConnectorResult<Self> {
        Ok(Self::new(ConnectorConfig::from_options(options)?))
    }
}

impl<T: Transport> ApiConnector<T> {
    pub fn with_transport(config: ConnectorConfig, transport: T) -> Self {
        Self {
            config,
            transport,
            last_response: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &ConnectorConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// GET `endpoint` with `query_params` in the query string.
    pub fn get(
        &self,
        endpoint: &str,
        headers: &[(&str, &str)],
        query_params: QueryParams,
    ) -> ConnectorResult<Outcome> {
        self.call(
            RequestSpec::new(HttpMethod::Get, endpoint)
                .with_headers(headers)
                .with_query(query_params),
        )
    }

    /// DELETE `endpoint` with `query_params` in the query string.
    pub fn delete(
        &self,
        endpoint: &str,
        headers: &[(&str, &str)],
        query_params: QueryParams,
    ) -> ConnectorResult<Outcome> {
        self.call(
            RequestSpec::new(HttpMethod::Delete, endpoint)
                .with_headers(headers)
                .with_query(query_params),
        )
    }

    /// POST `body` as JSON. `null`, `{}`, `[]` and `""` are rejected before
    /// any I/O.
    pub fn post(&self, endpoint: &str, body: Value, headers: &[(&str, &str)]) -> ConnectorResult<Outcome> {
        self.call(
            RequestSpec::new(HttpMethod::Post, endpoint)
                .with_body(body)
                .with_headers(headers),
        )
    }

    /// Run one call through the full pipeline.
    ///
    /// Argument problems are returned as `Err(InvalidArgument)` without
    /// touching the transport. A timeout, or a body that is not JSON, comes
    /// back as `Ok(Outcome::Failure)`. Transport faults below HTTP are
    /// returned as `Err(Transport)`.
    #[instrument(
        skip(self, spec),
        fields(method = ?spec.method, endpoint = %spec.endpoint, request_id = %Uuid::new_v4())
    )]
    pub fn call(&self, spec: RequestSpec) -> ConnectorResult<Outcome> {
        let request = self.build_request(&spec)?;
        debug!(url = %request.url, "dispatching request");

        match self.transport.execute(&request) {
            Ok(response) => Ok(self.parse_response(&request, response)),
            Err(TransportError::Timeout) => {
                warn!(url = %request.url, timeout = ?self.config.timeout, "request timed out");
                Ok(Outcome::timeout())
            }
            Err(TransportError::Other(err)) => {
                warn!(url = %request.url, error = %err, "transport failed");
                Err(ConnectorError::Transport(err))
            }
        }
    }

    /// Validate `spec` and turn it into a wire request.
    pub fn build_request(&self, spec: &RequestSpec) -> ConnectorResult<HttpRequest> {
        let method = spec
            .method
            .ok_or_else(|| ConnectorError::invalid_argument("method is missing"))?;
        if spec.endpoint.trim().is_empty() {
            return Err(ConnectorError::invalid_argument("endpoint can't be blank"));
        }

        let body = if method.requires_body() {
            match &spec.body {
                Some(body) if !is_blank(body) => Some(serde_json::to_string(body)?),
                _ => return Err(ConnectorError::invalid_argument("payload cannot be blank")),
            }
        } else {
            None
        };

        let url = if method.uses_query() {
            build_url(&self.config, &spec.endpoint, &spec.query_params)
        } else {
            build_url(&self.config, &spec.endpoint, &QueryParams::new())
        };

        Ok(HttpRequest {
            method,
            url,
            headers: compose_headers(&self.config, &spec.header_overrides),
            body,
        })
    }

    /// Snapshot `response` as the last response, then decode its body.
    pub fn parse_response(&self, request: &HttpRequest, response: HttpResponse) -> Outcome {
        if (200..300).contains(&response.status) {
            debug!(status = response.status, url = %request.url, "response received");
        } else {
            warn!(status = response.status, url = %request.url, "response received");
        }
        trace!(request = ?request, body = %response.body, "response body");

        let outcome = Outcome::from_body(&response.body);
        if !outcome.is_success() {
            warn!(status = response.status, "response body is not JSON");
        }
        self.record(request, response);
        outcome
    }

    /// The most recent response, if any call has completed.
    ///
    /// Diagnostic only: with concurrent calls on the same connector this is
    /// whichever response was recorded last.
    pub fn last_response(&self) -> Option<LastResponse> {
        self.last_response
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn record(&self, request: &HttpRequest, response: HttpResponse) {
        let host = sanitize(&self.config.domain);
        let host = host.split(':').next().unwrap_or(host);
        let jar = cookie_jar(&response, host);
        let snapshot = LastResponse {
            status: response.status,
            cookies: cookie_pairs(&jar),
            cookie_jar: jar,
            headers: response.headers,
            request: request.clone(),
            body: response.body,
        };
        *self.last_response.lock().unwrap_or_else(PoisonError::into_inner) = Some(snapshot);
    }
}

/// `null`, and empty strings, arrays and objects.
fn is_blank(body: &Value) -> bool {
    match body {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}
