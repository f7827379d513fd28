//! Outgoing header composition.
//!
//! Layers are applied in order, each one replacing same-named headers from
//! the layers before it (names compare case-insensitively):
//!
//! 1. `X-Client-Id` from the config
//! 2. `Authorization: Basic {token}` when a token is configured
//! 3. `Content-Type` and `Charset` defaults
//! 4. per-call overrides

use crate::config::ConnectorConfig;

pub const CLIENT_ID: &str = "X-Client-Id";
pub const AUTHORIZATION: &str = "Authorization";
pub const CONTENT_TYPE: &str = "Content-Type";
pub const CHARSET: &str = "Charset";

/// Set `name` to `value`, replacing an existing header of the same name in
/// place or appending a new one.
pub fn set_header(headers: &mut Vec<(String, String)>, name: &str, value: &str) {
    match headers.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(name)) {
        Some(entry) => {
            entry.0 = name.to_string();
            entry.1 = value.to_string();
        }
        None => headers.push((name.to_string(), value.to_string())),
    }
}

/// Compose the headers for one call.
pub fn compose_headers(
    config: &ConnectorConfig,
    overrides: &[(String, String)],
) -> Vec<(String, String)> {
    let mut headers = Vec::new();

    if let Some(client_id) = &config.client_id {
        set_header(&mut headers, CLIENT_ID, client_id);
    }
    // The token goes out as given; no base64 step.
    if let Some(token) = &config.auth_token {
        set_header(&mut headers, AUTHORIZATION, &format!("Basic {token}"));
    }
    set_header(&mut headers, CONTENT_TYPE, &config.content_type);
    set_header(&mut headers, CHARSET, &config.charset);

    for (name, value) in overrides {
        set_header(&mut headers, name, value);
    }
    headers
}
