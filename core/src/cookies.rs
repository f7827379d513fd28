//! `Set-Cookie` parsing for the last-response snapshot.
//!
//! Only what diagnostics need is kept: name, value, and the `Domain` and
//! `Path` attributes. Expiry and flags are dropped.

use serde::Serialize;

use crate::http::HttpResponse;

const SET_COOKIE: &str = "Set-Cookie";

/// A cookie as stored in the jar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cookie {
    pub name: String,
    pub value: String,
    pub domain: String,
    pub path: String,
}

/// Parse one `Set-Cookie` header value. `default_domain` applies when the
/// header carries no `Domain` attribute.
pub fn parse_set_cookie(header: &str, default_domain: &str) -> Option<Cookie> {
    let mut parts = header.split(';');
    let (name, value) = parts.next()?.split_once('=')?;
    let name = name.trim();
    if name.is_empty() {
        return None;
    }

    let mut cookie = Cookie {
        name: name.to_string(),
        value: value.trim().trim_matches('"').to_string(),
        domain: default_domain.to_string(),
        path: "/".to_string(),
    };
    for attribute in parts {
        let Some((key, val)) = attribute.split_once('=') else {
            continue;
        };
        let val = val.trim();
        if key.trim().eq_ignore_ascii_case("domain") && !val.is_empty() {
            cookie.domain = val.trim_start_matches('.').to_string();
        } else if key.trim().eq_ignore_ascii_case("path") && !val.is_empty() {
            cookie.path = val.to_string();
        }
    }
    Some(cookie)
}

/// Every well-formed cookie set by `response`, in header order.
pub fn cookie_jar(response: &HttpResponse, default_domain: &str) -> Vec<Cookie> {
    response
        .header_values(SET_COOKIE)
        .filter_map(|header| parse_set_cookie(header, default_domain))
        .collect()
}

/// Name/value pairs of the jar. A later cookie of the same name wins.
pub fn cookie_pairs(jar: &[Cookie]) -> Vec<(String, String)> {
    let mut pairs: Vec<(String, String)> = Vec::new();
    for cookie in jar {
        match pairs.iter_mut().find(|(name, _)| *name == cookie.name) {
            Some(pair) => pair.1 = cookie.value.clone(),
            None => pairs.push((cookie.name.clone(), cookie.value.clone())),
        }
    }
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_name_value_and_attributes() {
        let cookie =
            parse_set_cookie("session=abc123; Path=/api; Domain=.example.com; HttpOnly", "x.io")
                .unwrap();
        assert_eq!(
            cookie,
            Cookie {
                name: "session".to_string(),
                value: "abc123".to_string(),
                domain: "example.com".to_string(),
                path: "/api".to_string(),
            }
        );
    }

    #[test]
    fn defaults_domain_and_path() {
        let cookie = parse_set_cookie("theme=dark", "api.example.com").unwrap();
        assert_eq!(cookie.domain, "api.example.com");
        assert_eq!(cookie.path, "/");
    }

    #[test]
    fn rejects_malformed_headers() {
        assert!(parse_set_cookie("novalue", "x.io").is_none());
        assert!(parse_set_cookie("=orphan", "x.io").is_none());
    }

    #[test]
    fn jar_and_pairs_from_response() {
        let response = HttpResponse {
            status: 200,
            headers: vec![
                ("Set-Cookie".to_string(), "a=1".to_string()),
                ("Content-Type".to_string(), "application/json".to_string()),
                ("set-cookie".to_string(), "b=2; Path=/x".to_string()),
                ("Set-Cookie".to_string(), "a=3".to_string()),
            ],
            body: String::new(),
        };
        let jar = cookie_jar(&response, "x.io");
        assert_eq!(jar.len(), 3);
        assert_eq!(jar[1].path, "/x");
        assert_eq!(
            cookie_pairs(&jar),
            vec![
                ("a".to_string(), "3".to_string()),
                ("b".to_string(), "2".to_string()),
            ]
        );
    }
}
