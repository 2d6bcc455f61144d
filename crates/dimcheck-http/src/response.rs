//! HTTP response handling.

use crate::FetchError;
use serde::de::DeserializeOwned;
use std::collections::HashMap;

/// Longest body excerpt carried into an error message.
const ERROR_EXCERPT_LEN: usize = 200;

/// An HTTP response.
#[derive(Debug, Clone)]
pub struct Response {
    /// The HTTP status code.
    pub status: u16,
    /// The response headers.
    pub headers: HashMap<String, String>,
    /// The response body.
    pub body: Vec<u8>,
}

impl Response {
    /// Create a new response.
    pub fn new(status: u16, headers: HashMap<String, String>, body: Vec<u8>) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// Check if the response was successful (2xx status).
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Parse the response body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, FetchError> {
        serde_json::from_slice(&self.body).map_err(|e| FetchError::ParseError(e.to_string()))
    }

    /// Get a header value (case-insensitive).
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    /// Get a header value parsed as an unsigned integer.
    pub fn header_u64(&self, key: &str) -> Option<u64> {
        self.header(key).and_then(|v| v.trim().parse().ok())
    }

    /// Convert to a Result, returning an error for non-2xx status codes.
    ///
    /// The error message is a short excerpt of the body, which for REST APIs
    /// usually names the failing check.
    pub fn error_for_status(self) -> Result<Self, FetchError> {
        if self.is_success() {
            return Ok(self);
        }
        let text = String::from_utf8_lossy(&self.body);
        let mut message: String = text.chars().take(ERROR_EXCERPT_LEN).collect();
        if message.trim().is_empty() {
            message = "empty response body".to_string();
        }
        Err(FetchError::HttpError {
            status: self.status,
            message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_response(status: u16, headers: &[(&str, &str)], body: &[u8]) -> Response {
        let headers = headers
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Response::new(status, headers, body.to_vec())
    }

    #[test]
    fn test_success_range() {
        assert!(make_response(200, &[], b"").is_success());
        assert!(make_response(204, &[], b"").is_success());
        assert!(!make_response(301, &[], b"").is_success());
        assert!(!make_response(401, &[], b"").is_success());
    }

    #[test]
    fn test_json_array() {
        let resp = make_response(200, &[], br#"[{"id": 1}, {"id": 2}]"#);
        let items: Vec<serde_json::Value> = resp.json().unwrap();
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn test_json_invalid_is_parse_error() {
        let resp = make_response(200, &[], b"<html>maintenance</html>");
        let result: Result<Vec<serde_json::Value>, _> = resp.json();
        assert!(matches!(result, Err(FetchError::ParseError(_))));
    }

    #[test]
    fn test_header_lookup_ignores_case() {
        let resp = make_response(200, &[("X-WP-TotalPages", "7")], b"[]");
        assert_eq!(resp.header("x-wp-totalpages"), Some("7"));
        assert_eq!(resp.header_u64("X-WP-TOTALPAGES"), Some(7));
        assert_eq!(resp.header_u64("X-WP-Total"), None);
    }

    #[test]
    fn test_header_u64_rejects_garbage() {
        let resp = make_response(200, &[("X-WP-Total", "many")], b"[]");
        assert_eq!(resp.header_u64("X-WP-Total"), None);
    }

    #[test]
    fn test_error_for_status_keeps_excerpt() {
        let body = br#"{"code":"woocommerce_rest_cannot_view","message":"Sorry, you cannot list resources."}"#;
        let err = make_response(401, &[], body).error_for_status().unwrap_err();
        match err {
            FetchError::HttpError { status, message } => {
                assert_eq!(status, 401);
                assert!(message.contains("woocommerce_rest_cannot_view"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_error_for_status_truncates_long_bodies() {
        let body = vec![b'x'; 1000];
        let err = make_response(500, &[], &body).error_for_status().unwrap_err();
        if let FetchError::HttpError { message, .. } = err {
            assert_eq!(message.len(), ERROR_EXCERPT_LEN);
        } else {
            panic!("expected HttpError");
        }
    }

    #[test]
    fn test_error_for_status_empty_body() {
        let err = make_response(502, &[], b"").error_for_status().unwrap_err();
        assert_eq!(err.to_string(), "HTTP 502: empty response body");
    }
}
