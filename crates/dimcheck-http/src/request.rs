//! HTTP request builder.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use std::collections::HashMap;

/// A builder for constructing GET requests.
///
/// Query parameters keep insertion order so logged URLs are stable.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    pub(crate) url: String,
    pub(crate) headers: HashMap<String, String>,
    pub(crate) query: Vec<(String, String)>,
}

impl RequestBuilder {
    /// Create a new request builder.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: HashMap::new(),
            query: Vec::new(),
        }
    }

    /// Add a header to the request.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Append a query parameter.
    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Add a basic authorization header.
    pub fn basic_auth(self, username: impl AsRef<str>, password: Option<&str>) -> Self {
        let credentials = match password {
            Some(pass) => format!("{}:{}", username.as_ref(), pass),
            None => format!("{}:", username.as_ref()),
        };
        let encoded = STANDARD.encode(credentials.as_bytes());
        self.header("Authorization", format!("Basic {}", encoded))
    }

    /// Target URL without query parameters.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Query parameters in insertion order.
    pub fn query_pairs(&self) -> &[(String, String)] {
        &self.query
    }

    /// Look up a header that will be sent.
    pub fn header_value(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    /// The URL with query parameters appended, for logging.
    ///
    /// Values of parameters named in `redact` are replaced with `***`.
    pub fn display_url(&self, redact: &[&str]) -> String {
        if self.query.is_empty() {
            return self.url.clone();
        }
        let params: Vec<String> = self
            .query
            .iter()
            .map(|(k, v)| {
                if redact.contains(&k.as_str()) {
                    format!("{}=***", k)
                } else {
                    format!("{}={}", k, v)
                }
            })
            .collect();
        format!("{}?{}", self.url, params.join("&"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_auth_header() {
        let req = RequestBuilder::new("https://shop.test/wp-json")
            .basic_auth("ck_abc", Some("cs_def"));
        assert_eq!(
            req.headers.get("Authorization").map(String::as_str),
            Some("Basic Y2tfYWJjOmNzX2RlZg==")
        );
    }

    #[test]
    fn test_basic_auth_without_password() {
        let req = RequestBuilder::new("https://shop.test").basic_auth("user", None);
        assert_eq!(
            req.headers.get("Authorization").map(String::as_str),
            Some("Basic dXNlcjo=")
        );
    }

    #[test]
    fn test_query_keeps_order() {
        let req = RequestBuilder::new("https://shop.test/products")
            .query("per_page", 100)
            .query("page", 3);
        assert_eq!(
            req.display_url(&[]),
            "https://shop.test/products?per_page=100&page=3"
        );
    }

    #[test]
    fn test_display_url_redacts_secrets() {
        let req = RequestBuilder::new("https://shop.test/products")
            .query("page", 1)
            .query("consumer_secret", "cs_hidden");
        let shown = req.display_url(&["consumer_secret"]);
        assert!(shown.ends_with("consumer_secret=***"));
        assert!(!shown.contains("cs_hidden"));
    }
}
