//! Blocking HTTP client utilities for dimcheck.
//!
//! Provides a small builder API for GET requests over a blocking HTTP client
//! with JSON response decoding. Requests are issued one at a time; the caller waits for
//! each response before building the next.
//!
//! # Example
//!
//! ```rust,ignore
//! use dimcheck_http::FetchClient;
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct Product {
//!     id: u64,
//!     name: String,
//! }
//!
//! let client = FetchClient::new().with_base_url("https://shop.example.com/wp-json/wc/v3");
//!
//! let products: Vec<Product> = client
//!     .get("/products")
//!     .query("per_page", 100)
//!     .query("page", 1)
//!     .basic_auth("ck_...", Some("cs_..."))
//!     .send()?
//!     .error_for_status()?
//!     .json()?;
//! ```

mod error;
mod request;
mod response;

use std::collections::HashMap;
use std::time::Duration;

pub use error::FetchError;
pub use request::RequestBuilder;
pub use response::Response;

/// Transport settings applied when the underlying client is built.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Whole-request timeout.
    pub timeout: Option<Duration>,
    /// Reject invalid TLS certificates.
    pub verify_tls: bool,
    /// Value of the `User-Agent` header.
    pub user_agent: String,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout: Some(Duration::from_secs(30)),
            verify_tls: true,
            user_agent: concat!("dimcheck/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// HTTP client for making outbound requests.
///
/// Cloning is cheap; clones share the connection pool.
#[derive(Clone)]
pub struct FetchClient {
    inner: reqwest::blocking::Client,
    base_url: Option<String>,
    default_headers: HashMap<String, String>,
}

impl Default for FetchClient {
    fn default() -> Self {
        Self::new()
    }
}

impl FetchClient {
    /// Create a new HTTP client with default transport settings.
    pub fn new() -> Self {
        Self::from_inner(reqwest::blocking::Client::new())
    }

    /// Create a client with explicit transport settings.
    pub fn with_options(options: &ClientOptions) -> Result<Self, FetchError> {
        let mut builder = reqwest::blocking::Client::builder()
            .user_agent(options.user_agent.clone())
            .danger_accept_invalid_certs(!options.verify_tls);
        if let Some(timeout) = options.timeout {
            builder = builder.timeout(timeout);
        }
        let inner = builder
            .build()
            .map_err(|e| FetchError::RequestError(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self::from_inner(inner))
    }

    fn from_inner(inner: reqwest::blocking::Client) -> Self {
        Self {
            inner,
            base_url: None,
            default_headers: HashMap::new(),
        }
    }

    /// Set a base URL that will be prepended to relative request paths.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Add a default header that will be included in all requests.
    pub fn with_default_header(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.default_headers.insert(key.into(), value.into());
        self
    }

    /// Create a GET request.
    pub fn get(&self, url: impl Into<String>) -> ClientRequestBuilder {
        let full_url = self.resolve(url.into());

        let mut builder = RequestBuilder::new(full_url);
        for (key, value) in &self.default_headers {
            builder = builder.header(key.clone(), value.clone());
        }

        ClientRequestBuilder {
            client: self.inner.clone(),
            builder,
        }
    }

    fn resolve(&self, url: String) -> String {
        match &self.base_url {
            Some(base) if !(url.starts_with("http://") || url.starts_with("https://")) => {
                format!(
                    "{}/{}",
                    base.trim_end_matches('/'),
                    url.trim_start_matches('/')
                )
            }
            _ => url,
        }
    }
}

/// A request builder bound to a client.
pub struct ClientRequestBuilder {
    client: reqwest::blocking::Client,
    builder: RequestBuilder,
}

impl ClientRequestBuilder {
    /// Add a header to the request.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.builder = self.builder.header(key, value);
        self
    }

    /// Append a query parameter.
    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.builder = self.builder.query(key, value);
        self
    }

    /// Add a basic authorization header.
    pub fn basic_auth(mut self, username: impl AsRef<str>, password: Option<&str>) -> Self {
        self.builder = self.builder.basic_auth(username, password);
        self
    }

    /// Inspect the request that will be sent.
    pub fn request(&self) -> &RequestBuilder {
        &self.builder
    }

    /// Send the request and wait for the full response body.
    pub fn send(self) -> Result<Response, FetchError> {
        let RequestBuilder {
            url,
            headers,
            query,
        } = self.builder;

        tracing::trace!(%url, "sending request");

        let mut request = self.client.get(&url);
        if !query.is_empty() {
            request = request.query(&query);
        }
        for (key, value) in &headers {
            request = request.header(key.as_str(), value.as_str());
        }

        let response = request.send()?;

        let status = response.status().as_u16();
        let headers: HashMap<String, String> = response
            .headers()
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("").to_string()))
            .collect();
        let body = response.bytes()?.to_vec();

        Ok(Response::new(status, headers, body))
    }
}
