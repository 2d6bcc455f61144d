//! WooCommerce REST API product source.

use std::time::Duration;

use dimcheck_http::{ClientOptions, ClientRequestBuilder, FetchClient};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::{PageSize, ProductSource};
use crate::catalog::Product;
use crate::error::{CatalogError, TransportError};
use crate::ids::ProductId;

/// Query parameters that carry credentials and must not be logged.
const SECRET_PARAMS: [&str; 2] = ["consumer_key", "consumer_secret"];

/// Connection settings for a WooCommerce store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Store root URL, e.g. `https://shop.example.com`.
    #[serde(default)]
    pub url: String,

    /// REST API consumer key (`ck_...`).
    #[serde(default)]
    pub consumer_key: String,

    /// REST API consumer secret (`cs_...`).
    #[serde(default)]
    pub consumer_secret: String,

    /// API namespace under `/wp-json`.
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Send credentials as query parameters instead of Basic auth.
    ///
    /// Some hosts strip the `Authorization` header before it reaches PHP.
    #[serde(default)]
    pub query_string_auth: bool,

    /// Verify the store's TLS certificate.
    #[serde(default = "default_true")]
    pub verify_ssl: bool,
}

fn default_api_version() -> String {
    "wc/v3".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_true() -> bool {
    true
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            consumer_key: String::new(),
            consumer_secret: String::new(),
            api_version: default_api_version(),
            timeout_secs: default_timeout_secs(),
            query_string_auth: false,
            verify_ssl: true,
        }
    }
}

impl StoreConfig {
    /// Settings for `url` with the given credential pair and defaults otherwise.
    pub fn new(
        url: impl Into<String>,
        consumer_key: impl Into<String>,
        consumer_secret: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            consumer_key: consumer_key.into(),
            consumer_secret: consumer_secret.into(),
            ..Self::default()
        }
    }

    /// Check that the settings can be used to build a client.
    pub fn validate(&self) -> Result<(), CatalogError> {
        let url = self.url.trim();
        if url.is_empty() {
            return Err(CatalogError::InvalidConfig("store url is required".into()));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(CatalogError::InvalidConfig(format!(
                "store url must start with http:// or https://, got '{}'",
                url
            )));
        }
        if self.consumer_key.trim().is_empty() {
            return Err(CatalogError::InvalidConfig("consumer key is required".into()));
        }
        if self.consumer_secret.trim().is_empty() {
            return Err(CatalogError::InvalidConfig(
                "consumer secret is required".into(),
            ));
        }
        if self.api_version.trim().is_empty() {
            return Err(CatalogError::InvalidConfig("api version is required".into()));
        }
        if self.timeout_secs == 0 {
            return Err(CatalogError::InvalidConfig(
                "timeout_secs must be greater than 0".into(),
            ));
        }
        Ok(())
    }

    /// Base URL of the REST API, e.g. `https://shop.example.com/wp-json/wc/v3`.
    pub fn api_base(&self) -> String {
        format!(
            "{}/wp-json/{}",
            self.url.trim().trim_end_matches('/'),
            self.api_version.trim().trim_matches('/')
        )
    }
}

/// Reads products from a WooCommerce store over its REST API.
pub struct WooCommerceSource {
    client: FetchClient,
    config: StoreConfig,
}

impl WooCommerceSource {
    /// Validate `config` and build the HTTP client.
    pub fn new(config: StoreConfig) -> Result<Self, CatalogError> {
        config.validate()?;

        let options = ClientOptions {
            timeout: Some(Duration::from_secs(config.timeout_secs)),
            verify_tls: config.verify_ssl,
            ..ClientOptions::default()
        };
        let client = FetchClient::with_options(&options)
            .map_err(|e| CatalogError::InvalidConfig(e.to_string()))?
            .with_base_url(config.api_base())
            .with_default_header("Accept", "application/json");

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    fn products_request(&self, page: u32, page_size: PageSize) -> ClientRequestBuilder {
        let request = self
            .client
            .get("products")
            .query("per_page", page_size.get())
            .query("page", page);
        self.authorize(request)
    }

    fn variations_request(
        &self,
        product_id: ProductId,
        page_size: PageSize,
    ) -> ClientRequestBuilder {
        let request = self
            .client
            .get(format!("products/{}/variations", product_id))
            .query("per_page", page_size.get());
        self.authorize(request)
    }

    fn authorize(&self, request: ClientRequestBuilder) -> ClientRequestBuilder {
        if self.config.query_string_auth {
            request
                .query("consumer_key", &self.config.consumer_key)
                .query("consumer_secret", &self.config.consumer_secret)
        } else {
            request.basic_auth(
                &self.config.consumer_key,
                Some(self.config.consumer_secret.as_str()),
            )
        }
    }

    fn fetch(&self, request: ClientRequestBuilder) -> Result<Vec<Product>, TransportError> {
        debug!(url = %request.request().display_url(&SECRET_PARAMS), "GET");

        let response = request.send()?.error_for_status()?;

        if let Some(total) = response.header_u64("X-WP-Total") {
            trace!(
                total,
                total_pages = ?response.header_u64("X-WP-TotalPages"),
                "store reported collection size"
            );
        }

        response
            .json::<Vec<Product>>()
            .map_err(|e| TransportError::decode(e.to_string()))
    }
}

impl ProductSource for WooCommerceSource {
    fn list_products(
        &self,
        page: u32,
        page_size: PageSize,
    ) -> Result<Vec<Product>, TransportError> {
        self.fetch(self.products_request(page, page_size))
    }

    fn list_variations(
        &self,
        product_id: ProductId,
        page_size: PageSize,
    ) -> Result<Vec<Product>, TransportError> {
        self.fetch(self.variations_request(product_id, page_size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransportErrorKind;

    fn config() -> StoreConfig {
        StoreConfig::new("https://shop.test/", "ck_key", "cs_secret")
    }

    fn query_value<'a>(request: &'a ClientRequestBuilder, key: &str) -> Option<&'a str> {
        request
            .request()
            .query_pairs()
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn test_defaults() {
        let config = config();
        assert_eq!(config.api_version, "wc/v3");
        assert_eq!(config.timeout_secs, 30);
        assert!(config.verify_ssl);
        assert!(!config.query_string_auth);
    }

    #[test]
    fn test_api_base() {
        assert_eq!(config().api_base(), "https://shop.test/wp-json/wc/v3");
    }

    #[test]
    fn test_validate_rejects_bad_settings() {
        let mut bad = config();
        bad.url = "shop.test".into();
        assert!(matches!(bad.validate(), Err(CatalogError::InvalidConfig(_))));

        let mut bad = config();
        bad.consumer_secret = "  ".into();
        assert!(bad.validate().is_err());

        let mut bad = config();
        bad.timeout_secs = 0;
        assert!(bad.validate().is_err());

        assert!(config().validate().is_ok());
    }

    #[test]
    fn test_new_fails_on_invalid_config() {
        let result = WooCommerceSource::new(StoreConfig::new("", "ck", "cs"));
        assert!(matches!(result, Err(CatalogError::InvalidConfig(_))));
    }

    #[test]
    fn test_products_request_shape() {
        let source = WooCommerceSource::new(config()).unwrap();
        let request = source.products_request(3, PageSize::MAX);
        assert_eq!(request.request().url(), "https://shop.test/wp-json/wc/v3/products");
        assert_eq!(query_value(&request, "per_page"), Some("100"));
        assert_eq!(query_value(&request, "page"), Some("3"));
        assert_eq!(
            request.request().header_value("authorization"),
            Some("Basic Y2tfa2V5OmNzX3NlY3JldA==")
        );
        assert_eq!(query_value(&request, "consumer_key"), None);
    }

    #[test]
    fn test_variations_request_shape() {
        let source = WooCommerceSource::new(config()).unwrap();
        let request = source.variations_request(ProductId::new(799), PageSize::MAX);
        assert_eq!(
            request.request().url(),
            "https://shop.test/wp-json/wc/v3/products/799/variations"
        );
        assert_eq!(query_value(&request, "per_page"), Some("100"));
        assert_eq!(query_value(&request, "page"), None);
    }

    #[test]
    fn test_query_string_auth() {
        let mut config = config();
        config.query_string_auth = true;
        let source = WooCommerceSource::new(config).unwrap();
        let request = source.products_request(1, PageSize::MAX);
        assert_eq!(query_value(&request, "consumer_key"), Some("ck_key"));
        assert_eq!(query_value(&request, "consumer_secret"), Some("cs_secret"));
        assert_eq!(request.request().header_value("Authorization"), None);
        assert!(!request
            .request()
            .display_url(&SECRET_PARAMS)
            .contains("cs_secret"));
    }

    #[test]
    fn test_unreachable_store_is_transport_error() {
        let mut config = StoreConfig::new("http://127.0.0.1:9", "ck", "cs");
        config.timeout_secs = 2;
        let source = WooCommerceSource::new(config).unwrap();
        let err = source.list_products(1, PageSize::MAX).unwrap_err();
        assert!(matches!(
            err.kind,
            TransportErrorKind::Network | TransportErrorKind::Timeout
        ));
    }

    #[test]
    fn test_config_deserialize_fills_defaults() {
        let config: StoreConfig = serde_json::from_str(
            r#"{"url": "https://shop.test", "consumer_key": "ck", "consumer_secret": "cs"}"#,
        )
        .unwrap();
        assert_eq!(config.api_version, "wc/v3");
        assert!(config.verify_ssl);
    }
}
