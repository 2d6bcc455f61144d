//! CLI configuration.

use std::path::Path;

use anyhow::{Context, Result};
use dimcheck_catalog::audit::DEFAULT_MAX_PAGES;
use dimcheck_catalog::StoreConfig;
use serde::{Deserialize, Serialize};

/// File names searched for, in order, from the working directory upwards.
pub const CONFIG_NAMES: [&str; 3] = ["dimcheck.toml", ".dimcheck.toml", "dimcheck.json"];

/// Environment variables that override the store settings.
pub const ENV_URL: &str = "DIMCHECK_URL";
pub const ENV_KEY: &str = "DIMCHECK_CONSUMER_KEY";
pub const ENV_SECRET: &str = "DIMCHECK_CONSUMER_SECRET";

/// CLI configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CliConfig {
    /// Store connection.
    #[serde(default)]
    pub store: StoreConfig,

    /// Scan tuning.
    #[serde(default)]
    pub scan: ScanConfig,
}

/// Scan configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Page cap. `0` scans until the store runs out of pages.
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,
}

fn default_max_pages() -> u32 {
    DEFAULT_MAX_PAGES
}

impl ScanConfig {
    /// The cap as the auditor expects it.
    pub fn page_cap(&self) -> Option<u32> {
        Some(self.max_pages).filter(|max| *max > 0)
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            max_pages: default_max_pages(),
        }
    }
}

impl CliConfig {
    /// Load config from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        if is_json(path) {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display()))
        }
    }

    /// Save config to a file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = if is_json(path) {
            serde_json::to_string_pretty(self)?
        } else {
            toml::to_string_pretty(self)?
        };

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }

    /// Replace store settings with any set, non-empty environment variables.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(url) = get(ENV_URL) {
            self.store.url = url;
        }
        if let Some(key) = get(ENV_KEY) {
            self.store.consumer_key = key;
        }
        if let Some(secret) = get(ENV_SECRET) {
            self.store.consumer_secret = secret;
        }
    }
}

fn is_json(path: &Path) -> bool {
    path.extension().map_or(false, |e| e == "json")
}

/// Quote `value` as a TOML basic string.
fn toml_string(value: &str) -> String {
    toml::Value::String(value.to_string()).to_string()
}

/// Generate a commented dimcheck.toml.
pub fn generate_default_config(url: &str, consumer_key: &str, consumer_secret: &str) -> String {
    format!(
        r#"# dimcheck configuration
#
# Create REST API keys under WooCommerce > Settings > Advanced > REST API.
# Read access is enough. DIMCHECK_URL, DIMCHECK_CONSUMER_KEY and
# DIMCHECK_CONSUMER_SECRET override these values.

[store]
url = {url}
consumer_key = {consumer_key}
consumer_secret = {consumer_secret}
api_version = "wc/v3"
timeout_secs = 30
# Send credentials as query parameters when the host strips Authorization headers.
query_string_auth = false
verify_ssl = true

[scan]
# Stop after this many pages of 100 products. 0 scans without a cap.
max_pages = {max_pages}
"#,
        url = toml_string(url),
        consumer_key = toml_string(consumer_key),
        consumer_secret = toml_string(consumer_secret),
        max_pages = DEFAULT_MAX_PAGES,
    )
}
