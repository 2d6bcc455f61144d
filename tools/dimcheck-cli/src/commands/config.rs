//! Configuration management commands.

use std::fs;

use anyhow::{bail, Context as _, Result};
use dialoguer::{Input, Password};

use super::{ConfigArgs, ConfigCommand};
use crate::config::{generate_default_config, CliConfig};
use crate::context::Context;
use crate::output::mask_secret;

/// Request timeouts above this many seconds get a warning.
const SLOW_TIMEOUT_SECS: u64 = 120;

/// Run the config command.
pub fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx),
        ConfigCommand::Init { force } => init_config(force, ctx),
        ConfigCommand::Validate => validate_config(ctx),
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    let shown = masked(&ctx.config);

    if ctx.output.is_json() {
        ctx.output.json(&shown);
        return Ok(());
    }

    ctx.output.header("Current Configuration");
    match &ctx.config_path {
        Some(path) => ctx.output.kv("file", &path.display().to_string()),
        None => ctx.output.kv("file", "(none, using defaults and environment)"),
    }

    let store = &shown.store;
    ctx.output.info("");
    ctx.output.info("[store]");
    ctx.output.kv("url", if store.url.is_empty() { "(not set)" } else { &store.url });
    ctx.output.kv("consumer_key", &store.consumer_key);
    ctx.output.kv("consumer_secret", &store.consumer_secret);
    ctx.output.kv("api_version", &store.api_version);
    ctx.output.kv("timeout_secs", &store.timeout_secs.to_string());
    ctx.output.kv("query_string_auth", &store.query_string_auth.to_string());
    ctx.output.kv("verify_ssl", &store.verify_ssl.to_string());

    ctx.output.info("");
    ctx.output.info("[scan]");
    let cap = match shown.scan.page_cap() {
        Some(max) => max.to_string(),
        None => "0 (no cap)".to_string(),
    };
    ctx.output.kv("max_pages", &cap);

    Ok(())
}

/// A copy of `config` with both credentials masked.
fn masked(config: &CliConfig) -> CliConfig {
    let mut shown = config.clone();
    shown.store.consumer_key = mask_secret(&shown.store.consumer_key);
    shown.store.consumer_secret = mask_secret(&shown.store.consumer_secret);
    shown
}

fn init_config(force: bool, ctx: &Context) -> Result<()> {
    let config_path = ctx.default_config_path();

    if config_path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    let store = &ctx.config.store;
    let url: String = Input::new()
        .with_prompt("Store URL")
        .with_initial_text(store.url.clone())
        .interact_text()
        .context("Failed to read store URL")?;
    let key: String = Input::new()
        .with_prompt("Consumer key")
        .with_initial_text(store.consumer_key.clone())
        .interact_text()
        .context("Failed to read consumer key")?;
    let secret = Password::new()
        .with_prompt("Consumer secret")
        .interact()
        .context("Failed to read consumer secret")?;

    let content = generate_default_config(url.trim(), key.trim(), secret.trim());
    fs::write(&config_path, content)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;

    ctx.output.success(&format!("Created: {}", config_path.display()));
    ctx.output.info("Keep this file out of version control; it holds your API secret.");

    Ok(())
}

fn validate_config(ctx: &Context) -> Result<()> {
    ctx.output.header("Validating configuration");

    let (errors, warnings) = check_config(&ctx.config);

    if errors.is_empty() && warnings.is_empty() {
        ctx.output.success("Configuration is valid");
        return Ok(());
    }

    for error in &errors {
        ctx.output.error(&format!("Error: {}", error));
    }

    for warning in &warnings {
        ctx.output.warn(&format!("Warning: {}", warning));
    }

    if !errors.is_empty() {
        bail!("Configuration has {} error(s)", errors.len());
    }

    ctx.output.success("Configuration is valid (with warnings)");

    Ok(())
}

/// Errors and warnings for a configuration.
fn check_config(config: &CliConfig) -> (Vec<String>, Vec<String>) {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();
    let store = &config.store;

    if let Err(e) = store.validate() {
        errors.push(e.to_string());
    }

    if store.url.starts_with("http://") {
        warnings.push("store.url uses plain http; credentials are sent unencrypted".to_string());
    }
    if !store.verify_ssl {
        warnings.push("store.verify_ssl is off; certificate errors are ignored".to_string());
    }
    if store.timeout_secs > SLOW_TIMEOUT_SECS {
        warnings.push(format!(
            "store.timeout_secs is {}; a stalled store will hang the scan that long per request",
            store.timeout_secs
        ));
    }
    if config.scan.page_cap().is_none() {
        warnings.push("scan.max_pages is 0; scans run until the store returns an empty page".to_string());
    }

    (errors, warnings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dimcheck_catalog::StoreConfig;

    fn valid() -> CliConfig {
        CliConfig {
            store: StoreConfig::new("https://shop.test", "ck_1", "cs_2"),
            ..CliConfig::default()
        }
    }

    #[test]
    fn test_valid_config_is_clean() {
        let (errors, warnings) = check_config(&valid());
        assert!(errors.is_empty());
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_masked_hides_both_credentials() {
        let mut config = valid();
        config.store.consumer_key = "ck_0123456789abcdef".into();
        config.store.consumer_secret = "cs_fedcba9876543210".into();

        let shown = masked(&config);
        let json = serde_json::to_string(&shown).unwrap();
        assert!(!json.contains("ck_0123456789abcdef"));
        assert!(!json.contains("cs_fedcba9876543210"));
        assert_eq!(shown.store.consumer_key, "***************cdef");
        assert_eq!(shown.store.url, "https://shop.test");
    }

    #[test]
    fn test_missing_credentials_are_errors() {
        let (errors, _) = check_config(&CliConfig::default());
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_warnings() {
        let mut config = valid();
        config.store.url = "http://shop.test".into();
        config.store.timeout_secs = 600;
        config.scan.max_pages = 0;

        let (errors, warnings) = check_config(&config);
        assert!(errors.is_empty());
        assert_eq!(warnings.len(), 3);
        assert!(warnings[0].contains("plain http"));
    }
}
