//! The scan command: audit the store and report products missing shipping data.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use anyhow::{Context as _, Result};
use chrono::{DateTime, Utc};
use dimcheck_catalog::audit::{Interruption, ScanEvent};
use dimcheck_catalog::{
    Attribute, CatalogAuditor, MissingBuckets, Product, ProductId, ScanOptions, ScanReport,
    StoreConfig, WooCommerceSource,
};
use indicatif::ProgressBar;
use serde::Serialize;

use super::ScanArgs;
use crate::config::ScanConfig;
use crate::context::Context;
use crate::output::{format_duration, status_badge};

/// Exit status when the store stopped answering or the page cap was hit.
pub const EXIT_PARTIAL: i32 = 1;
/// Exit status for `--fail-on-missing` when something is missing.
pub const EXIT_MISSING: i32 = 2;

const COLUMN_WIDTHS: [usize; 4] = [10, 10, 20, 48];

/// Run the scan command.
pub fn run(args: ScanArgs, ctx: &Context) -> Result<i32> {
    let store = store_settings(&args, &ctx.config.store);
    store.validate().context(
        "Store settings are incomplete; set them in dimcheck.toml, \
         DIMCHECK_* environment variables or --url/--key/--secret",
    )?;
    let options = scan_options(&args, &ctx.config.scan);
    let attributes = selected_attributes(&args.only);

    let source = WooCommerceSource::new(store.clone())?;
    let mut auditor = CatalogAuditor::with_options(source, options);

    let spinner = ctx.output.spinner(&format!("Scanning {}", store.url));
    let started_at = Utc::now();
    let timer = Instant::now();
    let report = auditor
        .scan_with(|event| show_progress(&spinner, event))?
        .clone();
    spinner.finish_and_clear();
    let elapsed = timer.elapsed();

    let summary = ScanSummary::new(
        &store.url,
        started_at,
        elapsed,
        &report,
        auditor.buckets(),
        &attributes,
    );

    if ctx.output.is_json() {
        ctx.output.json(&summary);
    } else {
        render(ctx, &summary, &report, elapsed);
    }

    Ok(exit_code(&report, &summary, args.fail_on_missing))
}

/// Store settings with command-line overrides applied.
fn store_settings(args: &ScanArgs, base: &StoreConfig) -> StoreConfig {
    let mut store = base.clone();
    if let Some(url) = &args.url {
        store.url = url.clone();
    }
    if let Some(key) = &args.key {
        store.consumer_key = key.clone();
    }
    if let Some(secret) = &args.secret {
        store.consumer_secret = secret.clone();
    }
    store
}

fn scan_options(args: &ScanArgs, config: &ScanConfig) -> ScanOptions {
    if args.no_limit {
        return ScanOptions::unbounded();
    }
    match args.max_pages {
        Some(0) => ScanOptions::unbounded(),
        Some(max) => ScanOptions {
            max_pages: Some(max),
        },
        None => ScanOptions {
            max_pages: config.page_cap(),
        },
    }
}

/// Attributes to report, in check order. Empty selection means all.
fn selected_attributes(only: &[Attribute]) -> Vec<Attribute> {
    Attribute::ALL
        .into_iter()
        .filter(|a| only.is_empty() || only.contains(a))
        .collect()
}

fn show_progress(spinner: &ProgressBar, event: ScanEvent) {
    match event {
        ScanEvent::PageFetched { page, items } => {
            spinner.set_message(format!("Page {}: {} products", page, items));
        }
        ScanEvent::VariationsFetched { parent, items } => {
            spinner.set_message(format!("Product {}: {} variations", parent, items));
        }
        ScanEvent::Skipped { product } => {
            spinner.println(format!("  skipped product {} (no dimensions)", product));
        }
    }
}

fn exit_code(report: &ScanReport, summary: &ScanSummary<'_>, fail_on_missing: bool) -> i32 {
    if !report.is_complete() {
        EXIT_PARTIAL
    } else if fail_on_missing && summary.missing.values().any(|rows| !rows.is_empty()) {
        EXIT_MISSING
    } else {
        0
    }
}

/// One product line in a report.
#[derive(Debug, Serialize)]
struct ProductRow<'a> {
    id: ProductId,
    #[serde(skip_serializing_if = "Option::is_none")]
    parent_id: Option<ProductId>,
    name: &'a str,
    sku: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    permalink: Option<&'a str>,
}

impl<'a> From<&'a Product> for ProductRow<'a> {
    fn from(product: &'a Product) -> Self {
        Self {
            id: product.id,
            parent_id: product.parent_id,
            name: &product.name,
            sku: &product.sku,
            permalink: product.permalink.as_deref(),
        }
    }
}

/// The JSON document printed by `scan --json`.
#[derive(Debug, Serialize)]
struct ScanSummary<'a> {
    store: &'a str,
    started_at: DateTime<Utc>,
    duration_ms: u128,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    interruption: Option<&'a Interruption>,
    pages: u32,
    requests: u32,
    checked: usize,
    skipped: usize,
    missing: BTreeMap<Attribute, Vec<ProductRow<'a>>>,
}

impl<'a> ScanSummary<'a> {
    fn new(
        store: &'a str,
        started_at: DateTime<Utc>,
        elapsed: Duration,
        report: &'a ScanReport,
        buckets: &'a MissingBuckets,
        attributes: &[Attribute],
    ) -> Self {
        let missing = attributes
            .iter()
            .map(|a| (*a, buckets.get(*a).iter().map(ProductRow::from).collect()))
            .collect();

        Self {
            store,
            started_at,
            duration_ms: elapsed.as_millis(),
            status: if report.is_complete() { "success" } else { "partial" },
            interruption: report.status.interruption(),
            pages: report.pages,
            requests: report.requests,
            checked: report.checked,
            skipped: report.skipped,
            missing,
        }
    }
}

fn render(ctx: &Context, summary: &ScanSummary<'_>, report: &ScanReport, elapsed: Duration) {
    let out = &ctx.output;

    out.header(&format!("Shipping data audit: {}", summary.store));
    out.kv("Status", &status_badge(&report.status));
    out.kv("Pages", &summary.pages.to_string());
    out.kv("Products checked", &summary.checked.to_string());
    if summary.skipped > 0 {
        out.kv("Skipped (no dimensions)", &summary.skipped.to_string());
    }
    out.kv("Requests", &summary.requests.to_string());
    out.kv("Duration", &format_duration(elapsed));

    if let Some(interruption) = summary.interruption {
        out.warn(&format!("Scan incomplete: {}", interruption));
        out.warn("Results below only cover the products read before that point.");
    }

    for (attribute, rows) in &summary.missing {
        if rows.is_empty() {
            out.success(&format!("No products missing {}", attribute));
            continue;
        }

        out.header(&format!("Missing {} ({})", attribute, rows.len()));
        out.table_row(&["ID", "PARENT", "SKU", "NAME"], &COLUMN_WIDTHS);
        for row in rows {
            let id = row.id.to_string();
            let parent = row
                .parent_id
                .map(|p| p.to_string())
                .unwrap_or_else(|| "-".to_string());
            let sku = if row.sku.is_empty() { "-" } else { row.sku };
            out.table_row(&[id.as_str(), parent.as_str(), sku, row.name], &COLUMN_WIDTHS);
        }
    }

    let total: usize = summary.missing.values().map(Vec::len).sum();
    out.info("");
    out.info(&format!(
        "{} missing value(s) across {} attribute(s)",
        total,
        summary.missing.len()
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use dimcheck_catalog::{Dimensions, PageSize, ProductSource, TransportError};

    struct OnePage(Vec<Product>);

    impl ProductSource for OnePage {
        fn list_products(
            &self,
            page: u32,
            _page_size: PageSize,
        ) -> Result<Vec<Product>, TransportError> {
            Ok(if page == 1 { self.0.clone() } else { Vec::new() })
        }

        fn list_variations(
            &self,
            _product_id: ProductId,
            _page_size: PageSize,
        ) -> Result<Vec<Product>, TransportError> {
            Ok(Vec::new())
        }
    }

    fn args() -> ScanArgs {
        ScanArgs {
            url: None,
            key: None,
            secret: None,
            only: Vec::new(),
            max_pages: None,
            no_limit: false,
            fail_on_missing: false,
        }
    }

    fn scanned(products: Vec<Product>) -> CatalogAuditor<OnePage> {
        let mut auditor = CatalogAuditor::new(OnePage(products));
        auditor.scan().unwrap();
        auditor
    }

    #[test]
    fn test_flags_override_config() {
        let base = StoreConfig::new("https://file.test", "ck_file", "cs_file");
        let mut args = args();
        args.url = Some("https://flag.test".into());
        args.secret = Some("cs_flag".into());

        let store = store_settings(&args, &base);
        assert_eq!(store.url, "https://flag.test");
        assert_eq!(store.consumer_key, "ck_file");
        assert_eq!(store.consumer_secret, "cs_flag");
    }

    #[test]
    fn test_scan_options_precedence() {
        let config = ScanConfig { max_pages: 50 };
        let mut args = args();
        assert_eq!(scan_options(&args, &config).max_pages, Some(50));

        args.max_pages = Some(7);
        assert_eq!(scan_options(&args, &config).max_pages, Some(7));

        args.max_pages = None;
        args.no_limit = true;
        assert_eq!(scan_options(&args, &config).max_pages, None);
    }

    #[test]
    fn test_selected_attributes_keep_check_order() {
        assert_eq!(selected_attributes(&[]), Attribute::ALL.to_vec());
        assert_eq!(
            selected_attributes(&[Attribute::Length, Attribute::Weight, Attribute::Length]),
            vec![Attribute::Weight, Attribute::Length]
        );
    }

    #[test]
    fn test_summary_json_shape() {
        let auditor = scanned(vec![
            Product::new(1u64, "Bare").with_sku("B-1"),
            Product::new(2u64, "Heavy")
                .with_weight("2")
                .with_dimensions(Dimensions::new("1", "", "1")),
        ]);
        let report = auditor.report().unwrap();
        let summary = ScanSummary::new(
            "https://shop.test",
            Utc::now(),
            Duration::from_millis(5),
            report,
            auditor.buckets(),
            &[Attribute::Weight, Attribute::Width],
        );

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["status"], "success");
        assert_eq!(json["checked"], 2);
        assert!(json.get("interruption").is_none());
        assert_eq!(json["missing"]["weight"][0]["id"], 1);
        assert_eq!(json["missing"]["weight"][0]["sku"], "B-1");
        assert_eq!(json["missing"]["width"].as_array().unwrap().len(), 2);
        assert!(json["missing"].get("height").is_none());
    }

    #[test]
    fn test_exit_codes() {
        let auditor = scanned(vec![Product::new(1u64, "Bare")]);
        let report = auditor.report().unwrap();
        let summary = ScanSummary::new(
            "https://shop.test",
            Utc::now(),
            Duration::ZERO,
            report,
            auditor.buckets(),
            &Attribute::ALL,
        );
        assert_eq!(exit_code(report, &summary, false), 0);
        assert_eq!(exit_code(report, &summary, true), EXIT_MISSING);

        let mut partial = report.clone();
        partial.status =
            dimcheck_catalog::ScanStatus::Partial(Interruption::PageLimit { pages: 1 });
        assert_eq!(exit_code(&partial, &summary, true), EXIT_PARTIAL);
    }

    #[test]
    fn test_exit_code_ignores_unselected_attributes() {
        let complete_but_weightless = Product::new(1u64, "Light")
            .with_dimensions(Dimensions::new("1", "1", "1"));
        let auditor = scanned(vec![complete_but_weightless]);
        let report = auditor.report().unwrap();
        let summary = ScanSummary::new(
            "https://shop.test",
            Utc::now(),
            Duration::ZERO,
            report,
            auditor.buckets(),
            &[Attribute::Height],
        );
        assert_eq!(exit_code(report, &summary, true), 0);
    }
}
