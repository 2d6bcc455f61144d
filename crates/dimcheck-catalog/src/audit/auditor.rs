//! The catalog scan.

use tracing::{debug, info, warn};

use super::{Interruption, MissingBuckets, ScanReport, ScanState, ScanStatus};
use crate::catalog::Product;
use crate::error::CatalogError;
use crate::ids::ProductId;
use crate::source::{PageSize, ProductSource, StoreConfig, WooCommerceSource};

/// Default page cap: one million products at 100 per page.
pub const DEFAULT_MAX_PAGES: u32 = 10_000;

/// Tuning for a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanOptions {
    /// Stop once this many pages have been classified and the next one is
    /// still non-empty. `None` scans until the store returns an empty page.
    pub max_pages: Option<u32>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            max_pages: Some(DEFAULT_MAX_PAGES),
        }
    }
}

impl ScanOptions {
    /// No page cap.
    pub fn unbounded() -> Self {
        Self { max_pages: None }
    }
}

/// Progress notification emitted during a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanEvent {
    /// A page of top-level products arrived.
    PageFetched { page: u32, items: usize },
    /// The variations of `parent` arrived.
    VariationsFetched { parent: ProductId, items: usize },
    /// A record without dimensions was skipped.
    Skipped { product: ProductId },
}

#[derive(Debug, Default)]
struct Tally {
    pages: u32,
    requests: u32,
    checked: usize,
    skipped: usize,
}

/// Walks a product catalog and collects products missing shipping
/// attributes.
///
/// An auditor scans once. Pages are requested at the maximum page size
/// starting from page 1 until the source returns an empty page. Variations
/// of a variable product are listed with a single request and classified
/// before their parent. A transport failure ends the scan early with
/// [`ScanStatus::Partial`]; everything classified up to that point is kept.
///
/// ```rust,ignore
/// let mut auditor = CatalogAuditor::new(source);
/// let report = auditor.scan()?;
/// if !report.is_complete() {
///     eprintln!("partial scan: {:?}", report.status);
/// }
/// for product in auditor.weight() {
///     println!("{} has no weight", product.label());
/// }
/// ```
pub struct CatalogAuditor<S> {
    source: S,
    options: ScanOptions,
    buckets: MissingBuckets,
    state: ScanState,
    report: Option<ScanReport>,
}

impl CatalogAuditor<WooCommerceSource> {
    /// Connect to a WooCommerce store and scan it before returning.
    ///
    /// Only unusable settings make this fail. A store that stops answering
    /// mid-scan yields an auditor whose [`status`](Self::status) is partial.
    pub fn connect(
        endpoint: impl Into<String>,
        key: impl Into<String>,
        secret: impl Into<String>,
    ) -> Result<Self, CatalogError> {
        Self::connect_with(StoreConfig::new(endpoint, key, secret), ScanOptions::default())
    }

    /// Like [`connect`](Self::connect) with full store settings.
    pub fn connect_with(config: StoreConfig, options: ScanOptions) -> Result<Self, CatalogError> {
        let source = WooCommerceSource::new(config)?;
        let mut auditor = Self::with_options(source, options);
        auditor.scan()?;
        Ok(auditor)
    }
}

impl<S: ProductSource> CatalogAuditor<S> {
    /// Create an auditor that has not scanned yet.
    pub fn new(source: S) -> Self {
        Self::with_options(source, ScanOptions::default())
    }

    pub fn with_options(source: S, options: ScanOptions) -> Self {
        Self {
            source,
            options,
            buckets: MissingBuckets::new(),
            state: ScanState::Unscanned,
            report: None,
        }
    }

    /// Run the scan.
    ///
    /// Fails only when called a second time.
    pub fn scan(&mut self) -> Result<&ScanReport, CatalogError> {
        self.scan_with(|_| {})
    }

    /// Run the scan, reporting progress to `observer`.
    pub fn scan_with<F>(&mut self, mut observer: F) -> Result<&ScanReport, CatalogError>
    where
        F: FnMut(ScanEvent),
    {
        if self.state != ScanState::Unscanned {
            return Err(CatalogError::AlreadyScanned);
        }
        self.state = ScanState::Scanning;
        self.buckets.clear();

        let mut tally = Tally::default();
        let status = match self.walk(&mut tally, &mut observer) {
            Ok(()) => ScanStatus::Success,
            Err(interruption) => {
                warn!(%interruption, pages = tally.pages, "catalog scan interrupted");
                ScanStatus::Partial(interruption)
            }
        };

        self.state = if status.is_success() {
            ScanState::Scanned
        } else {
            ScanState::PartiallyScanned
        };

        let report = ScanReport {
            status,
            pages: tally.pages,
            requests: tally.requests,
            checked: tally.checked,
            skipped: tally.skipped,
            counts: self.buckets.counts(),
        };
        info!(
            complete = report.is_complete(),
            pages = report.pages,
            requests = report.requests,
            checked = report.checked,
            skipped = report.skipped,
            "catalog scan finished"
        );

        Ok(self.report.insert(report))
    }

    fn walk<F>(&mut self, tally: &mut Tally, observer: &mut F) -> Result<(), Interruption>
    where
        F: FnMut(ScanEvent),
    {
        let page_size = PageSize::MAX;
        let mut page: u32 = 1;

        loop {
            tally.requests += 1;
            let products = self
                .source
                .list_products(page, page_size)
                .map_err(|error| Interruption::Transport {
                    page,
                    product: None,
                    error,
                })?;

            debug!(page, items = products.len(), "fetched page");
            observer(ScanEvent::PageFetched {
                page,
                items: products.len(),
            });

            if products.is_empty() {
                return Ok(());
            }
            if let Some(max) = self.options.max_pages {
                if tally.pages >= max {
                    return Err(Interruption::PageLimit { pages: tally.pages });
                }
            }

            for product in products {
                if product.has_variations() {
                    tally.requests += 1;
                    let variations = self
                        .source
                        .list_variations(product.id, page_size)
                        .map_err(|error| Interruption::Transport {
                            page,
                            product: Some(product.id),
                            error,
                        })?;

                    debug!(parent = %product.id, items = variations.len(), "fetched variations");
                    observer(ScanEvent::VariationsFetched {
                        parent: product.id,
                        items: variations.len(),
                    });

                    for variation in &variations {
                        self.check(variation, tally, observer);
                    }
                }
                self.check(&product, tally, observer);
            }

            tally.pages += 1;
            page += 1;
        }
    }

    fn check<F>(&mut self, product: &Product, tally: &mut Tally, observer: &mut F)
    where
        F: FnMut(ScanEvent),
    {
        if product.is_malformed() {
            warn!(product = %product.id, "skipping record without dimensions");
            tally.skipped += 1;
            observer(ScanEvent::Skipped {
                product: product.id,
            });
            return;
        }
        self.buckets.classify(product);
        tally.checked += 1;
    }

    /// Products missing a weight.
    pub fn weight(&self) -> &[Product] {
        self.buckets.weight()
    }

    /// Products missing a height.
    pub fn height(&self) -> &[Product] {
        self.buckets.height()
    }

    /// Products missing a width.
    pub fn width(&self) -> &[Product] {
        self.buckets.width()
    }

    /// Products missing a length.
    pub fn length(&self) -> &[Product] {
        self.buckets.length()
    }

    pub fn buckets(&self) -> &MissingBuckets {
        &self.buckets
    }

    pub fn state(&self) -> ScanState {
        self.state
    }

    /// Outcome of the scan, once it has run.
    pub fn status(&self) -> Option<&ScanStatus> {
        self.report.as_ref().map(|r| &r.status)
    }

    pub fn report(&self) -> Option<&ScanReport> {
        self.report.as_ref()
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Give up the auditor, keeping its buckets.
    pub fn into_buckets(self) -> MissingBuckets {
        self.buckets
    }
}
