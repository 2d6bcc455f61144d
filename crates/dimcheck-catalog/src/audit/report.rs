//! Scan outcome types.

use serde::Serialize;

use super::BucketCounts;
use crate::error::TransportError;
use crate::ids::ProductId;

/// Lifecycle of a [`CatalogAuditor`](super::CatalogAuditor).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanState {
    Unscanned,
    Scanning,
    /// Every page was read.
    Scanned,
    /// The scan stopped early; buckets hold what was read before that.
    PartiallyScanned,
}

/// Why a scan stopped before the catalog was exhausted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum Interruption {
    /// The source failed while listing `page`, or while listing the
    /// variations of `product` on that page.
    Transport {
        page: u32,
        #[serde(skip_serializing_if = "Option::is_none")]
        product: Option<ProductId>,
        error: TransportError,
    },
    /// The page cap was reached and the next page was still non-empty.
    PageLimit { pages: u32 },
}

impl std::fmt::Display for Interruption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Interruption::Transport {
                page,
                product: Some(product),
                error,
            } => write!(
                f,
                "listing variations of product {} on page {} failed: {}",
                product, page, error
            ),
            Interruption::Transport {
                page,
                product: None,
                error,
            } => write!(f, "listing page {} failed: {}", page, error),
            Interruption::PageLimit { pages } => {
                write!(f, "stopped after {} pages (page limit reached)", pages)
            }
        }
    }
}

/// Whether a scan read the whole catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ScanStatus {
    Success,
    Partial(Interruption),
}

impl ScanStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, ScanStatus::Success)
    }

    pub fn interruption(&self) -> Option<&Interruption> {
        match self {
            ScanStatus::Success => None,
            ScanStatus::Partial(interruption) => Some(interruption),
        }
    }
}

/// Summary of a finished scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanReport {
    pub status: ScanStatus,
    /// Pages fully classified. The terminating empty page is not counted.
    pub pages: u32,
    /// Calls made to the source, including a failing or terminating one.
    pub requests: u32,
    /// Records classified (parents and variations).
    pub checked: usize,
    /// Records skipped for lacking a dimensions object.
    pub skipped: usize,
    pub counts: BucketCounts,
}

impl ScanReport {
    /// True only when the whole catalog was read.
    pub fn is_complete(&self) -> bool {
        self.status.is_success()
    }
}
