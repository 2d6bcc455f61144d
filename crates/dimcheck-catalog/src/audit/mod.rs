//! Catalog audit: the scan loop and its results.

mod auditor;
mod buckets;
mod report;

pub use auditor::{CatalogAuditor, ScanEvent, ScanOptions, DEFAULT_MAX_PAGES};
pub use buckets::{BucketCounts, MissingBuckets};
pub use report::{Interruption, ScanReport, ScanState, ScanStatus};
