//! Catalog audit core for dimcheck.
//!
//! Walks a paginated product catalog and reports products whose shipping
//! weight or package dimensions are missing, which breaks shipping rate
//! calculators.
//!
//! - **Catalog**: products, variations, dimensions and attribute values
//! - **Source**: the [`ProductSource`] capability and its WooCommerce implementation
//! - **Audit**: [`CatalogAuditor`], the missing-attribute buckets and scan reports
//!
//! # Example
//!
//! ```rust,ignore
//! use dimcheck_catalog::prelude::*;
//!
//! let auditor = CatalogAuditor::connect("https://shop.example.com", "ck_...", "cs_...")?;
//!
//! if let Some(ScanStatus::Partial(why)) = auditor.status() {
//!     eprintln!("scan incomplete: {}", why);
//! }
//! for product in auditor.weight() {
//!     println!("{} ({}) has no weight", product.label(), product.id);
//! }
//! ```

pub mod error;
pub mod ids;

pub mod audit;
pub mod catalog;
pub mod source;

pub use audit::{CatalogAuditor, MissingBuckets, ScanOptions, ScanReport, ScanStatus};
pub use catalog::{Attribute, Dimensions, Measure, Product};
pub use error::{CatalogError, TransportError, TransportErrorKind};
pub use ids::ProductId;
pub use source::{PageSize, ProductSource, StoreConfig, WooCommerceSource};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::{CatalogError, TransportError, TransportErrorKind};
    pub use crate::ids::ProductId;

    // Catalog
    pub use crate::catalog::{Attribute, Dimensions, Measure, Product};

    // Source
    pub use crate::source::{PageSize, ProductSource, StoreConfig, WooCommerceSource};

    // Audit
    pub use crate::audit::{
        BucketCounts, CatalogAuditor, Interruption, MissingBuckets, ScanEvent, ScanOptions,
        ScanReport, ScanState, ScanStatus,
    };
}
