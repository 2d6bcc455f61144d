//! Product sources: where the auditor reads the catalog from.

mod woocommerce;

pub use woocommerce::{StoreConfig, WooCommerceSource};

use crate::catalog::Product;
use crate::error::{CatalogError, TransportError};
use crate::ids::ProductId;

/// Number of records requested per call.
///
/// The store refuses more than 100 per request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PageSize(u32);

impl PageSize {
    /// The largest page the store will return.
    pub const MAX: PageSize = PageSize(100);

    pub fn new(size: u32) -> Result<Self, CatalogError> {
        if size == 0 || size > Self::MAX.0 {
            return Err(CatalogError::InvalidPageSize(size));
        }
        Ok(Self(size))
    }

    pub const fn get(&self) -> u32 {
        self.0
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self::MAX
    }
}

/// Read access to a paginated product catalog.
///
/// Implementations own transport concerns (auth, timeouts). Calls are made
/// one at a time.
pub trait ProductSource {
    /// List one page of top-level products. Pages start at 1.
    fn list_products(&self, page: u32, page_size: PageSize)
        -> Result<Vec<Product>, TransportError>;

    /// List the variations of a variable product (first page only).
    fn list_variations(
        &self,
        product_id: ProductId,
        page_size: PageSize,
    ) -> Result<Vec<Product>, TransportError>;
}

impl<S: ProductSource + ?Sized> ProductSource for &S {
    fn list_products(
        &self,
        page: u32,
        page_size: PageSize,
    ) -> Result<Vec<Product>, TransportError> {
        (**self).list_products(page, page_size)
    }

    fn list_variations(
        &self,
        product_id: ProductId,
        page_size: PageSize,
    ) -> Result<Vec<Product>, TransportError> {
        (**self).list_variations(product_id, page_size)
    }
}

impl<S: ProductSource + ?Sized> ProductSource for Box<S> {
    fn list_products(
        &self,
        page: u32,
        page_size: PageSize,
    ) -> Result<Vec<Product>, TransportError> {
        (**self).list_products(page, page_size)
    }

    fn list_variations(
        &self,
        product_id: ProductId,
        page_size: PageSize,
    ) -> Result<Vec<Product>, TransportError> {
        (**self).list_variations(product_id, page_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_size_bounds() {
        assert!(PageSize::new(0).is_err());
        assert!(PageSize::new(101).is_err());
        assert_eq!(PageSize::new(1).unwrap().get(), 1);
        assert_eq!(PageSize::new(100).unwrap(), PageSize::MAX);
        assert_eq!(PageSize::default(), PageSize::MAX);
    }
}
