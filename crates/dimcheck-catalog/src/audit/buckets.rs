//! Per-attribute collections of products missing that attribute.

use serde::Serialize;

use crate::catalog::{Attribute, Product};

/// Products lacking each shipping attribute, in discovery order.
///
/// The buckets are independent: a product missing every attribute sits in
/// all four.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MissingBuckets {
    weight: Vec<Product>,
    height: Vec<Product>,
    width: Vec<Product>,
    length: Vec<Product>,
}

/// Size of each bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BucketCounts {
    pub weight: usize,
    pub height: usize,
    pub width: usize,
    pub length: usize,
}

impl BucketCounts {
    pub fn get(&self, attribute: Attribute) -> usize {
        match attribute {
            Attribute::Weight => self.weight,
            Attribute::Height => self.height,
            Attribute::Width => self.width,
            Attribute::Length => self.length,
        }
    }
}

impl MissingBuckets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Products missing `attribute`.
    pub fn get(&self, attribute: Attribute) -> &[Product] {
        match attribute {
            Attribute::Weight => &self.weight,
            Attribute::Height => &self.height,
            Attribute::Width => &self.width,
            Attribute::Length => &self.length,
        }
    }

    pub fn weight(&self) -> &[Product] {
        &self.weight
    }

    pub fn height(&self) -> &[Product] {
        &self.height
    }

    pub fn width(&self) -> &[Product] {
        &self.width
    }

    pub fn length(&self) -> &[Product] {
        &self.length
    }

    /// Buckets paired with their attribute, in check order.
    pub fn iter(&self) -> impl Iterator<Item = (Attribute, &[Product])> + '_ {
        Attribute::ALL.into_iter().map(move |a| (a, self.get(a)))
    }

    /// Whether every bucket is empty.
    pub fn is_empty(&self) -> bool {
        self.iter().all(|(_, products)| products.is_empty())
    }

    /// Sum of bucket sizes. A product in two buckets counts twice.
    pub fn total(&self) -> usize {
        self.iter().map(|(_, products)| products.len()).sum()
    }

    pub fn counts(&self) -> BucketCounts {
        BucketCounts {
            weight: self.weight.len(),
            height: self.height.len(),
            width: self.width.len(),
            length: self.length.len(),
        }
    }

    /// Classify `product` into every bucket whose attribute it lacks.
    ///
    /// Returns how many buckets received it.
    pub(crate) fn classify(&mut self, product: &Product) -> usize {
        let mut placed = 0;
        for attribute in Attribute::ALL {
            if attribute.is_missing_on(product) {
                self.bucket_mut(attribute).push(product.clone());
                placed += 1;
            }
        }
        placed
    }

    pub(crate) fn clear(&mut self) {
        self.weight.clear();
        self.height.clear();
        self.width.clear();
        self.length.clear();
    }

    fn bucket_mut(&mut self, attribute: Attribute) -> &mut Vec<Product> {
        match attribute {
            Attribute::Weight => &mut self.weight,
            Attribute::Height => &mut self.height,
            Attribute::Width => &mut self.width,
            Attribute::Length => &mut self.length,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Dimensions;

    fn complete(id: u64) -> Product {
        Product::new(id, "complete")
            .with_weight("1")
            .with_dimensions(Dimensions::new("1", "1", "1"))
    }

    #[test]
    fn test_complete_product_goes_nowhere() {
        let mut buckets = MissingBuckets::new();
        assert_eq!(buckets.classify(&complete(1)), 0);
        assert!(buckets.is_empty());
    }

    #[test]
    fn test_product_missing_everything_lands_in_all_four() {
        let mut buckets = MissingBuckets::new();
        let bare = Product::new(2u64, "bare");
        assert_eq!(buckets.classify(&bare), 4);
        for (_, products) in buckets.iter() {
            assert_eq!(products, std::slice::from_ref(&bare));
        }
        assert_eq!(buckets.total(), 4);
    }

    #[test]
    fn test_zero_counts_as_present() {
        let mut buckets = MissingBuckets::new();
        let product = Product::new(3u64, "flat")
            .with_weight("0")
            .with_dimensions(Dimensions::new("10", "", "0"));
        buckets.classify(&product);
        assert!(buckets.weight().is_empty());
        assert!(buckets.height().is_empty());
        assert!(buckets.length().is_empty());
        assert_eq!(buckets.width().len(), 1);
    }

    #[test]
    fn test_discovery_order_is_kept() {
        let mut buckets = MissingBuckets::new();
        for id in [5u64, 3, 9] {
            buckets.classify(&Product::new(id, "x").with_dimensions(Dimensions::new("1", "1", "1")));
        }
        let ids: Vec<u64> = buckets.weight().iter().map(|p| p.id.get()).collect();
        assert_eq!(ids, vec![5, 3, 9]);
        assert_eq!(
            buckets.counts(),
            BucketCounts {
                weight: 3,
                ..BucketCounts::default()
            }
        );
    }

    #[test]
    fn test_clear() {
        let mut buckets = MissingBuckets::new();
        buckets.classify(&Product::new(1u64, "bare"));
        buckets.clear();
        assert!(buckets.is_empty());
        assert_eq!(buckets.counts().get(Attribute::Height), 0);
    }
}
