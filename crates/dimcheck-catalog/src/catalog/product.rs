//! Product, variation and dimension records as the store reports them.

use crate::catalog::Measure;
use crate::error::CatalogError;
use crate::ids::{self, ProductId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Package dimensions of a product.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    #[serde(default)]
    pub length: Measure,
    #[serde(default)]
    pub width: Measure,
    #[serde(default)]
    pub height: Measure,
}

impl Dimensions {
    pub fn new(
        length: impl Into<Measure>,
        width: impl Into<Measure>,
        height: impl Into<Measure>,
    ) -> Self {
        Self {
            length: length.into(),
            width: width.into(),
            height: height.into(),
        }
    }
}

/// A catalog record: either a top-level product or one of its variations.
///
/// Only the fields the audit and its reports need are decoded; the rest of
/// the store's payload is ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Unique product identifier.
    pub id: ProductId,
    /// Product name. Older stores leave it out for variations.
    #[serde(default)]
    pub name: String,
    /// Stock keeping unit.
    #[serde(default)]
    pub sku: String,
    /// Storefront URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permalink: Option<String>,
    /// Parent product, for variations.
    #[serde(
        default,
        deserialize_with = "ids::parent_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub parent_id: Option<ProductId>,
    /// Shipping weight.
    #[serde(default)]
    pub weight: Measure,
    /// Package dimensions. `None` when the record has no dimensions object.
    #[serde(default)]
    pub dimensions: Option<Dimensions>,
    /// Variation IDs, in store order. Empty unless the product is variable.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub variations: Vec<ProductId>,
}

impl Product {
    /// Create a product with every shipping attribute unset.
    pub fn new(id: impl Into<ProductId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            sku: String::new(),
            permalink: None,
            parent_id: None,
            weight: Measure::unset(),
            dimensions: Some(Dimensions::default()),
            variations: Vec::new(),
        }
    }

    /// Set the weight.
    pub fn with_weight(mut self, weight: impl Into<Measure>) -> Self {
        self.weight = weight.into();
        self
    }

    /// Set the dimensions.
    pub fn with_dimensions(mut self, dimensions: Dimensions) -> Self {
        self.dimensions = Some(dimensions);
        self
    }

    /// Set the SKU.
    pub fn with_sku(mut self, sku: impl Into<String>) -> Self {
        self.sku = sku.into();
        self
    }

    /// Declare variation IDs, making this a variable product.
    pub fn with_variations<I, T>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<ProductId>,
    {
        self.variations = ids.into_iter().map(Into::into).collect();
        self
    }

    /// Mark this record as a variation of `parent`.
    pub fn variation_of(mut self, parent: impl Into<ProductId>) -> Self {
        self.parent_id = Some(parent.into());
        self
    }

    /// Check if this is a variable product (has variations to expand).
    pub fn has_variations(&self) -> bool {
        !self.variations.is_empty()
    }

    /// Check if this record is a variation.
    pub fn is_variation(&self) -> bool {
        self.parent_id.is_some()
    }

    /// Whether the record came without a dimensions object at all.
    pub fn is_malformed(&self) -> bool {
        self.dimensions.is_none()
    }

    /// Name to show in reports, falling back to SKU and then ID.
    pub fn label(&self) -> String {
        if !self.name.is_empty() {
            self.name.clone()
        } else if !self.sku.is_empty() {
            self.sku.clone()
        } else {
            format!("#{}", self.id)
        }
    }
}

/// A shipping attribute checked by the audit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Attribute {
    Weight,
    Height,
    Width,
    Length,
}

impl Attribute {
    /// All attributes, in check order.
    pub const ALL: [Attribute; 4] = [
        Attribute::Weight,
        Attribute::Height,
        Attribute::Width,
        Attribute::Length,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Attribute::Weight => "weight",
            Attribute::Height => "height",
            Attribute::Width => "width",
            Attribute::Length => "length",
        }
    }

    /// The product's value for this attribute.
    ///
    /// Dimension attributes resolve to `None` when the record has no
    /// dimensions object.
    pub fn of<'a>(&self, product: &'a Product) -> Option<&'a Measure> {
        match self {
            Attribute::Weight => Some(&product.weight),
            Attribute::Height => product.dimensions.as_ref().map(|d| &d.height),
            Attribute::Width => product.dimensions.as_ref().map(|d| &d.width),
            Attribute::Length => product.dimensions.as_ref().map(|d| &d.length),
        }
    }

    /// Whether `product` lacks this attribute.
    pub fn is_missing_on(&self, product: &Product) -> bool {
        self.of(product).map_or(true, Measure::is_missing)
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Attribute {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "weight" => Ok(Attribute::Weight),
            "height" => Ok(Attribute::Height),
            "width" => Ok(Attribute::Width),
            "length" => Ok(Attribute::Length),
            other => Err(CatalogError::UnknownAttribute(other.to_string())),
        }
    }
}
