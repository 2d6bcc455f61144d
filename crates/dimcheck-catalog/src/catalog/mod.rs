//! Product catalog module.
//!
//! Contains the read-only record types the audit inspects.

mod measure;
mod product;

pub use measure::Measure;
pub use product::{Attribute, Dimensions, Product};
