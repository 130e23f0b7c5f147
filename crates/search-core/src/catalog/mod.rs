//! Product catalog module.
//!
//! Contains the raw upstream record shape and the canonical product.

mod product;
mod raw;

pub use product::NormalizedProduct;
pub use raw::{RawProductRecord, SourceKind, SourceLabel};
