//! Product search pipeline.
//!
//! Normalizes product records from heterogeneous upstream sources into one
//! canonical shape, then filters, sorts, paginates and suggests over them.
//!
//! - **Catalog**: [`NormalizedProduct`], raw records, source labels
//! - **Normalize**: prioritized field lookup with per-field defaults
//! - **Search**: filters, sort keys, pagination, suggestions
//!
//! # Example
//!
//! ```rust
//! use search_core::prelude::*;
//! use serde_json::json;
//!
//! let pipeline = SearchPipeline::default();
//! let batch = pipeline.normalize(
//!     SourceLabel::catalog("catalog"),
//!     vec![json!({"id": 1, "title": "Red Mug", "price": "10.00", "category": "Kitchen"})],
//! );
//!
//! let query = QuerySpec::new().with_text("mug").with_sort(SortKey::PriceAsc);
//! let result = pipeline.search(&batch.products, &query).unwrap();
//! assert_eq!(result.total_matches(), 1);
//! ```

pub mod catalog;
pub mod error;
pub mod ids;
pub mod normalize;
pub mod pipeline;
pub mod search;

pub use error::SearchError;
pub use ids::ProductId;
pub use pipeline::SearchPipeline;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::catalog::{NormalizedProduct, RawProductRecord, SourceKind, SourceLabel};
    pub use crate::error::SearchError;
    pub use crate::ids::ProductId;
    pub use crate::normalize::{merge_batches, NormalizedBatch, Normalizer, NormalizerConfig};
    pub use crate::pipeline::SearchPipeline;
    pub use crate::search::{
        Facet, Filter, Pagination, QueryParams, QuerySpec, SearchResult, SortKey,
        SuggestionEntry, SuggestionKind,
    };
}
