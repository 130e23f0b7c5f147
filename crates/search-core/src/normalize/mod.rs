//! Normalization of heterogeneous upstream records.
//!
//! Each canonical field is resolved by an ordered list of candidate keys,
//! so the catalog service (`title`, `image`, `stock`), the marketplace
//! service (`images[]`, `seller_name`) and already-normalized records
//! (`imageUrl`, `categoryName`) all map onto [`NormalizedProduct`].

mod lookup;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::catalog::{NormalizedProduct, RawProductRecord, SourceLabel};
use crate::error::SearchError;
use crate::ids::ProductId;
use lookup::{
    first_count, first_flag, first_identifier, first_number, first_text, nested_name, usable_str,
};

const ID_KEYS: &[&str] = &["id", "product_id", "productId", "pk", "uuid"];
const NAME_KEYS: &[&str] = &["name", "title", "product_name"];
const DESCRIPTION_KEYS: &[&str] = &["description", "short_description"];
const PRICE_KEYS: &[&str] = &["price", "unit_price", "price_amount"];
const IMAGE_LIST_KEY: &str = "images";
const IMAGE_ENTRY_URL_KEYS: &[&str] = &["url", "image_url", "src"];
const PRIMARY_FLAG_KEYS: &[&str] = &["isPrimary", "is_primary"];
const IMAGE_KEYS: &[&str] = &["imageUrl", "image_url", "image", "thumbnail"];
const CATEGORY_OBJECT_KEY: &str = "category";
const CATEGORY_KEYS: &[&str] = &["categoryName", "category_name", "category"];
const STOCK_KEYS: &[&str] = &["stockQuantity", "stock_quantity", "stock", "quantity"];
const RATING_KEYS: &[&str] = &["rating", "average_rating"];
const REVIEW_COUNT_KEYS: &[&str] = &["reviewCount", "review_count", "reviews_count"];
const SELLER_KEYS: &[&str] = &["sellerName", "seller_name"];
const SELLER_OBJECT_KEY: &str = "seller";

/// Highest rating a product can carry.
pub const MAX_RATING: f64 = 5.0;

/// Defaults applied when a record lacks a field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizerConfig {
    /// Image used when a record has none.
    pub placeholder_image_url: String,
    /// Name used when a record has none.
    pub placeholder_name: String,
    /// Rating given to unrated products.
    pub neutral_rating: f64,
    /// Category given to uncategorized products.
    pub default_category: String,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            placeholder_image_url: "https://via.placeholder.com/300x300?text=No+Image".to_string(),
            placeholder_name: "Unnamed product".to_string(),
            neutral_rating: 0.0,
            default_category: "Other".to_string(),
        }
    }
}

/// Products normalized from one source, plus how many records were dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedBatch {
    pub source: SourceLabel,
    pub products: Vec<NormalizedProduct>,
    pub dropped: usize,
}

impl NormalizedBatch {
    /// A batch for a source that contributed nothing.
    pub fn empty(source: SourceLabel) -> Self {
        Self {
            source,
            products: Vec::new(),
            dropped: 0,
        }
    }
}

/// Maps raw records onto [`NormalizedProduct`].
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    config: NormalizerConfig,
}

impl Normalizer {
    /// Blank placeholders fall back to their defaults, so a normalized
    /// product never has an empty name, category or image.
    pub fn new(config: NormalizerConfig) -> Self {
        let defaults = NormalizerConfig::default();
        let config = NormalizerConfig {
            placeholder_image_url: non_blank(
                config.placeholder_image_url,
                defaults.placeholder_image_url,
            ),
            placeholder_name: non_blank(config.placeholder_name, defaults.placeholder_name),
            default_category: non_blank(config.default_category, defaults.default_category),
            ..config
        };
        Self { config }
    }

    pub fn config(&self) -> &NormalizerConfig {
        &self.config
    }

    /// Normalize one JSON value. Non-object values are malformed.
    pub fn normalize_value(
        &self,
        source: &SourceLabel,
        value: Value,
    ) -> Result<NormalizedProduct, SearchError> {
        let record = RawProductRecord::from_value(value)
            .ok_or_else(|| SearchError::malformed(&source.name, "record is not a JSON object"))?;
        self.normalize_record(source, &record)
    }

    /// Normalize one record. Fails only when no identifier resolves.
    pub fn normalize_record(
        &self,
        source: &SourceLabel,
        record: &RawProductRecord,
    ) -> Result<NormalizedProduct, SearchError> {
        let fields = record.fields();

        let id = first_identifier(fields, ID_KEYS)
            .and_then(ProductId::try_new)
            .ok_or_else(|| SearchError::malformed(&source.name, "no usable identifier"))?;

        let name = first_text(fields, NAME_KEYS)
            .map(str::to_string)
            .unwrap_or_else(|| self.config.placeholder_name.clone());

        let description = first_text(fields, DESCRIPTION_KEYS)
            .map(str::to_string)
            .unwrap_or_default();

        let price = first_number(fields, PRICE_KEYS)
            .filter(|p| *p > 0.0)
            .unwrap_or(0.0);

        let rating = first_number(fields, RATING_KEYS)
            .map(|r| r.clamp(0.0, MAX_RATING))
            .unwrap_or(self.config.neutral_rating);

        let seller_name = if source.kind.carries_seller() {
            first_text(fields, SELLER_KEYS)
                .or_else(|| nested_name(fields, SELLER_OBJECT_KEY))
                .map(str::to_string)
        } else {
            None
        };

        Ok(NormalizedProduct {
            id,
            name,
            description,
            price,
            image_url: self.resolve_image(fields),
            category_name: self.resolve_category(fields),
            stock_quantity: first_count(fields, STOCK_KEYS).unwrap_or(0),
            rating,
            review_count: first_count(fields, REVIEW_COUNT_KEYS).unwrap_or(0),
            seller_name,
        })
    }

    /// Primary image entry, then first image entry, then a flat field,
    /// then the placeholder.
    fn resolve_image(&self, fields: &Map<String, Value>) -> String {
        let entries = fields
            .get(IMAGE_LIST_KEY)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();

        let primary = entries.iter().find_map(|entry| {
            let entry = entry.as_object()?;
            if first_flag(entry, PRIMARY_FLAG_KEYS) {
                first_text(entry, IMAGE_ENTRY_URL_KEYS)
            } else {
                None
            }
        });

        primary
            .or_else(|| entries.iter().find_map(image_entry_url))
            .or_else(|| first_text(fields, IMAGE_KEYS))
            .map(str::to_string)
            .unwrap_or_else(|| self.config.placeholder_image_url.clone())
    }

    /// Nested category object name, then a flat field, then the default.
    fn resolve_category(&self, fields: &Map<String, Value>) -> String {
        nested_name(fields, CATEGORY_OBJECT_KEY)
            .or_else(|| first_text(fields, CATEGORY_KEYS))
            .map(str::to_string)
            .unwrap_or_else(|| self.config.default_category.clone())
    }

    /// Normalize everything one source returned, counting drops.
    pub fn normalize_batch(&self, source: SourceLabel, records: Vec<Value>) -> NormalizedBatch {
        let mut products = Vec::with_capacity(records.len());
        let mut dropped = 0;

        for value in records {
            match self.normalize_value(&source, value) {
                Ok(product) => products.push(product),
                Err(e) => {
                    dropped += 1;
                    tracing::debug!(source = %source.name, error = %e, "dropping record");
                }
            }
        }

        if dropped > 0 {
            tracing::info!(
                source = %source.name,
                kept = products.len(),
                dropped,
                "dropped records without a usable identifier"
            );
        }

        NormalizedBatch {
            source,
            products,
            dropped,
        }
    }
}

fn non_blank(value: String, fallback: String) -> String {
    if value.trim().is_empty() {
        fallback
    } else {
        value
    }
}

/// URL of an image entry, which is either an object or a bare string.
fn image_entry_url(entry: &Value) -> Option<&str> {
    match entry {
        Value::Object(obj) => first_text(obj, IMAGE_ENTRY_URL_KEYS),
        other => usable_str(other),
    }
}

/// Concatenate batches in the given order. No de-duplication.
pub fn merge_batches<'a>(
    batches: impl IntoIterator<Item = &'a NormalizedBatch>,
) -> Vec<NormalizedProduct> {
    batches
        .into_iter()
        .flat_map(|batch| batch.products.iter().cloned())
        .collect()
}
