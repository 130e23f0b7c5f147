//! The search pipeline facade.
//!
//! `search` runs filter, sort and paginate over an already-normalized
//! product set; `suggest` runs the suggestion generator. Neither does I/O.

use std::collections::HashMap;

use serde_json::Value;

use crate::catalog::{NormalizedProduct, SourceLabel};
use crate::error::SearchError;
use crate::normalize::{NormalizedBatch, Normalizer, NormalizerConfig};
use crate::search::{
    apply_filters, paginate, sort_products, suggest, Facet, Filter, Pagination, QuerySpec,
    SearchResult, SuggestionEntry,
};

/// Stateless search pipeline.
#[derive(Debug, Clone, Default)]
pub struct SearchPipeline {
    normalizer: Normalizer,
}

impl SearchPipeline {
    /// Create a pipeline with the given normalization defaults.
    pub fn new(config: NormalizerConfig) -> Self {
        Self {
            normalizer: Normalizer::new(config),
        }
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    /// Normalize one source's raw records.
    pub fn normalize(&self, source: SourceLabel, records: Vec<Value>) -> NormalizedBatch {
        self.normalizer.normalize_batch(source, records)
    }

    /// Filter, sort and paginate `products` according to `query`.
    ///
    /// Only an invalid query is an error; an empty catalog is an empty,
    /// well-formed result.
    pub fn search(
        &self,
        products: &[NormalizedProduct],
        query: &QuerySpec,
    ) -> Result<SearchResult, SearchError> {
        query.validate()?;

        let filters = Filter::for_query(query);
        let mut matched = apply_filters(products, &filters);
        sort_products(&mut matched, query.sort);

        let pagination = Pagination::new(query.page, query.page_size, matched.len());
        let page: Vec<NormalizedProduct> = paginate(&matched, query.page, query.page_size)
            .into_iter()
            .cloned()
            .collect();

        tracing::debug!(
            candidates = products.len(),
            matched = pagination.total,
            returned = page.len(),
            sort = query.sort.as_str(),
            "search complete"
        );

        let mut result = SearchResult::new(page, pagination);
        if query.include_facets {
            result = result.with_facets(category_facets(products, query));
        }
        Ok(result)
    }

    /// Suggestions for a partial query.
    pub fn suggest(&self, products: &[NormalizedProduct], partial: &str) -> Vec<SuggestionEntry> {
        suggest(products, partial)
    }
}

/// Category counts over the products that pass every filter except the
/// category one, so a selected category still shows its siblings.
fn category_facets(products: &[NormalizedProduct], query: &QuerySpec) -> Vec<Facet> {
    let filters: Vec<Filter> = Filter::for_query(query)
        .into_iter()
        .filter(|f| !matches!(f, Filter::Category(_)))
        .collect();

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for product in apply_filters(products, &filters) {
        *counts.entry(product.category_name.as_str()).or_insert(0) += 1;
    }

    let selected = query.category.as_deref().map(str::to_lowercase);
    let mut facets: Vec<Facet> = counts
        .into_iter()
        .map(|(name, count)| Facet {
            value: name.to_string(),
            count,
            selected: selected.as_deref() == Some(name.to_lowercase().as_str()),
        })
        .collect();
    facets.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.value.cmp(&b.value)));
    facets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::SortKey;
    use serde_json::json;

    fn products() -> Vec<NormalizedProduct> {
        let batch = SearchPipeline::default().normalize(
            SourceLabel::catalog("catalog"),
            vec![
                json!({"id": 1, "name": "Red Mug", "price": 10, "category": "Kitchen"}),
                json!({"id": 2, "name": "Blue Mug", "price": 5, "category": "Kitchen"}),
                json!({"id": 3, "name": "Red Shirt", "price": 20, "category": "Fashion"}),
            ],
        );
        batch.products
    }

    #[test]
    fn test_invalid_query_is_rejected() {
        let query = QuerySpec::new().with_pagination(0, 10);
        let err = SearchPipeline::default().search(&products(), &query).unwrap_err();
        assert!(matches!(err, SearchError::InvalidQuery(_)));
    }

    #[test]
    fn test_empty_catalog() {
        let result = SearchPipeline::default()
            .search(&[], &QuerySpec::new().with_text("anything"))
            .unwrap();
        assert!(result.is_empty());
        assert_eq!(result.total_matches(), 0);
        assert_eq!(result.total_pages(), 0);
    }

    #[test]
    fn test_facets_ignore_category_filter() {
        let query = QuerySpec::new()
            .with_text("red")
            .with_category("fashion")
            .with_sort(SortKey::PriceAsc)
            .with_facets();
        let result = SearchPipeline::default().search(&products(), &query).unwrap();
        assert_eq!(result.total_matches(), 1);
        assert_eq!(
            result.facets,
            vec![
                Facet { value: "Fashion".into(), count: 1, selected: true },
                Facet { value: "Kitchen".into(), count: 1, selected: false },
            ]
        );
    }

    #[test]
    fn test_facets_ordered_by_count_then_name() {
        let result = SearchPipeline::default()
            .search(&products(), &QuerySpec::new().with_facets())
            .unwrap();
        let facets: Vec<_> = result.facets.iter().map(|f| (f.value.as_str(), f.count)).collect();
        assert_eq!(facets, vec![("Kitchen", 2), ("Fashion", 1)]);
        assert!(result.facets.iter().all(|f| !f.selected));
    }

    #[test]
    fn test_blank_placeholder_name_never_yields_empty_name() {
        let pipeline = SearchPipeline::new(NormalizerConfig {
            placeholder_name: String::new(),
            ..NormalizerConfig::default()
        });
        let batch = pipeline.normalize(SourceLabel::catalog("catalog"), vec![json!({"id": 1})]);
        assert_eq!(batch.products.len(), 1);
        assert!(!batch.products[0].name.is_empty());
    }

    #[test]
    fn test_facets_only_when_requested() {
        let result = SearchPipeline::default().search(&products(), &QuerySpec::new()).unwrap();
        assert!(result.facets.is_empty());
    }
}
