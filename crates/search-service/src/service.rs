//! The search service: upstream sources plus the pipeline.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use search_core::catalog::{NormalizedProduct, SourceLabel};
use search_core::normalize::{merge_batches, NormalizedBatch};
use search_core::search::{QuerySpec, SearchResult, SuggestionEntry, DEFAULT_PAGE_SIZE};
use search_core::{SearchError, SearchPipeline};
use search_data::{gather, CatalogSource, FetchClient, HttpSource, SourceStatus, TimeoutConfig};
use search_observability::{MetricsCollector, SearchMetrics, SourceMetrics};

use crate::config::{ConfigError, SearchConfig};

/// What one source contributed to a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceReport {
    pub name: String,
    pub kind: String,
    pub available: bool,
    pub records: usize,
    pub dropped: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Result of [`SearchService::search`].
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub result: SearchResult,
    pub sources: Vec<SourceReport>,
    pub metrics: SearchMetrics,
}

/// Result of [`SearchService::suggest`].
#[derive(Debug, Clone)]
pub struct SuggestOutcome {
    pub suggestions: Vec<SuggestionEntry>,
    pub sources: Vec<SourceReport>,
    pub metrics: SearchMetrics,
}

/// Products gathered from every source for one request.
struct Gathered {
    products: Vec<NormalizedProduct>,
    reports: Vec<SourceReport>,
    collector: MetricsCollector,
}

/// Searches across a fixed set of upstream sources.
///
/// Upstream failures never fail a request: a source that errors or times
/// out is reported as unavailable and contributes no products.
pub struct SearchService {
    sources: Vec<Arc<dyn CatalogSource>>,
    pipeline: SearchPipeline,
    default_page_size: u32,
}

impl SearchService {
    /// Create a service over `sources`, merged in the given order.
    pub fn new(sources: Vec<Arc<dyn CatalogSource>>, pipeline: SearchPipeline) -> Self {
        Self {
            sources,
            pipeline,
            default_page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Page size used when a request does not give one.
    pub fn with_default_page_size(mut self, page_size: u32) -> Self {
        self.default_page_size = page_size;
        self
    }

    /// Build HTTP sources from a validated config.
    pub fn from_config(config: &SearchConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let shared = TimeoutConfig::tightest(config.sources.iter().map(|s| s.timeouts()))
            .unwrap_or_default();
        let client = FetchClient::with_timeouts(&shared)
            .map_err(|e| ConfigError::Client(e.to_string()))?;

        let sources = config
            .sources
            .iter()
            .map(|source| {
                let label = SourceLabel::new(&source.name, source.kind.clone());
                let mut http = HttpSource::new(label, &source.url, client.clone())
                    .with_timeouts(source.timeouts());
                if let Some(token) = &source.auth_token {
                    http = http.with_auth_token(token);
                }
                Arc::new(http) as Arc<dyn CatalogSource>
            })
            .collect();

        Ok(Self::new(sources, SearchPipeline::new(config.normalize.clone()))
            .with_default_page_size(config.defaults.page_size))
    }

    pub fn default_page_size(&self) -> u32 {
        self.default_page_size
    }

    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    /// Run a search. Only an invalid query is an error, and it is reported
    /// before any upstream is contacted.
    pub async fn search(&self, query: &QuerySpec) -> Result<SearchOutcome, SearchError> {
        query.validate()?;

        let gathered = self.gather("search").await;
        let result = self.pipeline.search(&gathered.products, query)?;
        let metrics =
            gathered
                .collector
                .finish(gathered.products.len(), result.total_matches(), result.len());

        Ok(SearchOutcome {
            result,
            sources: gathered.reports,
            metrics,
        })
    }

    /// Suggestions for a partial query. A blank query contacts no source.
    pub async fn suggest(&self, partial: &str) -> SuggestOutcome {
        if partial.trim().is_empty() {
            return SuggestOutcome {
                suggestions: Vec::new(),
                sources: Vec::new(),
                metrics: MetricsCollector::new("suggest").finish(0, 0, 0),
            };
        }

        let gathered = self.gather("suggest").await;
        let suggestions = self.pipeline.suggest(&gathered.products, partial);
        let metrics = gathered.collector.finish(
            gathered.products.len(),
            suggestions.len(),
            suggestions.len(),
        );

        SuggestOutcome {
            suggestions,
            sources: gathered.reports,
            metrics,
        }
    }

    async fn gather(&self, operation: &str) -> Gathered {
        let mut collector = MetricsCollector::new(operation);
        let fetched = gather(&self.sources).await;

        let mut batches: Vec<NormalizedBatch> = Vec::with_capacity(fetched.len());
        let mut reports = Vec::with_capacity(fetched.len());

        for fetch in fetched {
            let name = fetch.label.name.clone();
            let kind = fetch.label.kind.to_string();

            match fetch.status {
                SourceStatus::Ok => {
                    let batch = self.pipeline.normalize(fetch.label, fetch.records);
                    collector.record_source(SourceMetrics::succeeded(
                        &name,
                        &kind,
                        fetch.elapsed,
                        batch.products.len(),
                        batch.dropped,
                    ));
                    reports.push(SourceReport {
                        name,
                        kind,
                        available: true,
                        records: batch.products.len(),
                        dropped: batch.dropped,
                        reason: None,
                    });
                    batches.push(batch);
                }
                SourceStatus::Unavailable(error) => {
                    let reason = error.reason().to_string();
                    collector.record_source(SourceMetrics::failed(
                        &name,
                        &kind,
                        fetch.elapsed,
                        &reason,
                    ));
                    reports.push(SourceReport {
                        name,
                        kind,
                        available: false,
                        records: 0,
                        dropped: 0,
                        reason: Some(reason),
                    });
                }
            }
        }

        Gathered {
            products: merge_batches(&batches),
            reports,
            collector,
        }
    }
}

impl std::fmt::Debug for SearchService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.sources.iter().map(|s| s.label().name.as_str()).collect();
        f.debug_struct("SearchService")
            .field("sources", &names)
            .field("default_page_size", &self.default_page_size)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use search_core::search::SortKey;
    use search_data::{FetchError, StaticSource};
    use serde_json::json;

    fn service() -> SearchService {
        let sources: Vec<Arc<dyn CatalogSource>> = vec![
            Arc::new(StaticSource::new(
                SourceLabel::catalog("catalog"),
                vec![
                    json!({"id": 1, "title": "Red Mug", "price": "10.00", "category": "Kitchen"}),
                    json!({"id": 2, "title": "Blue Mug", "price": "5.00", "category": "Kitchen"}),
                    json!({"title": "No id"}),
                ],
            )),
            Arc::new(StaticSource::failing(
                SourceLabel::marketplace("marketplace"),
                FetchError::Connection("connection refused".into()),
            )),
        ];
        SearchService::new(sources, SearchPipeline::default())
    }

    #[tokio::test]
    async fn test_search_degrades_past_failed_source() {
        let query = QuerySpec::new().with_text("mug").with_sort(SortKey::PriceAsc);
        let outcome = service().search(&query).await.unwrap();

        let names: Vec<_> = outcome.result.products.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Blue Mug", "Red Mug"]);

        assert_eq!(outcome.sources.len(), 2);
        assert!(outcome.sources[0].available);
        assert_eq!(outcome.sources[0].dropped, 1);
        assert!(!outcome.sources[1].available);
        assert!(outcome.sources[1]
            .reason
            .as_deref()
            .is_some_and(|r| r.contains("connection refused")));
        assert!(outcome.metrics.is_degraded());
        assert_eq!(outcome.metrics.candidates, 2);
    }

    #[tokio::test]
    async fn test_invalid_query_is_an_error() {
        let query = QuerySpec::new().with_pagination(1, 0);
        let err = service().search(&query).await.unwrap_err();
        assert!(matches!(err, SearchError::InvalidQuery(_)));
    }

    #[tokio::test]
    async fn test_all_sources_down_is_empty_result() {
        let sources: Vec<Arc<dyn CatalogSource>> = vec![Arc::new(StaticSource::failing(
            SourceLabel::catalog("catalog"),
            FetchError::Http { status: 502, url: "http://catalog".into() },
        ))];
        let outcome = SearchService::new(sources, SearchPipeline::default())
            .search(&QuerySpec::new())
            .await
            .unwrap();
        assert!(outcome.result.is_empty());
        assert_eq!(outcome.result.total_pages(), 0);
    }

    #[tokio::test]
    async fn test_suggest() {
        let outcome = service().suggest("mug").await;
        assert_eq!(outcome.suggestions.len(), 2);

        let blank = service().suggest("  ").await;
        assert!(blank.suggestions.is_empty());
        assert!(blank.sources.is_empty());
    }

    #[test]
    fn test_from_config() {
        let service = SearchService::from_config(&SearchConfig::default()).unwrap();
        assert_eq!(service.source_count(), 2);
        assert_eq!(service.default_page_size(), DEFAULT_PAGE_SIZE);
    }
}
