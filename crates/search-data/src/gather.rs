//! Concurrent gathering across sources.

use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::future::join_all;
use serde_json::Value;

use search_core::catalog::SourceLabel;
use search_core::SearchError;

use crate::client::FetchError;
use crate::source::CatalogSource;

/// How one source's fetch ended.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceStatus {
    Ok,
    /// Always [`SearchError::UpstreamUnavailable`].
    Unavailable(SearchError),
}

impl SourceStatus {
    pub fn is_ok(&self) -> bool {
        matches!(self, SourceStatus::Ok)
    }
}

/// Records from one source, or none with the reason it failed.
#[derive(Debug, Clone)]
pub struct SourceFetch {
    pub label: SourceLabel,
    pub records: Vec<Value>,
    pub status: SourceStatus,
    pub elapsed: Duration,
}

/// Fetch every source concurrently.
///
/// Each fetch runs under its own timeout, so a slow source never delays the
/// others past their budgets. A failed or timed-out source contributes no
/// records. Output order matches `sources`.
pub async fn gather(sources: &[Arc<dyn CatalogSource>]) -> Vec<SourceFetch> {
    join_all(sources.iter().map(|source| fetch_one(source.as_ref()))).await
}

async fn fetch_one(source: &dyn CatalogSource) -> SourceFetch {
    let label = source.label().clone();
    let budget = source.timeout();
    let start = Instant::now();

    let outcome = match tokio::time::timeout(budget, source.fetch()).await {
        Ok(result) => result,
        Err(_) => Err(FetchError::Timeout(budget)),
    };
    let elapsed = start.elapsed();

    match outcome {
        Ok(records) => {
            tracing::debug!(
                source = %label.name,
                records = records.len(),
                elapsed_ms = elapsed.as_millis() as u64,
                "source fetched"
            );
            SourceFetch {
                label,
                records,
                status: SourceStatus::Ok,
                elapsed,
            }
        }
        Err(err) => {
            let error = SearchError::upstream(&label.name, err);
            tracing::warn!(
                kind = %label.kind,
                error = %error,
                elapsed_ms = elapsed.as_millis() as u64,
                "continuing without source"
            );
            SourceFetch {
                label,
                records: Vec::new(),
                status: SourceStatus::Unavailable(error),
                elapsed,
            }
        }
    }
}
