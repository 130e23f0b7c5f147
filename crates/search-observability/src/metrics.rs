//! Per-request search metrics.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

/// Metrics for one upstream source within a request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceMetrics {
    /// Source name.
    pub source: String,
    /// Source kind (`catalog`, `marketplace`, ...).
    pub kind: String,
    /// Fetch duration (milliseconds).
    pub duration_ms: u64,
    /// Records kept after normalization.
    pub records: usize,
    /// Records dropped during normalization.
    pub dropped: usize,
    /// Whether the fetch succeeded.
    pub success: bool,
    /// Error message if failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SourceMetrics {
    /// Metrics for a source that answered.
    pub fn succeeded(
        source: impl Into<String>,
        kind: impl Into<String>,
        duration: Duration,
        records: usize,
        dropped: usize,
    ) -> Self {
        Self {
            source: source.into(),
            kind: kind.into(),
            duration_ms: duration.as_millis() as u64,
            records,
            dropped,
            success: true,
            error: None,
        }
    }

    /// Metrics for a source that contributed nothing.
    pub fn failed(
        source: impl Into<String>,
        kind: impl Into<String>,
        duration: Duration,
        error: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            kind: kind.into(),
            duration_ms: duration.as_millis() as u64,
            records: 0,
            dropped: 0,
            success: false,
            error: Some(error.into()),
        }
    }
}

/// Summary of one search or suggest request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchMetrics {
    /// `search` or `suggest`.
    pub operation: String,
    /// Wall time of the whole request (milliseconds).
    pub total_duration_ms: u64,
    /// Normalized products fed to the pipeline.
    pub candidates: usize,
    /// Products that passed the filters.
    pub matched: usize,
    /// Entries actually returned.
    pub returned: usize,
    /// Per-source metrics, in configured order.
    pub sources: Vec<SourceMetrics>,
}

impl SearchMetrics {
    /// Sources that failed.
    pub fn failed_sources(&self) -> impl Iterator<Item = &SourceMetrics> {
        self.sources.iter().filter(|s| !s.success)
    }

    /// Whether at least one source failed.
    pub fn is_degraded(&self) -> bool {
        self.failed_sources().next().is_some()
    }

    /// Format as JSON.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Format as human-readable summary.
    pub fn to_summary(&self) -> String {
        let mut lines = vec![format!(
            "{}: {} candidates, {} matched, {} returned in {}ms",
            self.operation, self.candidates, self.matched, self.returned, self.total_duration_ms
        )];

        for source in &self.sources {
            let status = match &source.error {
                None => format!("{} records", source.records),
                Some(err) => format!("FAILED ({})", err),
            };
            let dropped = if source.dropped > 0 {
                format!(", {} dropped", source.dropped)
            } else {
                String::new()
            };
            lines.push(format!(
                "  {} [{}]: {}{} in {}ms",
                source.source, source.kind, status, dropped, source.duration_ms
            ));
        }

        lines.join("\n")
    }
}

/// Collector for request metrics.
#[derive(Debug)]
pub struct MetricsCollector {
    operation: String,
    start: Instant,
    sources: Vec<SourceMetrics>,
}

impl MetricsCollector {
    /// Start timing a request.
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            start: Instant::now(),
            sources: Vec::new(),
        }
    }

    /// Record one source's fetch.
    pub fn record_source(&mut self, metrics: SourceMetrics) {
        self.sources.push(metrics);
    }

    /// Get total elapsed time.
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Finalize, log the summary once, and return the metrics.
    pub fn finish(self, candidates: usize, matched: usize, returned: usize) -> SearchMetrics {
        let metrics = SearchMetrics {
            operation: self.operation,
            total_duration_ms: self.start.elapsed().as_millis() as u64,
            candidates,
            matched,
            returned,
            sources: self.sources,
        };

        let failed = metrics.failed_sources().count();
        tracing::info!(
            operation = %metrics.operation,
            duration_ms = metrics.total_duration_ms,
            candidates,
            matched,
            returned,
            sources = metrics.sources.len(),
            failed_sources = failed,
            "request complete"
        );

        metrics
    }
}
