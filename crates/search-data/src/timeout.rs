//! Timeout configuration for upstream fetches.

use std::time::Duration;

use search_core::catalog::SourceKind;

/// Default timeouts per kind of source.
pub trait KindTimeout {
    /// Budget for one fetch from a source of this kind.
    fn default_timeout(&self) -> Duration;
}

impl KindTimeout for SourceKind {
    fn default_timeout(&self) -> Duration {
        match self {
            SourceKind::Catalog => Duration::from_millis(2000),
            SourceKind::Marketplace => Duration::from_millis(1500),
            SourceKind::Custom(_) => Duration::from_millis(2000),
        }
    }
}

/// Timeout configuration for a fetch operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeoutConfig {
    /// Connection timeout.
    pub connect: Duration,
    /// Total operation timeout, body included.
    pub total: Duration,
}

impl TimeoutConfig {
    /// Create a new timeout configuration.
    pub fn new(connect: Duration, total: Duration) -> Self {
        Self { connect, total }
    }

    /// Create from a single total timeout.
    pub fn from_total(total: Duration) -> Self {
        Self {
            connect: total / 4,
            total,
        }
    }

    /// The default budget for a kind of source.
    pub fn for_kind(kind: &SourceKind) -> Self {
        Self::from_total(kind.default_timeout())
    }

    /// The budget with the shortest connect timeout, for a client shared
    /// by several sources.
    pub fn tightest(configs: impl IntoIterator<Item = TimeoutConfig>) -> Option<Self> {
        configs.into_iter().min_by_key(|t| t.connect)
    }
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self::from_total(Duration::from_secs(2))
    }
}
