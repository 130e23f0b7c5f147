//! Product sources.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use search_core::catalog::SourceLabel;

use crate::client::{FetchClient, FetchError};
use crate::envelope::decode_envelope;
use crate::timeout::{KindTimeout, TimeoutConfig};

/// A provider of raw product records.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Name and kind of this source.
    fn label(&self) -> &SourceLabel;

    /// Budget for one `fetch`. Exceeding it counts as a failure.
    fn timeout(&self) -> Duration {
        self.label().kind.default_timeout()
    }

    /// Fetch every raw record this source currently offers.
    async fn fetch(&self) -> Result<Vec<Value>, FetchError>;
}

/// A source reached over HTTP.
#[derive(Debug, Clone)]
pub struct HttpSource {
    label: SourceLabel,
    url: String,
    timeouts: TimeoutConfig,
    auth_token: Option<String>,
    client: FetchClient,
}

impl HttpSource {
    /// Create a source with the default timeouts for its kind.
    pub fn new(label: SourceLabel, url: impl Into<String>, client: FetchClient) -> Self {
        let timeouts = TimeoutConfig::for_kind(&label.kind);
        Self {
            label,
            url: url.into(),
            timeouts,
            auth_token: None,
            client,
        }
    }

    /// Override the timeouts.
    pub fn with_timeouts(mut self, timeouts: TimeoutConfig) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// Override the total fetch budget.
    pub fn with_timeout(self, total: Duration) -> Self {
        self.with_timeouts(TimeoutConfig::from_total(total))
    }

    pub fn timeouts(&self) -> &TimeoutConfig {
        &self.timeouts
    }

    /// Forward a bearer token with every request. The token is opaque here.
    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl CatalogSource for HttpSource {
    fn label(&self) -> &SourceLabel {
        &self.label
    }

    fn timeout(&self) -> Duration {
        self.timeouts.total
    }

    async fn fetch(&self) -> Result<Vec<Value>, FetchError> {
        let body: Value = self
            .client
            .get_json(&self.url, self.timeouts.total, self.auth_token.as_deref())
            .await?;
        decode_envelope(body)
    }
}

/// An in-memory source, for fixtures and offline runs.
#[derive(Debug, Clone)]
pub struct StaticSource {
    label: SourceLabel,
    records: Vec<Value>,
    delay: Option<Duration>,
    failure: Option<FetchError>,
}

impl StaticSource {
    pub fn new(label: SourceLabel, records: Vec<Value>) -> Self {
        Self {
            label,
            records,
            delay: None,
            failure: None,
        }
    }

    /// A source whose every fetch fails with `error`.
    pub fn failing(label: SourceLabel, error: FetchError) -> Self {
        Self {
            label,
            records: Vec::new(),
            delay: None,
            failure: Some(error),
        }
    }

    /// Sleep before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

#[async_trait]
impl CatalogSource for StaticSource {
    fn label(&self) -> &SourceLabel {
        &self.label
    }

    async fn fetch(&self) -> Result<Vec<Value>, FetchError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match &self.failure {
            Some(err) => Err(err.clone()),
            None => Ok(self.records.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_http_source_timeout_defaults_to_kind() {
        let client = FetchClient::new().unwrap();
        let source = HttpSource::new(SourceLabel::marketplace("sellers"), "http://x", client);
        assert_eq!(source.timeout(), Duration::from_millis(1500));
        assert_eq!(source.timeouts().connect, Duration::from_millis(375));

        let source = source.with_timeout(Duration::from_millis(800));
        assert_eq!(source.timeout(), Duration::from_millis(800));
        assert_eq!(source.timeouts().connect, Duration::from_millis(200));
    }

    #[tokio::test]
    async fn test_static_source() {
        let source = StaticSource::new(SourceLabel::catalog("fixture"), vec![json!({"id": 1})]);
        assert_eq!(source.fetch().await.unwrap(), vec![json!({"id": 1})]);

        let broken = StaticSource::failing(
            SourceLabel::catalog("broken"),
            FetchError::Connection("refused".into()),
        );
        assert!(broken.fetch().await.is_err());
    }
}
