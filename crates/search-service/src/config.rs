//! Service configuration.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use search_core::catalog::SourceKind;
use search_core::normalize::NormalizerConfig;
use search_core::search::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use search_data::TimeoutConfig;
use serde::{Deserialize, Serialize};

/// File names searched for, in order, in each directory.
pub const CONFIG_FILE_NAMES: &[&str] = &["search.toml", ".search.toml", "search.json"];

/// Errors loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write config file {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {reason}")]
    Parse { path: PathBuf, reason: String },

    #[error("Failed to serialize config: {0}")]
    Serialize(String),

    #[error("Invalid config: {0}")]
    Invalid(String),

    #[error("Failed to build HTTP client: {0}")]
    Client(String),
}

/// Search service configuration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Upstream sources, queried concurrently and merged in this order.
    pub sources: Vec<SourceConfig>,

    /// Defaults for missing product fields.
    pub normalize: NormalizerConfig,

    /// HTTP listener.
    pub server: ServerConfig,

    /// Request defaults.
    pub defaults: DefaultsConfig,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            sources: vec![
                SourceConfig::new(
                    "catalog",
                    SourceKind::Catalog,
                    "http://localhost:8004/api/products/",
                ),
                SourceConfig::new(
                    "marketplace",
                    SourceKind::Marketplace,
                    "http://localhost:8005/api/sellers/products/",
                ),
            ],
            normalize: NormalizerConfig::default(),
            server: ServerConfig::default(),
            defaults: DefaultsConfig::default(),
        }
    }
}

impl SearchConfig {
    /// Load config from a file. `.json` files are JSON, anything else TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let parsed = if is_json(path) {
            serde_json::from_str(&content).map_err(|e| e.to_string())
        } else {
            toml::from_str(&content).map_err(|e| e.to_string())
        };

        parsed.map_err(|reason| ConfigError::Parse {
            path: path.to_path_buf(),
            reason,
        })
    }

    /// Save config to a file, choosing the format from the extension.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let content = if is_json(path) {
            serde_json::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            self.to_toml()?
        };

        std::fs::write(path, content).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Render as TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))
    }

    /// Find the nearest config file, starting at `start` and walking up.
    pub fn discover(start: impl AsRef<Path>) -> Option<PathBuf> {
        start.as_ref().ancestors().find_map(|dir| {
            CONFIG_FILE_NAMES
                .iter()
                .map(|name| dir.join(name))
                .find(|candidate| candidate.is_file())
        })
    }

    /// Check the config for mistakes that would make every request fail.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sources.is_empty() {
            return Err(ConfigError::Invalid("at least one source is required".into()));
        }

        let mut names = HashSet::new();
        for source in &self.sources {
            if source.name.trim().is_empty() {
                return Err(ConfigError::Invalid("source name cannot be empty".into()));
            }
            if !names.insert(source.name.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate source name '{}'",
                    source.name
                )));
            }
            if !(source.url.starts_with("http://") || source.url.starts_with("https://")) {
                return Err(ConfigError::Invalid(format!(
                    "source '{}' needs an http(s) URL, got '{}'",
                    source.name, source.url
                )));
            }
            if source.timeout_ms == Some(0) {
                return Err(ConfigError::Invalid(format!(
                    "source '{}' has a zero timeout",
                    source.name
                )));
            }
        }

        let page_size = self.defaults.page_size;
        if page_size == 0 || page_size > MAX_PAGE_SIZE {
            return Err(ConfigError::Invalid(format!(
                "defaults.page_size must be between 1 and {}, got {}",
                MAX_PAGE_SIZE, page_size
            )));
        }

        if !(0.0..=search_core::normalize::MAX_RATING).contains(&self.normalize.neutral_rating) {
            return Err(ConfigError::Invalid(format!(
                "normalize.neutral_rating must be between 0 and {}",
                search_core::normalize::MAX_RATING
            )));
        }

        let placeholders = [
            ("placeholder_name", &self.normalize.placeholder_name),
            ("placeholder_image_url", &self.normalize.placeholder_image_url),
            ("default_category", &self.normalize.default_category),
        ];
        for (field, value) in placeholders {
            if value.trim().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "normalize.{} cannot be empty",
                    field
                )));
            }
        }

        Ok(())
    }
}

fn is_json(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "json")
}

/// One upstream source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Unique name, used in logs and source reports.
    pub name: String,

    /// Source kind (`catalog`, `marketplace`, or anything else).
    #[serde(default)]
    pub kind: SourceKind,

    /// List endpoint.
    pub url: String,

    /// Fetch budget; defaults by kind.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,

    /// Bearer token forwarded to the upstream.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_token: Option<String>,
}

impl SourceConfig {
    pub fn new(name: impl Into<String>, kind: SourceKind, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            url: url.into(),
            timeout_ms: None,
            auth_token: None,
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    /// Configured budget, or the default for the source kind.
    pub fn timeouts(&self) -> TimeoutConfig {
        self.timeout()
            .map(TimeoutConfig::from_total)
            .unwrap_or_else(|| TimeoutConfig::for_kind(&self.kind))
    }
}

/// HTTP listener configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8010,
        }
    }
}

/// Request defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    /// Page size when a request gives no `limit`.
    pub page_size: u32,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Generate a commented config template.
pub fn generate_default_config() -> String {
    format!(
        r#"# Product search configuration

# Upstream sources are queried concurrently and merged in the order listed.
# A source that fails or times out contributes no products.

[[sources]]
name = "catalog"
kind = "catalog"
url = "http://localhost:8004/api/products/"
# timeout_ms = 2000

[[sources]]
name = "marketplace"
kind = "marketplace"
url = "http://localhost:8005/api/sellers/products/"
# timeout_ms = 1500
# auth_token = "..."

[normalize]
placeholder_image_url = "https://via.placeholder.com/300x300?text=No+Image"
placeholder_name = "Unnamed product"
neutral_rating = 0.0
default_category = "Other"

[server]
host = "127.0.0.1"
port = 8010

[defaults]
page_size = {}
"#,
        DEFAULT_PAGE_SIZE
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_parses_to_default() {
        let config: SearchConfig = toml::from_str(&generate_default_config()).unwrap();
        assert_eq!(config, SearchConfig::default());
        config.validate().unwrap();
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: SearchConfig = toml::from_str(
            r#"
            [[sources]]
            name = "feed"
            kind = "partner-feed"
            url = "https://feed.example/products"
            timeout_ms = 800
            "#,
        )
        .unwrap();
        assert_eq!(config.sources.len(), 1);
        assert_eq!(config.sources[0].kind, SourceKind::Custom("partner-feed".into()));
        assert_eq!(config.sources[0].timeout(), Some(Duration::from_millis(800)));
        assert_eq!(config.sources[0].timeouts().connect, Duration::from_millis(200));
        assert_eq!(config.server.port, 8010);
        assert_eq!(config.defaults.page_size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_json_config() {
        let config: SearchConfig = serde_json::from_str(
            r#"{"sources": [{"name": "sellers", "kind": "seller", "url": "http://s/"}],
                "server": {"port": 9000}}"#,
        )
        .unwrap();
        assert_eq!(config.sources[0].kind, SourceKind::Marketplace);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9000);
    }

    #[test]
    fn test_validation() {
        let mut config = SearchConfig::default();
        config.sources[1].name = "catalog".into();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = SearchConfig::default();
        config.sources[0].url = String::new();
        assert!(config.validate().is_err());

        let mut config = SearchConfig::default();
        config.defaults.page_size = 0;
        assert!(config.validate().is_err());

        let mut config = SearchConfig::default();
        config.sources.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_blank_normalize_defaults_rejected() {
        let mut config = SearchConfig::default();
        config.normalize.placeholder_name = String::new();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("normalize.placeholder_name"));

        let mut config = SearchConfig::default();
        config.normalize.default_category = "  ".into();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = SearchConfig::default();
        config.normalize.placeholder_image_url = String::new();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_kind_timeouts_when_unset() {
        let config = SearchConfig::default();
        assert_eq!(config.sources[0].timeouts().total, Duration::from_secs(2));
        assert_eq!(config.sources[1].timeouts().total, Duration::from_millis(1500));
    }

    #[test]
    fn test_toml_round_trip_keeps_kinds() {
        let toml = SearchConfig::default().to_toml().unwrap();
        assert!(toml.contains("kind = \"marketplace\""));
        let back: SearchConfig = toml::from_str(&toml).unwrap();
        assert_eq!(back, SearchConfig::default());
    }
}
