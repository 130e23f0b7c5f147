//! Raw upstream records and the labels of the sources they come from.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Kind of upstream product source.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(from = "String", into = "String")]
pub enum SourceKind {
    /// First-party catalog service.
    #[default]
    Catalog,
    /// Marketplace seller listings. Records carry a seller name.
    Marketplace,
    /// Any other provider.
    Custom(String),
}

impl SourceKind {
    pub fn as_str(&self) -> &str {
        match self {
            SourceKind::Catalog => "catalog",
            SourceKind::Marketplace => "marketplace",
            SourceKind::Custom(name) => name,
        }
    }

    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "catalog" | "product" | "products" => SourceKind::Catalog,
            "marketplace" | "seller" | "sellers" => SourceKind::Marketplace,
            other => SourceKind::Custom(other.to_string()),
        }
    }

    /// Whether records from this kind of source identify their seller.
    pub fn carries_seller(&self) -> bool {
        matches!(self, SourceKind::Marketplace)
    }
}

impl From<String> for SourceKind {
    fn from(s: String) -> Self {
        SourceKind::parse(&s)
    }
}

impl From<SourceKind> for String {
    fn from(kind: SourceKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Name and kind of a configured upstream source.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceLabel {
    pub name: String,
    pub kind: SourceKind,
}

impl SourceLabel {
    pub fn new(name: impl Into<String>, kind: SourceKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    pub fn catalog(name: impl Into<String>) -> Self {
        Self::new(name, SourceKind::Catalog)
    }

    pub fn marketplace(name: impl Into<String>) -> Self {
        Self::new(name, SourceKind::Marketplace)
    }
}

impl fmt::Display for SourceLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.kind)
    }
}

/// A product record exactly as an upstream source returned it.
///
/// The shape is not trusted: keys vary between sources, values may be
/// missing, nested, or of the wrong JSON type.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawProductRecord(Map<String, Value>);

impl RawProductRecord {
    /// Wrap a JSON value. Only objects are records.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    /// Look up a field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// All fields of the record.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for RawProductRecord {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_only_objects_are_records() {
        assert!(RawProductRecord::from_value(json!({"id": 1})).is_some());
        assert!(RawProductRecord::from_value(json!([1, 2])).is_none());
        assert!(RawProductRecord::from_value(json!("product")).is_none());
        assert!(RawProductRecord::from_value(Value::Null).is_none());
    }

    #[test]
    fn test_source_kind_parse() {
        assert_eq!(SourceKind::parse("Catalog"), SourceKind::Catalog);
        assert_eq!(SourceKind::parse("seller"), SourceKind::Marketplace);
        assert_eq!(
            SourceKind::parse("partner-feed"),
            SourceKind::Custom("partner-feed".to_string())
        );
    }

    #[test]
    fn test_source_kind_serializes_as_token() {
        assert_eq!(serde_json::to_value(SourceKind::Marketplace).unwrap(), json!("marketplace"));
        let kind: SourceKind = serde_json::from_value(json!("partner-feed")).unwrap();
        assert_eq!(kind, SourceKind::Custom("partner-feed".to_string()));
    }

    #[test]
    fn test_only_marketplace_carries_seller() {
        assert!(SourceKind::Marketplace.carries_seller());
        assert!(!SourceKind::Catalog.carries_seller());
        assert!(!SourceKind::Custom("x".into()).carries_seller());
    }
}
