//! Product search service.
//!
//! Wires configured upstream sources to the search pipeline:
//!
//! - [`SearchConfig`]: sources, normalization defaults, server and paging
//! - [`SearchService`]: gather, normalize, merge, then search or suggest
//! - [`http`]: the JSON API (`/api/search`, `/api/search/suggestions`,
//!   `/health`, `/ping`)

pub mod config;
pub mod http;
pub mod service;

pub use config::{ConfigError, SearchConfig, ServerConfig, SourceConfig, CONFIG_FILE_NAMES};
pub use service::{SearchOutcome, SearchService, SourceReport, SuggestOutcome};
