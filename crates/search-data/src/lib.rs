//! Upstream product sources.
//!
//! This crate provides:
//! - `FetchClient` - HTTP GET of JSON with status and parse checks
//! - `TimeoutConfig` - Per-source timeouts, defaulted from the source kind
//! - `CatalogSource` - A provider of raw product records
//! - `gather` - Concurrent fetch of every source, degrading failures to empty

mod client;
mod envelope;
mod gather;
mod source;
mod timeout;

pub use client::*;
pub use envelope::*;
pub use gather::*;
pub use source::*;
pub use timeout::*;
