//! Observability for the product search service.
//!
//! This crate provides:
//! - `init_tracing` - Subscriber setup with human or JSON output
//! - `MetricsCollector` - Per-request timing of every upstream source
//! - `SearchMetrics` - The finished, serializable summary

mod logging;
mod metrics;

pub use logging::*;
pub use metrics::*;
