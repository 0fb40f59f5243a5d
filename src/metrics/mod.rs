//! Metrics collection and exposition.

mod collector;
mod server;

pub use collector::{MetricHandle, MetricKind, MetricsBuilder, MetricsCollector, MetricsError};
pub use server::{scrape_response, MetricsServer, EXPOSITION_CONTENT_TYPE};
