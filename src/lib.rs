//! agrimon - farm store and procurement demo services
//!
//! Serves a small JSON API whose routes bump Prometheus counters and draw
//! down gauges, with the metrics exported on a second port:
//! - Two selectable service profiles (`agri-store`, `procurement`)
//! - An explicit, duplicate-checked route table
//! - Injectable random sources for gauge deltas
//! - Prometheus text exposition via prometheus-client

pub mod api;
pub mod config;
pub mod metrics;
pub mod random;
pub mod service;
pub mod state;
pub mod util;

pub use config::Config;
pub use state::AppState;
