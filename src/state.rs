//! Shared application state.

use crate::api::RouteTable;
use crate::config::ServiceKind;
use crate::metrics::{MetricsBuilder, MetricsCollector};
use crate::random::RandomSource;
use crate::service::{install, ServiceError};
use std::sync::Arc;

/// Process-wide state, created once at startup and cloned into every task.
///
/// Metric handles live inside the route handlers; the collector reads the
/// same atomics for scrapes.
#[derive(Clone)]
pub struct AppState {
    /// Mounted profile.
    service: ServiceKind,
    /// Every metric the profile registered.
    metrics: MetricsCollector,
    /// Routes served on the API port.
    routes: Arc<RouteTable>,
    /// Source of gauge deltas.
    random: Arc<dyn RandomSource>,
}

impl AppState {
    /// Register the profile's metrics and routes.
    pub fn new(service: ServiceKind, random: Arc<dyn RandomSource>) -> Result<Self, ServiceError> {
        let mut builder = MetricsBuilder::new();
        let routes = install(service, &mut builder)?;

        Ok(Self {
            service,
            metrics: builder.build(),
            routes: Arc::new(routes),
            random,
        })
    }

    /// Get the mounted profile.
    pub fn service(&self) -> ServiceKind {
        self.service
    }

    /// Get the metrics collector.
    pub fn metrics(&self) -> &MetricsCollector {
        &self.metrics
    }

    /// Get the route table.
    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    /// Get the random source.
    pub fn random(&self) -> &dyn RandomSource {
        self.random.as_ref()
    }
}
