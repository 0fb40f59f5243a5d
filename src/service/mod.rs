//! Service profiles.
//!
//! A profile registers its metrics and returns the routes that mutate them.
//! Exactly one profile is mounted per process.

mod agri_store;
mod procurement;

use crate::api::{RouteError, RouteTable};
use crate::config::ServiceKind;
use crate::metrics::{MetricsBuilder, MetricsError};
use thiserror::Error;

pub use agri_store::ORDER_STOCK_DRAW_KG;
pub use procurement::DEMAND_STORAGE_DRAW_TONS;

/// Errors raised while assembling a profile.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("failed to register metrics: {0}")]
    Metrics(#[from] MetricsError),

    #[error("invalid route table: {0}")]
    Routes(#[from] RouteError),
}

/// Register `kind`'s metrics on `metrics` and build its route table.
pub fn install(kind: ServiceKind, metrics: &mut MetricsBuilder) -> Result<RouteTable, ServiceError> {
    let routes = match kind {
        ServiceKind::AgriStore => agri_store::routes(metrics)?,
        ServiceKind::Procurement => procurement::routes(metrics)?,
    };

    Ok(RouteTable::new(routes)?)
}
