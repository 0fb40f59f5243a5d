//! Procurement profile: market price sync and supply demand processing.

use crate::api::{Reply, Route};
use crate::metrics::{MetricsBuilder, MetricsError};
use crate::random::RandomSource;
use std::ops::RangeInclusive;
use tracing::{info, warn};

/// Tons taken from grain storage by one demand request.
pub const DEMAND_STORAGE_DRAW_TONS: RangeInclusive<i64> = 5..=20;

const SERVICE_NAME: &str = "Digital Farming Procurement";

pub(super) fn routes(metrics: &mut MetricsBuilder) -> Result<Vec<Route>, MetricsError> {
    let price_syncs = metrics.counter(
        "market_price_sync_total",
        "Total market price synchronizations",
    )?;
    let demand_requests = metrics.counter(
        "farming_supply_demand_total",
        "Total supply demand requests processed",
    )?;
    let grain_storage = metrics.gauge(
        "grain_storage_level_tons",
        "Current grain storage level in tons",
    )?;

    Ok(vec![
        Route::get("/", |_: &dyn RandomSource| Reply::Info {
            service: SERVICE_NAME,
            status: "online",
        }),
        Route::get("/sync-prices", move |_: &dyn RandomSource| {
            price_syncs.inc();
            info!("market prices synchronized");
            Reply::Message {
                status: "success",
                message: "Market prices updated",
            }
        }),
        Route::get("/process-demand", move |random: &dyn RandomSource| {
            demand_requests.inc();
            let reduction = random.draw(DEMAND_STORAGE_DRAW_TONS);
            grain_storage.dec_by(reduction);
            warn!(
                reduction_tons = reduction,
                "high demand: grain storage reduced by {} tons", reduction
            );
            Reply::Demand {
                status: "processed",
                demand_level: "high",
            }
        }),
    ])
}
