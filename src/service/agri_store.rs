//! Farm store profile: product updates and orders.

use crate::api::{Reply, Route};
use crate::metrics::{MetricsBuilder, MetricsError};
use crate::random::RandomSource;
use std::ops::RangeInclusive;

/// Kilograms taken from stock by one order.
pub const ORDER_STOCK_DRAW_KG: RangeInclusive<i64> = 1..=5;

pub(super) fn routes(metrics: &mut MetricsBuilder) -> Result<Vec<Route>, MetricsError> {
    let product_updates = metrics.counter("agri_product_updates_total", "Total product updates")?;
    let orders = metrics.counter("agri_orders_total", "Total orders processed")?;
    let stock_level = metrics.gauge("agri_stock_level_kg", "Current stock levels")?;

    Ok(vec![
        Route::get("/update-product", move |_: &dyn RandomSource| {
            product_updates.inc();
            Reply::Status { status: "updated" }
        }),
        Route::get("/order", move |random: &dyn RandomSource| {
            orders.inc();
            stock_level.dec_by(random.draw(ORDER_STOCK_DRAW_KG));
            Reply::Status { status: "ordered" }
        }),
    ])
}
