//! The price histogram for a month.

use axum::{
    Json,
    extract::{Query, State},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    month::{MonthQuery, SaleWindow},
    sale::{SaleFilter, count_sales},
};

use super::InsightsState;

/// The histogram buckets as `(label, min, max)`, covering `[min, max)`.
///
/// Buckets after the first start one above the previous bucket's upper
/// bound, so prices in `[100, 101)`, `[200, 201)` and so on fall in no
/// bucket at all.
const PRICE_BUCKETS: [(&str, f64, Option<f64>); 10] = [
    ("0-100", 0.0, Some(100.0)),
    ("101-200", 101.0, Some(200.0)),
    ("201-300", 201.0, Some(300.0)),
    ("301-400", 301.0, Some(400.0)),
    ("401-500", 401.0, Some(500.0)),
    ("501-600", 501.0, Some(600.0)),
    ("601-700", 601.0, Some(700.0)),
    ("701-800", 701.0, Some(800.0)),
    ("801-900", 801.0, Some(900.0)),
    ("901-above", 901.0, None),
];

/// The number of sales in one price bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRange {
    /// The bucket label, e.g. "101-200".
    pub range: String,
    /// How many sales in the window fall in the bucket.
    pub count: u64,
}

/// Count the sales in `window` per price bucket.
///
/// Always returns all ten buckets in ascending order, including empty ones.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn compute_price_ranges(
    window: SaleWindow,
    connection: &Connection,
) -> Result<Vec<PriceRange>, Error> {
    PRICE_BUCKETS
        .iter()
        .map(|&(label, min, max)| {
            let filter = SaleFilter::default()
                .in_window(window)
                .price_between(min, max);

            Ok::<_, Error>(PriceRange {
                range: label.to_owned(),
                count: count_sales(&filter, connection)?,
            })
        })
        .collect()
}

/// Respond with the price histogram for the requested month.
pub async fn bar_chart_endpoint(
    State(state): State<InsightsState>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<Vec<PriceRange>>, Error> {
    let window = state.window(&query)?;
    let connection = state.connection()?;

    compute_price_ranges(window, &connection).map(Json)
}
