//! All three monthly reports in one response.

use axum::{
    Json,
    extract::{Query, State},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    month::{MonthQuery, SaleWindow},
};

use super::{
    InsightsState,
    categories::{CategoryCount, compute_category_distribution},
    price_ranges::{PriceRange, compute_price_ranges},
    statistics::{Statistics, compute_statistics},
};

/// The statistics, price histogram and category distribution of one month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinedInsights {
    /// The sale totals.
    pub statistics: Statistics,
    /// The price histogram.
    pub bar_chart: Vec<PriceRange>,
    /// The category distribution.
    pub pie_chart: Vec<CategoryCount>,
}

/// Compute every report for `window` against the same connection.
///
/// # Errors
/// Fails with the first error from any of the reports.
pub fn compute_combined(window: SaleWindow, connection: &Connection) -> Result<CombinedInsights, Error> {
    Ok(CombinedInsights {
        statistics: compute_statistics(window, connection)?,
        bar_chart: compute_price_ranges(window, connection)?,
        pie_chart: compute_category_distribution(window, connection)?,
    })
}

/// Respond with every report for the requested month.
///
/// The reports are read under one lock, so they agree with each other even
/// while the store is being re-seeded.
pub async fn combined_endpoint(
    State(state): State<InsightsState>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<CombinedInsights>, Error> {
    let window = state.window(&query)?;
    let connection = state.connection()?;

    compute_combined(window, &connection).map(Json)
}
