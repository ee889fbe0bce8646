//! How a month's sales split across categories.

use axum::{
    Json,
    extract::{Query, State},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    month::{MonthQuery, SaleWindow},
    sale::{SaleFilter, count_by_category},
};

use super::InsightsState;

/// The number of sales in one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    /// The category name.
    #[serde(rename = "_id")]
    pub category: String,
    /// How many sales in the window belong to the category.
    pub count: u64,
}

/// Count the sales in `window` per category.
///
/// Only categories with at least one sale in the window are listed.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn compute_category_distribution(
    window: SaleWindow,
    connection: &Connection,
) -> Result<Vec<CategoryCount>, Error> {
    let groups = count_by_category(&SaleFilter::default().in_window(window), connection)?;

    Ok(groups
        .into_iter()
        .map(|(category, count)| CategoryCount { category, count })
        .collect())
}

/// Respond with the category distribution for the requested month.
pub async fn pie_chart_endpoint(
    State(state): State<InsightsState>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<Vec<CategoryCount>>, Error> {
    let window = state.window(&query)?;
    let connection = state.connection()?;

    compute_category_distribution(window, &connection).map(Json)
}

#[cfg(test)]
mod tests {
    use axum::{Router, http::StatusCode, routing::get};
    use axum_test::TestServer;
    use serde_json::json;
    use time::macros::datetime;

    use crate::{
        endpoints,
        insights::test_fixtures::{FixtureSale, state_with},
        month::SaleWindow,
    };

    use super::{CategoryCount, compute_category_distribution, pie_chart_endpoint};

    fn fixture() -> Vec<FixtureSale<'static>> {
        vec![
            ("Monitor", 599.0, "electronics", true, datetime!(2022-01-04 10:00 UTC)),
            ("Hard drive", 64.0, "electronics", false, datetime!(2022-01-12 10:00 UTC)),
            ("Ring", 10.5, "jewelery", true, datetime!(2022-01-20 10:00 UTC)),
            ("Jacket", 56.99, "women's clothing", true, datetime!(2022-02-03 10:00 UTC)),
        ]
    }

    #[test]
    fn counts_only_categories_in_window() {
        let state = state_with(&fixture());
        let connection = state.db_connection.lock().unwrap();
        let window = SaleWindow {
            start: datetime!(2022-01-01 00:00 UTC),
            end: datetime!(2022-01-31 00:00 UTC),
        };

        let mut distribution = compute_category_distribution(window, &connection).unwrap();
        distribution.sort_by(|a, b| a.category.cmp(&b.category));

        assert_eq!(
            distribution,
            vec![
                CategoryCount { category: "electronics".to_owned(), count: 2 },
                CategoryCount { category: "jewelery".to_owned(), count: 1 },
            ]
        );
    }

    #[tokio::test]
    async fn endpoint_uses_id_field_for_category() {
        let app = Router::new()
            .route(endpoints::PIE_CHART, get(pie_chart_endpoint))
            .with_state(state_with(&fixture()));
        let server = TestServer::new(app).expect("Could not create test server.");

        let response = server
            .get(endpoints::PIE_CHART)
            .add_query_param("month", "2")
            .await;

        response.assert_status_ok();
        response.assert_json(&json!([{ "_id": "women's clothing", "count": 1 }]));
    }

    #[tokio::test]
    async fn endpoint_rejects_invalid_months() {
        let app = Router::new()
            .route(endpoints::PIE_CHART, get(pie_chart_endpoint))
            .with_state(state_with(&fixture()));
        let server = TestServer::new(app).expect("Could not create test server.");

        for month in ["13", "0", "abc"] {
            server
                .get(endpoints::PIE_CHART)
                .add_query_param("month", month)
                .expect_failure()
                .await
                .assert_status(StatusCode::BAD_REQUEST);
        }
        server
            .get(endpoints::PIE_CHART)
            .expect_failure()
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }
}
