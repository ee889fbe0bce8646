//! Sale totals for a month.

use axum::{
    Json,
    extract::{Query, State},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    month::{MonthQuery, SaleWindow},
    sale::{SaleFilter, count_sales, sum_prices},
};

use super::InsightsState;

/// How much sold in a month and how many items did not.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    /// The sum of the prices of sold items.
    pub total_sale_amount: f64,
    /// The number of sold items.
    pub total_sold_items: u64,
    /// The number of items that did not sell.
    pub total_not_sold_items: u64,
}

/// Compute the sale totals for the sales in `window`.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn compute_statistics(window: SaleWindow, connection: &Connection) -> Result<Statistics, Error> {
    let in_window = SaleFilter::default().in_window(window);
    let (total_sale_amount, total_sold_items) =
        sum_prices(&in_window.clone().sold(true), connection)?;
    let total_not_sold_items = count_sales(&in_window.sold(false), connection)?;

    Ok(Statistics {
        total_sale_amount,
        total_sold_items,
        total_not_sold_items,
    })
}

/// Respond with the sale totals for the requested month.
pub async fn statistics_endpoint(
    State(state): State<InsightsState>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<Statistics>, Error> {
    let window = state.window(&query)?;
    let connection = state.connection()?;

    compute_statistics(window, &connection).map(Json)
}

#[cfg(test)]
mod tests {
    use axum::{Router, http::StatusCode, routing::get};
    use axum_test::TestServer;
    use time::macros::datetime;

    use crate::{
        endpoints,
        insights::test_fixtures::{FixtureSale, state_with},
        month::SaleWindow,
        sale::{SaleFilter, count_sales},
        test_utils::get_test_connection,
    };

    use super::{Statistics, compute_statistics, statistics_endpoint};

    fn march_window() -> SaleWindow {
        SaleWindow {
            start: datetime!(2022-03-01 00:00 UTC),
            end: datetime!(2022-03-31 00:00 UTC),
        }
    }

    fn fixture() -> Vec<FixtureSale<'static>> {
        vec![
            ("Backpack", 109.95, "men's clothing", true, datetime!(2022-03-02 09:00 UTC)),
            ("Ring", 10.5, "jewelery", true, datetime!(2022-03-15 18:30 UTC)),
            ("Monitor", 599.0, "electronics", false, datetime!(2022-03-20 11:00 UTC)),
            ("Hard drive", 64.0, "electronics", true, datetime!(2022-03-31 10:00 UTC)),
            ("Jacket", 56.99, "women's clothing", false, datetime!(2022-04-01 00:00 UTC)),
            ("T-shirt", 7.95, "women's clothing", true, datetime!(2021-03-05 12:00 UTC)),
        ]
    }

    #[test]
    fn totals_sold_and_unsold_sales_in_window() {
        let state = state_with(&fixture());
        let connection = state.db_connection.lock().unwrap();

        let statistics = compute_statistics(march_window(), &connection).unwrap();

        assert!((statistics.total_sale_amount - 120.45).abs() < 1e-9);
        assert_eq!(statistics.total_sold_items, 2);
        assert_eq!(statistics.total_not_sold_items, 1);
    }

    #[test]
    fn empty_window_is_all_zeros() {
        let connection = get_test_connection();

        let statistics = compute_statistics(march_window(), &connection).unwrap();

        assert_eq!(
            statistics,
            Statistics {
                total_sale_amount: 0.0,
                total_sold_items: 0,
                total_not_sold_items: 0,
            }
        );
    }

    #[test]
    fn sold_and_unsold_add_up_to_window_count_for_every_month() {
        let state = state_with(&fixture());
        let window_config = state.window_config.clone();
        let connection = state.db_connection.lock().unwrap();

        for number in 1..=12u8 {
            let month = crate::month::SaleMonth::parse(Some(&number.to_string())).unwrap();
            let window = window_config.window_for(month).unwrap();

            let statistics = compute_statistics(window, &connection).unwrap();
            let in_window =
                count_sales(&SaleFilter::default().in_window(window), &connection).unwrap();

            assert_eq!(
                statistics.total_sold_items + statistics.total_not_sold_items,
                in_window,
                "month {number}"
            );
        }
    }

    fn get_test_server() -> TestServer {
        let app = Router::new()
            .route(endpoints::STATISTICS, get(statistics_endpoint))
            .with_state(state_with(&fixture()));

        TestServer::new(app).expect("Could not create test server.")
    }

    #[tokio::test]
    async fn responds_with_camel_case_totals() {
        let server = get_test_server();

        let response = server
            .get(endpoints::STATISTICS)
            .add_query_param("month", "3")
            .await;

        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        assert_eq!(body["totalSoldItems"], 2);
        assert_eq!(body["totalNotSoldItems"], 1);
        assert!(body["totalSaleAmount"].is_number());
    }

    #[tokio::test]
    async fn rejects_invalid_months() {
        let server = get_test_server();

        for month in ["13", "0", "abc", ""] {
            let response = server
                .get(endpoints::STATISTICS)
                .add_query_param("month", month)
                .expect_failure()
                .await;

            response.assert_status(StatusCode::BAD_REQUEST);
            response.assert_json(&serde_json::json!({ "message": "Invalid month provided." }));
        }

        server
            .get(endpoints::STATISTICS)
            .expect_failure()
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }
}
