//! Defines the route handler for listing and searching sales.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Query, State},
};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    pagination::{Page, PageQuery, PaginationConfig},
};

use super::{
    model::Sale,
    store::{SaleFilter, find_sales},
};

/// How the `search` parameter of a listing request is applied.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchFilter {
    /// No search text, every sale matches.
    Everything,
    /// The search text is a number: match sales with exactly this price.
    ///
    /// Numeric searches never fall back to matching the title or
    /// description, even when the number appears in them.
    Price(f64),
    /// Match sales whose title or description contains the text, ignoring case.
    Text(String),
}

impl SearchFilter {
    /// Decide how to apply the raw search text.
    pub fn parse(search: &str) -> Self {
        let search = search.trim();

        if search.is_empty() {
            return Self::Everything;
        }

        match search.parse::<f64>() {
            Ok(price) if price.is_finite() => Self::Price(price),
            _ => Self::Text(search.to_owned()),
        }
    }

    fn into_sale_filter(self) -> SaleFilter {
        match self {
            Self::Everything => SaleFilter::default(),
            Self::Price(price) => SaleFilter {
                price: Some(price),
                ..Default::default()
            },
            Self::Text(text) => SaleFilter {
                text: Some(text),
                ..Default::default()
            },
        }
    }
}

/// Get one page of the sales matching `search`, in the order they were stored.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn list_sales(
    search: SearchFilter,
    page: Page,
    connection: &Connection,
) -> Result<Vec<Sale>, Error> {
    find_sales(
        &search.into_sale_filter(),
        page.offset(),
        page.size,
        connection,
    )
}

/// The search parameter of a listing request.
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    /// Free text, or a number to match a price exactly.
    pub search: Option<String>,
}

/// The state needed for listing sales.
#[derive(Debug, Clone)]
pub struct ListSalesState {
    /// The database connection holding the sales.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The config that controls how listing requests are paged.
    pub pagination_config: PaginationConfig,
}

impl FromRef<AppState> for ListSalesState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            pagination_config: state.pagination_config.clone(),
        }
    }
}

/// Respond with one page of sales as a JSON array.
pub async fn list_sales_endpoint(
    State(state): State<ListSalesState>,
    Query(search_query): Query<SearchQuery>,
    Query(page_query): Query<PageQuery>,
) -> Result<Json<Vec<Sale>>, Error> {
    let page = Page::resolve(&page_query, &state.pagination_config);
    let search = SearchFilter::parse(search_query.search.as_deref().unwrap_or_default());
    tracing::debug!("listing sales with {search:?} on {page:?}");

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    list_sales(search, page, &connection).map(Json)
}

#[cfg(test)]
mod search_filter_tests {
    use super::SearchFilter;

    #[test]
    fn blank_search_matches_everything() {
        assert_eq!(SearchFilter::parse(""), SearchFilter::Everything);
        assert_eq!(SearchFilter::parse("   "), SearchFilter::Everything);
    }

    #[test]
    fn numbers_search_by_price() {
        assert_eq!(SearchFilter::parse("45"), SearchFilter::Price(45.0));
        assert_eq!(SearchFilter::parse(" 109.95 "), SearchFilter::Price(109.95));
    }

    #[test]
    fn non_finite_numbers_search_by_text() {
        assert_eq!(
            SearchFilter::parse("inf"),
            SearchFilter::Text("inf".to_owned())
        );
        assert_eq!(
            SearchFilter::parse("NaN"),
            SearchFilter::Text("NaN".to_owned())
        );
    }

    #[test]
    fn other_text_searches_by_text() {
        assert_eq!(
            SearchFilter::parse("Backpack "),
            SearchFilter::Text("Backpack".to_owned())
        );
    }
}


#[cfg(test)]
mod endpoint_tests {
    use axum::{Router, routing::get};
    use axum_test::TestServer;
    use time::macros::datetime;

    use crate::{
        endpoints,
        pagination::PaginationConfig,
        sale::{Sale, insert_sales},
        test_utils::get_test_db_connection,
    };

    use super::{ListSalesState, list_sales_endpoint};

    fn get_test_server(sale_count: usize) -> TestServer {
        let db_connection = get_test_db_connection();
        {
            let connection = db_connection.lock().unwrap();
            let sales: Vec<_> = (1..=sale_count)
                .map(|i| {
                    Sale::build(&format!("Product {i}"), i as f64, datetime!(2022-05-10 00:00 UTC))
                        .description("A product")
                        .category("misc")
                })
                .collect();
            insert_sales(&sales, &connection).unwrap();
        }

        let state = ListSalesState {
            db_connection,
            pagination_config: PaginationConfig {
                max_page_size: 20,
                ..Default::default()
            },
        };
        let app = Router::new()
            .route(endpoints::TRANSACTIONS, get(list_sales_endpoint))
            .with_state(state);

        TestServer::new(app).expect("Could not create test server.")
    }

    #[tokio::test]
    async fn defaults_to_first_ten_sales() {
        let server = get_test_server(15);

        let response = server.get(endpoints::TRANSACTIONS).await;

        response.assert_status_ok();
        let sales: Vec<Sale> = response.json();
        assert_eq!(sales.len(), 10);
        assert_eq!(sales[0].title, "Product 1");
    }

    #[tokio::test]
    async fn pages_with_query_parameters() {
        let server = get_test_server(15);

        let sales: Vec<Sale> = server
            .get(endpoints::TRANSACTIONS)
            .add_query_param("page", 2)
            .add_query_param("perPage", 5)
            .await
            .json();

        let ids: Vec<_> = sales.iter().map(|sale| sale.id).collect();
        assert_eq!(ids, vec![6, 7, 8, 9, 10]);
    }

    #[tokio::test]
    async fn zero_and_negative_page_sizes_return_one_sale() {
        let server = get_test_server(15);

        for per_page in ["0", "-5"] {
            let response = server
                .get(endpoints::TRANSACTIONS)
                .add_query_param("perPage", per_page)
                .await;

            response.assert_status_ok();
            let sales: Vec<Sale> = response.json();
            assert_eq!(sales.len(), 1, "perPage={per_page}");
        }
    }

    #[tokio::test]
    async fn page_size_is_capped() {
        let server = get_test_server(30);

        let sales: Vec<Sale> = server
            .get(endpoints::TRANSACTIONS)
            .add_query_param("perPage", 1000)
            .await
            .json();

        assert_eq!(sales.len(), 20);
    }

    #[tokio::test]
    async fn searches_by_price() {
        let server = get_test_server(15);

        let sales: Vec<Sale> = server
            .get(endpoints::TRANSACTIONS)
            .add_query_param("search", "12")
            .await
            .json();

        assert_eq!(sales.len(), 1);
        assert_eq!(sales[0].price, 12.0);
    }

    #[tokio::test]
    async fn responds_with_raw_records() {
        let server = get_test_server(1);

        let body: serde_json::Value = server.get(endpoints::TRANSACTIONS).await.json();

        assert_eq!(body[0]["dateOfSale"], "2022-05-10T00:00:00Z");
        assert_eq!(body[0]["sold"], false);
    }
}
