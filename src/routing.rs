//! Application router configuration.

use std::any::Any;

use axum::{
    Json, Router,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::json;
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer};

use crate::{
    AppState, Error, endpoints,
    insights::{bar_chart_endpoint, combined_endpoint, pie_chart_endpoint, statistics_endpoint},
    logging::logging_middleware,
    sale::list_sales_endpoint,
    seed::initialize_endpoint,
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let router = Router::new()
        .route(endpoints::INITIALIZE, post(initialize_endpoint))
        .route(endpoints::TRANSACTIONS, get(list_sales_endpoint))
        .route(endpoints::STATISTICS, get(statistics_endpoint))
        .route(endpoints::BAR_CHART, get(bar_chart_endpoint))
        .route(endpoints::PIE_CHART, get(pie_chart_endpoint))
        .route(endpoints::COMBINED, get(combined_endpoint))
        .fallback(get_404_not_found)
        .with_state(state);

    add_common_layers(router)
}

/// Allow cross-origin requests, log every request, and turn handler panics
/// into a plain 500 response.
fn add_common_layers(router: Router) -> Router {
    router
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(middleware::from_fn(logging_middleware))
        .layer(CorsLayer::permissive())
}

async fn get_404_not_found() -> Error {
    Error::NotFound
}

fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!("A request handler panicked: {detail}");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "message": "Something went wrong!" })),
    )
        .into_response()
}
