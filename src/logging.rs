//! Middleware for logging requests and responses.

use axum::{extract::Request, middleware::Next, response::Response};
use tokio::time::Instant;

/// Log one line per request with its method, URI, response status and how
/// long it took to handle.
///
/// Server errors are logged at the `warn` level, everything else at `info`.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = Instant::now();

    let response = next.run(request).await;

    let status = response.status();
    let latency = start.elapsed();
    if status.is_server_error() {
        tracing::warn!("{method} {uri} {} - {latency:.2?}", status.as_u16());
    } else {
        tracing::info!("{method} {uri} {} - {latency:.2?}", status.as_u16());
    }

    response
}
