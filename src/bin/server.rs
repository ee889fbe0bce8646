use std::{net::SocketAddr, process::ExitCode, time::Duration};

use axum::{
    Router,
    extract::{MatchedPath, Request},
};
use axum_server::Handle;
use clap::Parser;
use rusqlite::Connection;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

use sales_insights::{
    AppState, DEFAULT_REFERENCE_YEAR, DEFAULT_SEED_URL, PaginationConfig, SeedConfig,
    WindowConfig, WindowEnd, build_router, graceful_shutdown,
};

/// The REST API server for sales_insights.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long, default_value = "sales.db")]
    db_path: String,

    /// The port to serve the API from.
    #[arg(short, long, default_value_t = 5003)]
    port: u16,

    /// The URL of the JSON document used to seed the sale store.
    #[arg(long, default_value = DEFAULT_SEED_URL)]
    seed_url: String,

    /// How many seconds to wait for the seed document before giving up.
    #[arg(long, default_value_t = 30)]
    seed_timeout_secs: u64,

    /// The largest page size a listing request may ask for.
    #[arg(long, default_value_t = 100)]
    max_page_size: u64,

    /// The year that month reports are computed for.
    #[arg(long, default_value_t = DEFAULT_REFERENCE_YEAR)]
    reference_year: i32,

    /// Include the last day of the month in month reports.
    #[arg(long)]
    include_last_day: bool,

    /// The canonical timezone name that month boundaries are midnight in,
    /// e.g. "Pacific/Auckland".
    #[arg(long, default_value = "Etc/UTC")]
    timezone: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    setup_logging();

    let args = Args::parse();

    if !sales_insights::is_valid_timezone(&args.timezone) {
        tracing::error!("{} is not a valid canonical timezone name", args.timezone);
        return ExitCode::FAILURE;
    }

    if !sales_insights::is_valid_reference_year(args.reference_year) {
        tracing::error!("{} is not a supported reference year", args.reference_year);
        return ExitCode::FAILURE;
    }

    let conn = match Connection::open(&args.db_path) {
        Ok(conn) => conn,
        Err(error) => {
            tracing::error!("Could not open database file {}: {error}", args.db_path);
            return ExitCode::FAILURE;
        }
    };

    let pagination_config = PaginationConfig {
        max_page_size: args.max_page_size,
        ..Default::default()
    };
    let seed_config = SeedConfig {
        url: args.seed_url,
        timeout: Duration::from_secs(args.seed_timeout_secs),
    };
    let window_config = WindowConfig {
        reference_year: args.reference_year,
        window_end: if args.include_last_day {
            WindowEnd::NextMonthStart
        } else {
            WindowEnd::LastDayOfMonth
        },
        local_timezone: args.timezone,
    };

    let app_state = match AppState::new(conn, pagination_config, seed_config, window_config) {
        Ok(app_state) => app_state,
        Err(error) => {
            tracing::error!("Could not initialize the database: {error}");
            return ExitCode::FAILURE;
        }
    };

    let addr = SocketAddr::from(([0, 0, 0, 0], args.port));
    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    let router = add_tracing_layer(build_router(app_state));

    tracing::info!("HTTP server listening on {}", addr);
    if let Err(error) = axum_server::bind(addr)
        .handle(handle)
        .serve(router.into_make_service())
        .await
    {
        tracing::error!("Server stopped with an error: {error}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn setup_logging() {
    let stdout_log = tracing_subscriber::fmt::layer().pretty();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(stdout_log.with_filter(filter))
        .init();
}

fn add_tracing_layer(router: Router) -> Router {
    let tracing_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &Request| {
            let method = req.method();
            let uri = req.uri();

            let matched_path = req
                .extensions()
                .get::<MatchedPath>()
                .map(|matched_path| matched_path.as_str());

            tracing::debug_span!("request", %method, %uri, matched_path)
        })
        // Errors are logged where they are turned into responses.
        .on_failure(());

    router.layer(tracing_layer)
}
