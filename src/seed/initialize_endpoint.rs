//! Defines the route handler that re-seeds the sale store.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{AppState, Error};

use super::{SeedConfig, loader::seed_sales, source::HttpSeedSource};

/// The state needed for re-seeding the sale store.
#[derive(Debug, Clone)]
pub struct SeedState {
    /// The database connection holding the sales.
    pub db_connection: Arc<Mutex<Connection>>,
    /// Where to fetch seed data from.
    pub seed_config: SeedConfig,
    /// Serializes re-seeds.
    pub seed_lock: Arc<tokio::sync::Mutex<()>>,
}

impl FromRef<AppState> for SeedState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            seed_config: state.seed_config.clone(),
            seed_lock: state.seed_lock.clone(),
        }
    }
}

/// Replace every stored sale with the records from the configured seed source.
///
/// Concurrent requests are handled one at a time, so each re-seed sees the
/// store that the previous one left behind.
pub async fn initialize_endpoint(State(state): State<SeedState>) -> Result<Response, Error> {
    let _seeding = state.seed_lock.lock().await;

    let source = HttpSeedSource::new(&state.seed_config)?;
    let summary = seed_sales(&source, &state.db_connection).await?;

    tracing::info!(
        "Seeded {} sales from {} ({} of {} records rejected)",
        summary.inserted,
        state.seed_config.url,
        summary.rejected,
        summary.fetched
    );

    Ok((StatusCode::OK, "Database initialized with seed data").into_response())
}
