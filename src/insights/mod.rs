//! Monthly reports over the sale store.
//!
//! Each report is scoped to the window of one month (see
//! [WindowConfig::window_for]). The month is validated before the database
//! is touched, so a bad month never costs a lock.

use std::sync::{Arc, Mutex, MutexGuard};

use axum::extract::FromRef;
use rusqlite::Connection;

use crate::{
    AppState, Error,
    month::{MonthQuery, SaleMonth, SaleWindow, WindowConfig},
};

mod categories;
mod combined;
mod price_ranges;
mod statistics;

pub use categories::pie_chart_endpoint;
pub use combined::combined_endpoint;
pub use price_ranges::bar_chart_endpoint;
pub use statistics::statistics_endpoint;

/// The state needed for the monthly report endpoints.
#[derive(Debug, Clone)]
pub struct InsightsState {
    /// The database connection holding the sales.
    pub db_connection: Arc<Mutex<Connection>>,
    /// How a month is turned into a window of sale times.
    pub window_config: WindowConfig,
}

impl FromRef<AppState> for InsightsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            window_config: state.window_config.clone(),
        }
    }
}

impl InsightsState {
    /// Validate the requested month and compute its window.
    ///
    /// # Errors
    /// Returns [Error::InvalidMonth] for a missing or bad month, or
    /// [Error::InvalidTimezone] if the window cannot be placed in the
    /// configured timezone.
    fn window(&self, query: &MonthQuery) -> Result<SaleWindow, Error> {
        let month = SaleMonth::parse(query.month.as_deref())?;
        let window = self.window_config.window_for(month)?;
        tracing::debug!(
            "month {} maps to [{}, {})",
            month.month(),
            window.start,
            window.end
        );

        Ok(window)
    }

    fn connection(&self) -> Result<MutexGuard<'_, Connection>, Error> {
        self.db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)
    }
}
