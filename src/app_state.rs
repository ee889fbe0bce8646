//! Implements a struct that holds the state of the REST server.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::{
    Error, db::initialize, month::WindowConfig, pagination::PaginationConfig, seed::SeedConfig,
};

/// The state of the REST server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The database connection holding the sale records.
    pub db_connection: Arc<Mutex<Connection>>,

    /// The config that controls how listing requests are paged.
    pub pagination_config: PaginationConfig,

    /// Where seed data comes from and how long to wait for it.
    pub seed_config: SeedConfig,

    /// How a month selector is turned into a date window.
    pub window_config: WindowConfig,

    /// Held for the whole of a re-seed so that re-seeds never interleave.
    pub seed_lock: Arc<tokio::sync::Mutex<()>>,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the sale table.
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn new(
        db_connection: Connection,
        pagination_config: PaginationConfig,
        seed_config: SeedConfig,
        window_config: WindowConfig,
    ) -> Result<Self, Error> {
        initialize(&db_connection)?;

        Ok(Self {
            db_connection: Arc::new(Mutex::new(db_connection)),
            pagination_config,
            seed_config,
            window_config,
            seed_lock: Arc::new(tokio::sync::Mutex::new(())),
        })
    }
}
