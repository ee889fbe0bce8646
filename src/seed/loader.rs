//! Replaces the sale store with freshly fetched seed records.

use std::sync::Mutex;

use rusqlite::Connection;

use crate::{
    Error,
    sale::{clear_sales, insert_sales},
};

use super::{source::SeedSource, validate::validate_records};

/// The outcome of a re-seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    /// How many records the source returned.
    pub fetched: usize,
    /// How many records passed validation and were stored.
    pub inserted: usize,
    /// How many records failed validation.
    pub rejected: usize,
}

/// Fetch records from `source`, validate them, and replace every stored sale
/// with the valid ones.
///
/// The replace runs in two phases with the lock released in between: first
/// every sale is deleted, then the new sales are inserted in one database
/// transaction. A reader that runs between the phases sees an empty store,
/// but never a partial insert. If no record is valid the store is left empty,
/// which is not an error.
///
/// Nothing is deleted if the fetch fails.
///
/// # Errors
/// Returns [Error::SeedFetch] if the fetch fails, [Error::DatabaseLockError]
/// if the lock is poisoned, or [Error::SqlError] if either phase fails.
pub async fn seed_sales(
    source: &impl SeedSource,
    db_connection: &Mutex<Connection>,
) -> Result<SeedSummary, Error> {
    let records = source.fetch().await?;
    let sales = validate_records(&records);

    let deleted = {
        let connection = db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;
        clear_sales(&connection)?
    };
    tracing::debug!("cleared {deleted} sales before re-seeding");

    let inserted = {
        let connection = db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;
        insert_sales(&sales, &connection)?
    };

    Ok(SeedSummary {
        fetched: records.len(),
        inserted,
        rejected: records.len() - inserted,
    })
}
