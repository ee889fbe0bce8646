//! Database setup for the sale store.

use rusqlite::{Connection, TransactionBehavior};

use crate::{Error, sale::create_sale_table};

/// Create the application tables if they do not already exist.
///
/// # Errors
/// Returns an [Error::SqlError] if a table cannot be created.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    let transaction =
        rusqlite::Transaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_sale_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}
