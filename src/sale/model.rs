//! Defines the sale record model and its table.

use rusqlite::{Connection, Row, types::Type};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Alias for the integer type used for sale IDs.
pub type SaleId = i64;

/// A product sale, i.e. a product that was listed on a given date and may
/// or may not have sold.
///
/// To create a new sale, use [Sale::build] and insert it with
/// [super::insert_sales].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    /// The ID assigned by the store.
    pub id: SaleId,
    /// The product name.
    pub title: String,
    /// A text description of the product.
    pub description: String,
    /// The listed price.
    pub price: f64,
    /// A short label grouping similar products, e.g. "electronics".
    pub category: String,
    /// A link to an image of the product.
    pub image: Option<String>,
    /// Whether the product sold.
    pub sold: bool,
    /// When the product was sold or listed.
    #[serde(with = "time::serde::rfc3339")]
    pub date_of_sale: OffsetDateTime,
}

impl Sale {
    /// Create a new sale.
    ///
    /// Shortcut for [NewSale] for discoverability.
    pub fn build(title: &str, price: f64, date_of_sale: OffsetDateTime) -> NewSale {
        NewSale {
            title: title.to_owned(),
            description: String::new(),
            price,
            category: String::new(),
            image: None,
            sold: false,
            date_of_sale,
        }
    }
}

/// A sale that has not been stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSale {
    /// The product name.
    pub title: String,
    /// A text description of the product.
    pub description: String,
    /// The listed price.
    pub price: f64,
    /// A short label grouping similar products.
    pub category: String,
    /// A link to an image of the product.
    pub image: Option<String>,
    /// Whether the product sold.
    pub sold: bool,
    /// When the product was sold or listed.
    pub date_of_sale: OffsetDateTime,
}

impl NewSale {
    /// Set the description.
    pub fn description(mut self, description: &str) -> Self {
        self.description = description.to_owned();
        self
    }

    /// Set the category.
    pub fn category(mut self, category: &str) -> Self {
        self.category = category.to_owned();
        self
    }

    /// Set the image link.
    pub fn image(mut self, image: Option<String>) -> Self {
        self.image = image;
        self
    }

    /// Set whether the product sold.
    pub fn sold(mut self, sold: bool) -> Self {
        self.sold = sold;
        self
    }
}

/// Convert a sale time to the millisecond timestamp stored in the database.
pub(super) fn to_timestamp_millis(instant: OffsetDateTime) -> i64 {
    (instant.unix_timestamp_nanos() / 1_000_000) as i64
}

/// Create the sale table in the database.
///
/// `date_of_sale` is stored as milliseconds since the Unix epoch so that
/// window filters are plain integer comparisons. `title_lower` and
/// `description_lower` hold the Unicode lowercase forms used by text search,
/// since SQLite's `lower()` only folds ASCII letters.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_sale_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS sale (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                description TEXT NOT NULL,
                title_lower TEXT NOT NULL,
                description_lower TEXT NOT NULL,
                price REAL NOT NULL,
                category TEXT NOT NULL,
                image TEXT,
                sold INTEGER NOT NULL,
                date_of_sale INTEGER NOT NULL
                )",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_sale_date_of_sale ON sale(date_of_sale);",
        (),
    )?;

    Ok(())
}

/// Map a database row to a [Sale].
///
/// Expects the columns in the order they were defined in the table.
pub(super) fn map_sale_row(row: &Row) -> Result<Sale, rusqlite::Error> {
    let timestamp_millis: i64 = row.get(7)?;
    let date_of_sale =
        OffsetDateTime::from_unix_timestamp_nanos(timestamp_millis as i128 * 1_000_000)
            .map_err(|error| {
                rusqlite::Error::FromSqlConversionFailure(7, Type::Integer, Box::new(error))
            })?;

    Ok(Sale {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        price: row.get(3)?,
        category: row.get(4)?,
        image: row.get(5)?,
        sold: row.get(6)?,
        date_of_sale,
    })
}
