//! Database queries over the sale table.
//!
//! Every read takes a [SaleFilter]. Filter fields are combined with `AND`,
//! and a filter with no fields set matches every sale.

use rusqlite::{
    Connection, Row, params_from_iter,
    types::{Type, Value},
};

use crate::{Error, month::SaleWindow};

use super::model::{NewSale, Sale, map_sale_row, to_timestamp_millis};

const SALE_COLUMNS: &str =
    "id, title, description, price, category, image, sold, date_of_sale";

/// Defines which sales a query applies to.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SaleFilter {
    /// Include sales with a sale time inside the window.
    pub window: Option<SaleWindow>,
    /// Include sales that did (`true`) or did not (`false`) sell.
    pub sold: Option<bool>,
    /// Include sales whose title or description contains this text, ignoring case.
    pub text: Option<String>,
    /// Include sales with exactly this price.
    pub price: Option<f64>,
    /// Include sales priced at or above this amount.
    pub min_price: Option<f64>,
    /// Include sales priced below this amount.
    pub max_price: Option<f64>,
}

impl SaleFilter {
    /// Restrict the filter to `window`.
    pub fn in_window(mut self, window: SaleWindow) -> Self {
        self.window = Some(window);
        self
    }

    /// Restrict the filter to sold or unsold products.
    pub fn sold(mut self, sold: bool) -> Self {
        self.sold = Some(sold);
        self
    }

    /// Restrict the filter to prices in `[min, max)`, or `[min, ∞)` if `max` is `None`.
    pub fn price_between(mut self, min: f64, max: Option<f64>) -> Self {
        self.min_price = Some(min);
        self.max_price = max;
        self
    }

    /// Build the SQL `WHERE` clause and its positional parameters.
    ///
    /// Returns an empty string if no fields are set.
    fn where_clause(&self) -> (String, Vec<Value>) {
        let mut clause_parts = vec![];
        let mut parameters = vec![];

        if let Some(window) = self.window {
            clause_parts.push(format!(
                "date_of_sale >= ?{} AND date_of_sale < ?{}",
                parameters.len() + 1,
                parameters.len() + 2
            ));
            parameters.push(Value::Integer(to_timestamp_millis(window.start)));
            parameters.push(Value::Integer(to_timestamp_millis(window.end)));
        }

        if let Some(sold) = self.sold {
            clause_parts.push(format!("sold = ?{}", parameters.len() + 1));
            parameters.push(Value::Integer(sold as i64));
        }

        if let Some(text) = &self.text {
            let index = parameters.len() + 1;
            clause_parts.push(format!(
                "(instr(title_lower, ?{index}) > 0 OR instr(description_lower, ?{index}) > 0)"
            ));
            parameters.push(Value::Text(text.to_lowercase()));
        }

        if let Some(price) = self.price {
            clause_parts.push(format!("price = ?{}", parameters.len() + 1));
            parameters.push(Value::Real(price));
        }

        if let Some(min_price) = self.min_price {
            clause_parts.push(format!("price >= ?{}", parameters.len() + 1));
            parameters.push(Value::Real(min_price));
        }

        if let Some(max_price) = self.max_price {
            clause_parts.push(format!("price < ?{}", parameters.len() + 1));
            parameters.push(Value::Real(max_price));
        }

        if clause_parts.is_empty() {
            (String::new(), parameters)
        } else {
            (
                format!("WHERE {}", clause_parts.join(" AND ")),
                parameters,
            )
        }
    }
}

/// Delete every sale.
///
/// This is the first phase of a re-seed. Readers that run before
/// [insert_sales] see an empty store.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn clear_sales(connection: &Connection) -> Result<usize, Error> {
    let deleted = connection.execute("DELETE FROM sale", ())?;

    Ok(deleted)
}

/// Insert `sales` in a single database transaction.
///
/// Either all of the sales are stored or none of them are. IDs are assigned
/// in the order of `sales`.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn insert_sales(sales: &[NewSale], connection: &Connection) -> Result<usize, Error> {
    let tx = connection.unchecked_transaction()?;

    // Prepare the insert statement once for reuse
    let mut stmt = tx.prepare(
        "INSERT INTO sale (title, description, title_lower, description_lower, price, category, image, sold, date_of_sale)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
    )?;

    for sale in sales {
        stmt.execute((
            &sale.title,
            &sale.description,
            sale.title.to_lowercase(),
            sale.description.to_lowercase(),
            sale.price,
            &sale.category,
            &sale.image,
            sale.sold,
            to_timestamp_millis(sale.date_of_sale),
        ))?;
    }

    drop(stmt);

    tx.commit()?;
    Ok(sales.len())
}

/// Get the sales matching `filter` in the order they were stored, skipping
/// the first `skip` matches and returning at most `limit`.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn find_sales(
    filter: &SaleFilter,
    skip: u64,
    limit: u64,
    connection: &Connection,
) -> Result<Vec<Sale>, Error> {
    let (where_clause, mut parameters) = filter.where_clause();
    let limit_index = parameters.len() + 1;
    let query = format!(
        "SELECT {SALE_COLUMNS} FROM sale {where_clause} ORDER BY id LIMIT ?{limit_index} OFFSET ?{}",
        limit_index + 1
    );
    parameters.push(Value::Integer(clamp_to_sql_integer(limit)));
    parameters.push(Value::Integer(clamp_to_sql_integer(skip)));

    connection
        .prepare(&query)?
        .query_map(params_from_iter(parameters), map_sale_row)?
        .map(|sale_result| sale_result.map_err(Error::SqlError))
        .collect()
}

/// Count the sales matching `filter`.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn count_sales(filter: &SaleFilter, connection: &Connection) -> Result<u64, Error> {
    let (where_clause, parameters) = filter.where_clause();

    connection
        .query_row(
            &format!("SELECT COUNT(id) FROM sale {where_clause}"),
            params_from_iter(parameters),
            |row| get_count(row, 0),
        )
        .map_err(|error| error.into())
}

/// Sum the prices of the sales matching `filter`.
///
/// Returns the total and the number of sales that went into it. No matches
/// gives `(0.0, 0)`.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn sum_prices(filter: &SaleFilter, connection: &Connection) -> Result<(f64, u64), Error> {
    let (where_clause, parameters) = filter.where_clause();

    connection
        .query_row(
            &format!("SELECT COALESCE(SUM(price), 0.0), COUNT(id) FROM sale {where_clause}"),
            params_from_iter(parameters),
            |row| Ok((row.get(0)?, get_count(row, 1)?)),
        )
        .map_err(|error| error.into())
}

/// Count the sales matching `filter` per category.
///
/// Categories without a matching sale are left out.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn count_by_category(
    filter: &SaleFilter,
    connection: &Connection,
) -> Result<Vec<(String, u64)>, Error> {
    let (where_clause, parameters) = filter.where_clause();

    connection
        .prepare(&format!(
            "SELECT category, COUNT(id) FROM sale {where_clause} GROUP BY category"
        ))?
        .query_map(params_from_iter(parameters), |row| {
            Ok((row.get(0)?, get_count(row, 1)?))
        })?
        .map(|group_result| group_result.map_err(Error::SqlError))
        .collect()
}

/// Read a `COUNT(..)` column, which SQLite returns as a signed integer.
fn get_count(row: &Row, index: usize) -> Result<u64, rusqlite::Error> {
    let count: i64 = row.get(index)?;

    u64::try_from(count).map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(index, Type::Integer, Box::new(error))
    })
}

fn clamp_to_sql_integer(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}
