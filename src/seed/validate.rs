//! Turns raw seed records into sales, dropping the ones that are unusable.

use serde_json::Value;
use time::{OffsetDateTime, UtcOffset, format_description::well_known::Rfc3339};

use crate::sale::{NewSale, Sale};

/// Convert a raw record into a sale.
///
/// A record is kept only if `price` is a number and `title`, `description`,
/// `category` and `dateOfSale` are non-empty strings, with `dateOfSale` in
/// RFC 3339 format. A missing or non-boolean `sold` counts as not sold.
pub fn validate_record(record: &Value) -> Option<NewSale> {
    let price = record.get("price").filter(|price| price.is_number())?.as_f64()?;
    let title = non_empty_str(record, "title")?;
    let description = non_empty_str(record, "description")?;
    let category = non_empty_str(record, "category")?;
    let date_of_sale = OffsetDateTime::parse(non_empty_str(record, "dateOfSale")?, &Rfc3339)
        .ok()?
        .to_offset(UtcOffset::UTC);

    let sold = record
        .get("sold")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    let image = record
        .get("image")
        .and_then(Value::as_str)
        .map(str::to_owned);

    Some(
        Sale::build(title, price, date_of_sale)
            .description(description)
            .category(category)
            .image(image)
            .sold(sold),
    )
}

/// Validate every record, keeping the order of the ones that pass.
pub fn validate_records(records: &[Value]) -> Vec<NewSale> {
    records
        .iter()
        .enumerate()
        .filter_map(|(index, record)| {
            let sale = validate_record(record);
            if sale.is_none() {
                tracing::warn!("rejecting seed record {index}: {record}");
            }
            sale
        })
        .collect()
}

fn non_empty_str<'a>(record: &'a Value, field: &str) -> Option<&'a str> {
    record
        .get(field)
        .and_then(Value::as_str)
        .filter(|value| !value.is_empty())
}
