//! Sale records and the store that holds them.
//!
//! This module contains:
//! - The `Sale` model and the `NewSale` builder
//! - Store functions for filtering, counting, aggregating and replacing sales
//! - The route handler for the paginated, searchable sale listing

mod list;
mod model;
mod store;

pub use list::list_sales_endpoint;
pub use model::{NewSale, Sale, create_sale_table};
pub use store::{
    SaleFilter, clear_sales, count_by_category, count_sales, insert_sales, sum_prices,
};

#[cfg(test)]
pub use store::find_sales;
