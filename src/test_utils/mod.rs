#![allow(missing_docs)]

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::db::initialize;

pub(crate) fn get_test_connection() -> Connection {
    let conn = Connection::open_in_memory().expect("Could not open in-memory SQLite database");
    initialize(&conn).expect("Could not initialize database");
    conn
}

pub(crate) fn get_test_db_connection() -> Arc<Mutex<Connection>> {
    Arc::new(Mutex::new(get_test_connection()))
}
