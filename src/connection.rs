use rusqlite::Connection;

use crate::database::PickStore;
use crate::errors::AppResult;
use crate::utils::ensure_parent_dir;

pub fn conn(database_url: &str) -> AppResult<Connection> {
    ensure_parent_dir(database_url)?;
    let conn = Connection::open(database_url)?;

    // Initialize the database tables
    crate::database::create_database_with_connection(&conn)?;

    Ok(conn)
}

pub fn open_store(database_url: &str) -> AppResult<PickStore> {
    Ok(PickStore::from_initialized(conn(database_url)?))
}
