// src/database.rs

use log::debug;
use rusqlite::{Connection, Result};
use std::path::Path;

/// Opens the on-device store and makes sure the schema exists.
pub fn open<P: AsRef<Path>>(path: P) -> Result<Connection> {
    let conn = Connection::open(path)?;
    init_db(&conn)?;
    Ok(conn)
}

/// Opens a throwaway in-memory store. Used by tests and as a last-resort
/// fallback when the device has no writable storage.
pub fn open_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    init_db(&conn)?;
    Ok(conn)
}

pub fn init_db(conn: &Connection) -> Result<()> {
    debug!("init_db: checking store schema...");

    // Every logical entity lives under its own namespaced key as one JSON
    // blob. There are no cross-entity transactions.
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS kv_store (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );
        ",
    )?;

    Ok(())
}
