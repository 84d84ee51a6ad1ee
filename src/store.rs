// src/store.rs

use log::error;
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Serializes `value` to JSON and writes it under `key`. Best-effort:
/// failures are logged and swallowed, a storage fault must never abort a
/// learning session in progress.
pub fn save<T: Serialize>(conn: &Connection, key: &str, value: &T) {
    let json = match serde_json::to_string(value) {
        Ok(json) => json,
        Err(e) => {
            error!("Failed to serialize '{}': {}", key, e);
            return;
        }
    };

    if let Err(e) = conn.execute(
        "INSERT OR REPLACE INTO kv_store (key, value) VALUES (?, ?)",
        params![key, json],
    ) {
        error!("Failed to save '{}': {}", key, e);
    }
}

/// Reads and parses the value stored under `key`. Missing keys, unreadable
/// storage and corrupt JSON all load as `None`; callers fall back to their
/// defaults instead of surfacing an error.
pub fn load<T: DeserializeOwned>(conn: &Connection, key: &str) -> Option<T> {
    let json: Option<String> = match conn
        .query_row("SELECT value FROM kv_store WHERE key = ?", [key], |row| {
            row.get(0)
        })
        .optional()
    {
        Ok(value) => value,
        Err(e) => {
            error!("Failed to read '{}': {}", key, e);
            return None;
        }
    };

    let json = json?;
    match serde_json::from_str(&json) {
        Ok(value) => Some(value),
        Err(e) => {
            error!("Discarding corrupt value under '{}': {}", key, e);
            None
        }
    }
}

pub fn remove(conn: &Connection, key: &str) {
    if let Err(e) = conn.execute("DELETE FROM kv_store WHERE key = ?", [key]) {
        error!("Failed to remove '{}': {}", key, e);
    }
}
