//! Manifest database decoding.
//!
//! The world manifest is a SQLite file with one table per definition
//! category. Every table has the same shape, `(id INTEGER, json TEXT)`, where
//! `id` is the definition hash stored as a signed 32-bit integer and `json` is
//! the definition itself.
//!
//! Hashes used everywhere else (API responses, item hashes) are unsigned, so
//! rows are re-keyed by their unsigned value on load. [`hash_for_storage`]
//! goes the other way when querying by hash.

use std::collections::HashMap;
use std::path::Path;

use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags};
use serde_json::Value;
use tracing::{debug, info};

use crate::error::{Error, Result};

/// One manifest table keyed by unsigned definition hash
pub type ManifestTable = HashMap<u32, Value>;

/// Table holding inventory item definitions
pub const ITEM_DEFINITION_TABLE: &str = "DestinyInventoryItemDefinition";

/// Reinterpret an unsigned hash as the signed value stored in the database
pub fn hash_for_storage(value: u32) -> i32 {
    value as i32
}

/// Reinterpret a stored signed id as the unsigned hash used for lookups
pub fn hash_for_lookup(value: i32) -> u32 {
    value as u32
}

/// Convert a raw SQLite integer id to an unsigned hash.
///
/// Accepts both the signed storage form and an already-unsigned value; anything
/// outside those two ranges is rejected rather than truncated.
fn row_id_to_hash(id: i64) -> Result<u32> {
    if let Ok(signed) = i32::try_from(id) {
        return Ok(hash_for_lookup(signed));
    }
    u32::try_from(id).map_err(|_| Error::InvalidHash(id))
}

fn open_read_only(db_path: &Path) -> Result<Connection> {
    if !db_path.is_file() {
        return Err(Error::NotFound(format!(
            "Database does not exist at \"{}\"",
            db_path.display()
        )));
    }

    let conn = Connection::open_with_flags(
        db_path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )?;
    Ok(conn)
}

fn table_names(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn.prepare("SELECT name FROM sqlite_master WHERE type = 'table'")?;
    let names = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(names)
}

/// List the tables of a manifest database, sorted by name
pub fn list_tables<P: AsRef<Path>>(db_path: P) -> Result<Vec<String>> {
    let conn = open_read_only(db_path.as_ref())?;
    let mut names = table_names(&conn)?;
    names.sort();
    Ok(names)
}

/// Load a whole manifest table keyed by unsigned hash
pub fn load_manifest<P: AsRef<Path>>(db_path: P, table: &str) -> Result<ManifestTable> {
    let db_path = db_path.as_ref();
    let conn = open_read_only(db_path)?;

    if !table_names(&conn)?.iter().any(|name| name == table) {
        return Err(Error::NotFound(format!("Unable to find table \"{}\"", table)));
    }

    // The name was matched against the catalog, quoting only guards odd names
    let sql = format!("SELECT id, json FROM \"{}\"", table.replace('"', "\"\""));
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query([])?;

    let mut entries = ManifestTable::new();
    while let Some(row) = rows.next()? {
        let id = row_id_to_hash(row.get::<_, i64>(0)?)?;
        // Content databases store the definition as TEXT or BLOB depending on version
        let bytes = match row.get_ref(1)? {
            ValueRef::Text(bytes) | ValueRef::Blob(bytes) => bytes,
            other => {
                return Err(Error::Query(rusqlite::Error::InvalidColumnType(
                    1,
                    "json".to_string(),
                    other.data_type(),
                )));
            }
        };
        let value = serde_json::from_slice(bytes)
            .map_err(|source| Error::ManifestRow { id, source })?;
        entries.insert(id, value);
    }

    debug!("Decoded {} rows from {}", entries.len(), table);
    info!(
        "Loaded manifest table {} from {}",
        table,
        db_path.display()
    );
    Ok(entries)
}
