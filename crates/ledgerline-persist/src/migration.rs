//! Database schema migrations for SQLite.
//!
//! Each migration transforms the schema from version N to N+1. Applied
//! versions are recorded in `schema_migrations`.

use rusqlite::Connection;

use crate::error::{PersistError, Result};

/// Current schema version.
pub const CURRENT_VERSION: u32 = 2;

/// Initialize or migrate the database schema.
///
/// Idempotent: running it against an up-to-date database does nothing.
pub fn migrate(conn: &mut Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL
        )",
        [],
    )?;

    let current: u32 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
        [],
        |row| row.get(0),
    )?;

    if current > CURRENT_VERSION {
        return Err(PersistError::Migration(format!(
            "database schema version {} is newer than supported version {}",
            current, CURRENT_VERSION
        )));
    }

    if current < CURRENT_VERSION {
        let tx = conn.transaction()?;

        for version in (current + 1)..=CURRENT_VERSION {
            apply_migration(&tx, version)?;

            tx.execute(
                "INSERT INTO schema_migrations (version, applied_at) VALUES (?1, ?2)",
                rusqlite::params![version, ledgerline_core::now_timestamp()],
            )?;
        }

        tx.commit()?;
        tracing::debug!(from = current, to = CURRENT_VERSION, "schema migrated");
    }

    Ok(())
}

fn apply_migration(conn: &Connection, version: u32) -> Result<()> {
    match version {
        1 => apply_v1(conn),
        2 => apply_v2(conn),
        _ => Err(PersistError::Migration(format!(
            "unknown migration version: {}",
            version
        ))),
    }
}

/// Migration v1: one row per block.
fn apply_v1(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE blocks (
            idx INTEGER PRIMARY KEY,          -- block index, genesis = 0
            timestamp TEXT NOT NULL,          -- opaque creation time
            data TEXT NOT NULL,               -- opaque payload
            hash TEXT NOT NULL,               -- lowercase hex SHA-256
            prev_hash TEXT NOT NULL           -- empty for genesis
        );
        "#,
    )?;
    Ok(())
}

/// Migration v2: key rows by position in the chain instead of block index.
///
/// A replacement chain is stored as given, so `idx` may repeat or run out of
/// order. `idx` holds the index bits as a signed integer.
fn apply_v2(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE blocks_v2 (
            position INTEGER PRIMARY KEY,     -- offset in the chain, genesis = 0
            idx INTEGER NOT NULL,             -- block index as stored
            timestamp TEXT NOT NULL,
            data TEXT NOT NULL,
            hash TEXT NOT NULL,
            prev_hash TEXT NOT NULL
        );

        INSERT INTO blocks_v2 (position, idx, timestamp, data, hash, prev_hash)
        SELECT ROW_NUMBER() OVER (ORDER BY idx) - 1, idx, timestamp, data, hash, prev_hash
        FROM blocks;

        DROP TABLE blocks;
        ALTER TABLE blocks_v2 RENAME TO blocks;
        "#,
    )?;
    Ok(())
}
