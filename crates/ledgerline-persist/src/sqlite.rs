//! SQLite gateway.
//!
//! Stores one row per block, keyed by its position in the chain. The block's
//! own index is an ordinary column: a chain adopted without verification may
//! repeat indices, and it is stored exactly as given.
//!
//! An append inserts a single row when the table
//! is exactly one block behind the ledger; otherwise (first save, chain
//! replacement, or a previous save that was lost) the table is rewritten
//! from the full chain inside one transaction.
//!
//! Uses rusqlite with bundled SQLite, wrapped in async via
//! `tokio::task::spawn_blocking`.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use ledgerline_core::Block;
use rusqlite::{params, Connection, Transaction};

use crate::error::{PersistError, Result};
use crate::migration;
use crate::traits::{Checkpoint, PersistenceGateway};

/// SQLite-based gateway.
///
/// Thread-safe via an internal mutex around the single connection.
pub struct SqliteGateway {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteGateway {
    /// Open a SQLite database at the given path, running migrations.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let mut conn = Connection::open(path)?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open an in-memory SQLite database.
    pub fn open_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run `f` with the connection on the blocking pool.
    async fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let mut conn = lock(&conn)?;
            f(&mut conn)
        })
        .await
        .map_err(|e| PersistError::Unavailable(format!("spawn_blocking failed: {}", e)))?
    }
}

fn lock(conn: &Mutex<Connection>) -> Result<MutexGuard<'_, Connection>> {
    conn.lock()
        .map_err(|e| PersistError::Unavailable(format!("mutex poisoned: {}", e)))
}

// SQLite integers are signed; the index is stored bit for bit.
fn to_sql_index(index: u64) -> i64 {
    index as i64
}

fn from_sql_index(idx: i64) -> u64 {
    idx as u64
}

fn to_sql_position(position: usize) -> Result<i64> {
    i64::try_from(position)
        .map_err(|_| PersistError::Unavailable(format!("position {} exceeds SQLite range", position)))
}

fn row_to_block(row: &rusqlite::Row<'_>) -> rusqlite::Result<Block> {
    Ok(Block {
        index: from_sql_index(row.get("idx")?),
        timestamp: row.get("timestamp")?,
        data: row.get("data")?,
        hash: row.get("hash")?,
        prev_hash: row.get("prev_hash")?,
    })
}

fn insert_block(tx: &Transaction<'_>, position: usize, block: &Block) -> Result<()> {
    tx.execute(
        "INSERT INTO blocks (position, idx, timestamp, data, hash, prev_hash)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            to_sql_position(position)?,
            to_sql_index(block.index),
            &block.timestamp,
            &block.data,
            &block.hash,
            &block.prev_hash,
        ],
    )?;
    Ok(())
}

fn rewrite(tx: &Transaction<'_>, chain: &[Block]) -> Result<()> {
    tx.execute("DELETE FROM blocks", [])?;
    for (position, block) in chain.iter().enumerate() {
        insert_block(tx, position, block)?;
    }
    Ok(())
}

#[async_trait]
impl PersistenceGateway for SqliteGateway {
    async fn load(&self) -> Result<Option<Vec<Block>>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT idx, timestamp, data, hash, prev_hash FROM blocks ORDER BY position",
            )?;
            let chain = stmt
                .query_map([], row_to_block)?
                .collect::<rusqlite::Result<Vec<_>>>()?;

            if chain.is_empty() {
                return Ok(None);
            }
            Ok(Some(chain))
        })
        .await
    }

    async fn save(&self, checkpoint: Checkpoint<'_>) -> Result<()> {
        let appended = match checkpoint {
            Checkpoint::Appended { block, .. } => Some(block.clone()),
            Checkpoint::Replaced { .. } => None,
        };
        let chain = checkpoint.chain().to_vec();

        self.with_conn(move |conn| {
            let tx = conn.transaction()?;
            let stored: i64 = tx.query_row("SELECT COUNT(*) FROM blocks", [], |row| row.get(0))?;

            match appended {
                Some(block) if stored as usize + 1 == chain.len() => {
                    insert_block(&tx, chain.len() - 1, &block)?
                }
                _ => {
                    tracing::debug!(blocks = chain.len(), "rewriting blocks table");
                    rewrite(&tx, &chain)?;
                }
            }

            tx.commit()?;
            Ok(())
        })
        .await
    }
}
