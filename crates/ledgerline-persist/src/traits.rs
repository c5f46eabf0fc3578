//! Gateway trait: the narrow interface the ledger needs from storage.

use std::sync::Arc;

use async_trait::async_trait;
use ledgerline_core::Block;

use crate::error::Result;

/// What changed in the ledger since the last save.
///
/// Both variants carry the full chain after the change, so a backend that
/// always rewrites everything can ignore the distinction.
#[derive(Debug, Clone, Copy)]
pub enum Checkpoint<'a> {
    /// `block` was appended; it is the last element of `chain`.
    Appended { block: &'a Block, chain: &'a [Block] },
    /// The whole chain was swapped, or written for the first time.
    Replaced { chain: &'a [Block] },
}

impl<'a> Checkpoint<'a> {
    /// The chain as it stands after this change.
    pub fn chain(&self) -> &'a [Block] {
        match self {
            Checkpoint::Appended { chain, .. } | Checkpoint::Replaced { chain } => chain,
        }
    }
}

/// Durable storage for a single ledger.
///
/// All methods are async. Blocking backends run their I/O on
/// `spawn_blocking` so callers on the async runtime are not stalled.
#[async_trait]
pub trait PersistenceGateway: Send + Sync {
    /// Load the stored chain.
    ///
    /// # Returns
    /// - `Ok(None)` if there is no prior ledger.
    /// - `Ok(Some(chain))` with blocks in index order otherwise.
    /// - `Err` if a ledger exists but cannot be read. Callers must treat
    ///   this as fatal rather than start over.
    async fn load(&self) -> Result<Option<Vec<Block>>>;

    /// Record a change to the ledger.
    async fn save(&self, checkpoint: Checkpoint<'_>) -> Result<()>;
}

#[async_trait]
impl<G: PersistenceGateway + ?Sized> PersistenceGateway for Arc<G> {
    async fn load(&self) -> Result<Option<Vec<Block>>> {
        (**self).load().await
    }

    async fn save(&self, checkpoint: Checkpoint<'_>) -> Result<()> {
        (**self).save(checkpoint).await
    }
}

#[async_trait]
impl<G: PersistenceGateway + ?Sized> PersistenceGateway for Box<G> {
    async fn load(&self) -> Result<Option<Vec<Block>>> {
        (**self).load().await
    }

    async fn save(&self, checkpoint: Checkpoint<'_>) -> Result<()> {
        (**self).save(checkpoint).await
    }
}
