//! In-memory gateway.
//!
//! Keeps the last saved chain in process memory. Nothing survives a
//! restart. Saves can be made to fail on demand, which is how the
//! best-effort durability path gets tested.

use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use ledgerline_core::Block;

use crate::error::{PersistError, Result};
use crate::traits::{Checkpoint, PersistenceGateway};

/// In-memory gateway implementation.
#[derive(Debug, Default)]
pub struct MemoryGateway {
    inner: RwLock<MemoryGatewayInner>,
}

#[derive(Debug, Default)]
struct MemoryGatewayInner {
    chain: Option<Vec<Block>>,
    saves: usize,
    fail_saves: bool,
}

impl MemoryGateway {
    /// Create an empty gateway (load returns `None`).
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a gateway that already holds `chain`.
    pub fn with_chain(chain: Vec<Block>) -> Self {
        Self {
            inner: RwLock::new(MemoryGatewayInner {
                chain: Some(chain),
                ..Default::default()
            }),
        }
    }

    /// Make every subsequent save fail (or succeed again).
    pub fn set_fail_saves(&self, fail: bool) {
        self.write().fail_saves = fail;
    }

    /// The chain as of the last successful save.
    pub fn saved_chain(&self) -> Option<Vec<Block>> {
        self.read().chain.clone()
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> usize {
        self.read().saves
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, MemoryGatewayInner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, MemoryGatewayInner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl PersistenceGateway for MemoryGateway {
    async fn load(&self) -> Result<Option<Vec<Block>>> {
        Ok(self.read().chain.clone())
    }

    async fn save(&self, checkpoint: Checkpoint<'_>) -> Result<()> {
        let mut inner = self.write();
        if inner.fail_saves {
            return Err(PersistError::Unavailable("saves disabled".into()));
        }

        // Extend in place when the stored chain is exactly one block behind.
        let extended = match (checkpoint, inner.chain.as_mut()) {
            (Checkpoint::Appended { block, chain }, Some(stored))
                if stored.len() + 1 == chain.len() =>
            {
                stored.push(block.clone());
                true
            }
            _ => false,
        };
        if !extended {
            inner.chain = Some(checkpoint.chain().to_vec());
        }
        inner.saves += 1;
        Ok(())
    }
}
