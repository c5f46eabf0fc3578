//! The ledger store: the authoritative in-memory chain.
//!
//! # Concurrency
//!
//! The current chain is published as an `Arc<Vec<Block>>` behind a
//! `std::sync::RwLock`. Readers clone the `Arc` and walk away with a frozen
//! view; they hold the lock only for that clone.
//!
//! Every mutation (`try_append`, `write`, `replace`) first takes the async
//! `writer` mutex, so at most one mutation is in flight. Inside it the
//! mutation validates against the tip it sees, publishes the new chain under
//! a short write lock, and then saves through the gateway while still
//! holding `writer`. Saves therefore reach the gateway in commit order, and
//! readers are never blocked by a save in progress.
//!
//! Appends go through `Arc::make_mut`: when no reader holds the current
//! snapshot the vector grows in place, otherwise it is copied first. A
//! snapshot a reader holds never changes.

use std::ops::Deref;
use std::sync::{Arc, PoisonError, RwLock, RwLockWriteGuard};

use ledgerline_core::{check_block, create_next, genesis, verify_chain, Block};
use ledgerline_persist::{Checkpoint, PersistenceGateway};
use serde::{Deserialize, Serialize, Serializer};
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::config::{LedgerConfig, ReplacePolicy};
use crate::error::Result;

/// A point-in-time view of the chain.
///
/// Cheap to clone. Never empty: every published chain starts at genesis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainSnapshot(Arc<Vec<Block>>);

impl ChainSnapshot {
    /// The last block.
    pub fn tip(&self) -> &Block {
        // Published chains are never empty.
        &self.0[self.0.len() - 1]
    }

    /// Copy the blocks out.
    pub fn to_vec(&self) -> Vec<Block> {
        self.0.as_ref().clone()
    }
}

impl Serialize for ChainSnapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.0.as_slice().serialize(serializer)
    }
}

impl Deref for ChainSnapshot {
    type Target = [Block];

    fn deref(&self) -> &[Block] {
        &self.0
    }
}

/// Result of submitting an externally built block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitOutcome {
    /// Whether the block was appended.
    pub accepted: bool,
    /// The submitted block, echoed back.
    pub block: Block,
}

/// The ledger store.
///
/// Owns the chain and the gateway it persists to. Share it between tasks
/// with an `Arc`.
pub struct LedgerStore<G: PersistenceGateway> {
    /// Published chain.
    chain: RwLock<Arc<Vec<Block>>>,
    /// Serializes mutations and their saves.
    writer: Mutex<()>,
    /// Durable storage.
    gateway: G,
    /// Configuration.
    config: LedgerConfig,
}

impl<G: PersistenceGateway> LedgerStore<G> {
    /// Open the ledger stored behind `gateway`.
    ///
    /// If the gateway holds no ledger, a genesis block is created and saved.
    /// If it holds one, the whole chain is verified first.
    ///
    /// # Errors
    /// - [`LedgerError::Persist`](crate::LedgerError::Persist) if the gateway
    ///   cannot load, or cannot save a freshly created genesis block.
    /// - [`LedgerError::Recovery`](crate::LedgerError::Recovery) if the stored
    ///   chain is empty or broken.
    ///
    /// Both are fatal: the caller must not serve from a ledger it could
    /// not recover.
    pub async fn open(gateway: G, config: LedgerConfig) -> Result<Self> {
        let chain = match gateway.load().await? {
            Some(chain) => {
                verify_chain(&chain)?;
                info!(
                    blocks = chain.len(),
                    tip = %chain[chain.len() - 1].hash,
                    "recovered ledger"
                );
                chain
            }
            None => {
                let chain = vec![genesis(&config.genesis_data)];
                gateway.save(Checkpoint::Replaced { chain: &chain }).await?;
                info!(genesis = %chain[0].hash, "created new ledger");
                chain
            }
        };

        Ok(Self {
            chain: RwLock::new(Arc::new(chain)),
            writer: Mutex::new(()),
            gateway,
            config,
        })
    }

    /// Get the configuration.
    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Get the gateway reference.
    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Reads
    // ─────────────────────────────────────────────────────────────────────────

    /// A frozen view of the current chain.
    pub fn snapshot(&self) -> ChainSnapshot {
        let chain = self.chain.read().unwrap_or_else(PoisonError::into_inner);
        ChainSnapshot(Arc::clone(&chain))
    }

    /// Number of blocks, genesis included.
    pub fn len(&self) -> usize {
        self.chain.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Always false; kept for the `len` convention.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// A copy of the last block.
    pub fn tip(&self) -> Block {
        self.snapshot().tip().clone()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Append `candidate` if it extends the current tip.
    ///
    /// Returns `false` without touching the chain if the candidate fails
    /// validation. A failed save after acceptance is logged; the block stays
    /// in the chain.
    pub async fn try_append(&self, candidate: &Block) -> bool {
        let _writer = self.writer.lock().await;

        let verdict = check_block(candidate, self.snapshot().tip());
        if let Err(reason) = verdict {
            debug!(index = candidate.index, %reason, "candidate rejected");
            return false;
        }

        self.commit_append(candidate.clone()).await;
        true
    }

    /// Build a block carrying `data` on top of the current tip and append it.
    ///
    /// The block is built inside the exclusive section, so it cannot lose a
    /// race against a concurrent append.
    pub async fn write(&self, data: &str) -> Result<Block> {
        let _writer = self.writer.lock().await;

        let block = {
            let current = self.snapshot();
            let block = create_next(current.tip(), data);
            check_block(&block, current.tip())?;
            block
        };

        self.commit_append(block.clone()).await;
        Ok(block)
    }

    /// Replace the chain with `candidate` if it is strictly longer.
    ///
    /// Under [`ReplacePolicy::LengthOnly`] length is the only criterion.
    /// Under [`ReplacePolicy::Verified`] the candidate must also pass
    /// [`verify_chain`]. Returns whether the swap happened.
    pub async fn replace(&self, candidate: Vec<Block>) -> bool {
        let _writer = self.writer.lock().await;

        let current_len = self.len();
        if candidate.len() <= current_len {
            debug!(
                current = current_len,
                candidate = candidate.len(),
                "replacement not longer than current chain"
            );
            return false;
        }

        if let Err(e) = verify_chain(&candidate) {
            match self.config.replace_policy {
                ReplacePolicy::LengthOnly => {
                    warn!(error = %e, "replacing ledger with a chain that fails verification");
                }
                ReplacePolicy::Verified => {
                    debug!(error = %e, "replacement rejected by verification");
                    return false;
                }
            }
        }

        let published = Arc::new(candidate);
        *self.write_chain() = Arc::clone(&published);
        info!(from = current_len, to = published.len(), "ledger replaced");

        self.persist(Checkpoint::Replaced { chain: &published }).await;
        true
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Host-facing operations
    // ─────────────────────────────────────────────────────────────────────────

    /// `GetChain`: the current chain.
    pub fn chain(&self) -> ChainSnapshot {
        self.snapshot()
    }

    /// `SubmitBlock`: try to append an externally built block and echo it.
    pub async fn submit(&self, candidate: Block) -> SubmitOutcome {
        let accepted = self.try_append(&candidate).await;
        SubmitOutcome {
            accepted,
            block: candidate,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Internals
    // ─────────────────────────────────────────────────────────────────────────

    /// Publish an already validated block and save. Caller holds `writer`.
    async fn commit_append(&self, block: Block) {
        let published = {
            let mut chain = self.write_chain();
            Arc::make_mut(&mut chain).push(block);
            Arc::clone(&chain)
        };

        let block = &published[published.len() - 1];
        info!(index = block.index, hash = %block.hash, "block appended");

        self.persist(Checkpoint::Appended {
            block,
            chain: &published,
        })
        .await;
    }

    async fn persist(&self, checkpoint: Checkpoint<'_>) {
        if let Err(e) = self.gateway.save(checkpoint).await {
            error!(
                error = %e,
                blocks = checkpoint.chain().len(),
                "failed to persist ledger; keeping in-memory state"
            );
        }
    }

    fn write_chain(&self) -> RwLockWriteGuard<'_, Arc<Vec<Block>>> {
        self.chain.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<G: PersistenceGateway> std::fmt::Debug for LedgerStore<G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LedgerStore")
            .field("len", &self.len())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LedgerError;
    use ledgerline_core::{create_next_at, genesis_at, GENESIS_DATA};
    use ledgerline_persist::MemoryGateway;

    async fn open_empty() -> LedgerStore<Arc<MemoryGateway>> {
        LedgerStore::open(Arc::new(MemoryGateway::new()), LedgerConfig::default())
            .await
            .unwrap()
    }

    fn chain_from(genesis: &Block, len: usize) -> Vec<Block> {
        let mut chain = vec![genesis.clone()];
        for i in 1..len {
            let next = create_next_at(&chain[i - 1], &format!("fork {i}"), format!("f{i}"));
            chain.push(next);
        }
        chain
    }

    #[tokio::test]
    async fn test_open_creates_and_saves_genesis() {
        let gateway = Arc::new(MemoryGateway::new());
        let ledger = LedgerStore::open(Arc::clone(&gateway), LedgerConfig::default())
            .await
            .unwrap();

        assert_eq!(ledger.len(), 1);
        let genesis = ledger.tip();
        assert!(genesis.is_genesis());
        assert_eq!(genesis.data, GENESIS_DATA);
        assert!(genesis.has_valid_hash());
        assert_eq!(gateway.saved_chain(), Some(vec![genesis]));
    }

    #[tokio::test]
    async fn test_open_uses_configured_genesis_data() {
        let config = LedgerConfig {
            genesis_data: "custom".into(),
            ..Default::default()
        };
        let ledger = LedgerStore::open(MemoryGateway::new(), config).await.unwrap();
        assert_eq!(ledger.tip().data, "custom");
    }

    #[tokio::test]
    async fn test_open_recovers_existing_chain() {
        let genesis = genesis_at(GENESIS_DATA, "t0");
        let chain = chain_from(&genesis, 3);
        let gateway = MemoryGateway::with_chain(chain.clone());

        let ledger = LedgerStore::open(gateway, LedgerConfig::default())
            .await
            .unwrap();
        assert_eq!(ledger.chain().to_vec(), chain);
        assert_eq!(ledger.gateway().save_count(), 0);
    }

    #[tokio::test]
    async fn test_open_refuses_broken_chain() {
        let genesis = genesis_at(GENESIS_DATA, "t0");
        let mut chain = chain_from(&genesis, 3);
        chain[1].data = "edited".into();

        let result = LedgerStore::open(MemoryGateway::with_chain(chain), LedgerConfig::default()).await;
        assert!(matches!(result, Err(LedgerError::Recovery(_))));
    }

    #[tokio::test]
    async fn test_open_refuses_empty_chain() {
        let result =
            LedgerStore::open(MemoryGateway::with_chain(vec![]), LedgerConfig::default()).await;
        assert!(matches!(result, Err(LedgerError::Recovery(_))));
    }

    #[tokio::test]
    async fn test_open_fails_when_genesis_cannot_be_saved() {
        let gateway = MemoryGateway::new();
        gateway.set_fail_saves(true);
        let result = LedgerStore::open(gateway, LedgerConfig::default()).await;
        assert!(matches!(result, Err(LedgerError::Persist(_))));
    }

    #[tokio::test]
    async fn test_append_and_reject_stale() {
        let ledger = open_empty().await;
        let genesis = ledger.tip();

        let first = create_next_at(&genesis, "hello", "t1");
        assert!(ledger.try_append(&first).await);
        assert_eq!(ledger.len(), 2);

        let stale = create_next_at(&genesis, "late", "t1b");
        assert!(!ledger.try_append(&stale).await);
        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.tip(), first);
    }

    #[tokio::test]
    async fn test_rejected_append_is_not_saved() {
        let ledger = open_empty().await;
        let saves = ledger.gateway().save_count();

        assert!(!ledger.try_append(&Block::default()).await);
        assert_eq!(ledger.gateway().save_count(), saves);
    }

    #[tokio::test]
    async fn test_failed_save_keeps_block() {
        let ledger = open_empty().await;
        ledger.gateway().set_fail_saves(true);

        let next = create_next_at(&ledger.tip(), "kept", "t1");
        assert!(ledger.try_append(&next).await);
        assert_eq!(ledger.tip(), next);
        assert_eq!(ledger.gateway().saved_chain().map(|c| c.len()), Some(1));
    }

    #[tokio::test]
    async fn test_snapshot_is_frozen() {
        let ledger = open_empty().await;
        let before = ledger.snapshot();

        ledger.write("after").await.unwrap();

        assert_eq!(before.len(), 1);
        assert_eq!(ledger.snapshot().len(), 2);
    }

    #[tokio::test]
    async fn test_write_builds_on_tip() {
        let ledger = open_empty().await;
        let genesis = ledger.tip();

        let block = ledger.write("payload").await.unwrap();
        assert_eq!(block.index, 1);
        assert_eq!(block.prev_hash, genesis.hash);
        assert_eq!(ledger.tip(), block);
        assert_eq!(ledger.gateway().saved_chain().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_submit_echoes_block() {
        let ledger = open_empty().await;
        let candidate = Block::new(1, "t", "bad link", "");

        let outcome = ledger.submit(candidate.clone()).await;
        assert!(!outcome.accepted);
        assert_eq!(outcome.block, candidate);
    }

    #[tokio::test]
    async fn test_replace_requires_longer_chain() {
        let ledger = open_empty().await;
        let genesis = ledger.tip();
        ledger.write("one").await.unwrap();

        // Equal length: unchanged.
        assert!(!ledger.replace(chain_from(&genesis, 2)).await);
        // Shorter: unchanged.
        assert!(!ledger.replace(chain_from(&genesis, 1)).await);
        assert_eq!(ledger.tip().data, "one");

        let longer = chain_from(&genesis, 3);
        assert!(ledger.replace(longer.clone()).await);
        assert_eq!(ledger.chain().to_vec(), longer);
        assert_eq!(ledger.gateway().saved_chain(), Some(longer));
    }

    #[tokio::test]
    async fn test_length_only_accepts_broken_longer_chain() {
        let ledger = open_empty().await;
        let garbage = vec![Block::default(), Block::default()];

        assert!(ledger.replace(garbage.clone()).await);
        assert_eq!(ledger.chain().to_vec(), garbage);
    }

    #[tokio::test]
    async fn test_verified_policy_rejects_broken_longer_chain() {
        let config = LedgerConfig {
            replace_policy: ReplacePolicy::Verified,
            ..Default::default()
        };
        let ledger = LedgerStore::open(MemoryGateway::new(), config).await.unwrap();
        let genesis = ledger.tip();

        let mut broken = chain_from(&genesis, 3);
        broken[2].prev_hash = "nope".into();
        assert!(!ledger.replace(broken).await);
        assert_eq!(ledger.len(), 1);

        assert!(ledger.replace(chain_from(&genesis, 3)).await);
        assert_eq!(ledger.len(), 3);
    }
}
