//! Test fixtures and helpers.
//!
//! Common setup code for integration tests. Every chain built here has
//! fixed timestamps, so hashes are stable across runs.

use ledgerline_core::{create_next_at, genesis_at, Block, GENESIS_DATA};
use ledgerline_persist::MemoryGateway;

/// Timestamp used for the block at `index` in fixture chains.
///
/// Genesis gets the timestamp of the golden genesis vector; later blocks
/// count up in nanoseconds.
pub fn fixture_timestamp(index: u64) -> String {
    if index == 0 {
        "2024-01-01T00:00:00+00:00".to_string()
    } else {
        format!("2024-01-01T00:00:00.{index:09}+00:00")
    }
}

/// A deterministic, valid chain.
#[derive(Debug, Clone)]
pub struct TestChain {
    blocks: Vec<Block>,
}

impl TestChain {
    /// Build a chain of `len` blocks (at least the genesis block).
    pub fn new(len: usize) -> Self {
        let mut chain = Self {
            blocks: vec![genesis_at(GENESIS_DATA, fixture_timestamp(0))],
        };
        chain.extend(len.saturating_sub(1));
        chain
    }

    /// Append `count` more blocks with payloads `block <index>`.
    pub fn extend(&mut self, count: usize) -> &mut Self {
        for _ in 0..count {
            let next = self.next_block(&format!("block {}", self.tip().index + 1));
            self.blocks.push(next);
        }
        self
    }

    /// The block that would validly extend this chain.
    pub fn next_block(&self, data: &str) -> Block {
        let tip = self.tip();
        create_next_at(tip, data, fixture_timestamp(tip.index + 1))
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn into_blocks(self) -> Vec<Block> {
        self.blocks
    }

    pub fn tip(&self) -> &Block {
        // `new` always seeds genesis and nothing removes blocks.
        &self.blocks[self.blocks.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// A memory gateway that loads this chain.
    pub fn memory_gateway(&self) -> MemoryGateway {
        MemoryGateway::with_chain(self.blocks.clone())
    }
}

/// A valid chain sharing the first `keep` blocks of `base`, followed by
/// `extra` blocks with payloads distinct from anything in `base`.
pub fn fork_of(base: &[Block], keep: usize, extra: usize) -> Vec<Block> {
    let mut fork: Vec<Block> = base.iter().take(keep.max(1)).cloned().collect();
    if fork.is_empty() {
        fork.push(genesis_at(GENESIS_DATA, fixture_timestamp(0)));
    }
    for n in 0..extra {
        let tip = &fork[fork.len() - 1];
        let next = create_next_at(tip, &format!("fork {n}"), fixture_timestamp(tip.index + 1));
        fork.push(next);
    }
    fork
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledgerline_core::{is_valid, verify_chain};
    use ledgerline_persist::PersistenceGateway;

    #[test]
    fn test_chain_is_valid() {
        let chain = TestChain::new(10);
        assert_eq!(chain.len(), 10);
        assert!(verify_chain(chain.blocks()).is_ok());
    }

    #[test]
    fn test_chain_is_deterministic() {
        assert_eq!(TestChain::new(5).tip(), TestChain::new(5).tip());
    }

    #[test]
    fn test_zero_length_still_has_genesis() {
        let chain = TestChain::new(0);
        assert_eq!(chain.len(), 1);
        assert!(chain.tip().is_genesis());
    }

    #[test]
    fn test_next_block_extends_tip() {
        let chain = TestChain::new(3);
        let next = chain.next_block("payload");
        assert_eq!(next.index, 3);
        assert!(is_valid(&next, chain.tip()));
    }

    #[test]
    fn test_fork_diverges_after_keep() {
        let base = TestChain::new(4);
        let fork = fork_of(base.blocks(), 2, 3);

        assert_eq!(fork.len(), 5);
        assert_eq!(fork[..2], base.blocks()[..2]);
        assert_ne!(fork[2], base.blocks()[2]);
        assert!(verify_chain(&fork).is_ok());
    }

    #[tokio::test]
    async fn test_memory_gateway_loads_chain() {
        let chain = TestChain::new(3);
        let gateway = chain.memory_gateway();
        let loaded = gateway.load().await.unwrap();
        assert_eq!(loaded.as_deref(), Some(chain.blocks()));
    }
}
