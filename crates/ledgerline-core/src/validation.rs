//! Block validation: tip linkage and hash integrity.

use crate::block::Block;
use crate::error::{ChainError, ValidationError};

/// Check that `candidate` directly extends `tip`.
///
/// Checks, in order:
/// 1. `candidate.index == tip.index + 1`
/// 2. `candidate.prev_hash == tip.hash`
/// 3. the hash recomputed over the candidate's fields equals `candidate.hash`
///
/// The first failing check is reported.
pub fn check_block(candidate: &Block, tip: &Block) -> Result<(), ValidationError> {
    let expected = tip.index.checked_add(1);
    if expected != Some(candidate.index) {
        return Err(ValidationError::InvalidIndex {
            expected,
            got: candidate.index,
        });
    }

    if candidate.prev_hash != tip.hash {
        return Err(ValidationError::BrokenLink {
            expected: tip.hash.clone(),
            got: candidate.prev_hash.clone(),
        });
    }

    let computed = candidate.compute_hash();
    if !computed.matches_hex(&candidate.hash) {
        return Err(ValidationError::HashMismatch {
            computed: computed.to_hex(),
            claimed: candidate.hash.clone(),
        });
    }

    Ok(())
}

/// Whether `candidate` is a valid successor of `tip`.
pub fn is_valid(candidate: &Block, tip: &Block) -> bool {
    check_block(candidate, tip).is_ok()
}

/// Verify every invariant of a whole chain.
///
/// The chain must be non-empty, start with a genesis block whose hash
/// matches its fields, and every later block must pass [`check_block`]
/// against its predecessor.
pub fn verify_chain(chain: &[Block]) -> Result<(), ChainError> {
    let genesis = chain.first().ok_or(ChainError::Empty)?;

    if genesis.index != 0 {
        return Err(ChainError::InvalidGenesis(format!(
            "index is {}, expected 0",
            genesis.index
        )));
    }
    if !genesis.prev_hash.is_empty() {
        return Err(ChainError::InvalidGenesis("prev_hash is not empty".into()));
    }
    if !genesis.has_valid_hash() {
        return Err(ChainError::InvalidGenesis("hash does not match fields".into()));
    }

    for (position, pair) in chain.windows(2).enumerate() {
        check_block(&pair[1], &pair[0]).map_err(|source| ChainError::Broken {
            position: position + 1,
            source,
        })?;
    }

    Ok(())
}
