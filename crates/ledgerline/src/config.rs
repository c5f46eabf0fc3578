//! Ledger configuration.

use ledgerline_core::GENESIS_DATA;
use serde::{Deserialize, Serialize};

/// How `replace` treats a longer candidate chain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReplacePolicy {
    /// Any strictly longer chain wins. The candidate's internal linkage is
    /// checked only to log a warning; a broken chain still replaces the
    /// current one.
    #[default]
    LengthOnly,
    /// A strictly longer chain wins only if it passes full verification.
    Verified,
}

/// Configuration for a [`crate::LedgerStore`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Chain selection policy for `replace`.
    pub replace_policy: ReplacePolicy,
    /// Payload of the genesis block created when no ledger exists yet.
    pub genesis_data: String,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            replace_policy: ReplacePolicy::default(),
            genesis_data: GENESIS_DATA.to_string(),
        }
    }
}
