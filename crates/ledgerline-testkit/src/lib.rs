//! # Ledgerline Testkit
//!
//! Testing utilities for Ledgerline.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: Known block fields with their expected SHA-256 digests
//! - **Generators**: Proptest strategies for blocks and chains
//! - **Fixtures**: Deterministic chains and pre-loaded gateways
//!
//! ## Golden Vectors
//!
//! ```rust
//! use ledgerline_testkit::vectors::{all_vectors, verify_all_vectors};
//!
//! assert!(verify_all_vectors().is_ok());
//! for vector in all_vectors() {
//!     println!("{}: {}", vector.name, vector.expected_hash);
//! }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use ledgerline_testkit::generators::valid_chain;
//!
//! proptest! {
//!     #[test]
//!     fn generated_chains_verify(chain in valid_chain(16)) {
//!         prop_assert!(ledgerline_core::verify_chain(&chain).is_ok());
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use ledgerline_testkit::fixtures::TestChain;
//!
//! let chain = TestChain::new(3);
//! let candidate = chain.next_block("payload");
//! assert_eq!(candidate.index, 3);
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{fork_of, TestChain};
pub use generators::{valid_chain, BlockParams};
pub use vectors::{all_vectors, verify_all_vectors, GoldenVector};
