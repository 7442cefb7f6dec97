// Blockchain module
//
// This module contains the core ledger implementation including:
// - Block structure and proof of work
// - Blockchain (chain + pending pool)
// - Transaction structure and signing
// - Cryptography utilities

pub mod block;
pub mod chain;
pub mod crypto;
pub mod transaction;

// Re-export main components for easier access
pub use block::Block;
pub use chain::{Blockchain, BlockchainError};
pub use crypto::{verify_signature, Address, CryptoError, DigitalSignature, SigningKeyPair, Wallet};
pub use transaction::{Transaction, TransactionError};
