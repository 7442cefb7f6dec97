//! A minimal append-only ledger.
//!
//! Transactions are signed secp256k1 transfers, blocks are sealed by a
//! proof-of-work search, and the [`Blockchain`] owns the chain, the pending
//! pool, balance replay, and integrity verification. The whole thing runs
//! in process and single-threaded; there is no networking, persistence, or
//! fork resolution.
//!
//! ```
//! use tinyledger::{Blockchain, Transaction, Wallet};
//!
//! let mut ledger = Blockchain::with_params(2, 500.0);
//! let alice = Wallet::new();
//! let bob = Wallet::new();
//!
//! let mut tx = Transaction::new(alice.address().clone(), bob.address().clone(), 20.0);
//! tx.sign(&alice).unwrap();
//! ledger.add_transaction(tx).unwrap();
//!
//! ledger.mine_pending_transactions(alice.address());
//! assert_eq!(ledger.balance_of(bob.address()), 20.0);
//! assert!(ledger.is_valid());
//! ```

pub mod blockchain;

pub use blockchain::{
    verify_signature, Address, Block, Blockchain, BlockchainError, CryptoError, DigitalSignature,
    SigningKeyPair, Transaction, TransactionError, Wallet,
};
