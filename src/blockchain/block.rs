use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::transaction::Transaction;

/// How often the mining progress callback fires, in nonce attempts
const MINING_PROGRESS_INTERVAL: u64 = 100_000;

/// A block in the chain.
///
/// Fields are mutable only while the block is being mined; once appended to
/// a chain the block is handed out by shared reference and stays sealed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    /// Timestamp when the block was created (hash input only)
    timestamp: DateTime<Utc>,

    /// Transactions included in this block, in insertion order
    transactions: Vec<Transaction>,

    /// Hash of the previous block, or "0" for the genesis block
    previous_hash: String,

    /// Nonce incremented during proof of work
    nonce: u64,

    /// Hash of the block contents
    hash: String,
}

impl Block {
    /// Creates a new unmined block with nonce 0 and its hash computed
    pub fn new(
        timestamp: DateTime<Utc>,
        transactions: Vec<Transaction>,
        previous_hash: String,
    ) -> Self {
        let mut block = Block {
            timestamp,
            transactions,
            previous_hash,
            nonce: 0,
            hash: String::new(),
        };

        block.hash = block.calculate_hash();
        block
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn previous_hash(&self) -> &str {
        &self.previous_hash
    }

    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    pub fn hash(&self) -> &str {
        &self.hash
    }

    /// Calculates the SHA-256 hash of the block as a hex string.
    ///
    /// The transaction list is serialized in order, so reordering or editing
    /// any transaction changes the hash.
    pub fn calculate_hash(&self) -> String {
        let data = serde_json::json!({
            "previous_hash": self.previous_hash,
            "timestamp": self.timestamp,
            "transactions": self.transactions,
            "nonce": self.nonce,
        });

        let mut hasher = Sha256::new();
        hasher.update(data.to_string().as_bytes());

        format!("{:x}", hasher.finalize())
    }

    /// Mines the block: searches for a nonce whose hash starts with
    /// `difficulty` zero hex characters.
    ///
    /// This is a blocking busy loop with no cancellation; the expected cost
    /// grows by a factor of 16 per difficulty step.
    pub fn mine(&mut self, difficulty: usize) {
        self.mine_with_progress(difficulty, &mut |_| {});
    }

    /// Mines the block, invoking `on_milestone` with the current nonce every
    /// `MINING_PROGRESS_INTERVAL` attempts
    pub fn mine_with_progress(&mut self, difficulty: usize, on_milestone: &mut dyn FnMut(u64)) {
        let target = "0".repeat(difficulty);

        while !self.hash.starts_with(&target) {
            self.nonce += 1;
            self.hash = self.calculate_hash();

            if self.nonce % MINING_PROGRESS_INTERVAL == 0 {
                on_milestone(self.nonce);
            }
        }
    }

    /// Checks every contained transaction, stopping at the first invalid one
    pub fn has_valid_transactions(&self) -> bool {
        self.transactions
            .iter()
            .all(|tx| matches!(tx.is_valid(), Ok(true)))
    }

    /// Overwrites a stored transaction amount in place, bypassing all
    /// validation. Exists only to simulate tampering in tests.
    #[doc(hidden)]
    pub fn debug_tamper_transaction_amount(&mut self, index: usize, amount: f64) {
        self.transactions[index].amount = amount;
    }
}
