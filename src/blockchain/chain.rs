use chrono::{DateTime, Utc};
use log::{debug, info};
use thiserror::Error;

use super::block::Block;
use super::crypto::Address;
use super::transaction::{Transaction, TransactionError};

/// Default number of leading zero hex characters required of a block hash
const DEFAULT_DIFFICULTY: usize = 2;

/// Default amount credited to the miner of a block
const DEFAULT_MINING_REWARD: f64 = 500.0;

/// Errors that can occur when admitting a transaction to the ledger
#[derive(Debug, Error)]
pub enum BlockchainError {
    #[error("Transaction must include from and to addresses")]
    MissingAddress,

    #[error("Transaction amount must be higher than zero, got {0}")]
    InvalidAmount(f64),

    #[error("Transaction signature does not verify")]
    InvalidSignature,

    #[error("Transaction error: {0}")]
    TransactionError(#[from] TransactionError),
}

/// The ledger: an append-only chain of blocks plus the pool of transactions
/// waiting to be mined.
///
/// Single-threaded by design. Callers that mine from several threads must
/// serialize access themselves.
#[derive(Debug, Clone)]
pub struct Blockchain {
    /// The chain of blocks, index 0 being the genesis block
    chain: Vec<Block>,

    /// Pending transactions to be included in the next block
    pending_transactions: Vec<Transaction>,

    /// Mining difficulty (number of leading zeros required in hash)
    difficulty: usize,

    /// Amount credited to the miner per mined block
    mining_reward: f64,
}

impl Blockchain {
    /// Creates a new ledger containing only the genesis block, with default
    /// difficulty and mining reward
    pub fn new() -> Self {
        Self::with_params(DEFAULT_DIFFICULTY, DEFAULT_MINING_REWARD)
    }

    /// Creates a new ledger with the given difficulty and mining reward
    pub fn with_params(difficulty: usize, mining_reward: f64) -> Self {
        Blockchain {
            chain: vec![Self::create_genesis_block()],
            pending_transactions: Vec::new(),
            difficulty,
            mining_reward,
        }
    }

    /// Creates the genesis block: fixed timestamp, no transactions, previous
    /// hash "0". Not mined.
    fn create_genesis_block() -> Block {
        Block::new(genesis_timestamp(), Vec::new(), "0".to_string())
    }

    /// Gets the last block in the chain
    pub fn latest_block(&self) -> &Block {
        self.chain
            .last()
            .expect("chain always contains the genesis block")
    }

    /// Gets the whole chain, genesis first
    pub fn blocks(&self) -> &[Block] {
        &self.chain
    }

    /// Gets the transactions waiting to be mined
    pub fn pending_transactions(&self) -> &[Transaction] {
        &self.pending_transactions
    }

    pub fn difficulty(&self) -> usize {
        self.difficulty
    }

    pub fn mining_reward(&self) -> f64 {
        self.mining_reward
    }

    /// Admits a transaction into the pending pool.
    ///
    /// This is the sole admission gate: the transaction must name both
    /// addresses, carry a verifying signature, and move a positive amount.
    /// On any rejection the pool is left untouched.
    pub fn add_transaction(&mut self, transaction: Transaction) -> Result<(), BlockchainError> {
        let from_address = transaction
            .from_address
            .as_ref()
            .ok_or(BlockchainError::MissingAddress)?;

        if from_address.0.is_empty() || transaction.to_address.0.is_empty() {
            return Err(BlockchainError::MissingAddress);
        }

        if !transaction.is_valid()? {
            return Err(BlockchainError::InvalidSignature);
        }

        if transaction.amount <= 0.0 {
            return Err(BlockchainError::InvalidAmount(transaction.amount));
        }

        debug!(
            "Admitted transaction of {} from {} to {}",
            transaction.amount, from_address, transaction.to_address
        );
        self.pending_transactions.push(transaction);

        Ok(())
    }

    /// Mines the pending pool into a new block and appends it to the chain.
    ///
    /// A reward transaction for `reward_address` is added to the pool first,
    /// so the reward rides in the very block being mined. The pool is empty
    /// when this returns. Returns a copy of the sealed block.
    pub fn mine_pending_transactions(&mut self, reward_address: &Address) -> Block {
        let reward_tx = Transaction::reward(reward_address.clone(), self.mining_reward);
        self.pending_transactions.push(reward_tx);

        let mut block = Block::new(
            Utc::now(),
            std::mem::take(&mut self.pending_transactions),
            self.latest_block().hash().to_string(),
        );

        block.mine(self.difficulty);
        info!(
            "Mined block {} at difficulty {}: {}",
            self.chain.len(),
            self.difficulty,
            block.hash()
        );

        self.chain.push(block);
        self.latest_block().clone()
    }

    /// Computes the balance of an address by replaying every transaction in
    /// every block. No caching; always a full scan.
    pub fn balance_of(&self, address: &Address) -> f64 {
        let mut balance = 0.0;

        for block in &self.chain {
            for transaction in block.transactions() {
                if transaction.from_address.as_ref() == Some(address) {
                    balance -= transaction.amount;
                }

                if &transaction.to_address == address {
                    balance += transaction.amount;
                }
            }
        }

        balance
    }

    /// Verifies the whole chain: every non-genesis block must contain only
    /// valid transactions, hash to its stored hash, and link to its
    /// predecessor. Detection only; nothing is repaired.
    pub fn is_valid(&self) -> bool {
        for i in 1..self.chain.len() {
            let current_block = &self.chain[i];
            let previous_block = &self.chain[i - 1];

            if !current_block.has_valid_transactions() {
                return false;
            }

            if current_block.hash() != current_block.calculate_hash() {
                return false;
            }

            if current_block.previous_hash() != previous_block.hash() {
                return false;
            }
        }

        true
    }

    /// Overwrites a stored transaction amount in place, bypassing the
    /// admission gate. Exists only to simulate tampering in tests.
    #[doc(hidden)]
    pub fn debug_tamper_transaction_amount(
        &mut self,
        block_index: usize,
        tx_index: usize,
        amount: f64,
    ) {
        self.chain[block_index].debug_tamper_transaction_amount(tx_index, amount);
    }
}

impl Default for Blockchain {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixed timestamp of the genesis block
fn genesis_timestamp() -> DateTime<Utc> {
    DateTime::UNIX_EPOCH
}
