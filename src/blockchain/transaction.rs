use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

use super::crypto::{verify_signature, Address, CryptoError, DigitalSignature, SigningKeyPair};

/// Errors that can occur during transaction operations
#[derive(Debug, Error)]
pub enum TransactionError {
    #[error("Cannot sign transactions for another wallet")]
    WrongSigningKey,

    #[error("No signature in this transaction")]
    MissingSignature,

    #[error("Crypto error: {0}")]
    CryptoError(#[from] CryptoError),
}

/// A transfer of value from one address to another.
///
/// A transaction with no sender is a reward mint: it is constructed by the
/// ledger itself when a block is mined and needs no signature.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    /// Sender's address, or `None` for a mining reward mint
    pub from_address: Option<Address>,

    /// Recipient's address
    pub to_address: Address,

    /// Amount being transferred
    pub amount: f64,

    /// Digital signature over the transaction digest
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature: Option<DigitalSignature>,
}

impl Transaction {
    /// Creates a new unsigned transaction
    pub fn new(from_address: Address, to_address: Address, amount: f64) -> Self {
        Transaction {
            from_address: Some(from_address),
            to_address,
            amount,
            signature: None,
        }
    }

    /// Creates a mining reward transaction (no sender, no signature)
    pub fn reward(to_address: Address, amount: f64) -> Self {
        Transaction {
            from_address: None,
            to_address,
            amount,
            signature: None,
        }
    }

    /// Calculates the SHA-256 digest of the transaction as a hex string.
    ///
    /// Only the transfer fields are hashed; the signature covers this digest
    /// and so cannot be part of it.
    pub fn calculate_hash(&self) -> String {
        let data = serde_json::json!({
            "from_address": self.from_address,
            "to_address": self.to_address,
            "amount": self.amount,
        });

        let mut hasher = Sha256::new();
        hasher.update(data.to_string().as_bytes());

        format!("{:x}", hasher.finalize())
    }

    /// Signs the transaction with the given key pair.
    ///
    /// The key pair must be the one behind `from_address`; signing on behalf
    /// of another wallet is rejected.
    pub fn sign(&mut self, key_pair: &impl SigningKeyPair) -> Result<(), TransactionError> {
        if self.from_address.as_ref() != Some(key_pair.address()) {
            return Err(TransactionError::WrongSigningKey);
        }

        let digest = self.calculate_hash();
        self.signature = Some(key_pair.sign_digest(digest.as_bytes())?);

        Ok(())
    }

    /// Checks the transaction's signature.
    ///
    /// Reward mints are always valid. Any other transaction must carry a
    /// signature that verifies against the sender's public key.
    pub fn is_valid(&self) -> Result<bool, TransactionError> {
        let from_address = match &self.from_address {
            Some(address) => address,
            None => return Ok(true),
        };

        let signature = match &self.signature {
            Some(signature) => signature,
            None => return Err(TransactionError::MissingSignature),
        };

        let digest = self.calculate_hash();
        verify_signature(digest.as_bytes(), signature, from_address)
            .map_err(TransactionError::from)
    }

    /// Checks if the transaction is a mining reward mint
    pub fn is_reward(&self) -> bool {
        self.from_address.is_none()
    }
}
