use k256::ecdsa::signature::{Signer, Verifier};
use k256::ecdsa::{Signature, SigningKey, VerifyingKey};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use std::fmt;
use std::str::FromStr;

/// Errors that can occur during cryptographic operations
#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("Invalid public key: {0}")]
    InvalidPublicKey(String),

    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),

    #[error("Invalid signature: {0}")]
    InvalidSignature(String),

    #[error("Decoding error: {0}")]
    DecodingError(String),
}

/// A wallet address: the hex encoding of a compressed secp256k1 public key
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Address(pub String);

impl Address {
    /// Creates a new address from a public key
    pub fn from_public_key(public_key: &VerifyingKey) -> Self {
        Address(hex::encode(public_key.to_sec1_bytes()))
    }

    /// Converts the address back to a public key
    pub fn to_public_key(&self) -> Result<VerifyingKey, CryptoError> {
        let bytes = hex::decode(&self.0)
            .map_err(|e| CryptoError::DecodingError(e.to_string()))?;

        VerifyingKey::from_sec1_bytes(&bytes)
            .map_err(|e| CryptoError::InvalidPublicKey(e.to_string()))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Address {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Validate that the string is valid hex before accepting it
        hex::decode(s).map_err(|e| CryptoError::DecodingError(e.to_string()))?;

        Ok(Address(s.to_string()))
    }
}

/// A digital signature in hex format
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DigitalSignature(pub String);

impl DigitalSignature {
    /// Creates a new digital signature from a raw ECDSA signature
    pub fn from_signature(signature: &Signature) -> Self {
        DigitalSignature(hex::encode(signature.to_bytes()))
    }

    /// Converts the digital signature back to a raw ECDSA signature
    pub fn to_signature(&self) -> Result<Signature, CryptoError> {
        let bytes = hex::decode(&self.0)
            .map_err(|e| CryptoError::DecodingError(e.to_string()))?;

        Signature::from_slice(&bytes)
            .map_err(|e| CryptoError::InvalidSignature(e.to_string()))
    }
}

/// Anything that can authorize transactions for an address.
///
/// `Wallet` is the only implementation in this crate, but the seam lets an
/// embedder plug in a hardware token or a remote signer.
pub trait SigningKeyPair {
    /// The address of the public half of the key pair
    fn address(&self) -> &Address;

    /// Signs a transaction digest with the private half of the key pair
    fn sign_digest(&self, digest: &[u8]) -> Result<DigitalSignature, CryptoError>;
}

/// A wallet holding a secp256k1 keypair
#[derive(Debug, Clone)]
pub struct Wallet {
    signing_key: SigningKey,
    verifying_key: VerifyingKey,
    address: Address,
}

impl Wallet {
    /// Creates a new wallet with a random keypair
    pub fn new() -> Self {
        let signing_key = SigningKey::random(&mut OsRng);
        let verifying_key = VerifyingKey::from(&signing_key);
        let address = Address::from_public_key(&verifying_key);

        Wallet {
            signing_key,
            verifying_key,
            address,
        }
    }

    /// Creates a wallet from an existing secret key
    pub fn from_secret_key(secret_key_bytes: &[u8]) -> Result<Self, CryptoError> {
        let signing_key = SigningKey::from_slice(secret_key_bytes)
            .map_err(|e| CryptoError::InvalidPrivateKey(e.to_string()))?;
        let verifying_key = VerifyingKey::from(&signing_key);
        let address = Address::from_public_key(&verifying_key);

        Ok(Wallet {
            signing_key,
            verifying_key,
            address,
        })
    }

    /// Gets the wallet's address
    pub fn address(&self) -> &Address {
        &self.address
    }

    /// Gets the wallet's public key
    pub fn public_key(&self) -> &VerifyingKey {
        &self.verifying_key
    }

    /// Exports the wallet's secret key as bytes
    pub fn export_secret_key(&self) -> Vec<u8> {
        self.signing_key.to_bytes().to_vec()
    }
}

impl Default for Wallet {
    fn default() -> Self {
        Self::new()
    }
}

impl SigningKeyPair for Wallet {
    fn address(&self) -> &Address {
        &self.address
    }

    fn sign_digest(&self, digest: &[u8]) -> Result<DigitalSignature, CryptoError> {
        let signature: Signature = self.signing_key.sign(digest);
        Ok(DigitalSignature::from_signature(&signature))
    }
}

/// Verifies a signature over a digest against the public key behind `address`
pub fn verify_signature(
    digest: &[u8],
    signature: &DigitalSignature,
    address: &Address,
) -> Result<bool, CryptoError> {
    let public_key = address.to_public_key()?;
    let signature = signature.to_signature()?;

    Ok(public_key.verify(digest, &signature).is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wallet_creation() {
        let wallet = Wallet::new();
        assert!(!wallet.address().0.is_empty());
    }

    #[test]
    fn test_signing_and_verification() {
        let wallet = Wallet::new();
        let digest = b"8c5d9e4f3a2b1c0d";

        let signature = wallet.sign_digest(digest).unwrap();

        // Verify the signature
        let result = verify_signature(digest, &signature, wallet.address()).unwrap();
        assert!(result);

        // Verify with a different digest
        let wrong_digest = b"0000000000000000";
        let result = verify_signature(wrong_digest, &signature, wallet.address()).unwrap();
        assert!(!result);
    }

    #[test]
    fn test_address_conversion() {
        let wallet = Wallet::new();
        let address = wallet.address();

        // Convert address to public key and back
        let public_key = address.to_public_key().unwrap();
        assert_eq!(&Address::from_public_key(&public_key), address);
    }

    #[test]
    fn test_wallet_from_secret_key() {
        let wallet = Wallet::new();
        let secret = wallet.export_secret_key();

        let restored = Wallet::from_secret_key(&secret).unwrap();
        assert_eq!(restored.address(), wallet.address());
    }

    #[test]
    fn test_address_rejects_non_hex() {
        assert!("not hex!".parse::<Address>().is_err());
        assert!("02abcdef".parse::<Address>().is_ok());
    }
}
