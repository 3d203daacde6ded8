//! Ed25519 keypair signer.
//!
//! The secret key is accepted either hex-encoded or base58-encoded, and
//! either as a bare 32-byte seed or a 64-byte seed+pubkey pair (only the
//! seed half is used). Decoded key material is wiped after import.

use ed25519_dalek::{Signer, SigningKey};
use thiserror::Error;
use zeroize::Zeroize;

use drizzle_core::traits::TransferSigner;
use drizzle_core::types::Address;

#[derive(Debug, Error)]
pub enum SignerError {
    #[error("secret key is neither valid hex nor valid base58: {0}")]
    InvalidEncoding(String),
    #[error("secret key decodes to {0} bytes, expected 32 or 64")]
    InvalidLength(usize),
}

/// Holds the distribution wallet's signing key.
#[derive(Debug)]
pub struct KeypairSigner {
    key: SigningKey,
}

impl KeypairSigner {
    /// Import a secret key from its string encoding.
    pub fn from_secret_str(encoded: &str) -> Result<Self, SignerError> {
        let trimmed = encoded.trim();

        let mut bytes = match hex::decode(trimmed) {
            Ok(bytes) => bytes,
            Err(hex_err) => bs58::decode(trimmed)
                .into_vec()
                .map_err(|bs58_err| {
                    SignerError::InvalidEncoding(format!("hex: {hex_err}; base58: {bs58_err}"))
                })?,
        };

        if bytes.len() != 32 && bytes.len() != 64 {
            let len = bytes.len();
            bytes.zeroize();
            return Err(SignerError::InvalidLength(len));
        }

        let mut seed = [0u8; 32];
        seed.copy_from_slice(&bytes[..32]);
        bytes.zeroize();

        let key = SigningKey::from_bytes(&seed);
        seed.zeroize();
        Ok(Self { key })
    }
}

impl TransferSigner for KeypairSigner {
    fn source(&self) -> Address {
        Address(self.key.verifying_key().to_bytes())
    }

    fn sign(&self, payload: &[u8]) -> [u8; 64] {
        self.key.sign(payload).to_bytes()
    }
}
