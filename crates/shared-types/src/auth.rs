//! # Ed25519 Authorization
//!
//! Key pairs for signing transactions and signature verification.

use ed25519_dalek::{Signer, SigningKey, Verifier, VerifyingKey};

use crate::codec::CodecError;
use crate::entities::{Action, Address, Auth, Base, PublicKey, Transaction};

/// Ed25519 key pair used to sign transactions.
pub struct KeyPair {
    signing_key: SigningKey,
}

impl KeyPair {
    /// Generate a random key pair.
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::generate(&mut rand::thread_rng()),
        }
    }

    /// Create from a 32-byte secret seed.
    pub fn from_seed(seed: [u8; 32]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(&seed),
        }
    }

    pub fn public_key(&self) -> PublicKey {
        self.signing_key.verifying_key().to_bytes()
    }

    /// Account address controlled by this key.
    pub fn address(&self) -> Address {
        crate::entities::address_of(&self.public_key())
    }

    /// Signs and assembles a transaction.
    pub fn sign_transaction(&self, base: Base, action: Action) -> Result<Transaction, CodecError> {
        let digest = Transaction::digest(&base, &action)?;
        let signature = self.signing_key.sign(&digest).to_bytes();
        Transaction::new(
            base,
            action,
            Auth::Ed25519 {
                signer: self.public_key(),
                signature,
            },
        )
    }
}

impl std::fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyPair")
            .field("public_key", &hex::encode(self.public_key()))
            .finish()
    }
}

/// Verifies the authorization of a transaction against its digest.
pub fn verify_auth(tx: &Transaction) -> bool {
    let Ok(digest) = Transaction::digest(tx.base(), tx.action()) else {
        return false;
    };
    match tx.auth() {
        Auth::Ed25519 { signer, signature } => {
            let Ok(key) = VerifyingKey::from_bytes(signer) else {
                return false;
            };
            let signature = ed25519_dalek::Signature::from_bytes(signature);
            key.verify(&digest, &signature).is_ok()
        }
    }
}
