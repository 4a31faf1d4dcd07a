//! Cryptographic functions for kms-vault
//!
//! Provides the AES-256-GCM envelope cipher, zeroizing containers for key
//! material, and Argon2id derivation for the local master key.

pub mod cipher;
pub mod key_derivation;
pub mod secure_memory;

pub use cipher::{open, random_bytes, seal, SealedPayload, KEY_SIZE, NONCE_SIZE, TAG_SIZE};
pub use key_derivation::{derive_master_key, KeyDerivationParams};
pub use secure_memory::{SecureBytes, SecureString};
