//! AES-256-GCM envelope cipher
//!
//! Seals plaintext under a one-time data key. Every seal draws a fresh
//! 96-bit nonce from the operating system; callers cannot supply their own.

use aes_gcm::aead::rand_core::RngCore;
use aes_gcm::{
    aead::{Aead, KeyInit, OsRng},
    Aes256Gcm, Nonce,
};

use crate::error::{VaultError, VaultResult};

use super::SecureBytes;

/// Size of an AES-256 key in bytes
pub const KEY_SIZE: usize = 32;

/// Size of the AES-GCM nonce in bytes (96 bits)
pub const NONCE_SIZE: usize = 12;

/// Size of the AES-GCM authentication tag in bytes
pub const TAG_SIZE: usize = 16;

/// Output of a seal: the nonce and the ciphertext with its tag appended
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealedPayload {
    pub nonce: [u8; NONCE_SIZE],
    pub ciphertext: Vec<u8>,
}

/// Encrypt plaintext with a raw 32-byte key
pub fn seal(raw_key: &[u8], plaintext: &[u8]) -> VaultResult<SealedPayload> {
    let cipher = new_cipher(raw_key)?;
    let nonce = random_bytes::<NONCE_SIZE>()?;

    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce), plaintext)
        .map_err(|_| VaultError::Validation("Plaintext too large for AES-GCM".to_string()))?;

    Ok(SealedPayload { nonce, ciphertext })
}

/// Decrypt and verify a ciphertext produced by [`seal`]
///
/// Any tag mismatch (wrong key, wrong nonce, altered bytes) is reported as a
/// single [`VaultError::Authentication`] with no partial output.
pub fn open(raw_key: &[u8], nonce: &[u8], ciphertext: &[u8]) -> VaultResult<SecureBytes> {
    let cipher = new_cipher(raw_key)?;

    if nonce.len() != NONCE_SIZE {
        return Err(VaultError::NonceLength {
            expected: NONCE_SIZE,
            actual: nonce.len(),
        });
    }

    cipher
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map(SecureBytes::new)
        .map_err(|_| VaultError::Authentication)
}

/// Fill an array from the operating system CSPRNG
///
/// There is no fallback: if the OS source fails the caller gets
/// [`VaultError::RandomSource`].
pub fn random_bytes<const N: usize>() -> VaultResult<[u8; N]> {
    let mut bytes = [0u8; N];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| VaultError::RandomSource(e.to_string()))?;
    Ok(bytes)
}

fn new_cipher(raw_key: &[u8]) -> VaultResult<Aes256Gcm> {
    if raw_key.len() != KEY_SIZE {
        return Err(VaultError::KeyLength {
            expected: KEY_SIZE,
            actual: raw_key.len(),
        });
    }
    Aes256Gcm::new_from_slice(raw_key).map_err(|_| VaultError::KeyLength {
        expected: KEY_SIZE,
        actual: raw_key.len(),
    })
}
