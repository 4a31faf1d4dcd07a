//! Master key derivation using Argon2id
//!
//! The local key service has no cloud KMS behind it, so its master key is
//! derived from a passphrase. Salt and cost parameters are stored in the
//! settings file; the passphrase never is.

use argon2::{Algorithm, Argon2, Params, Version};
use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::error::{VaultError, VaultResult};

use super::cipher::{random_bytes, KEY_SIZE};

/// Salt length in bytes
const SALT_SIZE: usize = 16;

/// Parameters for master key derivation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyDerivationParams {
    /// Salt for key derivation (base64 encoded)
    pub salt: String,
    /// Memory cost in KiB (default: 65536 = 64 MiB)
    pub memory_cost: u32,
    /// Time cost (iterations, default: 3)
    pub time_cost: u32,
    /// Parallelism degree (default: 4)
    pub parallelism: u32,
}

impl KeyDerivationParams {
    /// Create new params with a random salt and default costs
    pub fn new() -> VaultResult<Self> {
        let salt = random_bytes::<SALT_SIZE>()?;
        Ok(Self::with_values(STANDARD.encode(salt), 65536, 3, 4))
    }

    /// Create params with specific values
    pub fn with_values(salt: String, memory_cost: u32, time_cost: u32, parallelism: u32) -> Self {
        Self {
            salt,
            memory_cost,
            time_cost,
            parallelism,
        }
    }
}

/// Derive a 32-byte master key from a passphrase
pub fn derive_master_key(
    passphrase: &str,
    params: &KeyDerivationParams,
) -> VaultResult<Zeroizing<[u8; KEY_SIZE]>> {
    let salt = STANDARD
        .decode(&params.salt)
        .map_err(|e| VaultError::Config(format!("Invalid key derivation salt: {}", e)))?;

    let argon2_params = Params::new(
        params.memory_cost,
        params.time_cost,
        params.parallelism,
        Some(KEY_SIZE),
    )
    .map_err(|e| VaultError::Config(format!("Invalid Argon2 parameters: {}", e)))?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, argon2_params);

    let mut key = Zeroizing::new([0u8; KEY_SIZE]);
    argon2
        .hash_password_into(passphrase.as_bytes(), &salt, &mut key[..])
        .map_err(|e| VaultError::Config(format!("Key derivation failed: {}", e)))?;

    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cheap_params() -> KeyDerivationParams {
        let mut params = KeyDerivationParams::new().unwrap();
        params.memory_cost = 256;
        params.time_cost = 1;
        params.parallelism = 1;
        params
    }

    #[test]
    fn test_new_params_have_random_salt() {
        let params1 = KeyDerivationParams::new().unwrap();
        let params2 = KeyDerivationParams::new().unwrap();
        assert_ne!(params1.salt, params2.salt);
        assert_eq!(STANDARD.decode(&params1.salt).unwrap().len(), SALT_SIZE);
        assert_eq!(params1.memory_cost, 65536);
    }

    #[test]
    fn test_same_passphrase_same_key() {
        let params = cheap_params();
        let key1 = derive_master_key("correct horse", &params).unwrap();
        let key2 = derive_master_key("correct horse", &params).unwrap();
        assert_eq!(*key1, *key2);
    }

    #[test]
    fn test_different_passphrase_different_key() {
        let params = cheap_params();
        let key1 = derive_master_key("passphrase1", &params).unwrap();
        let key2 = derive_master_key("passphrase2", &params).unwrap();
        assert_ne!(*key1, *key2);
    }

    #[test]
    fn test_different_salt_different_key() {
        let key1 = derive_master_key("same", &cheap_params()).unwrap();
        let key2 = derive_master_key("same", &cheap_params()).unwrap();
        assert_ne!(*key1, *key2);
    }

    #[test]
    fn test_invalid_salt_rejected() {
        let mut params = cheap_params();
        params.salt = "not base64 !!".to_string();
        let result = derive_master_key("x", &params);
        assert!(matches!(result, Err(VaultError::Config(_))));
    }
}
