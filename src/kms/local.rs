//! Local key service
//!
//! Holds a single master key in process memory and wraps data keys with
//! AES-256-GCM, binding the master key identifier as associated data.
//! Wrapped key layout: `nonce (12) || ciphertext (32) || tag (16)`.

use std::fmt;

use aes_gcm::{
    aead::{Aead, KeyInit, Payload},
    Aes256Gcm, Key, Nonce,
};
use async_trait::async_trait;
use tracing::debug;
use zeroize::Zeroizing;

use crate::crypto::{
    derive_master_key, random_bytes, KeyDerivationParams, SecureBytes, KEY_SIZE, NONCE_SIZE,
    TAG_SIZE,
};
use crate::error::{VaultError, VaultResult};

use super::{DataKey, KeyService, GENERATE_DATA_KEY, UNWRAP_DATA_KEY};

/// In-process key service with one master key
pub struct LocalKeyService {
    key_id: String,
    master_key: Zeroizing<[u8; KEY_SIZE]>,
}

impl LocalKeyService {
    /// Create a service around an existing master key
    pub fn new(key_id: impl Into<String>, master_key: [u8; KEY_SIZE]) -> Self {
        Self {
            key_id: key_id.into(),
            master_key: Zeroizing::new(master_key),
        }
    }

    /// Create a service with a random master key
    pub fn generate(key_id: impl Into<String>) -> VaultResult<Self> {
        let master_key = Zeroizing::new(random_bytes::<KEY_SIZE>()?);
        Ok(Self {
            key_id: key_id.into(),
            master_key,
        })
    }

    /// Create a service whose master key is derived from a passphrase
    pub fn from_passphrase(
        key_id: impl Into<String>,
        passphrase: &str,
        params: &KeyDerivationParams,
    ) -> VaultResult<Self> {
        Ok(Self {
            key_id: key_id.into(),
            master_key: derive_master_key(passphrase, params)?,
        })
    }

    /// The only master key identifier this service answers for
    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    fn cipher(&self) -> Aes256Gcm {
        Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&self.master_key[..]))
    }
}

#[async_trait]
impl KeyService for LocalKeyService {
    async fn generate_data_key(&self, master_key_identifier: &str) -> VaultResult<DataKey> {
        if master_key_identifier != self.key_id {
            return Err(VaultError::key_service(
                GENERATE_DATA_KEY,
                format!("NotFoundException: unknown master key '{}'", master_key_identifier),
            ));
        }

        let data_key = Zeroizing::new(random_bytes::<KEY_SIZE>()?);
        let nonce = random_bytes::<NONCE_SIZE>()?;

        let sealed = self
            .cipher()
            .encrypt(
                Nonce::from_slice(&nonce),
                Payload {
                    msg: &data_key[..],
                    aad: self.key_id.as_bytes(),
                },
            )
            .map_err(|_| VaultError::key_service(GENERATE_DATA_KEY, "failed to wrap data key"))?;

        let mut wrapped = Vec::with_capacity(NONCE_SIZE + sealed.len());
        wrapped.extend_from_slice(&nonce);
        wrapped.extend_from_slice(&sealed);

        debug!(key_id = %self.key_id, wrapped_len = wrapped.len(), "generated local data key");

        Ok(DataKey::new(SecureBytes::from(&data_key[..]), wrapped))
    }

    async fn unwrap_data_key(&self, wrapped_key: &[u8]) -> VaultResult<SecureBytes> {
        if wrapped_key.len() < NONCE_SIZE + TAG_SIZE {
            debug!(len = wrapped_key.len(), "wrapped key too short to verify");
            return Err(VaultError::Authentication);
        }

        let (nonce, sealed) = wrapped_key.split_at(NONCE_SIZE);
        let plaintext = self
            .cipher()
            .decrypt(
                Nonce::from_slice(nonce),
                Payload {
                    msg: sealed,
                    aad: self.key_id.as_bytes(),
                },
            )
            .map(SecureBytes::new)
            .map_err(|_| VaultError::Authentication)?;

        debug!(key_id = %self.key_id, operation = UNWRAP_DATA_KEY, "unwrapped local data key");
        Ok(plaintext)
    }
}

impl fmt::Debug for LocalKeyService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalKeyService")
            .field("key_id", &self.key_id)
            .finish_non_exhaustive()
    }
}
