//! Seal/unseal orchestration
//!
//! Drives the envelope workflow: ask the key service for a data key, seal the
//! plaintext with it, drop the key, and prove the record opens before handing
//! it back.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::crypto::{self, SecureBytes};
use crate::error::{VaultError, VaultResult};
use crate::kms::{KeyService, GENERATE_DATA_KEY, UNWRAP_DATA_KEY};
use crate::models::{validate_identity, EncryptedRecord};

/// Default time allowed for a single key service call
pub const DEFAULT_KEY_SERVICE_TIMEOUT: Duration = Duration::from_secs(30);

/// Service for sealing and unsealing secrets
///
/// Holds no mutable state, so one instance can be shared across tasks.
#[derive(Clone)]
pub struct EnvelopeService {
    key_service: Arc<dyn KeyService>,
    verifier: Arc<dyn KeyService>,
    timeout: Duration,
}

impl EnvelopeService {
    /// Create a service that generates and verifies through one client
    pub fn new(key_service: Arc<dyn KeyService>) -> Self {
        Self {
            verifier: Arc::clone(&key_service),
            key_service,
            timeout: DEFAULT_KEY_SERVICE_TIMEOUT,
        }
    }

    /// Use a separate client for the post-seal verification
    pub fn with_verifier(mut self, verifier: Arc<dyn KeyService>) -> Self {
        self.verifier = verifier;
        self
    }

    /// Set the per-call key service timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Seal a plaintext into a new record
    ///
    /// The record is unsealed through the verifier before it is returned; if
    /// that fails, the error is returned and the record is discarded.
    pub async fn seal_secret(
        &self,
        master_key_identifier: &str,
        property_name: &str,
        plaintext: &[u8],
    ) -> VaultResult<EncryptedRecord> {
        validate_identity(master_key_identifier, property_name)?;

        let data_key = self
            .call(
                GENERATE_DATA_KEY,
                self.key_service.generate_data_key(master_key_identifier),
            )
            .await?;

        let record = {
            let (raw_key, wrapped_key) = data_key.into_parts();
            let sealed = crypto::seal(&raw_key, plaintext)?;
            drop(raw_key);
            EncryptedRecord::new(
                master_key_identifier,
                property_name,
                wrapped_key,
                sealed,
                Utc::now(),
            )?
        };

        debug!(
            master_key = master_key_identifier,
            property = property_name,
            plaintext_len = plaintext.len(),
            "sealed secret, verifying"
        );

        if let Err(e) = self.unseal_with(self.verifier.as_ref(), &record).await {
            warn!(
                master_key = master_key_identifier,
                property = property_name,
                error = %e,
                "sealed record failed verification"
            );
            return Err(e);
        }

        info!(
            master_key = master_key_identifier,
            property = property_name,
            "sealed and verified secret"
        );
        Ok(record)
    }

    /// Recover the plaintext of a record
    pub async fn unseal_secret(&self, record: &EncryptedRecord) -> VaultResult<SecureBytes> {
        let plaintext = self.unseal_with(self.key_service.as_ref(), record).await?;
        debug!(
            master_key = record.master_key_identifier(),
            property = record.property_name(),
            "unsealed secret"
        );
        Ok(plaintext)
    }

    async fn unseal_with(
        &self,
        key_service: &dyn KeyService,
        record: &EncryptedRecord,
    ) -> VaultResult<SecureBytes> {
        let raw_key = self
            .call(
                UNWRAP_DATA_KEY,
                key_service.unwrap_data_key(record.wrapped_data_key()),
            )
            .await?;

        crypto::open(&raw_key, record.nonce(), record.ciphertext())
    }

    async fn call<T>(
        &self,
        operation: &'static str,
        request: impl Future<Output = VaultResult<T>>,
    ) -> VaultResult<T> {
        match tokio::time::timeout(self.timeout, request).await {
            Ok(result) => result,
            Err(_) => Err(VaultError::KeyServiceTimeout {
                operation,
                timeout: self.timeout,
            }),
        }
    }
}
