//! AWS KMS key service
//!
//! Data keys come from `GenerateDataKey` with an `AES_256` key spec and are
//! unwrapped with `Decrypt`. The KMS ciphertext blob already names its master
//! key, so unwrapping needs only the blob.

use async_trait::async_trait;
use aws_sdk_kms::config::Region;
use aws_sdk_kms::error::DisplayErrorContext;
use aws_sdk_kms::primitives::Blob;
use aws_sdk_kms::types::DataKeySpec;
use aws_sdk_kms::Client as KmsClient;
use tracing::debug;

use crate::crypto::SecureBytes;
use crate::error::{VaultError, VaultResult};

use super::{DataKey, KeyService, GENERATE_DATA_KEY, UNWRAP_DATA_KEY};

/// AWS KMS key service
#[derive(Debug, Clone)]
pub struct AwsKeyService {
    client: KmsClient,
}

impl AwsKeyService {
    /// Build a client from the default credential chain
    ///
    /// `region` and `profile` override the environment when given.
    pub async fn from_env(region: Option<String>, profile: Option<String>) -> Self {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
        if let Some(region) = region {
            loader = loader.region(Region::new(region));
        }
        if let Some(profile) = profile {
            loader = loader.profile_name(profile);
        }

        let config = loader.load().await;
        Self {
            client: KmsClient::new(&config),
        }
    }

    /// Wrap an already configured KMS client
    pub fn with_client(client: KmsClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl KeyService for AwsKeyService {
    async fn generate_data_key(&self, master_key_identifier: &str) -> VaultResult<DataKey> {
        let mut output = self
            .client
            .generate_data_key()
            .key_id(master_key_identifier)
            .key_spec(DataKeySpec::Aes256)
            .send()
            .await
            .map_err(|e| {
                VaultError::key_service(GENERATE_DATA_KEY, DisplayErrorContext(&e).to_string())
            })?;

        // Take the SDK's buffer so the only plaintext copy is zeroized on drop
        let plaintext = output
            .plaintext
            .take()
            .map(|blob| SecureBytes::new(blob.into_inner()))
            .ok_or_else(|| VaultError::key_service(GENERATE_DATA_KEY, "no plaintext in response"))?;

        let wrapped = output
            .ciphertext_blob
            .take()
            .map(Blob::into_inner)
            .ok_or_else(|| {
                VaultError::key_service(GENERATE_DATA_KEY, "no ciphertext blob in response")
            })?;

        debug!(
            key_id = output.key_id().unwrap_or(master_key_identifier),
            "generated KMS data key"
        );

        Ok(DataKey::new(plaintext, wrapped))
    }

    async fn unwrap_data_key(&self, wrapped_key: &[u8]) -> VaultResult<SecureBytes> {
        let mut output = self
            .client
            .decrypt()
            .ciphertext_blob(Blob::new(wrapped_key))
            .send()
            .await
            .map_err(|e| {
                let invalid_ciphertext = e
                    .as_service_error()
                    .map(|se| se.is_invalid_ciphertext_exception())
                    .unwrap_or(false);
                if invalid_ciphertext {
                    VaultError::Authentication
                } else {
                    VaultError::key_service(UNWRAP_DATA_KEY, DisplayErrorContext(&e).to_string())
                }
            })?;

        let plaintext = output
            .plaintext
            .take()
            .map(|blob| SecureBytes::new(blob.into_inner()))
            .ok_or_else(|| VaultError::key_service(UNWRAP_DATA_KEY, "no plaintext in response"))?;

        debug!(key_id = output.key_id().unwrap_or("unknown"), "unwrapped KMS data key");
        Ok(plaintext)
    }
}
