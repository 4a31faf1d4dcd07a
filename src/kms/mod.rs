//! Key management service clients
//!
//! The envelope service only ever talks to a [`KeyService`]. Implementations:
//!
//! - [`LocalKeyService`]: one in-process master key, for offline use and tests
//! - [`AwsKeyService`]: AWS KMS (cargo feature `aws`)

use async_trait::async_trait;

use crate::crypto::SecureBytes;
use crate::error::VaultResult;

#[cfg(feature = "aws")]
pub mod aws;
pub mod local;

#[cfg(feature = "aws")]
pub use aws::AwsKeyService;
pub use local::LocalKeyService;

/// Operation name used in errors and logs for data key generation
pub const GENERATE_DATA_KEY: &str = "GenerateDataKey";

/// Operation name used in errors and logs for data key unwrapping
pub const UNWRAP_DATA_KEY: &str = "Decrypt";

/// A freshly generated data key
///
/// The plaintext half is zeroized when the value is dropped.
#[derive(Debug)]
pub struct DataKey {
    plaintext: SecureBytes,
    wrapped: Vec<u8>,
}

impl DataKey {
    pub fn new(plaintext: SecureBytes, wrapped: Vec<u8>) -> Self {
        Self { plaintext, wrapped }
    }

    /// The raw key to seal with
    pub fn plaintext(&self) -> &SecureBytes {
        &self.plaintext
    }

    /// The key as wrapped by the master key
    pub fn wrapped(&self) -> &[u8] {
        &self.wrapped
    }

    /// Split into the plaintext key and the wrapped key
    pub fn into_parts(self) -> (SecureBytes, Vec<u8>) {
        (self.plaintext, self.wrapped)
    }
}

/// Envelope key generation and unwrapping
///
/// Implementations must be stateless with respect to call history so that
/// concurrent seals and unseals need no locking.
#[async_trait]
pub trait KeyService: Send + Sync {
    /// Generate a one-time 256-bit data key under the given master key
    async fn generate_data_key(&self, master_key_identifier: &str) -> VaultResult<DataKey>;

    /// Recover the plaintext of a wrapped data key
    async fn unwrap_data_key(&self, wrapped_key: &[u8]) -> VaultResult<SecureBytes>;
}
