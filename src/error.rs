//! Custom error types for kms-vault
//!
//! This module defines the error hierarchy for sealing and unsealing secrets
//! using thiserror for ergonomic error definitions.

use std::time::Duration;

use thiserror::Error;

/// The main error type for kms-vault operations
#[derive(Error, Debug)]
pub enum VaultError {
    /// The key-management service rejected or failed a request
    #[error("Key service {operation} failed: {message}")]
    KeyService {
        operation: &'static str,
        message: String,
    },

    /// The key-management service did not answer in time
    #[error("Key service {operation} timed out after {timeout:?}")]
    KeyServiceTimeout {
        operation: &'static str,
        timeout: Duration,
    },

    /// A raw data key had the wrong length
    #[error("Invalid key length: expected {expected} bytes, got {actual}")]
    KeyLength { expected: usize, actual: usize },

    /// A nonce had the wrong length
    #[error("Invalid nonce length: expected {expected} bytes, got {actual}")]
    NonceLength { expected: usize, actual: usize },

    /// Ciphertext failed its integrity check
    #[error("Authentication failed: ciphertext could not be verified")]
    Authentication,

    /// The operating system random source is unavailable
    #[error("Secure random source unavailable: {0}")]
    RandomSource(String),

    /// Validation errors for record identity fields
    #[error("Validation error: {0}")]
    Validation(String),

    /// Base64 or timestamp decoding errors
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// YAML serialization/deserialization errors
    #[error("YAML error: {0}")]
    Yaml(String),

    /// Record file errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Output rendering errors
    #[error("Render error: {0}")]
    Render(String),
}

impl VaultError {
    /// Create a key service error for the given operation
    pub fn key_service(operation: &'static str, message: impl Into<String>) -> Self {
        Self::KeyService {
            operation,
            message: message.into(),
        }
    }

    /// Check if this error came from the key service (including timeouts)
    pub fn is_key_service(&self) -> bool {
        matches!(
            self,
            Self::KeyService { .. } | Self::KeyServiceTimeout { .. }
        )
    }

    /// Check if this is an integrity failure
    pub fn is_authentication(&self) -> bool {
        matches!(self, Self::Authentication)
    }
}

// Implement From traits for common error types

impl From<std::io::Error> for VaultError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for VaultError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<serde_yaml::Error> for VaultError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Yaml(err.to_string())
    }
}

/// Result type alias for kms-vault operations
pub type VaultResult<T> = Result<T, VaultError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = VaultError::Config("test error".into());
        assert_eq!(err.to_string(), "Configuration error: test error");
    }

    #[test]
    fn test_key_service_error() {
        let err = VaultError::key_service("GenerateDataKey", "AccessDeniedException");
        assert_eq!(
            err.to_string(),
            "Key service GenerateDataKey failed: AccessDeniedException"
        );
        assert!(err.is_key_service());
        assert!(!err.is_authentication());
    }

    #[test]
    fn test_timeout_is_key_service() {
        let err = VaultError::KeyServiceTimeout {
            operation: "Decrypt",
            timeout: Duration::from_secs(5),
        };
        assert!(err.is_key_service());
        assert_eq!(err.to_string(), "Key service Decrypt timed out after 5s");
    }

    #[test]
    fn test_length_errors() {
        let err = VaultError::NonceLength {
            expected: 12,
            actual: 8,
        };
        assert_eq!(
            err.to_string(),
            "Invalid nonce length: expected 12 bytes, got 8"
        );
    }

    #[test]
    fn test_authentication_message_is_opaque() {
        let err = VaultError::Authentication;
        assert!(err.is_authentication());
        assert_eq!(
            err.to_string(),
            "Authentication failed: ciphertext could not be verified"
        );
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let vault_err: VaultError = io_err.into();
        assert!(matches!(vault_err, VaultError::Io(_)));
    }
}
