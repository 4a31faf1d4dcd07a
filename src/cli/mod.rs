//! CLI command handlers
//!
//! Bridges clap argument parsing with the envelope service. Argument types
//! live here so the binary only wires them together.

pub mod config;
pub mod decrypt;
pub mod encrypt;
pub mod key_service;

pub use config::handle_config_command;
pub use decrypt::{handle_decrypt_command, DecryptArgs};
pub use encrypt::{handle_encrypt_command, EncryptArgs};

use std::time::Duration;

use tracing::warn;

use crate::audit::{AuditEntry, AuditLogger, Operation};
use crate::config::{KeyServiceKind, Settings, VaultPaths};
use crate::crypto::SecureString;
use crate::error::VaultResult;

/// Options accepted by every command
#[derive(Debug, Default)]
pub struct GlobalOptions {
    /// Force the local key service regardless of settings
    pub local: bool,
    pub passphrase: Option<SecureString>,
    /// Key service timeout override in seconds
    pub timeout_secs: Option<u64>,
}

/// State shared by command handlers
#[derive(Debug)]
pub struct CliContext {
    pub paths: VaultPaths,
    pub settings: Settings,
    pub options: GlobalOptions,
}

impl CliContext {
    pub fn new(paths: VaultPaths, settings: Settings, options: GlobalOptions) -> Self {
        Self {
            paths,
            settings,
            options,
        }
    }

    /// The key service selected by flags and settings
    pub fn key_service_kind(&self) -> KeyServiceKind {
        if self.options.local {
            KeyServiceKind::Local
        } else {
            self.settings.key_service
        }
    }

    pub fn timeout(&self) -> Duration {
        self.options
            .timeout_secs
            .map(Duration::from_secs)
            .unwrap_or_else(|| self.settings.timeout())
    }

    /// Append the outcome of a seal or unseal to the audit log
    ///
    /// A failed audit write is logged and does not change the outcome.
    pub(crate) fn audit<T>(
        &self,
        operation: Operation,
        master_key_identifier: &str,
        property_name: &str,
        result: &VaultResult<T>,
    ) {
        if !self.settings.audit_enabled {
            return;
        }

        let entry = match result {
            Ok(_) => AuditEntry::success(operation, master_key_identifier, property_name),
            Err(e) => AuditEntry::failure(operation, master_key_identifier, property_name, e),
        };

        let logger = AuditLogger::new(self.paths.audit_log());
        if let Err(e) = logger.log(&entry) {
            warn!(error = %e, "failed to write audit entry");
        }
    }
}
