//! User settings for kms-vault
//!
//! Selects the key service, its timeout, the default output format and the
//! local master key parameters.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::paths::VaultPaths;
use crate::crypto::KeyDerivationParams;
use crate::error::VaultError;
use crate::render::OutputFormat;
use crate::storage::write_atomic;

/// Which key service backs seal and unseal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum KeyServiceKind {
    /// AWS KMS through the default credential chain
    #[default]
    Aws,
    /// In-process master key derived from a passphrase
    Local,
}

impl std::fmt::Display for KeyServiceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeyServiceKind::Aws => write!(f, "aws"),
            KeyServiceKind::Local => write!(f, "local"),
        }
    }
}

/// Local key service settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LocalKeySettings {
    /// Key derivation parameters (salt, memory cost, etc.)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_params: Option<KeyDerivationParams>,
}

/// User settings for kms-vault
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    #[serde(default)]
    pub key_service: KeyServiceKind,

    /// Seconds allowed for each key service call
    #[serde(default = "default_timeout_secs")]
    pub key_service_timeout_secs: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aws_region: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aws_profile: Option<String>,

    /// Output format for `encrypt` when `--format` is not given
    #[serde(default)]
    pub default_format: OutputFormat,

    /// Whether seal and unseal outcomes are appended to the audit log
    #[serde(default = "default_audit_enabled")]
    pub audit_enabled: bool,

    #[serde(default)]
    pub local: LocalKeySettings,
}

fn default_schema_version() -> u32 {
    1
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_audit_enabled() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            key_service: KeyServiceKind::default(),
            key_service_timeout_secs: default_timeout_secs(),
            aws_region: None,
            aws_profile: None,
            default_format: OutputFormat::default(),
            audit_enabled: default_audit_enabled(),
            local: LocalKeySettings::default(),
        }
    }
}

impl Settings {
    /// Per-call key service timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.key_service_timeout_secs)
    }

    /// Check values serde cannot constrain
    pub fn validate(&self) -> Result<(), VaultError> {
        if self.key_service_timeout_secs == 0 {
            return Err(VaultError::Config(
                "key_service_timeout_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Load settings from disk, or default settings if the file doesn't exist
    pub fn load_or_create(paths: &VaultPaths) -> Result<Self, VaultError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path).map_err(|e| {
                VaultError::Io(format!("Failed to read settings file: {}", e))
            })?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                VaultError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            settings.validate()?;
            Ok(settings)
        } else {
            // Not persisted until the caller saves
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &VaultPaths) -> Result<(), VaultError> {
        self.validate()?;
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self).map_err(|e| {
            VaultError::Config(format!("Failed to serialize settings: {}", e))
        })?;

        write_atomic(&paths.settings_file(), contents.as_bytes())
    }
}
