//! Configuration module for kms-vault
//!
//! - XDG-compliant path resolution
//! - Settings persistence (key service choice, timeout, output format)

pub mod paths;
pub mod settings;

pub use paths::VaultPaths;
pub use settings::{KeyServiceKind, LocalKeySettings, Settings};
