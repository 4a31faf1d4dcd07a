//! Output rendering for encrypted records
//!
//! A record can be emitted as a Rust source snippet to paste into a program,
//! as pretty JSON, or as YAML.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::VaultResult;
use crate::models::EncryptedRecord;

pub mod json;
pub mod snippet;
pub mod yaml;

pub use snippet::{render_snippet, static_name};

/// Output format for a rendered record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// A `StaticRecord` declaration framed for copy and paste
    #[default]
    Rust,
    Json,
    Yaml,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Rust => write!(f, "rust"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Yaml => write!(f, "yaml"),
        }
    }
}

/// Render a record in the given format
pub fn render(record: &EncryptedRecord, format: OutputFormat) -> VaultResult<String> {
    match format {
        OutputFormat::Rust => Ok(render_snippet(record)),
        OutputFormat::Json => json::to_json(record),
        OutputFormat::Yaml => yaml::to_yaml(record),
    }
}
