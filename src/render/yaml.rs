//! YAML rendering

use std::fmt::Write;

use crate::error::{VaultError, VaultResult};
use crate::models::EncryptedRecord;

/// YAML with a header comment naming the secret
pub fn to_yaml(record: &EncryptedRecord) -> VaultResult<String> {
    let mut out = String::new();
    writeln!(out, "# kms-vault encrypted record: {}", record.property_name())
        .map_err(|e| VaultError::Render(e.to_string()))?;
    writeln!(
        out,
        "# Unseal with: kms-vault decrypt <this file>"
    )
    .map_err(|e| VaultError::Render(e.to_string()))?;

    let body = serde_yaml::to_string(record)
        .map_err(|e| VaultError::Render(format!("Failed to serialize record: {}", e)))?;
    out.push_str(&body);
    Ok(out)
}
