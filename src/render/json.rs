//! JSON rendering

use crate::error::{VaultError, VaultResult};
use crate::models::EncryptedRecord;

/// Pretty JSON with a trailing newline
pub fn to_json(record: &EncryptedRecord) -> VaultResult<String> {
    let mut json = serde_json::to_string_pretty(record)
        .map_err(|e| VaultError::Render(format!("Failed to serialize record: {}", e)))?;
    json.push('\n');
    Ok(json)
}
