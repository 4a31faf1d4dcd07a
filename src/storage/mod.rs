//! Storage layer for kms-vault
//!
//! Record files are JSON unless the extension is `.yaml` or `.yml`.

pub mod file_io;

pub use file_io::{read_to_string_required, write_atomic};

use std::path::Path;

use tracing::debug;

use crate::error::{VaultError, VaultResult};
use crate::models::EncryptedRecord;
use crate::render::{json, yaml};

/// Whether a path should be read and written as YAML
pub fn is_yaml_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"))
        .unwrap_or(false)
}

/// Write a record atomically, choosing the format from the extension
pub fn save_record<P: AsRef<Path>>(path: P, record: &EncryptedRecord) -> VaultResult<()> {
    let path = path.as_ref();
    let contents = if is_yaml_path(path) {
        yaml::to_yaml(record)?
    } else {
        json::to_json(record)?
    };

    write_atomic(path, contents.as_bytes())?;
    debug!(path = %path.display(), property = record.property_name(), "saved record");
    Ok(())
}

/// Load and validate a record, choosing the format from the extension
pub fn load_record<P: AsRef<Path>>(path: P) -> VaultResult<EncryptedRecord> {
    let path = path.as_ref();
    let contents = read_to_string_required(path)?;

    let record = if is_yaml_path(path) {
        serde_yaml::from_str(&contents)
            .map_err(|e| VaultError::Yaml(format!("Failed to parse {}: {}", path.display(), e)))?
    } else {
        serde_json::from_str(&contents)
            .map_err(|e| VaultError::Json(format!("Failed to parse {}: {}", path.display(), e)))?
    };

    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::SealedPayload;
    use chrono::Utc;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn sample_record() -> EncryptedRecord {
        EncryptedRecord::new(
            "alias/test-key",
            "dbPassword",
            vec![9, 9, 9],
            SealedPayload {
                nonce: [7u8; 12],
                ciphertext: vec![1, 2, 3, 4],
            },
            Utc::now(),
        )
        .unwrap()
    }

    #[test]
    fn test_is_yaml_path() {
        assert!(is_yaml_path(&PathBuf::from("a.yaml")));
        assert!(is_yaml_path(&PathBuf::from("dir/a.YML")));
        assert!(!is_yaml_path(&PathBuf::from("a.json")));
        assert!(!is_yaml_path(&PathBuf::from("record")));
    }

    #[test]
    fn test_save_and_load_json() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("db.json");
        let record = sample_record();

        save_record(&path, &record).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.trim_start().starts_with('{'));
        assert_eq!(load_record(&path).unwrap(), record);
    }

    #[test]
    fn test_save_and_load_yaml() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("db.yml");
        let record = sample_record();

        save_record(&path, &record).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with('#'));
        assert_eq!(load_record(&path).unwrap(), record);
    }

    #[test]
    fn test_load_rejects_invalid_record() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bad.json");
        std::fs::write(&path, r#"{"masterKeyIdentifier": "k"}"#).unwrap();

        assert!(matches!(load_record(&path), Err(VaultError::Json(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let err = load_record(temp_dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, VaultError::Storage(_)));
    }
}
