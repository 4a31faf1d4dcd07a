//! File I/O utilities with atomic writes
//!
//! Provides safe file operations that won't corrupt data on failure.

use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::VaultError;

/// Write bytes to a file atomically (write to temp, then rename)
///
/// The file is either completely written or not modified at all. Missing
/// parent directories are created. The temp file has a random name and is
/// created owner-only (0600 on unix), and the target keeps that mode.
pub fn write_atomic<P: AsRef<Path>>(path: P, bytes: &[u8]) -> Result<(), VaultError> {
    let path = path.as_ref();

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).map_err(|e| {
        VaultError::Storage(format!(
            "Failed to create directory {}: {}",
            parent.display(),
            e
        ))
    })?;

    // Same directory as the target so the rename stays on one filesystem
    let mut temp = NamedTempFile::new_in(parent)
        .map_err(|e| VaultError::Storage(format!("Failed to create temp file: {}", e)))?;

    temp.write_all(bytes)
        .and_then(|_| temp.flush())
        .and_then(|_| temp.as_file().sync_all())
        .map_err(|e| {
            VaultError::Storage(format!("Failed to write {}: {}", path.display(), e))
        })?;

    // A failed persist drops the temp file, which removes it
    temp.persist(path)
        .map_err(|e| VaultError::Storage(format!("Failed to rename temp file: {}", e.error)))?;

    Ok(())
}

/// Read a file to a string, failing if it doesn't exist
pub fn read_to_string_required<P: AsRef<Path>>(path: P) -> Result<String, VaultError> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(VaultError::Storage(format!(
            "File not found: {}",
            path.display()
        )));
    }

    fs::read_to_string(path)
        .map_err(|e| VaultError::Storage(format!("Failed to read {}: {}", path.display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_and_read() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("secret.json");

        write_atomic(&path, b"{\"a\": 1}").unwrap();
        assert_eq!(read_to_string_required(&path).unwrap(), "{\"a\": 1}");
    }

    #[test]
    fn test_atomic_write_no_temp_file_left() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("secret.yaml");

        write_atomic(&path, b"x: 1").unwrap();

        let names: Vec<_> = fs::read_dir(temp_dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(names, ["secret.yaml"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_written_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("plain.txt");

        write_atomic(&path, b"s3cr3t").unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o077, 0, "mode {:o} readable by group or other", mode);
    }

    #[cfg(unix)]
    #[test]
    fn test_planted_symlink_is_not_followed() {
        let temp_dir = TempDir::new().unwrap();
        let victim = temp_dir.path().join("victim");
        fs::write(&victim, b"untouched").unwrap();

        let path = temp_dir.path().join("plain.txt");
        std::os::unix::fs::symlink(&victim, temp_dir.path().join("plain.txt.tmp")).unwrap();

        write_atomic(&path, b"s3cr3t").unwrap();

        assert_eq!(fs::read(&victim).unwrap(), b"untouched");
        assert_eq!(fs::read(&path).unwrap(), b"s3cr3t");
    }

    #[test]
    fn test_overwrite_replaces_contents() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("out.bin");

        write_atomic(&path, b"first version").unwrap();
        write_atomic(&path, b"second").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"second");
    }

    #[test]
    fn test_write_creates_parent_directories() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("dir").join("r.json");

        write_atomic(&path, b"{}").unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_read_required_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let err = read_to_string_required(temp_dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, VaultError::Storage(_)));
    }
}
