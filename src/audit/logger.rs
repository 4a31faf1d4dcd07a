//! Append-only JSONL audit log

use std::collections::VecDeque;
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use crate::error::{VaultError, VaultResult};

use super::entry::AuditEntry;

/// Writes audit entries to a line-delimited JSON file
///
/// Each line is one complete [`AuditEntry`]. Lines are appended and flushed
/// one at a time, so a crash loses at most the entry being written.
#[derive(Debug, Clone)]
pub struct AuditLogger {
    log_path: PathBuf,
}

impl AuditLogger {
    pub fn new(log_path: PathBuf) -> Self {
        Self { log_path }
    }

    /// Append an entry to the log
    pub fn log(&self, entry: &AuditEntry) -> VaultResult<()> {
        let mut line = serde_json::to_string(entry)
            .map_err(|e| VaultError::Json(format!("Failed to serialize audit entry: {}", e)))?;
        line.push('\n');

        if let Some(parent) = self.log_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|e| VaultError::Io(format!("Failed to create audit log directory: {}", e)))?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .map_err(|e| VaultError::Io(format!("Failed to open audit log: {}", e)))?;

        file.write_all(line.as_bytes())
            .and_then(|_| file.flush())
            .map_err(|e| VaultError::Io(format!("Failed to write audit entry: {}", e)))
    }

    /// Read every entry, oldest first
    pub fn read_all(&self) -> VaultResult<Vec<AuditEntry>> {
        let mut entries = Vec::new();
        self.for_each_entry(|entry| entries.push(entry))?;
        Ok(entries)
    }

    /// Read the most recent `count` entries, oldest first
    pub fn read_recent(&self, count: usize) -> VaultResult<Vec<AuditEntry>> {
        let mut window = VecDeque::with_capacity(count);
        self.for_each_entry(|entry| {
            if count == 0 {
                return;
            }
            if window.len() == count {
                window.pop_front();
            }
            window.push_back(entry);
        })?;
        Ok(window.into())
    }

    pub fn path(&self) -> &Path {
        &self.log_path
    }

    fn for_each_entry(&self, mut f: impl FnMut(AuditEntry)) -> VaultResult<()> {
        if !self.log_path.exists() {
            return Ok(());
        }

        let file = File::open(&self.log_path)
            .map_err(|e| VaultError::Io(format!("Failed to open audit log: {}", e)))?;

        for (index, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|e| {
                VaultError::Io(format!("Failed to read audit log line {}: {}", index + 1, e))
            })?;
            if line.trim().is_empty() {
                continue;
            }

            let entry = serde_json::from_str(&line).map_err(|e| {
                VaultError::Json(format!(
                    "Failed to parse audit entry at line {}: {}",
                    index + 1,
                    e
                ))
            })?;
            f(entry);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::entry::{Operation, Outcome};
    use tempfile::TempDir;

    fn create_test_logger() -> (AuditLogger, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let logger = AuditLogger::new(temp_dir.path().join("audit.log"));
        (logger, temp_dir)
    }

    #[test]
    fn test_log_and_read() {
        let (logger, _temp) = create_test_logger();

        logger
            .log(&AuditEntry::success(Operation::Seal, "alias/app", "dbPassword"))
            .unwrap();
        logger
            .log(&AuditEntry::failure(
                Operation::Unseal,
                "alias/app",
                "dbPassword",
                &VaultError::Authentication,
            ))
            .unwrap();

        let entries = logger.read_all().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].operation, Operation::Seal);
        assert_eq!(entries[0].outcome, Outcome::Success);
        assert_eq!(entries[1].operation, Operation::Unseal);
        assert_eq!(entries[1].outcome, Outcome::Failure);
    }

    #[test]
    fn test_read_recent() {
        let (logger, _temp) = create_test_logger();

        for i in 0..10 {
            logger
                .log(&AuditEntry::success(Operation::Seal, "k", format!("p{}", i)))
                .unwrap();
        }

        let recent = logger.read_recent(3).unwrap();
        let names: Vec<_> = recent.iter().map(|e| e.property_name.as_str()).collect();
        assert_eq!(names, ["p7", "p8", "p9"]);

        assert!(logger.read_recent(0).unwrap().is_empty());
        assert_eq!(logger.read_recent(50).unwrap().len(), 10);
    }

    #[test]
    fn test_empty_log() {
        let (logger, _temp) = create_test_logger();
        assert!(logger.read_all().unwrap().is_empty());
    }

    #[test]
    fn test_creates_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let logger = AuditLogger::new(temp_dir.path().join("nested").join("audit.log"));

        logger
            .log(&AuditEntry::success(Operation::Seal, "k", "p"))
            .unwrap();
        assert!(logger.path().exists());
    }

    #[test]
    fn test_corrupt_line_reports_position() {
        let (logger, _temp) = create_test_logger();
        logger
            .log(&AuditEntry::success(Operation::Seal, "k", "p"))
            .unwrap();
        fs::write(
            logger.path(),
            format!("{}\nnot json\n", fs::read_to_string(logger.path()).unwrap().trim()),
        )
        .unwrap();

        let err = logger.read_all().unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }
}
