//! Audit entry data structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::VaultError;

/// Types of operations that can be audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Seal,
    Unseal,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Seal => write!(f, "SEAL"),
            Operation::Unseal => write!(f, "UNSEAL"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Success,
    Failure,
}

/// A single audit log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// When the operation finished (UTC)
    pub timestamp: DateTime<Utc>,

    pub operation: Operation,

    pub master_key_identifier: String,

    pub property_name: String,

    pub outcome: Outcome,

    /// Error text for failed operations
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AuditEntry {
    /// Entry for an operation that succeeded
    pub fn success(
        operation: Operation,
        master_key_identifier: impl Into<String>,
        property_name: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            operation,
            master_key_identifier: master_key_identifier.into(),
            property_name: property_name.into(),
            outcome: Outcome::Success,
            error: None,
        }
    }

    /// Entry for an operation that failed with `error`
    pub fn failure(
        operation: Operation,
        master_key_identifier: impl Into<String>,
        property_name: impl Into<String>,
        error: &VaultError,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            operation,
            master_key_identifier: master_key_identifier.into(),
            property_name: property_name.into(),
            outcome: Outcome::Failure,
            error: Some(error.to_string()),
        }
    }

    /// Format the entry for human-readable output
    pub fn format_human_readable(&self) -> String {
        let mut output = format!(
            "[{}] {} {} ({})",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            self.operation,
            self.property_name,
            self.master_key_identifier
        );

        if let Some(error) = &self.error {
            output.push_str(&format!(" FAILED: {}", error));
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_display() {
        assert_eq!(Operation::Seal.to_string(), "SEAL");
        assert_eq!(Operation::Unseal.to_string(), "UNSEAL");
    }

    #[test]
    fn test_success_entry() {
        let entry = AuditEntry::success(Operation::Seal, "alias/app", "dbPassword");
        assert_eq!(entry.outcome, Outcome::Success);
        assert!(entry.error.is_none());

        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["operation"], "seal");
        assert_eq!(json["outcome"], "success");
        assert!(json.get("error").is_none());
    }

    #[test]
    fn test_failure_entry() {
        let entry = AuditEntry::failure(
            Operation::Unseal,
            "alias/app",
            "dbPassword",
            &VaultError::Authentication,
        );
        assert_eq!(entry.outcome, Outcome::Failure);
        assert!(entry.error.as_deref().unwrap().contains("Authentication"));
    }

    #[test]
    fn test_human_readable_format() {
        let entry = AuditEntry::failure(
            Operation::Seal,
            "alias/app",
            "apiKey",
            &VaultError::key_service("GenerateDataKey", "AccessDenied"),
        );

        let formatted = entry.format_human_readable();
        assert!(formatted.contains("SEAL apiKey (alias/app)"));
        assert!(formatted.contains("FAILED"));
        assert!(formatted.contains("AccessDenied"));
    }
}
