//! Audit logging for seal and unseal
//!
//! Every CLI seal or unseal appends one line-delimited JSON entry to the audit
//! log, whether it succeeded or not. Entries carry identities only, never key
//! material or plaintext.
//!
//! # Example
//!
//! ```rust,ignore
//! use kms_vault::audit::{AuditEntry, AuditLogger, Operation};
//!
//! let logger = AuditLogger::new(paths.audit_log());
//! logger.log(&AuditEntry::success(Operation::Seal, "alias/app", "dbPassword"))?;
//! ```

mod entry;
mod logger;

pub use entry::{AuditEntry, Operation, Outcome};
pub use logger::AuditLogger;
