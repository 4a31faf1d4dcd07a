//! Data models for kms-vault
//!
//! The encrypted record is the only entity the tool persists or emits.

pub mod record;

pub use record::{
    is_valid_property_name, validate_identity, EncryptedRecord, StaticRecord,
};
