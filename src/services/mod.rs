//! Service layer for kms-vault
//!
//! The service layer drives the key service and the cipher to produce and
//! consume encrypted records.

pub mod envelope;

pub use envelope::{EnvelopeService, DEFAULT_KEY_SERVICE_TIMEOUT};
