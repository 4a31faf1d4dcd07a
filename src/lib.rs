//! kms-vault - envelope encryption of small secrets with a key management service
//!
//! A secret is sealed with a one-time AES-256-GCM data key. The data key is
//! generated and wrapped by a key management service (AWS KMS, or a local
//! passphrase-derived master key), and only the wrapped form is kept. The
//! resulting [`EncryptedRecord`] is safe to commit to source code or config.
//!
//! # Architecture
//!
//! - `crypto`: AES-256-GCM seal/open, zeroizing key containers, Argon2id
//! - `kms`: the [`KeyService`] trait and its AWS and local implementations
//! - `models`: the encrypted record and its compiled-in [`StaticRecord`] form
//! - `services`: [`EnvelopeService`], which seals, self-checks and unseals
//! - `render`: Rust snippet, JSON and YAML output
//! - `storage`: atomic record file I/O
//! - `audit`: append-only log of seal and unseal outcomes
//! - `config`: path resolution and persisted settings
//! - `cli`: command handlers for the `kms-vault` binary
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use kms_vault::{EnvelopeService, LocalKeyService};
//!
//! let kms = LocalKeyService::generate("alias/app")?;
//! let service = EnvelopeService::new(Arc::new(kms));
//!
//! let record = service.seal_secret("alias/app", "dbPassword", b"s3cr3t").await?;
//! let plaintext = service.unseal_secret(&record).await?;
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod crypto;
pub mod error;
pub mod kms;
pub mod models;
pub mod render;
pub mod services;
pub mod storage;

pub use error::{VaultError, VaultResult};
#[cfg(feature = "aws")]
pub use kms::AwsKeyService;
pub use kms::{DataKey, KeyService, LocalKeyService};
pub use models::{EncryptedRecord, StaticRecord};
pub use render::OutputFormat;
pub use services::EnvelopeService;
