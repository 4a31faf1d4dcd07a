//! `encrypt` command

use std::path::PathBuf;

use clap::{ArgGroup, Args};
use tracing::info;

use super::key_service::build_envelope_service;
use super::CliContext;
use crate::audit::Operation;
use crate::crypto::SecureBytes;
use crate::error::{VaultError, VaultResult};
use crate::models::validate_identity;
use crate::render::{render, OutputFormat};
use crate::storage::save_record;

/// Arguments for sealing a secret
#[derive(Debug, Args)]
#[command(group(
    ArgGroup::new("plaintext")
        .required(true)
        .args(["value", "file"])
))]
pub struct EncryptArgs {
    /// Master key identifier (KMS key ID, ARN or alias)
    #[arg(short = 'k', long = "key", value_name = "ID")]
    pub key: String,

    /// Property name for the secret (letters, digits and underscores)
    #[arg(short, long)]
    pub name: String,

    /// Secret value
    #[arg(short, long)]
    pub value: Option<String>,

    /// Read the secret from a file
    #[arg(short, long, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Output format (defaults to the configured format)
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Also write the record to this file (YAML for .yaml/.yml, otherwise JSON)
    #[arg(short, long, value_name = "PATH")]
    pub out: Option<PathBuf>,
}

/// Seal a secret and print the rendered record
pub async fn handle_encrypt_command(
    ctx: &mut CliContext,
    mut args: EncryptArgs,
) -> VaultResult<()> {
    validate_identity(&args.key, &args.name)?;
    let plaintext = read_plaintext(&mut args)?;

    let service = build_envelope_service(ctx, &args.key).await?;
    let result = service
        .seal_secret(&args.key, &args.name, plaintext.as_bytes())
        .await;
    drop(plaintext);
    ctx.audit(Operation::Seal, &args.key, &args.name, &result);
    let record = result?;

    if let Some(out) = &args.out {
        save_record(out, &record)?;
        info!(path = %out.display(), "wrote record");
        eprintln!("Record written to {}", out.display());
    }

    let format = args.format.unwrap_or(ctx.settings.default_format);
    print!("{}", render(&record, format)?);
    Ok(())
}

/// Move the secret out of the arguments into zeroizing storage
fn read_plaintext(args: &mut EncryptArgs) -> VaultResult<SecureBytes> {
    match (args.value.take(), &args.file) {
        (Some(value), None) => Ok(SecureBytes::new(value.into_bytes())),
        (None, Some(path)) => std::fs::read(path)
            .map(SecureBytes::new)
            .map_err(|e| VaultError::Io(format!("Failed to read {}: {}", path.display(), e))),
        _ => Err(VaultError::Validation(
            "Exactly one of --value or --file is required".to_string(),
        )),
    }
}
