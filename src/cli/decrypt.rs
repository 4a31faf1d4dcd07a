//! `decrypt` command

use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use tracing::info;

use super::key_service::build_envelope_service;
use super::CliContext;
use crate::audit::Operation;
use crate::error::{VaultError, VaultResult};
use crate::storage::{load_record, write_atomic};

/// Arguments for unsealing a record file
#[derive(Debug, Args)]
pub struct DecryptArgs {
    /// Record file written by `encrypt --out` (JSON or YAML)
    #[arg(value_name = "RECORD_FILE")]
    pub record: PathBuf,

    /// Write the plaintext to this file instead of stdout
    #[arg(short, long, value_name = "PATH")]
    pub out: Option<PathBuf>,
}

/// Unseal a record file and emit the plaintext bytes
pub async fn handle_decrypt_command(ctx: &mut CliContext, args: DecryptArgs) -> VaultResult<()> {
    let record = load_record(&args.record)?;
    let master_key = record.master_key_identifier().to_string();

    let service = build_envelope_service(ctx, &master_key).await?;
    let result = service.unseal_secret(&record).await;
    ctx.audit(Operation::Unseal, &master_key, record.property_name(), &result);
    let plaintext = result?;

    match &args.out {
        Some(out) => {
            write_atomic(out, plaintext.as_bytes())?;
            info!(path = %out.display(), "wrote plaintext");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(plaintext.as_bytes())
                .and_then(|_| stdout.flush())
                .map_err(|e| VaultError::Io(format!("Failed to write plaintext: {}", e)))?;
        }
    }

    Ok(())
}
