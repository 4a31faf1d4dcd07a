//! Key service selection for CLI commands

use std::sync::Arc;

use tracing::{debug, info};

use super::CliContext;
use crate::config::KeyServiceKind;
use crate::crypto::{KeyDerivationParams, SecureString};
use crate::error::{VaultError, VaultResult};
use crate::kms::LocalKeyService;
use crate::services::EnvelopeService;

/// Minimum length accepted for a newly chosen passphrase
const MIN_PASSPHRASE_LEN: usize = 8;

/// Build an envelope service for the given master key
pub async fn build_envelope_service(
    ctx: &mut CliContext,
    master_key_identifier: &str,
) -> VaultResult<EnvelopeService> {
    let service = match ctx.key_service_kind() {
        KeyServiceKind::Local => local_service(ctx, master_key_identifier)?,
        KeyServiceKind::Aws => aws_service(ctx).await?,
    };

    Ok(service.with_timeout(ctx.timeout()))
}

fn local_service(
    ctx: &mut CliContext,
    master_key_identifier: &str,
) -> VaultResult<EnvelopeService> {
    let (params, first_use) = match &ctx.settings.local.key_params {
        Some(params) => (params.clone(), false),
        None => (KeyDerivationParams::new()?, true),
    };

    let passphrase = match ctx.options.passphrase.take() {
        Some(passphrase) => passphrase,
        None if first_use => prompt_new_passphrase()?,
        None => prompt_passphrase("Master key passphrase: ")?,
    };

    debug!(master_key = master_key_identifier, "deriving local master key");
    let kms = LocalKeyService::from_passphrase(master_key_identifier, &passphrase, &params)?;
    ctx.options.passphrase = Some(passphrase);

    if first_use {
        ctx.settings.local.key_params = Some(params);
        ctx.settings.save(&ctx.paths)?;
        info!(
            path = %ctx.paths.settings_file().display(),
            "saved new local key parameters"
        );
    }

    Ok(EnvelopeService::new(Arc::new(kms)))
}

#[cfg(feature = "aws")]
async fn aws_service(ctx: &CliContext) -> VaultResult<EnvelopeService> {
    use crate::kms::AwsKeyService;

    let region = ctx.settings.aws_region.clone();
    let profile = ctx.settings.aws_profile.clone();

    // The self-check goes through a second, independently configured client
    let generator = AwsKeyService::from_env(region.clone(), profile.clone()).await;
    let verifier = AwsKeyService::from_env(region, profile).await;

    Ok(EnvelopeService::new(Arc::new(generator)).with_verifier(Arc::new(verifier)))
}

#[cfg(not(feature = "aws"))]
async fn aws_service(_ctx: &CliContext) -> VaultResult<EnvelopeService> {
    Err(VaultError::Config(
        "kms-vault was built without AWS support; use --local".to_string(),
    ))
}

fn prompt_new_passphrase() -> VaultResult<SecureString> {
    loop {
        let first = prompt_passphrase("New master key passphrase: ")?;

        if first.len() < MIN_PASSPHRASE_LEN {
            eprintln!(
                "Passphrase must be at least {} characters. Please try again.",
                MIN_PASSPHRASE_LEN
            );
            continue;
        }

        let second = prompt_passphrase("Confirm passphrase: ")?;
        if first.as_str() != second.as_str() {
            eprintln!("Passphrases do not match. Please try again.");
            continue;
        }

        return Ok(first);
    }
}

fn prompt_passphrase(prompt: &str) -> VaultResult<SecureString> {
    rpassword::prompt_password(prompt)
        .map(SecureString::from)
        .map_err(|e| VaultError::Config(format!("Failed to read passphrase: {}", e)))
}
