use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use kms_vault::cli::{
    handle_config_command, handle_decrypt_command, handle_encrypt_command, CliContext,
    DecryptArgs, EncryptArgs, GlobalOptions,
};
use kms_vault::config::{Settings, VaultPaths};
use kms_vault::crypto::SecureString;

#[derive(Parser)]
#[command(
    name = "kms-vault",
    version,
    about = "Envelope-encrypt small secrets with a key management service",
    long_about = "kms-vault seals secrets such as passwords and API keys with a one-time \
                  AES-256-GCM data key wrapped by AWS KMS (or a local passphrase-derived \
                  master key). The sealed record can be pasted into source code as a Rust \
                  snippet or stored as JSON or YAML."
)]
struct Cli {
    /// Use the local passphrase-derived key service instead of AWS KMS
    #[arg(long, global = true)]
    local: bool,

    /// Passphrase for the local master key
    #[arg(long, global = true, env = "KMS_VAULT_PASSPHRASE", hide_env_values = true)]
    passphrase: Option<String>,

    /// Seconds allowed for each key service call
    #[arg(
        long,
        global = true,
        value_name = "SECS",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Seal a secret into an encrypted record
    Encrypt(EncryptArgs),

    /// Unseal a record file and print the secret
    Decrypt(DecryptArgs),

    /// Show current configuration and paths
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    // stdout carries snippets and plaintext, so logs go to stderr
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let paths = VaultPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;
    let options = GlobalOptions {
        local: cli.local,
        passphrase: cli.passphrase.map(SecureString::from),
        timeout_secs: cli.timeout,
    };
    let mut ctx = CliContext::new(paths, settings, options);

    match cli.command {
        Commands::Encrypt(args) => handle_encrypt_command(&mut ctx, args).await?,
        Commands::Decrypt(args) => handle_decrypt_command(&mut ctx, args).await?,
        Commands::Config => handle_config_command(&ctx)?,
    }

    Ok(())
}
