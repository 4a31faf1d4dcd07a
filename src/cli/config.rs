//! `config` command

use super::CliContext;
use crate::audit::AuditLogger;
use crate::error::VaultResult;

/// Number of audit entries shown by `config`
const RECENT_AUDIT_ENTRIES: usize = 5;

/// Print paths, effective settings and recent audit activity
pub fn handle_config_command(ctx: &CliContext) -> VaultResult<()> {
    let settings = &ctx.settings;

    println!("kms-vault Configuration");
    println!("=======================");
    println!("Base directory: {}", ctx.paths.base_dir().display());
    println!("Settings file:  {}", ctx.paths.settings_file().display());
    println!("Audit log:      {}", ctx.paths.audit_log().display());
    println!();
    println!("Settings:");
    println!("  Key service:      {}", ctx.key_service_kind());
    println!("  Timeout:          {}s", ctx.timeout().as_secs());
    println!(
        "  AWS region:       {}",
        settings.aws_region.as_deref().unwrap_or("(default chain)")
    );
    println!(
        "  AWS profile:      {}",
        settings.aws_profile.as_deref().unwrap_or("(default chain)")
    );
    println!("  Default format:   {}", settings.default_format);
    println!("  Audit enabled:    {}", settings.audit_enabled);
    println!(
        "  Local key params: {}",
        if settings.local.key_params.is_some() {
            "configured"
        } else {
            "not yet generated"
        }
    );

    if settings.audit_enabled {
        let recent = AuditLogger::new(ctx.paths.audit_log()).read_recent(RECENT_AUDIT_ENTRIES)?;
        if !recent.is_empty() {
            println!();
            println!("Recent activity:");
            for entry in recent {
                println!("  {}", entry.format_human_readable());
            }
        }
    }

    Ok(())
}
