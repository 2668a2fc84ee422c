use crate::backend::Envon;
use crate::shell::bootstrap::emit_bootstrap;
use crate::shell::profile::Shell;
use anyhow::{Context, Result};
use std::io::Write;
use tracing::debug;

pub fn bootstrap(shell: Shell, out: &mut impl Write) -> Result<()> {
    let script = emit_bootstrap(shell)?;
    writeln!(out, "{script}")?;
    Ok(())
}

pub fn install(envon: &Envon, shell: Shell, out: &mut impl Write) -> Result<()> {
    let report = envon
        .install(shell)
        .with_context(|| format!("Failed to install envon bootstrap for {shell}"))?;
    debug!(
        managed_written = report.managed_written,
        profile_updated = report.profile_updated,
        "Install finished"
    );
    writeln!(out, "{report}")?;
    Ok(())
}
