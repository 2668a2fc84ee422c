use crate::envs::HostEnv;
use crate::error::{EnvonError, Result};
use crate::shell::bootstrap::emit_bootstrap;
use crate::shell::profile::Shell;
use crate::store::managed_store::{ManagedStore, write_if_changed};
use std::fmt;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const MARK_START: &str = "# >>> envon bootstrap >>>";
pub const MARK_END: &str = "# <<< envon bootstrap <<<";

/// Content of the managed bootstrap file: a version tag, then the wrapper.
pub fn managed_content(shell: Shell) -> Result<String> {
    let body = emit_bootstrap(shell)?;
    Ok(format!(
        "# envon managed bootstrap - version: {}\n{body}",
        env!("CARGO_PKG_VERSION")
    ))
}

#[derive(Debug)]
pub struct InstallReport {
    pub managed: PathBuf,
    pub profile: PathBuf,
    pub managed_written: bool,
    pub profile_updated: bool,
}

impl fmt::Display for InstallReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "envon bootstrap installed:")?;
        writeln!(f, "- managed: {}", self.managed.display())?;
        writeln!(f, "- rc: {}", self.profile.display())?;
        write!(
            f,
            "Restart your shell or run: source {}",
            self.profile.display()
        )
    }
}

/// Writes the managed bootstrap for `shell` and makes its profile source it.
///
/// Safe to repeat: the managed file is only rewritten when its content changes and
/// the profile block is appended at most once.
pub fn install_bootstrap(shell: Shell, host: &HostEnv) -> Result<InstallReport> {
    let content = managed_content(shell)?;
    let store = ManagedStore::new(host)?;
    let managed = store.file_for(shell)?;
    let profile = shell.profile_path(host)?;

    store.init()?;
    let _lock = store.lock()?;

    let managed_written = write_if_changed(&managed, &content)?;
    if managed_written {
        info!("Wrote managed bootstrap to {}", managed.display());
    }
    let profile_updated = ensure_profile_sources(&profile, &managed, shell)?;

    Ok(InstallReport {
        managed,
        profile,
        managed_written,
        profile_updated,
    })
}

fn profile_block(shell: Shell, managed: &Path) -> Result<String> {
    let guard = shell
        .profile()
        .guard_snippet(managed)
        .ok_or_else(|| EnvonError::UnsupportedShell(shell.name().to_string()))?;
    Ok(format!("\n{MARK_START}\n{guard}\n{MARK_END}\n"))
}

/// Appends the marker block sourcing `managed` to `profile`, unless one is there.
///
/// Returns whether the profile was modified.
pub fn ensure_profile_sources(profile: &Path, managed: &Path, shell: Shell) -> Result<bool> {
    let existing = match fs_err::read_to_string(profile) {
        Ok(content) => content,
        Err(err) if err.kind() == io::ErrorKind::NotFound => String::new(),
        Err(err) => return Err(err.into()),
    };

    if existing.contains(MARK_START) && existing.contains(MARK_END) {
        debug!("{} already sources the envon bootstrap", profile.display());
        return Ok(false);
    }

    let block = profile_block(shell, managed)?;
    if let Some(parent) = profile.parent() {
        fs_err::create_dir_all(parent)?;
    }
    let mut file = fs_err::OpenOptions::new()
        .create(true)
        .append(true)
        .open(profile)?;
    file.write_all(block.as_bytes())?;

    info!("Added envon bootstrap block to {}", profile.display());
    Ok(true)
}

/// Brings an existing managed bootstrap for `shell` up to date.
///
/// Does nothing when envon was never installed for that shell. Returns whether the
/// file was rewritten.
pub fn refresh_managed(shell: Shell, host: &HostEnv) -> Result<bool> {
    let managed = ManagedStore::new(host)?.file_for(shell)?;
    if !managed.is_file() {
        return Ok(false);
    }
    let content = managed_content(shell)?;
    Ok(write_if_changed(&managed, &content)?)
}

/// Runs [`refresh_managed`] and discards any failure.
pub fn self_heal(shell: Shell, host: &HostEnv) {
    match refresh_managed(shell, host) {
        Ok(true) => debug!("Refreshed managed bootstrap for {shell}"),
        Ok(false) => {}
        Err(err) => debug!("Skipping managed bootstrap refresh for {shell}: {err}"),
    }
}
