//! Directory holding the generated bootstrap files, one per shell family.

use crate::envs::HostEnv;
use crate::error::{EnvonError, Result};
use crate::shell::profile::Shell;
use crate::store::file_lock::FileLock;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

pub struct ManagedStore {
    path: PathBuf,
}

impl ManagedStore {
    /// `$XDG_CONFIG_HOME/envon` on POSIX, `%APPDATA%\envon` on Windows.
    pub fn new(host: &HostEnv) -> Result<Self> {
        Ok(ManagedStore {
            path: host.config_root()?.join("envon"),
        })
    }

    pub fn init(&self) -> io::Result<()> {
        fs_err::create_dir_all(&self.path)
    }

    /// The managed bootstrap file for `shell`'s family.
    pub fn file_for(&self, shell: Shell) -> Result<PathBuf> {
        shell
            .profile()
            .managed_file
            .map(|name| self.path.join(name))
            .ok_or_else(|| EnvonError::UnsupportedShell(shell.name().to_string()))
    }

    pub fn lock(&self) -> io::Result<FileLock> {
        FileLock::acquire(self.path.join(".lock"), "managed bootstrap store")
    }
}

/// Replaces `path` with `content` unless it already holds exactly that.
///
/// The new content goes to a temporary sibling that is renamed over `path`, so readers
/// see either the old file or the new one. Returns whether anything was written.
pub fn write_if_changed(path: &Path, content: &str) -> io::Result<bool> {
    if let Ok(current) = fs_err::read_to_string(path) {
        if current == content {
            return Ok(false);
        }
    }

    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    fs_err::create_dir_all(parent)?;

    let mut tmp = tempfile::NamedTempFile::new_in(parent)?;
    tmp.write_all(content.as_bytes())?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|err| err.error)?;
    Ok(true)
}
