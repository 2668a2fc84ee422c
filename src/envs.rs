use crate::error::{EnvonError, Result};
use etcetera::BaseStrategy;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// Names of the environment variables envon reads.
pub struct EnvVars;

impl EnvVars {
    /// Login shell of the current user, used for shell auto-detection on POSIX.
    pub const SHELL: &'static str = "SHELL";

    /// Set by PowerShell for its child processes; selects PowerShell over `cmd` on Windows.
    pub const PS_MODULE_PATH: &'static str = "PSModulePath";

    /// virtualenvwrapper's environments home, searched for named environments.
    pub const WORKON_HOME: &'static str = "WORKON_HOME";

    /// Roaming configuration root on Windows.
    pub const APPDATA: &'static str = "APPDATA";

    /// Directory holding zsh's startup files.
    pub const ZDOTDIR: &'static str = "ZDOTDIR";

    /// Tracing filter directive, e.g. `ENVON_LOG=debug`.
    pub const ENVON_LOG: &'static str = "ENVON_LOG";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Posix,
    Windows,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(windows) {
            Platform::Windows
        } else {
            Platform::Posix
        }
    }
}

/// Read-only snapshot of everything envon takes from the process environment.
///
/// Components receive this instead of reading variables themselves, so tests can
/// describe a host without touching global state.
#[derive(Debug, Clone)]
pub struct HostEnv {
    pub platform: Platform,
    pub home: Option<PathBuf>,
    /// `$XDG_CONFIG_HOME` (or `~/.config`) on POSIX, `%APPDATA%` on Windows.
    pub config_root: Option<PathBuf>,
    pub workon_home: Option<PathBuf>,
    pub shell: Option<String>,
    pub powershell: bool,
    pub zdotdir: Option<PathBuf>,
}

fn var_path(name: &str) -> Option<PathBuf> {
    std::env::var_os(name)
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
}

impl HostEnv {
    pub fn from_process() -> Self {
        let platform = Platform::current();
        let strategy_config = etcetera::base_strategy::choose_base_strategy()
            .ok()
            .map(|dirs| dirs.config_dir());
        let config_root = match platform {
            Platform::Windows => var_path(EnvVars::APPDATA).or(strategy_config),
            Platform::Posix => strategy_config,
        };

        HostEnv {
            platform,
            home: etcetera::home_dir().ok(),
            config_root,
            workon_home: var_path(EnvVars::WORKON_HOME),
            shell: std::env::var(EnvVars::SHELL).ok().filter(|s| !s.is_empty()),
            powershell: std::env::var_os(EnvVars::PS_MODULE_PATH).is_some(),
            zdotdir: var_path(EnvVars::ZDOTDIR),
        }
    }

    pub fn home(&self) -> Result<&Path> {
        self.home
            .as_deref()
            .ok_or_else(|| EnvonError::ConfigPathUnknown("home directory".to_string()))
    }

    pub fn config_root(&self) -> Result<&Path> {
        self.config_root
            .as_deref()
            .ok_or_else(|| EnvonError::ConfigPathUnknown("configuration directory".to_string()))
    }

    /// Basename of `$SHELL`, e.g. `zsh` for `/usr/bin/zsh`.
    pub fn shell_name(&self) -> Option<&str> {
        self.shell
            .as_deref()
            .and_then(|s| Path::new(s).file_name())
            .and_then(OsStr::to_str)
    }
}
