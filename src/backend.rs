use crate::envs::HostEnv;
use crate::error::Result;
use crate::shell::activation::emit_activation;
use crate::shell::install::{InstallReport, install_bootstrap, self_heal};
use crate::shell::profile::Shell;
use crate::venv::locator;
use crate::venv::selector::Selector;
use anyhow::Context;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use tracing::debug;

/// Everything envon does, bound to one host environment and working directory.
pub struct Envon {
    host: HostEnv,
    cwd: PathBuf,
}

impl Envon {
    pub fn new() -> anyhow::Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;
        Ok(Self::with_host(HostEnv::from_process(), cwd))
    }

    pub fn with_host(host: HostEnv, cwd: PathBuf) -> Self {
        Envon { host, cwd }
    }

    /// The explicitly requested shell, or the one detected from the host.
    pub fn shell(&self, explicit: Option<Shell>) -> Shell {
        explicit.unwrap_or_else(|| {
            let detected = Shell::detect(&self.host);
            debug!("Detected shell: {detected}");
            detected
        })
    }

    /// Refreshes an outdated managed bootstrap without ever failing.
    pub fn self_heal(&self, explicit: Option<Shell>) {
        self_heal(self.shell(explicit), &self.host);
    }

    pub fn resolve<R: BufRead, W: Write>(
        &self,
        target: Option<&str>,
        selector: &mut Selector<R, W>,
    ) -> Result<PathBuf> {
        let venv = locator::resolve(
            target,
            &self.cwd,
            self.host.workon_home.as_deref(),
            selector,
        )?;
        debug!("Resolved virtual environment: {}", venv.display());
        Ok(venv)
    }

    pub fn activation<R: BufRead, W: Write>(
        &self,
        target: Option<&str>,
        shell: Option<Shell>,
        selector: &mut Selector<R, W>,
    ) -> Result<String> {
        let venv = self.resolve(target, selector)?;
        emit_activation(&venv, self.shell(shell))
    }

    pub fn install(&self, shell: Shell) -> Result<InstallReport> {
        install_bootstrap(shell, &self.host)
    }
}
