use crate::shell::profile::Shell;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "envon",
    version,
    about = "Emit the activation command for the nearest or specified virtual environment."
)]
pub struct Cli {
    /// Path, project root, or name (searched in WORKON_HOME)
    pub target: Option<String>,

    /// Force shell output format (bash, zsh, sh, fish, csh, tcsh, nushell, powershell, pwsh, cmd)
    #[arg(long, value_name = "SHELL")]
    pub emit: Option<Shell>,

    /// Print resolved venv path (no activation)
    #[arg(long)]
    pub print_path: bool,

    /// Print a shell wrapper that evaluates envon's output so `envon` directly activates the venv
    #[arg(long, value_name = "SHELL", conflicts_with = "install")]
    pub bootstrap: Option<Shell>,

    /// Install the envon bootstrap function into the shell's configuration file
    #[arg(long, value_name = "SHELL")]
    pub install: Option<Shell>,
}
