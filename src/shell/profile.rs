use crate::envs::{HostEnv, Platform};
use crate::error::{EnvonError, Result};
use std::fmt;
use std::path::{MAIN_SEPARATOR, Path, PathBuf};
use std::str::FromStr;

/// Script directories of a virtual environment, Windows layout first.
pub const SCRIPT_DIRS: [&str; 2] = ["Scripts", "bin"];

/// Shells that share one activation script and one bootstrap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShellFamily {
    Posix,
    Fish,
    Csh,
    Nushell,
    PowerShell,
    Cmd,
}

/// A concrete shell as named on the command line.
///
/// Variants of the same family differ only in where their profile file lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shell {
    Bash,
    Zsh,
    Sh,
    Fish,
    Csh,
    Tcsh,
    Nushell,
    PowerShell,
    Pwsh,
    Cmd,
}

/// How a dialect wraps a path in a string literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quoting {
    /// `'...'`, with `'` written as `'\''`. Also valid for csh.
    Posix,
    /// `'...'`, with `\` and `'` backslash-escaped.
    Fish,
    /// `'...'`, or a raw string `r#'...'#` when the path holds a `'`.
    Nushell,
    /// `'...'`, with `'` doubled.
    PowerShell,
    /// `"..."`; Windows paths cannot contain `"`.
    Cmd,
}

pub struct ShellProfile {
    /// Activation script file names, tried in order inside the script directory.
    pub scripts: &'static [&'static str],
    /// Command running a script; `{script}` is replaced by the quoted path.
    pub run: &'static str,
    /// Profile snippet sourcing a file only if it exists; `{file}` is replaced by the
    /// quoted path. `None` when the shell has no bootstrap.
    pub guard: Option<&'static str>,
    /// File name of the managed bootstrap under the envon config directory.
    pub managed_file: Option<&'static str>,
    pub quoting: Quoting,
    /// Keep `\` separators on Windows instead of normalizing to `/`.
    pub native_separators: bool,
}

static POSIX: ShellProfile = ShellProfile {
    scripts: &["activate"],
    run: ". {script}",
    guard: Some("[ -f {file} ] && . {file}"),
    managed_file: Some("envon.bash"),
    quoting: Quoting::Posix,
    native_separators: false,
};

static FISH: ShellProfile = ShellProfile {
    scripts: &["activate.fish"],
    run: "source {script}",
    guard: Some("if test -f {file}\n    source {file}\nend"),
    managed_file: Some("envon.fish"),
    quoting: Quoting::Fish,
    native_separators: false,
};

static CSH: ShellProfile = ShellProfile {
    scripts: &["activate.csh"],
    run: "source {script}",
    guard: Some("if ( -f {file} ) source {file}"),
    managed_file: Some("envon.csh"),
    quoting: Quoting::Posix,
    native_separators: false,
};

static NUSHELL: ShellProfile = ShellProfile {
    scripts: &["activate.nu"],
    run: "overlay use {script}",
    guard: Some("if ({file} | path exists) {\n    source {file}\n}"),
    managed_file: Some("envon.nu"),
    quoting: Quoting::Nushell,
    native_separators: false,
};

static POWERSHELL: ShellProfile = ShellProfile {
    scripts: &["Activate.ps1", "activate.ps1"],
    run: ". {script}",
    guard: Some("$envonPath = {file}\nif (Test-Path $envonPath) { . $envonPath }"),
    managed_file: Some("envon.ps1"),
    quoting: Quoting::PowerShell,
    native_separators: false,
};

static CMD: ShellProfile = ShellProfile {
    scripts: &["activate.bat"],
    run: "call {script}",
    guard: None,
    managed_file: None,
    quoting: Quoting::Cmd,
    native_separators: true,
};

impl ShellFamily {
    pub const ALL: [ShellFamily; 6] = [
        ShellFamily::Posix,
        ShellFamily::Fish,
        ShellFamily::Csh,
        ShellFamily::Nushell,
        ShellFamily::PowerShell,
        ShellFamily::Cmd,
    ];

    pub fn profile(self) -> &'static ShellProfile {
        match self {
            ShellFamily::Posix => &POSIX,
            ShellFamily::Fish => &FISH,
            ShellFamily::Csh => &CSH,
            ShellFamily::Nushell => &NUSHELL,
            ShellFamily::PowerShell => &POWERSHELL,
            ShellFamily::Cmd => &CMD,
        }
    }
}

impl ShellProfile {
    /// Renders `path` as a literal for this dialect.
    pub fn quote_path(&self, path: &Path) -> String {
        let mut raw = path.to_string_lossy().into_owned();
        if !self.native_separators && MAIN_SEPARATOR == '\\' {
            raw = raw.replace('\\', "/");
        }
        match self.quoting {
            Quoting::Posix => format!("'{}'", raw.replace('\'', r"'\''")),
            Quoting::Fish => format!("'{}'", raw.replace('\\', r"\\").replace('\'', r"\'")),
            Quoting::Nushell if raw.contains('\'') => format!("r#'{raw}'#"),
            Quoting::Nushell => format!("'{raw}'"),
            Quoting::PowerShell => format!("'{}'", raw.replace('\'', "''")),
            Quoting::Cmd => format!("\"{raw}\""),
        }
    }

    pub fn run_command(&self, script: &Path) -> String {
        self.run.replace("{script}", &self.quote_path(script))
    }

    pub fn guard_snippet(&self, file: &Path) -> Option<String> {
        self.guard
            .map(|guard| guard.replace("{file}", &self.quote_path(file)))
    }
}

impl Shell {
    pub fn name(self) -> &'static str {
        match self {
            Shell::Bash => "bash",
            Shell::Zsh => "zsh",
            Shell::Sh => "sh",
            Shell::Fish => "fish",
            Shell::Csh => "csh",
            Shell::Tcsh => "tcsh",
            Shell::Nushell => "nushell",
            Shell::PowerShell => "powershell",
            Shell::Pwsh => "pwsh",
            Shell::Cmd => "cmd",
        }
    }

    pub fn family(self) -> ShellFamily {
        match self {
            Shell::Bash | Shell::Zsh | Shell::Sh => ShellFamily::Posix,
            Shell::Fish => ShellFamily::Fish,
            Shell::Csh | Shell::Tcsh => ShellFamily::Csh,
            Shell::Nushell => ShellFamily::Nushell,
            Shell::PowerShell | Shell::Pwsh => ShellFamily::PowerShell,
            Shell::Cmd => ShellFamily::Cmd,
        }
    }

    pub fn profile(self) -> &'static ShellProfile {
        self.family().profile()
    }

    /// Picks the shell to emit for when none was given explicitly.
    ///
    /// On Windows this is PowerShell when `PSModulePath` is set, otherwise `cmd`. On
    /// POSIX the basename of `$SHELL` is parsed; anything unrecognized is bash.
    pub fn detect(host: &HostEnv) -> Shell {
        match host.platform {
            Platform::Windows if host.powershell => Shell::PowerShell,
            Platform::Windows => Shell::Cmd,
            Platform::Posix => host
                .shell_name()
                .and_then(|name| name.parse().ok())
                .unwrap_or(Shell::Bash),
        }
    }

    /// Location of the shell's startup file that the installer edits.
    pub fn profile_path(self, host: &HostEnv) -> Result<PathBuf> {
        let path = match self {
            Shell::Bash | Shell::Sh => {
                let home = host.home()?;
                let bashrc = home.join(".bashrc");
                if bashrc.exists() {
                    bashrc
                } else {
                    home.join(".bash_profile")
                }
            }
            Shell::Zsh => match &host.zdotdir {
                Some(dir) => dir.join(".zshrc"),
                None => host.home()?.join(".zshrc"),
            },
            Shell::Fish => host.config_root()?.join("fish").join("config.fish"),
            Shell::Nushell => host.config_root()?.join("nushell").join("config.nu"),
            Shell::PowerShell | Shell::Pwsh => match host.platform {
                Platform::Windows => {
                    let folder = if self == Shell::Pwsh {
                        "PowerShell"
                    } else {
                        "WindowsPowerShell"
                    };
                    host.home()?
                        .join("Documents")
                        .join(folder)
                        .join("Microsoft.PowerShell_profile.ps1")
                }
                Platform::Posix => host
                    .config_root()?
                    .join("powershell")
                    .join("Microsoft.PowerShell_profile.ps1"),
            },
            Shell::Csh => host.home()?.join(".cshrc"),
            Shell::Tcsh => host.home()?.join(".tcshrc"),
            Shell::Cmd => return Err(EnvonError::ConfigPathUnknown(self.name().to_string())),
        };
        Ok(path)
    }
}

impl FromStr for Shell {
    type Err = EnvonError;

    fn from_str(s: &str) -> Result<Self> {
        let shell = match s.to_ascii_lowercase().as_str() {
            "bash" => Shell::Bash,
            "zsh" => Shell::Zsh,
            "sh" => Shell::Sh,
            "fish" => Shell::Fish,
            "csh" | "cshell" => Shell::Csh,
            "tcsh" => Shell::Tcsh,
            "nu" | "nushell" => Shell::Nushell,
            "powershell" => Shell::PowerShell,
            "pwsh" => Shell::Pwsh,
            "cmd" | "batch" | "bat" => Shell::Cmd,
            _ => return Err(EnvonError::UnsupportedShell(s.to_string())),
        };
        Ok(shell)
    }
}

impl fmt::Display for Shell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
