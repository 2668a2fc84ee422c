use crate::error::{EnvonError, Result};
use crate::shell::profile::{SCRIPT_DIRS, Shell};
use std::path::{Path, PathBuf};

/// Script directory of `venv`: `Scripts/` when present, `bin/` otherwise.
pub fn script_dir(venv: &Path) -> PathBuf {
    SCRIPT_DIRS
        .iter()
        .map(|dir| venv.join(dir))
        .find(|dir| dir.is_dir())
        .unwrap_or_else(|| venv.join(SCRIPT_DIRS[1]))
}

/// Builds the command that activates `venv` in `shell`. Nothing is executed.
pub fn emit_activation(venv: &Path, shell: Shell) -> Result<String> {
    let profile = shell.profile();
    let dir = script_dir(venv);

    let script = profile
        .scripts
        .iter()
        .map(|name| dir.join(name))
        .find(|script| script.is_file())
        .ok_or_else(|| EnvonError::ScriptNotFound {
            shell: shell.name().to_string(),
            venv: venv.to_path_buf(),
        })?;

    Ok(profile.run_command(&std::path::absolute(script)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn venv_with(tmp: &TempDir, scripts: &[&str]) -> PathBuf {
        let venv = tmp.path().join("venv");
        for script in scripts {
            let path = venv.join(script);
            fs_err::create_dir_all(path.parent().unwrap()).unwrap();
            fs_err::write(path, "").unwrap();
        }
        venv
    }

    fn posix(path: &Path) -> String {
        path.to_string_lossy().replace('\\', "/")
    }

    #[test]
    fn test_bash_family() {
        let tmp = TempDir::new().unwrap();
        let venv = venv_with(&tmp, &["bin/activate"]);
        let expected = format!(". '{}'", posix(&venv.join("bin").join("activate")));

        for shell in [Shell::Bash, Shell::Zsh, Shell::Sh] {
            assert_eq!(emit_activation(&venv, shell).unwrap(), expected);
        }
    }

    #[test]
    fn test_other_posix_layout_shells() {
        let tmp = TempDir::new().unwrap();
        let venv = venv_with(
            &tmp,
            &["bin/activate.fish", "bin/activate.csh", "bin/activate.nu"],
        );
        let bin = venv.join("bin");

        assert_eq!(
            emit_activation(&venv, Shell::Fish).unwrap(),
            format!("source '{}'", posix(&bin.join("activate.fish")))
        );
        assert_eq!(
            emit_activation(&venv, Shell::Tcsh).unwrap(),
            format!("source '{}'", posix(&bin.join("activate.csh")))
        );
        assert_eq!(
            emit_activation(&venv, Shell::Nushell).unwrap(),
            format!("overlay use '{}'", posix(&bin.join("activate.nu")))
        );
    }

    #[test]
    fn test_powershell_windows_layout() {
        let tmp = TempDir::new().unwrap();
        let venv = venv_with(&tmp, &["Scripts/Activate.ps1"]);
        assert_eq!(
            emit_activation(&venv, Shell::Pwsh).unwrap(),
            format!(". '{}'", posix(&venv.join("Scripts").join("Activate.ps1")))
        );
    }

    #[test]
    fn test_powershell_posix_layout() {
        let tmp = TempDir::new().unwrap();
        let venv = venv_with(&tmp, &["bin/activate", "bin/activate.ps1"]);
        let cmd = emit_activation(&venv, Shell::PowerShell).unwrap();
        assert!(cmd.starts_with(". '"));
        assert!(cmd.ends_with("activate.ps1'"));
    }

    #[test]
    fn test_cmd_uses_double_quotes_and_native_path() {
        let tmp = TempDir::new().unwrap();
        let venv = venv_with(&tmp, &["Scripts/activate.bat"]);
        let script = venv.join("Scripts").join("activate.bat");
        assert_eq!(
            emit_activation(&venv, Shell::Cmd).unwrap(),
            format!("call \"{}\"", script.display())
        );
    }

    #[test]
    fn test_scripts_dir_preferred_over_bin() {
        let tmp = TempDir::new().unwrap();
        let venv = venv_with(&tmp, &["Scripts/activate", "bin/activate"]);
        let cmd = emit_activation(&venv, Shell::Bash).unwrap();
        assert!(cmd.contains("/Scripts/activate'"));
    }

    #[test]
    fn test_references_own_script_only() {
        let tmp = TempDir::new().unwrap();
        let first = tmp.path().join("a");
        let second = tmp.path().join("b");
        for venv in [&first, &second] {
            fs_err::create_dir_all(venv.join("bin")).unwrap();
            fs_err::write(venv.join("bin").join("activate"), "").unwrap();
        }

        let cmd = emit_activation(&second, Shell::Bash).unwrap();
        assert!(cmd.contains(&posix(&second.join("bin").join("activate"))));
        assert!(!cmd.contains(&posix(&first)));
    }

    #[test]
    fn test_missing_script() {
        let tmp = TempDir::new().unwrap();
        let venv = venv_with(&tmp, &["bin/activate"]);
        let err = emit_activation(&venv, Shell::Fish).unwrap_err();
        assert!(matches!(err, EnvonError::ScriptNotFound { ref shell, .. } if shell == "fish"));
        assert!(err.to_string().contains(&venv.display().to_string()));
    }
}
