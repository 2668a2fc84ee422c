use crate::shell::profile::{SCRIPT_DIRS, ShellFamily};
use std::path::Path;

/// Written by `venv` and `virtualenv` into every environment they create.
pub const PYVENV_CFG: &str = "pyvenv.cfg";

/// Returns true if `path` looks like a Python virtual environment.
///
/// `pyvenv.cfg` is authoritative; otherwise any activation script envon knows how to
/// emit for, in either the `Scripts/` or `bin/` layout, is enough. Missing paths and
/// filesystem errors count as "not an environment".
pub fn is_venv_dir(path: &Path) -> bool {
    if path.as_os_str().is_empty() || !path.is_dir() {
        return false;
    }

    if path.join(PYVENV_CFG).is_file() {
        return true;
    }

    SCRIPT_DIRS.iter().any(|dir| {
        let script_dir = path.join(dir);
        ShellFamily::ALL
            .iter()
            .flat_map(|family| family.profile().scripts)
            .any(|script| script_dir.join(script).is_file())
    })
}
