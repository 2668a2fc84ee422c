use crate::error::{EnvonError, Result};
use crate::venv::detector::is_venv_dir;
use crate::venv::selector::Selector;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Conventional environment directory names, most preferred first.
pub const PREFERRED_NAMES: [&str; 4] = [".venv", "venv", "env", ".env"];

/// Walks from `start` up to the filesystem root, trying the preferred names at each
/// level. Returns the first environment found.
pub fn find_nearest_venv(start: &Path) -> Option<PathBuf> {
    let mut current_dir = start;

    loop {
        for name in PREFERRED_NAMES {
            let candidate = current_dir.join(name);
            if is_venv_dir(&candidate) {
                return Some(candidate);
            }
        }

        match current_dir.parent() {
            Some(parent) => current_dir = parent,
            None => return None,
        }
    }
}

/// Lists every environment directly under `root`.
///
/// Preferred names come first in their fixed order, followed by any other environment
/// subdirectories sorted by path. A missing or unreadable `root` yields nothing.
pub fn list_venvs_in_dir(root: &Path) -> Vec<PathBuf> {
    let mut found: Vec<PathBuf> = PREFERRED_NAMES
        .iter()
        .map(|name| root.join(name))
        .filter(|candidate| is_venv_dir(candidate))
        .collect();

    let Ok(entries) = root.read_dir() else {
        return found;
    };
    let mut others: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_dir() && !found.contains(path))
        .collect();
    others.sort();

    found.extend(others.into_iter().filter(|path| is_venv_dir(path)));
    found
}

fn pick_one<R: BufRead, W: Write>(
    mut candidates: Vec<PathBuf>,
    context: &Path,
    selector: &mut Selector<R, W>,
) -> Result<Option<PathBuf>> {
    debug!("Found {} environment(s) in {}", candidates.len(), context.display());
    match candidates.len() {
        0 => Ok(None),
        1 => Ok(candidates.pop()),
        _ => selector
            .choose(&candidates, &context.display().to_string())
            .map(Some),
    }
}

/// Turns an optional hint into exactly one environment directory.
///
/// Without a hint, environments directly in `cwd` win; if there are none, the nearest
/// preferred name up the tree is used. A hint is tried as an environment path, then as
/// a project root, and finally as a name under `workon_home`.
pub fn resolve<R: BufRead, W: Write>(
    hint: Option<&str>,
    cwd: &Path,
    workon_home: Option<&Path>,
    selector: &mut Selector<R, W>,
) -> Result<PathBuf> {
    let Some(target) = hint.filter(|s| !s.is_empty()) else {
        if let Some(venv) = pick_one(list_venvs_in_dir(cwd), cwd, selector)? {
            return Ok(venv);
        }
        return find_nearest_venv(cwd).ok_or_else(|| {
            EnvonError::NotFound(
                "No virtual environment found here. Create one (e.g., '.venv') or pass a path."
                    .to_string(),
            )
        });
    };

    let path = cwd.join(target);
    if path.exists() {
        if is_venv_dir(&path) {
            return Ok(path);
        }
        return pick_one(list_venvs_in_dir(&path), &path, selector)?.ok_or_else(|| {
            EnvonError::NotFound(format!(
                "Path does not appear to contain a virtual environment: {}",
                path.display()
            ))
        });
    }

    if let Some(home) = workon_home {
        let candidate = home.join(target);
        if is_venv_dir(&candidate) {
            return Ok(candidate);
        }
    }
    Err(EnvonError::NotFound(format!(
        "Cannot resolve virtual environment from argument: {target}"
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::venv::detector::PYVENV_CFG;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn make_venv(path: &Path) -> PathBuf {
        fs_err::create_dir_all(path).unwrap();
        fs_err::write(path.join(PYVENV_CFG), "home = /usr/bin\n").unwrap();
        path.to_path_buf()
    }

    fn batch() -> Selector<Cursor<&'static str>, Vec<u8>> {
        Selector::new(false, Cursor::new(""), Vec::new())
    }

    #[test]
    fn test_find_nearest_none() {
        let tmp = TempDir::new().unwrap();
        let start = tmp.path().join("project").join("subdir");
        fs_err::create_dir_all(&start).unwrap();
        assert_eq!(find_nearest_venv(&start), None);
    }

    #[test]
    fn test_find_nearest_in_parent() {
        let tmp = TempDir::new().unwrap();
        let project = tmp.path().join("project");
        let subdir = project.join("src").join("package");
        fs_err::create_dir_all(&subdir).unwrap();
        let venv = make_venv(&project.join(".venv"));

        assert_eq!(find_nearest_venv(&subdir), Some(venv));
    }

    #[test]
    fn test_find_nearest_prefers_closest_level() {
        let tmp = TempDir::new().unwrap();
        make_venv(&tmp.path().join(".venv"));
        let inner = make_venv(&tmp.path().join("project").join("env"));

        assert_eq!(find_nearest_venv(&tmp.path().join("project")), Some(inner));
    }

    #[test]
    fn test_find_nearest_preferred_order() {
        let tmp = TempDir::new().unwrap();
        for name in ["env", ".venv", "venv"] {
            make_venv(&tmp.path().join(name));
        }
        assert_eq!(find_nearest_venv(tmp.path()), Some(tmp.path().join(".venv")));
    }

    #[test]
    fn test_list_empty_and_missing() {
        let tmp = TempDir::new().unwrap();
        for name in ["src", "docs", "tests"] {
            fs_err::create_dir(tmp.path().join(name)).unwrap();
        }
        assert!(list_venvs_in_dir(tmp.path()).is_empty());
        assert!(list_venvs_in_dir(&tmp.path().join("nonexistent")).is_empty());
    }

    #[test]
    fn test_list_preferred_first_then_alphabetical() {
        let tmp = TempDir::new().unwrap();
        for name in ["custom-venv", ".env", ".venv", "env", "venv", "another-venv"] {
            make_venv(&tmp.path().join(name));
        }
        fs_err::create_dir(tmp.path().join("docs")).unwrap();

        let names: Vec<String> = list_venvs_in_dir(tmp.path())
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            names,
            [".venv", "venv", "env", ".env", "another-venv", "custom-venv"]
        );
    }

    #[test]
    fn test_resolve_single_venv_in_cwd() {
        let tmp = TempDir::new().unwrap();
        let venv = make_venv(&tmp.path().join(".venv"));
        assert_eq!(resolve(None, tmp.path(), None, &mut batch()).unwrap(), venv);
    }

    #[test]
    fn test_resolve_single_custom_named_venv_in_cwd() {
        let tmp = TempDir::new().unwrap();
        let venv = make_venv(&tmp.path().join("py312"));
        assert_eq!(resolve(None, tmp.path(), None, &mut batch()).unwrap(), venv);
    }

    #[test]
    fn test_resolve_ambiguous_when_not_interactive() {
        let tmp = TempDir::new().unwrap();
        let dot_venv = make_venv(&tmp.path().join(".venv"));
        let venv = make_venv(&tmp.path().join("venv"));

        let err = resolve(None, tmp.path(), None, &mut batch()).unwrap_err();
        let message = err.to_string();
        assert!(matches!(err, EnvonError::Ambiguous(_)));
        let first = message.find(&dot_venv.display().to_string()).unwrap();
        let second = message.find(&format!("2) {}", venv.display())).unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_resolve_interactive_choice() {
        let tmp = TempDir::new().unwrap();
        make_venv(&tmp.path().join(".venv"));
        let venv = make_venv(&tmp.path().join("venv"));

        let mut selector = Selector::new(true, Cursor::new("2\n"), Vec::new());
        assert_eq!(resolve(None, tmp.path(), None, &mut selector).unwrap(), venv);
    }

    #[test]
    fn test_resolve_walks_up() {
        let tmp = TempDir::new().unwrap();
        let venv = make_venv(&tmp.path().join("venv"));
        let nested = tmp.path().join("pkg").join("module");
        fs_err::create_dir_all(&nested).unwrap();

        assert_eq!(resolve(None, &nested, None, &mut batch()).unwrap(), venv);
    }

    #[test]
    fn test_resolve_not_found() {
        let tmp = TempDir::new().unwrap();
        let err = resolve(None, tmp.path(), None, &mut batch()).unwrap_err();
        assert!(matches!(err, EnvonError::NotFound(_)));
        assert!(err.to_string().contains("No virtual environment found"));
    }

    #[test]
    fn test_resolve_hint_is_venv() {
        let tmp = TempDir::new().unwrap();
        let venv = make_venv(&tmp.path().join("somewhere").join("myenv"));
        let hint = venv.to_string_lossy().into_owned();

        assert_eq!(resolve(Some(&hint), tmp.path(), None, &mut batch()).unwrap(), venv);
    }

    #[test]
    fn test_resolve_relative_hint_is_project_root() {
        let tmp = TempDir::new().unwrap();
        let venv = make_venv(&tmp.path().join("project").join("venv"));

        assert_eq!(
            resolve(Some("project"), tmp.path(), None, &mut batch()).unwrap(),
            venv
        );
    }

    #[test]
    fn test_resolve_hint_without_venv() {
        let tmp = TempDir::new().unwrap();
        fs_err::create_dir(tmp.path().join("empty")).unwrap();

        let err = resolve(Some("empty"), tmp.path(), None, &mut batch()).unwrap_err();
        assert!(
            err.to_string()
                .starts_with("Path does not appear to contain a virtual environment")
        );
    }

    #[test]
    fn test_resolve_name_in_workon_home() {
        let tmp = TempDir::new().unwrap();
        let homes = tmp.path().join("homes");
        let venv = homes.join("foo");
        fs_err::create_dir_all(venv.join("bin")).unwrap();
        fs_err::write(venv.join("bin").join("activate"), "").unwrap();
        let cwd = tmp.path().join("work");
        fs_err::create_dir(&cwd).unwrap();

        assert_eq!(
            resolve(Some("foo"), &cwd, Some(&homes), &mut batch()).unwrap(),
            venv
        );
    }

    #[test]
    fn test_resolve_unknown_name() {
        let tmp = TempDir::new().unwrap();
        let err = resolve(Some("foo"), tmp.path(), Some(tmp.path()), &mut batch()).unwrap_err();
        assert!(matches!(err, EnvonError::NotFound(_)));
        assert_eq!(
            err.to_string(),
            "Cannot resolve virtual environment from argument: foo"
        );
    }
}
