use fs2::FileExt;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Exclusive advisory lock held for as long as the value lives.
pub struct FileLock {
    file: fs_err::File,
    resource: String,
}

impl FileLock {
    /// Blocks until the lock at `path` is acquired, creating the lock file if needed.
    pub fn acquire(path: impl AsRef<Path>, resource: &str) -> io::Result<Self> {
        let path: PathBuf = path.as_ref().to_path_buf();
        let file = fs_err::OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&path)?;

        match file.file().try_lock_exclusive() {
            Ok(()) => debug!("Acquired lock for `{resource}`"),
            Err(_) => {
                info!(
                    "Waiting to acquire lock for `{resource}` at `{}`",
                    path.display()
                );
                file.file().lock_exclusive()?;
            }
        }

        Ok(FileLock {
            file,
            resource: resource.to_string(),
        })
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        if let Err(err) = FileExt::unlock(self.file.file()) {
            warn!("Failed to release lock for `{}`: {err}", self.resource);
        } else {
            debug!("Released lock for `{}`", self.resource);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_lock_is_reacquirable_after_drop() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(".lock");

        let lock = FileLock::acquire(&path, "test").unwrap();
        assert!(path.exists());
        drop(lock);

        let again = fs_err::File::open(&path).unwrap();
        assert!(again.file().try_lock_exclusive().is_ok());
    }
}
