use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EnvonError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Ambiguous(String),

    #[error("Unsupported shell: {0}")]
    UnsupportedShell(String),

    #[error("No activation script found for shell '{shell}' in '{}'.", venv.display())]
    ScriptNotFound { shell: String, venv: PathBuf },

    #[error("Unknown shell configuration path for: {0}")]
    ConfigPathUnknown(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = EnvonError> = std::result::Result<T, E>;
