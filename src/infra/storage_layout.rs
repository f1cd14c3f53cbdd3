use std::{env, fs, path::PathBuf};

use crate::infra::error::AppError;

const APP_DIR_NAME: &str = "mockgram";

/// Per-user state directory. Only logs live here; chat state is in-memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageLayout {
    pub state_dir: PathBuf,
    pub logs_dir: PathBuf,
}

impl StorageLayout {
    pub fn resolve() -> Result<Self, AppError> {
        let state_base = env::var_os("XDG_STATE_HOME")
            .map(PathBuf::from)
            .or_else(dirs::state_dir)
            .or_else(|| dirs::home_dir().map(|home| home.join(".local").join("state")))
            .ok_or_else(|| AppError::StoragePathResolution {
                details: "unable to resolve state base directory (XDG_STATE_HOME/HOME)".into(),
            })?;

        Ok(Self::under(state_base))
    }

    pub fn under(state_base: PathBuf) -> Self {
        let state_dir = state_base.join(APP_DIR_NAME);
        let logs_dir = state_dir.join("logs");
        Self {
            state_dir,
            logs_dir,
        }
    }

    pub fn ensure_dirs(&self) -> Result<(), AppError> {
        for dir in [&self.state_dir, &self.logs_dir] {
            fs::create_dir_all(dir).map_err(|source| AppError::StorageDirCreate {
                path: dir.clone(),
                source,
            })?;
        }

        Ok(())
    }
}
