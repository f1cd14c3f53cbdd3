use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::infra::{
    config::{load, AppConfig},
    contracts::ConfigAdapter,
};

/// Reads the TOML config named on the command line, or `./config.toml`.
#[derive(Debug, Clone, Default)]
pub struct FileConfigAdapter {
    path: Option<PathBuf>,
}

impl FileConfigAdapter {
    pub fn new(path: Option<&Path>) -> Self {
        Self {
            path: path.map(Path::to_path_buf),
        }
    }
}

impl ConfigAdapter for FileConfigAdapter {
    fn load(&self) -> Result<AppConfig> {
        Ok(load(self.path.as_deref())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_explicit_path() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("mockgram.toml");
        std::fs::write(&path, "[ui]\nshow_archived = true\n").expect("write config");

        let config = FileConfigAdapter::new(Some(&path))
            .load()
            .expect("config must load");

        assert!(config.ui.show_archived);
    }
}
