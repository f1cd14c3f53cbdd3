use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::infra::{
    config::{file_config::FileConfig, AppConfig},
    error::AppError,
};

const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Loads `path` (or `./config.toml`) over the defaults. A missing file is not
/// an error.
pub fn load(path: Option<&Path>) -> Result<AppConfig, AppError> {
    let config_path = path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));

    let mut config = AppConfig::default();

    if !config_path.exists() {
        tracing::debug!(path = %config_path.display(), "config file not found; using defaults");
        return Ok(config);
    }

    let raw = fs::read_to_string(&config_path).map_err(|source| AppError::ConfigRead {
        path: config_path.clone(),
        source,
    })?;

    let file_config: FileConfig = toml::from_str(&raw).map_err(|source| AppError::ConfigParse {
        path: config_path,
        source,
    })?;

    file_config.merge_into(&mut config);
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_config(contents: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("config.toml");
        fs::write(&path, contents).expect("must write test config");
        (dir, path)
    }

    #[test]
    fn returns_defaults_when_file_is_missing() {
        let dir = tempfile::tempdir().expect("temp dir");

        let config = load(Some(&dir.path().join("missing.toml"))).expect("config must load");

        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn merges_file_values_over_defaults() {
        let (_dir, path) = write_config(
            r#"[logging]
level = "debug"

[simulation]
reply_delay_ms = 5000
bot_replies = false

[seed]
path = "fixtures.toml"
"#,
        );

        let config = load(Some(&path)).expect("config must load");

        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.simulation.reply_delay_ms, 5_000);
        assert!(!config.simulation.bot_replies);
        assert_eq!(config.simulation.sent_delay_ms, 300);
        assert_eq!(config.seed.path, Some(PathBuf::from("fixtures.toml")));
        assert!(!config.ui.show_archived);
    }

    #[test]
    fn reports_parse_errors_with_path() {
        let (_dir, path) = write_config("[simulation]\nsent_delay_ms = \"soon\"\n");

        let error = load(Some(&path)).expect_err("config must not parse");

        assert!(matches!(error, AppError::ConfigParse { .. }));
        assert!(error.to_string().contains("config.toml"));
    }
}
