use std::path::PathBuf;

use serde::Deserialize;

use crate::infra::config::{AppConfig, LogConfig, SeedConfig, SimulationConfig, UiConfig};

#[derive(Debug, Deserialize, Default)]
pub struct FileConfig {
    pub logging: Option<FileLogConfig>,
    pub simulation: Option<FileSimulationConfig>,
    pub seed: Option<FileSeedConfig>,
    pub ui: Option<FileUiConfig>,
}

impl FileConfig {
    pub fn merge_into(self, config: &mut AppConfig) {
        if let Some(logging) = self.logging {
            logging.merge_into(&mut config.logging);
        }

        if let Some(simulation) = self.simulation {
            simulation.merge_into(&mut config.simulation);
        }

        if let Some(seed) = self.seed {
            seed.merge_into(&mut config.seed);
        }

        if let Some(ui) = self.ui {
            ui.merge_into(&mut config.ui);
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileLogConfig {
    pub level: Option<String>,
}

impl FileLogConfig {
    fn merge_into(self, config: &mut LogConfig) {
        if let Some(level) = self.level {
            config.level = level;
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileSimulationConfig {
    pub sent_delay_ms: Option<u64>,
    pub delivered_delay_ms: Option<u64>,
    pub typing_delay_ms: Option<u64>,
    pub reply_delay_ms: Option<u64>,
    pub bot_replies: Option<bool>,
    pub cancel_on_close: Option<bool>,
}

impl FileSimulationConfig {
    fn merge_into(self, config: &mut SimulationConfig) {
        if let Some(delay) = self.sent_delay_ms {
            config.sent_delay_ms = delay;
        }
        if let Some(delay) = self.delivered_delay_ms {
            config.delivered_delay_ms = delay;
        }
        if let Some(delay) = self.typing_delay_ms {
            config.typing_delay_ms = delay;
        }
        if let Some(delay) = self.reply_delay_ms {
            config.reply_delay_ms = delay;
        }
        if let Some(enabled) = self.bot_replies {
            config.bot_replies = enabled;
        }
        if let Some(enabled) = self.cancel_on_close {
            config.cancel_on_close = enabled;
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileSeedConfig {
    pub path: Option<PathBuf>,
}

impl FileSeedConfig {
    fn merge_into(self, config: &mut SeedConfig) {
        if let Some(path) = self.path {
            config.path = Some(path);
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileUiConfig {
    pub show_archived: Option<bool>,
}

impl FileUiConfig {
    fn merge_into(self, config: &mut UiConfig) {
        if let Some(show_archived) = self.show_archived {
            config.show_archived = show_archived;
        }
    }
}
