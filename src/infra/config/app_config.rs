use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct AppConfig {
    pub logging: LogConfig,
    pub simulation: SimulationConfig,
    pub seed: SeedConfig,
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LogConfig {
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
        }
    }
}

/// Timings of the simulated counterpart, relative to the moment of sending.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SimulationConfig {
    pub sent_delay_ms: u64,
    pub delivered_delay_ms: u64,
    pub typing_delay_ms: u64,
    pub reply_delay_ms: u64,
    pub bot_replies: bool,
    pub cancel_on_close: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            sent_delay_ms: 300,
            delivered_delay_ms: 800,
            typing_delay_ms: 1_000,
            reply_delay_ms: 2_500,
            bot_replies: true,
            cancel_on_close: false,
        }
    }
}

/// Where the initial chats come from. Built-in fixtures when `path` is unset.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct SeedConfig {
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct UiConfig {
    /// Start in the archived chats view.
    pub show_archived: bool,
}
