use anyhow::Result;

use crate::{domain::store::SeedSnapshot, infra::config::AppConfig};

pub trait ConfigAdapter {
    fn load(&self) -> Result<AppConfig>;
}

/// Supplies the users, chats and messages the store starts with.
pub trait SeedSource {
    fn load(&self) -> Result<SeedSnapshot>;
}

pub trait ClipboardAdapter {
    fn copy_text(&mut self, text: &str) -> Result<()>;
}

pub trait ExternalOpener {
    fn open(&self, target: &str) -> Result<()>;
}
