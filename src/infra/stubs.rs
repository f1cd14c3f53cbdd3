//! In-memory adapters for tests.

use std::{cell::RefCell, rc::Rc};

use anyhow::{bail, Result};

use crate::{
    domain::store::SeedSnapshot,
    infra::{
        config::AppConfig,
        contracts::{ClipboardAdapter, ConfigAdapter, ExternalOpener, SeedSource},
    },
};

#[derive(Debug, Clone, Default)]
pub struct StubConfigAdapter {
    pub config: AppConfig,
}

impl ConfigAdapter for StubConfigAdapter {
    fn load(&self) -> Result<AppConfig> {
        Ok(self.config.clone())
    }
}

#[derive(Debug, Clone)]
pub struct StubSeedSource {
    pub snapshot: SeedSnapshot,
}

impl SeedSource for StubSeedSource {
    fn load(&self) -> Result<SeedSnapshot> {
        Ok(self.snapshot.clone())
    }
}

/// Records copied text; `failing` simulates an unavailable clipboard.
#[derive(Debug, Clone, Default)]
pub struct RecordingClipboard {
    pub copied: Rc<RefCell<Vec<String>>>,
    pub failing: bool,
}

impl ClipboardAdapter for RecordingClipboard {
    fn copy_text(&mut self, text: &str) -> Result<()> {
        if self.failing {
            bail!("clipboard is unavailable");
        }
        self.copied.borrow_mut().push(text.to_owned());
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct RecordingOpener {
    pub opened: Rc<RefCell<Vec<String>>>,
}

impl ExternalOpener for RecordingOpener {
    fn open(&self, target: &str) -> Result<()> {
        self.opened.borrow_mut().push(target.to_owned());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failing_clipboard_reports_error() {
        let mut clipboard = RecordingClipboard {
            failing: true,
            ..RecordingClipboard::default()
        };

        assert!(clipboard.copy_text("x").is_err());
        assert!(clipboard.copied.borrow().is_empty());
    }
}
