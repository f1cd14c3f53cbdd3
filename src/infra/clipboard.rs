use anyhow::{Context, Result};

use crate::infra::contracts::ClipboardAdapter;

/// System clipboard through `arboard`. The handle is opened lazily so that
/// headless sessions only fail when something is actually copied.
#[derive(Default)]
pub struct SystemClipboard {
    inner: Option<arboard::Clipboard>,
}

impl std::fmt::Debug for SystemClipboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SystemClipboard")
            .field("connected", &self.inner.is_some())
            .finish()
    }
}

impl ClipboardAdapter for SystemClipboard {
    fn copy_text(&mut self, text: &str) -> Result<()> {
        if self.inner.is_none() {
            self.inner = Some(arboard::Clipboard::new().context("clipboard is unavailable")?);
        }
        if let Some(clipboard) = self.inner.as_mut() {
            clipboard
                .set_text(text.to_owned())
                .context("failed to write clipboard")?;
        }
        Ok(())
    }
}
