#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// Emitted when no key arrives within the poll window; drives timers.
    Tick,
    QuitRequested,
    InputKey(KeyInput),
}

/// Terminal-agnostic key press. Named keys use lowercase names
/// (`enter`, `esc`, `backspace`, `up`, `down`, `left`, `right`, `tab`,
/// `backtab`, `delete`, `home`, `end`); printable keys are the character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyInput {
    pub key: String,
    pub ctrl: bool,
}

impl KeyInput {
    pub fn new(key: impl Into<String>, ctrl: bool) -> Self {
        Self {
            key: key.into(),
            ctrl,
        }
    }

    pub fn plain(key: impl Into<String>) -> Self {
        Self::new(key, false)
    }

    /// The typed character, when this is a single printable key without Ctrl.
    pub fn as_char(&self) -> Option<char> {
        if self.ctrl {
            return None;
        }
        let mut chars = self.key.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) if !ch.is_control() => Some(ch),
            _ => None,
        }
    }
}
