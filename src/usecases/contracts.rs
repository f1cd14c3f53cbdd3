use anyhow::Result;

use crate::domain::{
    events::AppEvent, message::Message, shell_state::ShellState, store::ChatStore,
};

pub trait AppEventSource {
    fn next_event(&mut self) -> Result<Option<AppEvent>>;
}

pub trait ShellOrchestrator {
    fn state(&self) -> &ShellState;
    /// Mutable access for render-time bookkeeping such as scroll offsets.
    fn state_mut(&mut self) -> &mut ShellState;
    /// Read access for rendering pieces that live outside the shell state.
    fn store(&self) -> &ChatStore;
    fn now_ms(&self) -> i64;
    fn handle_event(&mut self, event: AppEvent) -> Result<()>;
}

/// Gets told about every message the local user sends.
pub trait DeliveryTracker {
    fn on_message_sent(&mut self, store: &ChatStore, message: &Message);
}
