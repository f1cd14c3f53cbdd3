//! UI layer: terminal rendering and the interactive shell loop.

mod event_source;
mod message_input;
mod message_rendering;
mod modal_view;
pub mod shell;
mod styles;
mod terminal;
mod view;

pub(crate) use event_source::CrosstermEventSource;
