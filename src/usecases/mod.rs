//! Use case layer: application workflows and orchestration.

pub mod bootstrap;
pub mod context;
pub mod contracts;
pub mod create_chat;
pub mod list_chats;
pub mod send_message;
pub mod shell;
