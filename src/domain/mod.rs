//! Domain layer: chat entities, the state store and UI state machines.

pub mod call;
pub mod chat;
pub mod chat_info;
pub mod chat_list_state;
pub mod events;
pub mod grouping;
pub mod ids;
pub mod message;
pub mod message_input_state;
pub mod modal_state;
pub mod open_chat_state;
pub mod search_state;
pub mod shell_state;
pub mod store;
pub mod user;
