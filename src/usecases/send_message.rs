//! Use case for composing into a chat: sending new text or editing an own
//! message.

use crate::domain::{
    ids::{ChatId, MessageId},
    message::Message,
    store::{ChatStore, StoreError},
};

use super::contracts::DeliveryTracker;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendMessageCommand {
    pub chat_id: ChatId,
    pub text: String,
    pub reply_to: Option<MessageId>,
    pub now_ms: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditMessageCommand {
    pub chat_id: ChatId,
    pub message_id: MessageId,
    pub text: String,
    pub now_ms: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendMessageError {
    /// Text is empty after trimming whitespace.
    EmptyMessage,
    ChatNotFound,
    /// The message being replied to or edited is gone.
    MessageNotFound,
    NotOwnMessage,
}

impl SendMessageError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::EmptyMessage => "Message is empty",
            Self::ChatNotFound => "Chat no longer exists",
            Self::MessageNotFound => "Message no longer exists",
            Self::NotOwnMessage => "You can only edit your own messages",
        }
    }
}

/// Appends the message and arms delivery tracking for it.
pub fn send_message(
    store: &mut ChatStore,
    tracker: &mut dyn DeliveryTracker,
    command: SendMessageCommand,
) -> Result<Message, SendMessageError> {
    if command.text.trim().is_empty() {
        return Err(SendMessageError::EmptyMessage);
    }

    let message = store
        .send_message(
            &command.chat_id,
            &command.text,
            command.reply_to.as_ref(),
            command.now_ms,
        )
        .map_err(map_store_error)?;

    tracker.on_message_sent(store, &message);
    tracing::info!(chat_id = %message.chat_id, message_id = %message.id, "message sent");
    Ok(message)
}

pub fn edit_message(
    store: &mut ChatStore,
    command: EditMessageCommand,
) -> Result<(), SendMessageError> {
    store
        .edit_message(
            &command.chat_id,
            &command.message_id,
            &command.text,
            command.now_ms,
        )
        .map_err(map_store_error)
}

fn map_store_error(error: StoreError) -> SendMessageError {
    match error {
        StoreError::EmptyMessage => SendMessageError::EmptyMessage,
        StoreError::MessageNotFound { .. } => SendMessageError::MessageNotFound,
        StoreError::NotOwnMessage => SendMessageError::NotOwnMessage,
        _ => SendMessageError::ChatNotFound,
    }
}
