//! In-memory chat state store.
//!
//! Holds the chat collection and the per-chat message lists. Every mutation
//! keeps these invariants:
//! - the Saved Messages chat exists, is pinned and sits at position 0;
//! - `Chat::last_message` mirrors the last message of the chat's list;
//! - every message lives in the list keyed by its own `chat_id`;
//! - `Message::pinned` is set exactly for ids in `Chat::pinned_message_ids`.
//!
//! The call log rides along, newest first.

mod calls;
mod chats;
mod creation;
mod messages;

use std::collections::{HashMap, HashSet};

use thiserror::Error;

pub use creation::{country_flag, ChannelDraft, ContactDraft, GroupDraft};

use super::{
    call::{normalize_calls, Call},
    chat::{Chat, SAVED_MESSAGES_CHAT_ID},
    ids::{CallId, ChatId, MessageId, UserId},
    message::Message,
    user::User,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("chat {0} does not exist")]
    ChatNotFound(ChatId),
    #[error("message {message_id} does not exist in chat {chat_id}")]
    MessageNotFound {
        chat_id: ChatId,
        message_id: MessageId,
    },
    #[error("the Saved Messages chat cannot be removed or archived")]
    SavedMessagesProtected,
    #[error("message text is empty")]
    EmptyMessage,
    #[error("only your own messages can be edited")]
    NotOwnMessage,
    #[error("a name is required")]
    MissingName,
    #[error("select at least one member")]
    MissingMembers,
    #[error("country code must contain digits only")]
    InvalidCountryCode,
    #[error("a phone number is required")]
    InvalidPhone,
    #[error("channel link `{0}` is already taken")]
    DuplicateChannelSlug(String),
    #[error("channel link `{0}` must be 5-32 letters, digits or underscores")]
    InvalidChannelSlug(String),
    #[error("contact {0} is unknown")]
    UnknownContact(UserId),
    #[error("call {0} is not in the log")]
    CallNotFound(CallId),
}

/// Initial snapshot supplied by a seed source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedSnapshot {
    pub me: User,
    pub contacts: Vec<User>,
    pub chats: Vec<Chat>,
    pub messages: Vec<Message>,
    pub calls: Vec<Call>,
}

#[derive(Debug, Clone)]
pub struct ChatStore {
    me: User,
    contacts: Vec<User>,
    chats: Vec<Chat>,
    messages: HashMap<ChatId, Vec<Message>>,
    calls: Vec<Call>,
}

impl ChatStore {
    pub fn from_seed(seed: SeedSnapshot) -> Self {
        let SeedSnapshot {
            me,
            contacts,
            chats,
            messages,
            calls,
        } = seed;

        let mut store = Self {
            me,
            contacts,
            chats: Vec::with_capacity(chats.len() + 1),
            messages: HashMap::new(),
            calls: normalize_calls(calls),
        };

        let mut saved = None;
        let mut seen = HashSet::new();
        for chat in chats {
            if !seen.insert(chat.id.clone()) {
                tracing::warn!(chat_id = %chat.id, "seed chat id repeats; dropped");
                continue;
            }
            if chat.is_saved_messages() {
                saved = Some(chat);
            } else {
                store.messages.insert(chat.id.clone(), Vec::new());
                store.chats.push(chat);
            }
        }

        let mut saved = saved.unwrap_or_else(|| Chat::saved_messages(store.me.clone()));
        saved.pinned = true;
        saved.archived = false;
        saved.participants = vec![store.me.clone()];
        store.messages.insert(saved.id.clone(), Vec::new());
        store.chats.insert(0, saved);

        for message in messages {
            match store.messages.get_mut(&message.chat_id) {
                Some(list) => list.push(message),
                None => tracing::warn!(
                    chat_id = %message.chat_id,
                    message_id = %message.id,
                    "seed message references unknown chat; dropped"
                ),
            }
        }

        let chat_ids: Vec<ChatId> = store.chats.iter().map(|chat| chat.id.clone()).collect();
        for chat_id in &chat_ids {
            store.rebuild_pin_index(chat_id);
            store.sync_last_message(chat_id);
        }

        store
    }

    pub fn me(&self) -> &User {
        &self.me
    }

    pub fn me_id(&self) -> &UserId {
        &self.me.id
    }

    pub fn contacts(&self) -> &[User] {
        &self.contacts
    }

    pub fn contact(&self, user_id: &UserId) -> Option<&User> {
        self.contacts.iter().find(|user| &user.id == user_id)
    }

    pub fn chats(&self) -> &[Chat] {
        &self.chats
    }

    pub fn chat(&self, chat_id: &ChatId) -> Option<&Chat> {
        self.chats.iter().find(|chat| &chat.id == chat_id)
    }

    pub fn saved_messages_id(&self) -> ChatId {
        ChatId::from(SAVED_MESSAGES_CHAT_ID)
    }

    /// Messages of a chat in insertion order; empty for unknown chats.
    pub fn messages(&self, chat_id: &ChatId) -> &[Message] {
        self.messages
            .get(chat_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn message(&self, chat_id: &ChatId, message_id: &MessageId) -> Option<&Message> {
        self.messages(chat_id)
            .iter()
            .find(|message| &message.id == message_id)
    }

    fn chat_mut(&mut self, chat_id: &ChatId) -> Result<&mut Chat, StoreError> {
        self.chats
            .iter_mut()
            .find(|chat| &chat.id == chat_id)
            .ok_or_else(|| StoreError::ChatNotFound(chat_id.clone()))
    }

    fn require_chat(&self, chat_id: &ChatId) -> Result<&Chat, StoreError> {
        self.chat(chat_id)
            .ok_or_else(|| StoreError::ChatNotFound(chat_id.clone()))
    }

    fn message_mut(
        &mut self,
        chat_id: &ChatId,
        message_id: &MessageId,
    ) -> Result<&mut Message, StoreError> {
        let list = self
            .messages
            .get_mut(chat_id)
            .ok_or_else(|| StoreError::ChatNotFound(chat_id.clone()))?;

        list.iter_mut()
            .find(|message| &message.id == message_id)
            .ok_or_else(|| StoreError::MessageNotFound {
                chat_id: chat_id.clone(),
                message_id: message_id.clone(),
            })
    }

    /// Inserts a new chat right below Saved Messages.
    fn insert_chat(&mut self, chat: Chat) -> ChatId {
        let chat_id = chat.id.clone();
        self.messages.insert(chat_id.clone(), Vec::new());
        let position = usize::from(!self.chats.is_empty());
        self.chats.insert(position, chat);
        chat_id
    }

    fn sync_last_message(&mut self, chat_id: &ChatId) {
        let last = self
            .messages
            .get(chat_id)
            .and_then(|list| list.last())
            .cloned();

        if let Some(chat) = self.chats.iter_mut().find(|chat| &chat.id == chat_id) {
            chat.last_message = last;
        }
    }

    fn rebuild_pin_index(&mut self, chat_id: &ChatId) {
        let pinned: Vec<MessageId> = self
            .messages(chat_id)
            .iter()
            .filter(|message| message.pinned)
            .map(|message| message.id.clone())
            .collect();

        if let Some(chat) = self.chats.iter_mut().find(|chat| &chat.id == chat_id) {
            chat.pinned_message_ids = pinned;
        }
    }

    #[cfg(test)]
    pub(crate) fn assert_invariants(&self) {
        let first = self.chats.first().expect("saved messages must exist");
        assert!(first.is_saved_messages(), "saved messages must be first");
        assert!(first.pinned, "saved messages must stay pinned");

        for chat in &self.chats {
            let list = self.messages(&chat.id);
            assert_eq!(chat.last_message.as_ref(), list.last(), "last_message of {}", chat.id);
            assert!(list.iter().all(|message| message.chat_id == chat.id));
            let pinned: Vec<&MessageId> = list
                .iter()
                .filter(|message| message.pinned)
                .map(|message| &message.id)
                .collect();
            assert_eq!(pinned.len(), chat.pinned_message_ids.len());
            assert!(pinned.iter().all(|id| chat.pinned_message_ids.contains(id)));
        }
    }
}
