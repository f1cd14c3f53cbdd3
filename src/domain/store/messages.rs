use super::{ChatStore, StoreError};
use crate::domain::{
    ids::{ChatId, MessageId},
    message::{DeliveryStatus, Message, ReplyPreview},
};

impl ChatStore {
    /// Appends an outgoing text message with status `Sending`.
    ///
    /// The returned copy is what the delivery simulation gets armed with.
    pub fn send_message(
        &mut self,
        chat_id: &ChatId,
        content: &str,
        reply_to: Option<&MessageId>,
        now_ms: i64,
    ) -> Result<Message, StoreError> {
        let content = content.trim();
        if content.is_empty() {
            return Err(StoreError::EmptyMessage);
        }

        let chat = self.require_chat(chat_id)?;
        let reply_preview = match reply_to {
            Some(reply_id) => {
                let replied =
                    self.message(chat_id, reply_id)
                        .ok_or_else(|| StoreError::MessageNotFound {
                            chat_id: chat_id.clone(),
                            message_id: reply_id.clone(),
                        })?;
                Some(ReplyPreview {
                    message_id: replied.id.clone(),
                    content: replied.display_content(),
                    sender_name: chat.sender_name(&replied.sender_id, &self.me.id),
                })
            }
            None => None,
        };

        let mut message = Message::text(
            MessageId::generate(),
            chat_id.clone(),
            self.me.id.clone(),
            content,
            now_ms,
        );
        message.reply_to = reply_preview;

        self.append(message.clone())?;
        tracing::debug!(chat_id = %chat_id, message_id = %message.id, "message appended");
        Ok(message)
    }

    /// Appends a message produced by the other side. Bumps the unread
    /// counter unless the chat is currently open.
    pub fn receive_message(&mut self, message: Message, chat_is_open: bool) -> Result<(), StoreError> {
        let chat_id = message.chat_id.clone();
        let incoming = message.sender_id != self.me.id;
        self.append(message)?;

        if incoming && !chat_is_open {
            let chat = self.chat_mut(&chat_id)?;
            chat.unread_count = chat.unread_count.saturating_add(1);
        }
        Ok(())
    }

    fn append(&mut self, message: Message) -> Result<(), StoreError> {
        let chat_id = message.chat_id.clone();
        self.messages
            .get_mut(&chat_id)
            .ok_or_else(|| StoreError::ChatNotFound(chat_id.clone()))?
            .push(message);
        self.sync_last_message(&chat_id);
        Ok(())
    }

    /// Replaces the content of an own message in place. No history is kept.
    pub fn edit_message(
        &mut self,
        chat_id: &ChatId,
        message_id: &MessageId,
        content: &str,
        now_ms: i64,
    ) -> Result<(), StoreError> {
        let content = content.trim();
        if content.is_empty() {
            return Err(StoreError::EmptyMessage);
        }

        let me = self.me.id.clone();
        let message = self.message_mut(chat_id, message_id)?;
        if message.sender_id != me {
            return Err(StoreError::NotOwnMessage);
        }
        message.content = content.to_owned();
        message.edited_at_ms = Some(now_ms);

        self.sync_last_message(chat_id);
        Ok(())
    }

    /// Removes a message and its pin. Returns false when the id is unknown.
    pub fn delete_message(
        &mut self,
        chat_id: &ChatId,
        message_id: &MessageId,
    ) -> Result<bool, StoreError> {
        let list = self
            .messages
            .get_mut(chat_id)
            .ok_or_else(|| StoreError::ChatNotFound(chat_id.clone()))?;

        let Some(position) = list.iter().position(|message| &message.id == message_id) else {
            return Ok(false);
        };
        list.remove(position);

        let chat = self.chat_mut(chat_id)?;
        chat.pinned_message_ids.retain(|id| id != message_id);
        self.sync_last_message(chat_id);
        Ok(true)
    }

    pub fn toggle_reaction(
        &mut self,
        chat_id: &ChatId,
        message_id: &MessageId,
        emoji: &str,
    ) -> Result<(), StoreError> {
        self.message_mut(chat_id, message_id)?.toggle_reaction(emoji);
        self.sync_last_message(chat_id);
        Ok(())
    }

    /// Pins or unpins a message. Returns the new pinned state.
    pub fn toggle_message_pin(
        &mut self,
        chat_id: &ChatId,
        message_id: &MessageId,
    ) -> Result<bool, StoreError> {
        let message = self.message_mut(chat_id, message_id)?;
        message.pinned = !message.pinned;
        let pinned = message.pinned;

        let chat = self.chat_mut(chat_id)?;
        if pinned {
            chat.pinned_message_ids.push(message_id.clone());
        } else {
            chat.pinned_message_ids.retain(|id| id != message_id);
        }
        self.sync_last_message(chat_id);
        Ok(pinned)
    }

    pub fn pinned_messages(&self, chat_id: &ChatId) -> Vec<&Message> {
        let Some(chat) = self.chat(chat_id) else {
            return Vec::new();
        };
        chat.pinned_message_ids
            .iter()
            .filter_map(|id| self.message(chat_id, id))
            .collect()
    }

    /// Moves a message's status forward. Returns false when it would regress.
    pub fn advance_status(
        &mut self,
        chat_id: &ChatId,
        message_id: &MessageId,
        status: DeliveryStatus,
    ) -> Result<bool, StoreError> {
        let advanced = self.message_mut(chat_id, message_id)?.advance_status(status);
        if advanced {
            self.sync_last_message(chat_id);
        }
        Ok(advanced)
    }

    /// Clones the selected messages of `source` into every target chat.
    ///
    /// Copies get fresh ids and timestamps, the local user as sender and
    /// status `Sent`; reactions, pins, edits and reply links are not carried.
    /// Copies follow the order of `message_ids`, one per entry, so a repeated
    /// id is forwarded twice. Validation happens before any target is touched.
    pub fn forward_messages(
        &mut self,
        source: &ChatId,
        message_ids: &[MessageId],
        targets: &[ChatId],
        now_ms: i64,
    ) -> Result<Vec<Message>, StoreError> {
        self.require_chat(source)?;
        for target in targets {
            self.require_chat(target)?;
        }

        let selected = message_ids
            .iter()
            .map(|message_id| {
                self.message(source, message_id)
                    .cloned()
                    .ok_or_else(|| StoreError::MessageNotFound {
                        chat_id: source.clone(),
                        message_id: message_id.clone(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut forwarded = Vec::with_capacity(selected.len() * targets.len());
        for target in targets {
            for original in &selected {
                let copy = Message {
                    id: MessageId::generate(),
                    chat_id: target.clone(),
                    sender_id: self.me.id.clone(),
                    timestamp_ms: now_ms,
                    status: DeliveryStatus::Sent,
                    reply_to: None,
                    reactions: Vec::new(),
                    edited_at_ms: None,
                    pinned: false,
                    ..original.clone()
                };
                self.append(copy.clone())?;
                forwarded.push(copy);
            }
        }

        tracing::info!(
            source = %source,
            messages = selected.len(),
            targets = targets.len(),
            "messages forwarded"
        );
        Ok(forwarded)
    }

    /// Case-insensitive substring search over a chat's messages.
    pub fn search_messages(&self, chat_id: &ChatId, query: &str) -> Vec<&Message> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        self.messages(chat_id)
            .iter()
            .filter(|message| message.content.to_lowercase().contains(&needle))
            .collect()
    }
}
