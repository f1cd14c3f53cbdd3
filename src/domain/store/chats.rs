use super::{ChatStore, StoreError};
use crate::domain::{
    chat::{Chat, MuteSetting},
    ids::ChatId,
};

impl ChatStore {
    /// Opening a chat marks it read.
    pub fn select_chat(&mut self, chat_id: &ChatId) -> Result<(), StoreError> {
        self.mark_as_read(chat_id)
    }

    pub fn mark_as_read(&mut self, chat_id: &ChatId) -> Result<(), StoreError> {
        self.chat_mut(chat_id)?.unread_count = 0;
        Ok(())
    }

    /// Returns the new pinned state. Saved Messages stays pinned.
    pub fn toggle_chat_pin(&mut self, chat_id: &ChatId) -> Result<bool, StoreError> {
        let chat = self.chat_mut(chat_id)?;
        if chat.is_saved_messages() {
            return Ok(true);
        }
        chat.pinned = !chat.pinned;
        Ok(chat.pinned)
    }

    pub fn set_mute(
        &mut self,
        chat_id: &ChatId,
        setting: Option<MuteSetting>,
    ) -> Result<(), StoreError> {
        self.chat_mut(chat_id)?.muted = setting;
        Ok(())
    }

    /// Returns the new archived state.
    pub fn toggle_archive(&mut self, chat_id: &ChatId) -> Result<bool, StoreError> {
        let chat = self.chat_mut(chat_id)?;
        if chat.is_saved_messages() {
            return Err(StoreError::SavedMessagesProtected);
        }
        chat.archived = !chat.archived;
        Ok(chat.archived)
    }

    /// Removes the chat with all its messages.
    pub fn delete_chat(&mut self, chat_id: &ChatId) -> Result<Chat, StoreError> {
        let position = self
            .chats
            .iter()
            .position(|chat| &chat.id == chat_id)
            .ok_or_else(|| StoreError::ChatNotFound(chat_id.clone()))?;

        if self.chats[position].is_saved_messages() {
            return Err(StoreError::SavedMessagesProtected);
        }

        let removed = self.chats.remove(position);
        self.messages.remove(chat_id);
        tracing::info!(chat_id = %chat_id, kind = ?removed.kind, "chat deleted");
        Ok(removed)
    }

    /// Drops every message of the chat but keeps the chat. Returns how many
    /// messages were removed.
    pub fn clear_history(&mut self, chat_id: &ChatId) -> Result<usize, StoreError> {
        let cleared = self
            .messages
            .get_mut(chat_id)
            .map(|list| std::mem::take(list).len())
            .ok_or_else(|| StoreError::ChatNotFound(chat_id.clone()))?;

        let chat = self.chat_mut(chat_id)?;
        chat.pinned_message_ids.clear();
        chat.unread_count = 0;
        self.sync_last_message(chat_id);
        Ok(cleared)
    }

    pub fn set_typing(&mut self, chat_id: &ChatId, names: Vec<String>) -> Result<(), StoreError> {
        self.chat_mut(chat_id)?.typing = names;
        Ok(())
    }

    /// Case-insensitive name filter over one view (active or archived).
    pub fn filter_chats(&self, query: &str, archived: bool) -> Vec<&Chat> {
        let needle = query.trim().to_lowercase();
        self.chats
            .iter()
            .filter(|chat| chat.archived == archived)
            .filter(|chat| needle.is_empty() || chat.name.to_lowercase().contains(&needle))
            .collect()
    }
}
