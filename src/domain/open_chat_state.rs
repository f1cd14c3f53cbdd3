use super::{
    chat::Chat,
    ids::{ChatId, MessageId},
    message::Message,
};

/// Rows kept visible above/below the cursor before the list scrolls.
const SCROLL_MARGIN: usize = 5;

/// Snapshot of the chat shown in the messages pane.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OpenChatState {
    chat: Option<Chat>,
    messages: Vec<Message>,
    selected_index: Option<usize>,
    scroll_offset: usize,
    /// Messages picked for a bulk action, in the order they were marked.
    marked: Vec<MessageId>,
}

impl OpenChatState {
    pub fn chat(&self) -> Option<&Chat> {
        self.chat.as_ref()
    }

    pub fn chat_id(&self) -> Option<&ChatId> {
        self.chat.as_ref().map(|chat| &chat.id)
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected_index
    }

    pub fn selected_message(&self) -> Option<&Message> {
        self.selected_index.and_then(|index| self.messages.get(index))
    }

    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    /// Shows a different chat with the cursor on its newest message.
    pub fn open(&mut self, chat: Chat, messages: Vec<Message>) {
        self.selected_index = messages.len().checked_sub(1);
        self.chat = Some(chat);
        self.messages = messages;
        self.scroll_offset = 0;
        self.marked.clear();
    }

    /// Re-syncs the snapshot of the already open chat.
    ///
    /// The cursor stays on the same message id. When it was on the newest
    /// message it follows the tail, so incoming replies stay in view.
    pub fn refresh(&mut self, chat: Chat, messages: Vec<Message>) {
        let was_at_tail = match self.selected_index {
            None => true,
            Some(index) => index + 1 >= self.messages.len(),
        };
        let previous = self.selected_message().map(|message| message.id.clone());

        self.chat = Some(chat);
        self.messages = messages;
        self.selected_index = if was_at_tail {
            self.messages.len().checked_sub(1)
        } else {
            previous
                .and_then(|id| self.position_of(&id))
                .or_else(|| self.messages.len().checked_sub(1))
        };
        let messages = &self.messages;
        self.marked
            .retain(|id| messages.iter().any(|message| &message.id == id));
    }

    pub fn close(&mut self) {
        *self = Self::default();
    }

    pub fn select_message_id(&mut self, message_id: &MessageId) -> bool {
        match self.position_of(message_id) {
            Some(index) => {
                self.selected_index = Some(index);
                true
            }
            None => false,
        }
    }

    /// Moves the cursor towards newer messages.
    pub fn select_next(&mut self) {
        if self.messages.is_empty() {
            return;
        }
        let last = self.messages.len() - 1;
        self.selected_index = Some(self.selected_index.map_or(0, |index| (index + 1).min(last)));
    }

    /// Moves the cursor towards older messages.
    pub fn select_previous(&mut self) {
        if self.messages.is_empty() {
            return;
        }
        let last = self.messages.len() - 1;
        self.selected_index = Some(self.selected_index.map_or(last, |index| index.saturating_sub(1)));
    }

    /// Keeps the row at `element_index` (visual index, separators included)
    /// inside a `viewport_height`-row window with a margin on both sides.
    pub fn update_scroll_offset(&mut self, element_index: usize, viewport_height: usize) {
        if viewport_height == 0 {
            return;
        }

        let margin = SCROLL_MARGIN.min(viewport_height / 2);
        if element_index < self.scroll_offset + margin {
            self.scroll_offset = element_index.saturating_sub(margin);
        }
        if element_index + margin >= self.scroll_offset + viewport_height {
            self.scroll_offset = (element_index + margin + 1).saturating_sub(viewport_height);
        }
    }

    /// Marks or unmarks the message under the cursor. Returns whether it is
    /// marked afterwards.
    pub fn toggle_mark(&mut self) -> bool {
        let Some(id) = self.selected_message().map(|message| message.id.clone()) else {
            return false;
        };
        match self.marked.iter().position(|marked| marked == &id) {
            Some(index) => {
                self.marked.remove(index);
                false
            }
            None => {
                self.marked.push(id);
                true
            }
        }
    }

    pub fn is_marked(&self, message_id: &MessageId) -> bool {
        self.marked.contains(message_id)
    }

    pub fn has_marks(&self) -> bool {
        !self.marked.is_empty()
    }

    /// Marked message ids in chat order.
    pub fn marked_ids(&self) -> Vec<MessageId> {
        self.messages
            .iter()
            .filter(|message| self.marked.contains(&message.id))
            .map(|message| message.id.clone())
            .collect()
    }

    pub fn clear_marks(&mut self) {
        self.marked.clear();
    }

    fn position_of(&self, message_id: &MessageId) -> Option<usize> {
        self.messages.iter().position(|message| &message.id == message_id)
    }
}
