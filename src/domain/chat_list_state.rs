use super::{chat::ChatSummary, ids::ChatId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatListUiState {
    Ready,
    Empty,
    /// A name filter is active and nothing matched.
    NoMatches,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatListState {
    ui_state: ChatListUiState,
    chats: Vec<ChatSummary>,
    selected_index: Option<usize>,
    filter: String,
}

impl Default for ChatListState {
    fn default() -> Self {
        Self {
            ui_state: ChatListUiState::Empty,
            chats: Vec::new(),
            selected_index: None,
            filter: String::new(),
        }
    }
}

impl ChatListState {
    pub fn ui_state(&self) -> ChatListUiState {
        self.ui_state
    }

    pub fn chats(&self) -> &[ChatSummary] {
        &self.chats
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected_index
    }

    pub fn selected_chat(&self) -> Option<&ChatSummary> {
        self.selected_index.and_then(|index| self.chats.get(index))
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn push_filter_char(&mut self, ch: char) {
        self.filter.push(ch);
    }

    pub fn pop_filter_char(&mut self) {
        self.filter.pop();
    }

    pub fn clear_filter(&mut self) {
        self.filter.clear();
    }

    /// Replaces the visible rows, pinned chats first, keeping the selected
    /// chat when it is still listed.
    pub fn set_chats(&mut self, mut chats: Vec<ChatSummary>) {
        let previous = self.selected_chat().map(|chat| chat.chat_id.clone());
        chats.sort_by_key(|chat| !chat.is_pinned);
        self.chats = chats;
        self.ui_state = match (self.chats.is_empty(), self.filter.is_empty()) {
            (false, _) => ChatListUiState::Ready,
            (true, true) => ChatListUiState::Empty,
            (true, false) => ChatListUiState::NoMatches,
        };
        self.selected_index = resolve_selection_index(&self.chats, previous.as_ref());
    }

    /// Moves the cursor onto `chat_id` if it is listed.
    pub fn select_chat_id(&mut self, chat_id: &ChatId) -> bool {
        match self.chats.iter().position(|chat| &chat.chat_id == chat_id) {
            Some(index) => {
                self.selected_index = Some(index);
                true
            }
            None => false,
        }
    }

    pub fn select_next(&mut self) {
        let Some(index) = self.selected_index else {
            return;
        };

        let last_index = self.chats.len().saturating_sub(1);
        self.selected_index = Some(std::cmp::min(index.saturating_add(1), last_index));
    }

    pub fn select_previous(&mut self) {
        let Some(index) = self.selected_index else {
            return;
        };

        self.selected_index = Some(index.saturating_sub(1));
    }
}

fn resolve_selection_index(chats: &[ChatSummary], previous: Option<&ChatId>) -> Option<usize> {
    if chats.is_empty() {
        return None;
    }

    previous
        .and_then(|chat_id| chats.iter().position(|chat| &chat.chat_id == chat_id))
        .or(Some(0))
}
