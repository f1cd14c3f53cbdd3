use super::{
    chat_list_state::ChatListState, ids::MessageId, message_input_state::MessageInputState,
    modal_state::ModalState, open_chat_state::OpenChatState, search_state::MessageSearchState,
};

/// How long a status-bar notice stays visible.
pub const NOTICE_TTL_MS: i64 = 4_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActivePane {
    #[default]
    ChatList,
    /// Typing into the chat list name filter.
    ChatFilter,
    Messages,
    MessageInput,
    /// Typing into the in-chat search bar.
    MessageSearch,
}

/// What Enter in the composer does besides sending plain text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComposeMode {
    Reply {
        message_id: MessageId,
        preview: String,
        sender_name: String,
    },
    Edit {
        message_id: MessageId,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub text: String,
    pub expires_at_ms: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellState {
    running: bool,
    active_pane: ActivePane,
    show_archived: bool,
    chat_list: ChatListState,
    open_chat: OpenChatState,
    message_input: MessageInputState,
    compose_mode: Option<ComposeMode>,
    search: Option<MessageSearchState>,
    modal: Option<ModalState>,
    notice: Option<Notice>,
}

impl Default for ShellState {
    fn default() -> Self {
        Self {
            running: true,
            active_pane: ActivePane::default(),
            show_archived: false,
            chat_list: ChatListState::default(),
            open_chat: OpenChatState::default(),
            message_input: MessageInputState::default(),
            compose_mode: None,
            search: None,
            modal: None,
            notice: None,
        }
    }
}

impl ShellState {
    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn active_pane(&self) -> ActivePane {
        self.active_pane
    }

    pub fn set_active_pane(&mut self, pane: ActivePane) {
        self.active_pane = pane;
    }

    pub fn show_archived(&self) -> bool {
        self.show_archived
    }

    pub fn set_show_archived(&mut self, show_archived: bool) {
        self.show_archived = show_archived;
    }

    pub fn chat_list(&self) -> &ChatListState {
        &self.chat_list
    }

    pub fn chat_list_mut(&mut self) -> &mut ChatListState {
        &mut self.chat_list
    }

    pub fn open_chat(&self) -> &OpenChatState {
        &self.open_chat
    }

    pub fn open_chat_mut(&mut self) -> &mut OpenChatState {
        &mut self.open_chat
    }

    pub fn message_input(&self) -> &MessageInputState {
        &self.message_input
    }

    pub fn message_input_mut(&mut self) -> &mut MessageInputState {
        &mut self.message_input
    }

    pub fn compose_mode(&self) -> Option<&ComposeMode> {
        self.compose_mode.as_ref()
    }

    pub fn set_compose_mode(&mut self, mode: Option<ComposeMode>) {
        self.compose_mode = mode;
    }

    pub fn take_compose_mode(&mut self) -> Option<ComposeMode> {
        self.compose_mode.take()
    }

    pub fn search(&self) -> Option<&MessageSearchState> {
        self.search.as_ref()
    }

    pub fn search_mut(&mut self) -> Option<&mut MessageSearchState> {
        self.search.as_mut()
    }

    pub fn start_search(&mut self) {
        self.search = Some(MessageSearchState::default());
        self.active_pane = ActivePane::MessageSearch;
    }

    pub fn close_search(&mut self) {
        self.search = None;
        if self.active_pane == ActivePane::MessageSearch {
            self.active_pane = ActivePane::Messages;
        }
    }

    pub fn modal(&self) -> Option<&ModalState> {
        self.modal.as_ref()
    }

    pub fn modal_mut(&mut self) -> Option<&mut ModalState> {
        self.modal.as_mut()
    }

    pub fn open_modal(&mut self, modal: ModalState) {
        self.modal = Some(modal);
    }

    pub fn take_modal(&mut self) -> Option<ModalState> {
        self.modal.take()
    }

    /// Visible notice, if it has not expired yet.
    pub fn notice(&self, now_ms: i64) -> Option<&str> {
        self.notice
            .as_ref()
            .filter(|notice| now_ms < notice.expires_at_ms)
            .map(|notice| notice.text.as_str())
    }

    pub fn set_notice(&mut self, text: impl Into<String>, now_ms: i64) {
        self.notice = Some(Notice {
            text: text.into(),
            expires_at_ms: now_ms + NOTICE_TTL_MS,
        });
    }

    /// Drops an expired notice. Returns true when something changed.
    pub fn expire_notice(&mut self, now_ms: i64) -> bool {
        let expired = self
            .notice
            .as_ref()
            .is_some_and(|notice| now_ms >= notice.expires_at_ms);
        if expired {
            self.notice = None;
        }
        expired
    }

    /// Leaves the open chat: clears composer state and search.
    pub fn leave_chat(&mut self) {
        self.open_chat.close();
        self.message_input.clear();
        self.compose_mode = None;
        self.search = None;
        self.active_pane = ActivePane::ChatList;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::modal_state::{FormKind, FormState};

    #[test]
    fn default_shell_runs_on_chat_list() {
        let state = ShellState::default();

        assert!(state.is_running());
        assert_eq!(state.active_pane(), ActivePane::ChatList);
        assert!(state.modal().is_none());
    }

    #[test]
    fn notice_expires_after_ttl() {
        let mut state = ShellState::default();
        state.set_notice("Copied", 1_000);

        assert_eq!(state.notice(1_000 + NOTICE_TTL_MS - 1), Some("Copied"));
        assert_eq!(state.notice(1_000 + NOTICE_TTL_MS), None);
        assert!(state.expire_notice(1_000 + NOTICE_TTL_MS));
        assert!(!state.expire_notice(1_000 + NOTICE_TTL_MS));
    }

    #[test]
    fn closing_search_returns_to_messages() {
        let mut state = ShellState::default();
        state.start_search();
        assert_eq!(state.active_pane(), ActivePane::MessageSearch);

        state.close_search();

        assert!(state.search().is_none());
        assert_eq!(state.active_pane(), ActivePane::Messages);
    }

    #[test]
    fn leave_chat_resets_composer() {
        let mut state = ShellState::default();
        state.message_input_mut().set_text("draft");
        state.set_compose_mode(Some(ComposeMode::Edit {
            message_id: MessageId::from("m1"),
        }));
        state.set_active_pane(ActivePane::MessageInput);

        state.leave_chat();

        assert!(state.message_input().is_empty());
        assert!(state.compose_mode().is_none());
        assert_eq!(state.active_pane(), ActivePane::ChatList);
    }

    #[test]
    fn modal_can_be_taken_back() {
        let mut state = ShellState::default();
        state.open_modal(ModalState::Form(FormState::new(FormKind::NewGroup)));

        assert!(matches!(state.take_modal(), Some(ModalState::Form(_))));
        assert!(state.modal().is_none());
    }
}
