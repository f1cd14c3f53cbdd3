//! Modal dialogs layered over the shell.

use super::{
    call::Call,
    chat::{Chat, ChatKind, MuteDuration},
    chat_info::ChatInfo,
    ids::{ChatId, MessageId},
    message_input_state::MessageInputState,
};

/// Reactions offered by the reaction picker, in display order.
pub const REACTION_EMOJIS: [&str; 10] = [
    "❤️", "👍", "🤷‍♂️", "👎", "👏", "🔥", "💔", "🍌", "😡", "😂",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerItem {
    /// Id of the contact or chat the row stands for.
    pub id: String,
    pub label: String,
    pub detail: Option<String>,
}

impl PickerItem {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

/// Filterable list with single or multi selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerState {
    items: Vec<PickerItem>,
    filter: String,
    cursor: usize,
    multi: bool,
    chosen: Vec<String>,
}

impl PickerState {
    pub fn single(items: Vec<PickerItem>) -> Self {
        Self::new(items, false)
    }

    pub fn multi(items: Vec<PickerItem>) -> Self {
        Self::new(items, true)
    }

    fn new(items: Vec<PickerItem>, multi: bool) -> Self {
        Self {
            items,
            filter: String::new(),
            cursor: 0,
            multi,
            chosen: Vec::new(),
        }
    }

    pub fn is_multi(&self) -> bool {
        self.multi
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn push_filter_char(&mut self, ch: char) {
        self.filter.push(ch);
        self.cursor = 0;
    }

    pub fn pop_filter_char(&mut self) {
        self.filter.pop();
        self.cursor = 0;
    }

    /// Items whose label contains the filter, case-insensitively.
    pub fn visible(&self) -> Vec<&PickerItem> {
        let needle = self.filter.to_lowercase();
        self.items
            .iter()
            .filter(|item| item.label.to_lowercase().contains(&needle))
            .collect()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn current(&self) -> Option<&PickerItem> {
        self.visible().get(self.cursor).copied()
    }

    pub fn select_next(&mut self) {
        let len = self.visible().len();
        if len > 0 {
            self.cursor = (self.cursor + 1).min(len - 1);
        }
    }

    pub fn select_previous(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// Toggles the row under the cursor. No-op for single pickers.
    pub fn toggle_current(&mut self) {
        if !self.multi {
            return;
        }
        let Some(id) = self.current().map(|item| item.id.clone()) else {
            return;
        };
        match self.chosen.iter().position(|chosen| chosen == &id) {
            Some(index) => {
                self.chosen.remove(index);
            }
            None => self.chosen.push(id),
        }
    }

    pub fn is_chosen(&self, id: &str) -> bool {
        self.chosen.iter().any(|chosen| chosen == id)
    }

    /// Chosen ids in the order they were picked.
    pub fn chosen_ids(&self) -> &[String] {
        &self.chosen
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    AddContact,
    NewGroup,
    NewChannel,
}

impl FormKind {
    pub fn title(self) -> &'static str {
        match self {
            Self::AddContact => "Add Contact",
            Self::NewGroup => "New Group",
            Self::NewChannel => "New Channel",
        }
    }

    pub fn field_labels(self) -> &'static [&'static str] {
        match self {
            Self::AddContact => &["First name", "Last name", "Country code", "Phone"],
            Self::NewGroup => &["Group name", "Avatar URL"],
            Self::NewChannel => &[
                "Channel name",
                "Description",
                "Public link (empty for private)",
                "Avatar URL",
            ],
        }
    }

    /// Group and channel forms continue to a member picker.
    pub fn picks_members(self) -> bool {
        !matches!(self, Self::AddContact)
    }
}

/// Field positions inside each form.
pub mod fields {
    pub const CONTACT_FIRST_NAME: usize = 0;
    pub const CONTACT_LAST_NAME: usize = 1;
    pub const CONTACT_COUNTRY_CODE: usize = 2;
    pub const CONTACT_PHONE: usize = 3;

    pub const GROUP_NAME: usize = 0;
    pub const GROUP_AVATAR: usize = 1;

    pub const CHANNEL_NAME: usize = 0;
    pub const CHANNEL_DESCRIPTION: usize = 1;
    pub const CHANNEL_SLUG: usize = 2;
    pub const CHANNEL_AVATAR: usize = 3;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    kind: FormKind,
    fields: Vec<MessageInputState>,
    focused: usize,
}

impl FormState {
    pub fn new(kind: FormKind) -> Self {
        Self {
            kind,
            fields: vec![MessageInputState::default(); kind.field_labels().len()],
            focused: 0,
        }
    }

    pub fn kind(&self) -> FormKind {
        self.kind
    }

    pub fn focused(&self) -> usize {
        self.focused
    }

    pub fn field(&self, index: usize) -> Option<&MessageInputState> {
        self.fields.get(index)
    }

    pub fn value(&self, index: usize) -> String {
        self.field(index)
            .map(MessageInputState::text)
            .unwrap_or_default()
    }

    pub fn focused_field_mut(&mut self) -> &mut MessageInputState {
        &mut self.fields[self.focused]
    }

    pub fn focus_next(&mut self) {
        self.focused = (self.focused + 1) % self.fields.len();
    }

    pub fn focus_previous(&mut self) {
        self.focused = (self.focused + self.fields.len() - 1) % self.fields.len();
    }
}

/// Entries of the in-chat options menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatOption {
    ViewInfo,
    SearchMessages,
    TogglePin,
    ToggleMute,
    ClearHistory,
    Delete,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatOptionItem {
    pub option: ChatOption,
    pub label: &'static str,
}

/// Options offered for `chat`, labelled for its current pin and mute state.
pub fn chat_options(chat: &Chat, now_ms: i64) -> Vec<ChatOptionItem> {
    let item = |option, label| ChatOptionItem { option, label };
    let mut items = vec![
        item(ChatOption::ViewInfo, "View Info"),
        item(ChatOption::SearchMessages, "Search Messages"),
    ];
    if !chat.is_saved_messages() {
        let pin = if chat.pinned { "Unpin Chat" } else { "Pin Chat" };
        items.push(item(ChatOption::TogglePin, pin));
    }
    let mute = if chat.is_muted(now_ms) { "Unmute" } else { "Mute" };
    items.push(item(ChatOption::ToggleMute, mute));
    items.push(item(ChatOption::ClearHistory, "Clear History"));
    if !chat.is_saved_messages() {
        items.push(item(ChatOption::Delete, chat.kind.delete_action_label()));
    }
    items
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalState {
    /// Contact list; Enter opens the private chat.
    Contacts(PickerState),
    Forward {
        source: ChatId,
        message_ids: Vec<MessageId>,
        picker: PickerState,
    },
    Reactions {
        chat_id: ChatId,
        message_id: MessageId,
        selected: usize,
    },
    Mute {
        chat_id: ChatId,
        selected: usize,
    },
    ConfirmDelete {
        chat_id: ChatId,
        title: String,
        kind: ChatKind,
    },
    Form(FormState),
    /// Second step of group/channel creation.
    Members {
        form: FormState,
        picker: PickerState,
    },
    ChatInfo(ChatInfo),
    ChatOptions {
        chat_id: ChatId,
        items: Vec<ChatOptionItem>,
        selected: usize,
    },
    /// Snapshot of the call log; `d` removes the entry under the cursor.
    Calls {
        calls: Vec<Call>,
        selected: usize,
    },
}

impl ModalState {
    /// Moves the cursor of fixed-option modals, wrapping at both ends.
    pub fn cycle_option(&mut self, forward: bool) {
        let (selected, len) = match self {
            Self::Reactions { selected, .. } => (selected, REACTION_EMOJIS.len()),
            Self::Mute { selected, .. } => (selected, MuteDuration::ALL.len()),
            Self::ChatOptions {
                selected, items, ..
            } => (selected, items.len()),
            Self::Calls { selected, calls } => (selected, calls.len()),
            _ => return,
        };
        if len == 0 {
            return;
        }
        *selected = if forward {
            (*selected + 1) % len
        } else {
            (*selected + len - 1) % len
        };
    }
}
