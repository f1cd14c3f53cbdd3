use crate::domain::{
    chat::{typing_label, ChatKind, ChatSummary},
    store::ChatStore,
};

const UNREAD_BADGE_CAP: u32 = 99;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListChatsQuery {
    /// Case-insensitive chat name filter; empty keeps every chat.
    pub filter: String,
    pub archived: bool,
    pub now_ms: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListChatsOutput {
    pub chats: Vec<ChatSummary>,
}

/// Matching chats in display order: pinned first, store order otherwise.
pub fn list_chats(store: &ChatStore, query: &ListChatsQuery) -> ListChatsOutput {
    let mut chats: Vec<ChatSummary> = store
        .filter_chats(&query.filter, query.archived)
        .into_iter()
        .map(|chat| chat.summarize(store.me_id(), query.now_ms))
        .collect();
    chats.sort_by_key(|chat| !chat.is_pinned);

    ListChatsOutput { chats }
}

/// Unread badge text, capped at "99+". Zero renders nothing.
pub fn unread_badge(unread_count: u32) -> Option<String> {
    match unread_count {
        0 => None,
        count if count > UNREAD_BADGE_CAP => Some(format!("{UNREAD_BADGE_CAP}+")),
        count => Some(count.to_string()),
    }
}

/// Preview line for the chat list: typing first, then the last message.
pub fn preview_line(chat: &ChatSummary) -> Option<String> {
    if let Some(typing) = typing_label(&chat.typing) {
        return Some(typing);
    }

    let preview = chat.last_message_preview.as_deref()?;
    let text = match (&chat.last_message_sender, chat.outgoing_status.is_outgoing) {
        (_, true) => format!("You: {preview}"),
        (Some(sender), false) if chat.chat_kind != ChatKind::Private => {
            format!("{sender}: {preview}")
        }
        _ => preview.to_owned(),
    };
    Some(text)
}

/// One plain-text line per chat for the `chats` subcommand.
pub fn format_chat_line(chat: &ChatSummary) -> String {
    let mut line = String::new();
    if chat.is_pinned {
        line.push_str("* ");
    }
    line.push_str(&chat.title);
    line.push_str(&format!(" [{}]", chat.chat_kind.as_label()));
    if chat.is_muted {
        line.push_str(" (muted)");
    }
    if let Some(badge) = unread_badge(chat.unread_count) {
        line.push_str(&format!(" ({badge})"));
    }
    if let Some(preview) = preview_line(chat) {
        line.push_str(" - ");
        line.push_str(&preview);
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        ids::ChatId,
        store::test_fixtures::{store, NOW},
    };

    fn query(filter: &str) -> ListChatsQuery {
        ListChatsQuery {
            filter: filter.to_owned(),
            archived: false,
            now_ms: NOW,
        }
    }

    #[test]
    fn lists_every_active_chat_with_saved_messages_first() {
        let store = store();

        let output = list_chats(&store, &query(""));

        assert_eq!(output.chats.len(), 3);
        assert_eq!(output.chats[0].chat_id, store.saved_messages_id());
    }

    #[test]
    fn pinned_chats_are_listed_before_the_rest() {
        let mut store = store();
        store
            .toggle_chat_pin(&ChatId::from("team"))
            .expect("pin should work");

        let output = list_chats(&store, &query(""));

        let titles: Vec<&str> = output.chats.iter().map(|chat| chat.title.as_str()).collect();
        assert_eq!(titles, vec!["Saved Messages", "Team", "Alice"]);
    }

    #[test]
    fn filters_by_name_case_insensitively() {
        let store = store();

        let output = list_chats(&store, &query("ALI"));

        let titles: Vec<_> = output.chats.iter().map(|chat| chat.title.as_str()).collect();
        assert_eq!(titles, vec!["Alice"]);
    }

    #[test]
    fn unread_badge_is_capped() {
        assert_eq!(unread_badge(0), None);
        assert_eq!(unread_badge(7).as_deref(), Some("7"));
        assert_eq!(unread_badge(99).as_deref(), Some("99"));
        assert_eq!(unread_badge(128).as_deref(), Some("99+"));
    }

    #[test]
    fn typing_replaces_preview() {
        let store = store();
        let mut chat = list_chats(&store, &query("alice")).chats.remove(0);

        chat.typing = vec!["Alice".to_owned()];
        assert_eq!(preview_line(&chat).as_deref(), Some("Alice is typing..."));

        chat.typing = vec!["Alice".to_owned(), "Bob".to_owned()];
        assert_eq!(preview_line(&chat).as_deref(), Some("Alice, Bob are typing..."));
    }

    #[test]
    fn group_previews_name_the_sender() {
        let store = store();
        let chat = list_chats(&store, &query("team")).chats.remove(0);

        let line = format_chat_line(&chat);

        assert_eq!(line, "Team [Group] - Bob: Standup in 5");
    }
}
