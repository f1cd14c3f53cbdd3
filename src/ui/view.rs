use chrono::{Local, TimeZone};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::{
    domain::{
        chat::{typing_label, Chat, ChatKind, ChatSummary},
        chat_list_state::ChatListUiState,
        grouping::calendar_day,
        ids::UserId,
        message::Message,
        shell_state::{ActivePane, ShellState},
    },
    usecases::list_chats::unread_badge,
};

use super::message_input::{input_height, render_message_input, render_search_bar};
use super::message_rendering::{
    build_message_list_elements, element_to_list_item, mark_rows, message_index_to_element_index,
    status_ticks,
};
use super::modal_view::render_modal;
use super::styles;

pub fn render(frame: &mut Frame<'_>, state: &mut ShellState, me: &UserId, now_ms: i64) {
    let [content_area, status_area] = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .areas(frame.area());

    let [chats_area, messages_with_input_area] = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
        .areas(content_area);

    let bottom_height = if state.search().is_some() {
        3
    } else {
        input_height(state.compose_mode())
    };
    let [messages_area, input_area] = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(bottom_height)])
        .areas(messages_with_input_area);

    let active_pane = state.active_pane();
    render_chat_list_panel(frame, chats_area, state, active_pane, now_ms);
    render_messages_panel(frame, messages_area, state, me, now_ms, active_pane);
    match state.search() {
        Some(search) => render_search_bar(frame, input_area, search, active_pane),
        None => render_message_input(
            frame,
            input_area,
            state.message_input(),
            state.compose_mode(),
            active_pane,
        ),
    }

    frame.render_widget(Paragraph::new(status_line(state, now_ms)), status_area);

    if let Some(modal) = state.modal() {
        render_modal(frame, modal, now_ms);
    }
}

fn border_style_for(is_active: bool) -> Style {
    if is_active {
        styles::active_panel_border_style()
    } else {
        styles::inactive_panel_border_style()
    }
}

fn render_chat_list_panel(
    frame: &mut Frame<'_>,
    area: Rect,
    state: &ShellState,
    active_pane: ActivePane,
    now_ms: i64,
) {
    let is_active = matches!(active_pane, ActivePane::ChatList | ActivePane::ChatFilter);
    let border_style = border_style_for(is_active);
    let chat_list = state.chat_list();
    let title = chat_list_title(state);

    match chat_list.ui_state() {
        ChatListUiState::Empty => {
            let message = if state.show_archived() {
                "No archived chats. Press 'a' to go back."
            } else {
                "No chats yet. Press 'c' to message a contact."
            };
            render_chat_list_message(frame, area, &title, message, border_style)
        }
        ChatListUiState::NoMatches => {
            let message = format!("No chats match \"{}\"", chat_list.filter());
            render_chat_list_message(frame, area, &title, &message, border_style)
        }
        ChatListUiState::Ready => {
            let chats = chat_list.chats();
            // Inner width = area width - 2 (borders)
            let inner_width = area.width.saturating_sub(2) as usize;
            let items = build_chat_list_items(chats, inner_width, now_ms);

            let list = List::new(items)
                .block(
                    Block::default()
                        .title(title)
                        .borders(Borders::ALL)
                        .border_style(border_style),
                )
                .highlight_style(styles::selection_highlight_style());

            let visual_index = chat_list
                .selected_index()
                .map(|idx| compute_visual_index(chats, idx));

            let mut list_state = ListState::default();
            list_state.select(visual_index);
            frame.render_stateful_widget(list, area, &mut list_state);
        }
    }
}

fn chat_list_title(state: &ShellState) -> String {
    let chat_list = state.chat_list();
    let section = if state.show_archived() {
        "Archived"
    } else {
        "Chats"
    };
    let mut title = format!("{} ({})", section, chat_list.chats().len());

    if state.active_pane() == ActivePane::ChatFilter || !chat_list.filter().is_empty() {
        title.push_str(&format!(" / {}", chat_list.filter()));
    }
    title
}

fn render_chat_list_message(
    frame: &mut Frame<'_>,
    area: Rect,
    title: &str,
    message: &str,
    border_style: Style,
) {
    let message = Paragraph::new(message.to_owned()).block(
        Block::default()
            .title(title.to_owned())
            .borders(Borders::ALL)
            .border_style(border_style),
    );
    frame.render_widget(message, area);
}

/// Builds the list of visual items including section headers.
fn build_chat_list_items(
    chats: &[ChatSummary],
    width: usize,
    now_ms: i64,
) -> Vec<ListItem<'static>> {
    let (pinned, regular): (Vec<_>, Vec<_>) = chats.iter().partition(|c| c.is_pinned);

    let mut items = Vec::new();
    let has_pinned = !pinned.is_empty();

    if has_pinned {
        items.push(section_header_item("Pinned"));
        for chat in &pinned {
            items.push(ListItem::new(chat_list_item_line(chat, width, now_ms)));
        }
    }

    if !regular.is_empty() || !has_pinned {
        items.push(section_header_item("All Chats"));
        for chat in &regular {
            items.push(ListItem::new(chat_list_item_line(chat, width, now_ms)));
        }
    }

    items
}

/// Computes the visual index in the list (accounting for section headers).
fn compute_visual_index(chats: &[ChatSummary], chat_index: usize) -> usize {
    let pinned_count = chats.iter().filter(|c| c.is_pinned).count();

    if chat_index < pinned_count {
        // +1 for the "Pinned" header
        chat_index + 1
    } else {
        let headers = if pinned_count > 0 { 2 } else { 1 };
        chat_index + headers
    }
}

fn section_header_item(title: &str) -> ListItem<'static> {
    let line = Line::from(vec![Span::styled(
        format!("-- {} --", title),
        styles::section_header_style(),
    )]);
    ListItem::new(line)
}

fn chat_list_item_line(chat: &ChatSummary, width: usize, now_ms: i64) -> Line<'static> {
    let timestamp = chat
        .last_message_unix_ms
        .map(|ts| format_chat_timestamp(ts, now_ms))
        .unwrap_or_else(|| "     ".to_owned());

    let typing = typing_label(&chat.typing);
    let (raw_preview, preview_style) = match typing {
        Some(text) => (text, styles::typing_style()),
        None => (
            chat.last_message_preview
                .as_deref()
                .map(normalize_preview_for_chat_row)
                .filter(|text| !text.is_empty())
                .unwrap_or_else(|| "No messages yet".to_owned()),
            styles::chat_preview_style(),
        ),
    };

    // Typing replaces sender and tick prefixes.
    let prefix_segments = if chat.typing.is_empty() {
        build_preview_prefix_segments(chat)
    } else {
        Vec::new()
    };
    let prefix_total_len: usize = prefix_segments.iter().map(|s| s.text.width()).sum();

    let muted_marker = if chat.is_muted { " (muted)" } else { "" };
    let unread = unread_badge(chat.unread_count)
        .map(|badge| format!(" [{}]", badge))
        .unwrap_or_default();
    let online_indicator = if chat.chat_kind == ChatKind::Private && chat.is_online == Some(true) {
        " \u{25CF}"
    } else {
        ""
    };

    let suffix_len = muted_marker.width() + unread.width() + online_indicator.width();
    // timestamp (5) + " | " (3) + name + " " + prefixes
    let content_len = 5 + 3 + chat.title.width() + 1 + prefix_total_len;
    let available = width.saturating_sub(content_len + suffix_len);

    let (display_preview, padding) = fit_preview(&raw_preview, available);

    let mut spans = vec![
        Span::styled(format!("{:>5}", timestamp), styles::timestamp_style()),
        Span::styled(" | ", styles::separator_style()),
        Span::styled(chat.title.clone(), styles::chat_name_style()),
        Span::raw(" "),
    ];

    for segment in prefix_segments {
        spans.push(Span::styled(segment.text, segment.style));
    }

    spans.push(Span::styled(display_preview, preview_style));

    if padding > 0 {
        spans.push(Span::raw(" ".repeat(padding)));
    }

    if !muted_marker.is_empty() {
        spans.push(Span::styled(muted_marker, styles::muted_marker_style()));
    }

    if !unread.is_empty() {
        let style = if chat.is_muted {
            styles::muted_unread_count_style()
        } else {
            styles::unread_count_style()
        };
        spans.push(Span::styled(unread, style));
    }

    if !online_indicator.is_empty() {
        spans.push(Span::styled(online_indicator, styles::online_indicator_style()));
    }

    Line::from(spans)
}

/// Truncates `preview` to `available` display columns; returns the padding
/// that right-aligns the suffix when the preview is shorter.
fn fit_preview(preview: &str, available: usize) -> (String, usize) {
    let preview_width = preview.width();
    if preview_width <= available {
        return (preview.to_owned(), available - preview_width);
    }

    let budget = available.saturating_sub(3);
    let mut used = 0;
    let mut truncated = String::new();
    for ch in preview.chars() {
        let ch_width = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + ch_width > budget {
            break;
        }
        used += ch_width;
        truncated.push(ch);
    }
    (format!("{}...", truncated), 0)
}

/// A styled segment of the preview prefix.
struct PrefixSegment {
    text: String,
    style: Style,
}

/// Sender name first (groups and channels), then delivery ticks for
/// outgoing messages.
fn build_preview_prefix_segments(chat: &ChatSummary) -> Vec<PrefixSegment> {
    let mut segments = Vec::new();

    if chat.outgoing_status.is_outgoing {
        if chat.chat_kind != ChatKind::Private {
            segments.push(PrefixSegment {
                text: "You: ".to_owned(),
                style: styles::group_sender_style(),
            });
        }
        let status = chat.outgoing_status.status;
        segments.push(PrefixSegment {
            text: format!("{} ", status_ticks(status)),
            style: styles::delivery_status_style(status),
        });
    } else if chat.chat_kind != ChatKind::Private {
        if let Some(sender) = &chat.last_message_sender {
            segments.push(PrefixSegment {
                text: format!("{}: ", sender),
                style: styles::group_sender_style(),
            });
        }
    }

    segments
}

/// "HH:MM" for today, "dd.mm" otherwise.
fn format_chat_timestamp(timestamp_ms: i64, now_ms: i64) -> String {
    format_chat_timestamp_in(&Local, timestamp_ms, now_ms)
}

fn format_chat_timestamp_in<Tz: TimeZone>(tz: &Tz, timestamp_ms: i64, now_ms: i64) -> String {
    // Negative or corrupted timestamps outside chrono's range render blank.
    let datetime = match tz.timestamp_millis_opt(timestamp_ms) {
        chrono::LocalResult::Single(dt) => dt.naive_local(),
        chrono::LocalResult::Ambiguous(dt, _) => dt.naive_local(),
        chrono::LocalResult::None => return "     ".to_owned(),
    };

    if datetime.date() == calendar_day(tz, now_ms) {
        datetime.format("%H:%M").to_string()
    } else {
        datetime.format("%d.%m").to_string()
    }
}

fn normalize_preview_for_chat_row(preview: &str) -> String {
    preview.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn render_messages_panel(
    frame: &mut Frame<'_>,
    area: Rect,
    state: &mut ShellState,
    me: &UserId,
    now_ms: i64,
    active_pane: ActivePane,
) {
    let is_active = matches!(active_pane, ActivePane::Messages | ActivePane::MessageSearch);
    let border_style = border_style_for(is_active);

    let open_chat = state.open_chat();
    let Some(chat) = open_chat.chat() else {
        let panel = Paragraph::new("Select a chat to view messages").block(
            Block::default()
                .title("Messages")
                .borders(Borders::ALL)
                .border_style(border_style),
        );
        frame.render_widget(panel, area);
        return;
    };

    let block = Block::default()
        .title(format!("Messages — {}", chat.name))
        .borders(Borders::ALL)
        .border_style(border_style);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let messages = open_chat.messages();
    let header = chat_header_lines(chat, messages, me);
    let mut elements = build_message_list_elements(chat, messages, me, now_ms);
    mark_rows(&mut elements, messages, |id| open_chat.is_marked(id));
    let is_empty = messages.is_empty();
    let selected_index = open_chat.selected_index();

    let [header_area, list_area] = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(header.len() as u16),
            Constraint::Min(0),
        ])
        .areas(inner);
    frame.render_widget(Paragraph::new(header), header_area);

    if is_empty && elements.is_empty() {
        frame.render_widget(Paragraph::new("No messages in this chat"), list_area);
        return;
    }

    let items: Vec<ListItem<'static>> = elements.iter().map(element_to_list_item).collect();
    let viewport_height = list_area.height as usize;

    // Map message index to element index (accounting for date separators)
    let element_index =
        selected_index.and_then(|msg_idx| message_index_to_element_index(&elements, msg_idx));

    if let Some(idx) = element_index {
        state
            .open_chat_mut()
            .update_scroll_offset(idx, viewport_height);
    }
    let scroll_offset = state.open_chat().scroll_offset();

    let list = List::new(items).highlight_style(styles::selection_highlight_style());

    let mut list_state = ListState::default();
    list_state.select(element_index);
    *list_state.offset_mut() = scroll_offset;
    frame.render_stateful_widget(list, list_area, &mut list_state);
}

/// Subtitle, channel description and the pinned-message banner.
fn chat_header_lines(chat: &Chat, messages: &[Message], me: &UserId) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    let subtitle = match chat.kind {
        ChatKind::Private if chat.is_saved_messages() => None,
        ChatKind::Private => chat.counterpart(me).map(|user| {
            if user.online {
                "online".to_owned()
            } else {
                "last seen recently".to_owned()
            }
        }),
        ChatKind::Group => Some(format!("{} members", chat.participants.len())),
        ChatKind::Channel => {
            let mut text = format!("{} subscribers", chat.participants.len());
            if let Some(link) = &chat.link {
                text.push_str(&format!(" | {}", link.url()));
            }
            Some(text)
        }
    };
    if let Some(subtitle) = subtitle {
        lines.push(Line::from(Span::styled(subtitle, styles::chat_details_style())));
    }

    if let Some(description) = chat.description.as_deref().filter(|d| !d.is_empty()) {
        lines.push(Line::from(Span::styled(
            normalize_preview_for_chat_row(description),
            styles::chat_details_style(),
        )));
    }

    let pinned = chat
        .pinned_message_ids
        .last()
        .and_then(|id| messages.iter().find(|message| &message.id == id));
    if let Some(message) = pinned {
        let count = chat.pinned_message_ids.len();
        let mut text = format!(
            "\u{1F4CC} {}",
            normalize_preview_for_chat_row(&message.display_content())
        );
        if count > 1 {
            text.push_str(&format!(" (+{} more, P to cycle)", count - 1));
        }
        lines.push(Line::from(Span::styled(text, styles::pinned_banner_style())));
    }

    lines
}

fn status_line(state: &ShellState, now_ms: i64) -> Line<'static> {
    if let Some(notice) = state.notice(now_ms) {
        return Line::from(Span::styled(notice.to_owned(), styles::notice_style()));
    }

    let hint = if state.modal().is_some() {
        "Enter: confirm | Esc: cancel"
    } else {
        pane_hint(state.active_pane())
    };
    Line::from(Span::styled(hint, styles::status_hint_style()))
}

fn pane_hint(pane: ActivePane) -> &'static str {
    match pane {
        ActivePane::ChatList => {
            "j/k: navigate | Enter: open | /: filter | I: info | L: calls | c: contacts | C: add contact | n/N: new group/channel | p: pin | m: mute | e: archive | a: archived | r: read | x: clear | d: delete | q: quit"
        }
        ActivePane::ChatFilter => "type to filter | Up/Down: navigate | Enter: done | Esc: clear",
        ActivePane::Messages => {
            "j/k: navigate | i: compose | r: reply | e: edit | d: delete | v: select | f: forward | +: react | p/P: pin/next pinned | y: copy | o: open | /: search | I: info | O: options | Esc: back"
        }
        ActivePane::MessageInput => "Enter: send | Esc: cancel | type your message",
        ActivePane::MessageSearch => "type to search | Tab/Down: next | Up: previous | Enter: done | Esc: close",
    }
}
