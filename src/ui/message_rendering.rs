//! Message list rendering logic.
//!
//! Turns the grouping plan of a chat into visual rows:
//! - date separators ("Today", "Yesterday", "Friday, February 13")
//! - a sender header on the first message of each sender run
//! - avatar initials on the last incoming message of a run in groups
//! - reply previews, attachments, reactions and edited/pinned/selected markers
//! - delivery ticks on the user's own messages
//! - a trailing typing indicator

use chrono::{Datelike, Local, NaiveDate, TimeZone};
use ratatui::{
    layout::Alignment,
    text::{Line, Span},
    widgets::ListItem,
};

use crate::domain::{
    chat::{typing_label, Chat, ChatKind},
    grouping::{calendar_day, plan_messages_in},
    ids::{MessageId, UserId},
    message::{Attachment, AttachmentKind, DeliveryStatus, Message, MessageKind},
    user::initials_of,
};

use super::styles;

/// Aligns continuation lines with the text after the time column.
const INDENT: &str = "      ";
const EMPTY_MESSAGE: &str = "[Empty message]";

/// Represents a visual element in the messages list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageListElement {
    DateSeparator(String),
    Message(MessageRow),
    /// Trailing "Alice is typing..." line.
    Typing(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MessageRow {
    pub time: String,
    /// Present on the first message of a sender run.
    pub sender: Option<String>,
    pub is_own: bool,
    pub is_system: bool,
    /// Group chats reserve a left gutter for avatars on every row.
    pub avatar_gutter: bool,
    pub avatar: Option<String>,
    pub content: String,
    pub reply: Option<String>,
    pub attachments: Vec<String>,
    pub reactions: Option<String>,
    /// Delivery status, only for the user's own messages.
    pub status: Option<DeliveryStatus>,
    pub edited: bool,
    pub pinned: bool,
    /// Picked for a bulk forward.
    pub marked: bool,
}

/// Builds the visual elements of `chat` using the local timezone.
pub fn build_message_list_elements(
    chat: &Chat,
    messages: &[Message],
    me: &UserId,
    now_ms: i64,
) -> Vec<MessageListElement> {
    build_message_list_elements_in(&Local, chat, messages, me, now_ms)
}

pub fn build_message_list_elements_in<Tz: TimeZone>(
    tz: &Tz,
    chat: &Chat,
    messages: &[Message],
    me: &UserId,
    now_ms: i64,
) -> Vec<MessageListElement> {
    let is_group = chat.kind == ChatKind::Group;
    let plan = plan_messages_in(tz, messages, me, is_group);
    let today = calendar_day(tz, now_ms);
    let mut elements = Vec::with_capacity(messages.len() + 2);

    for (message, placement) in messages.iter().zip(plan) {
        if placement.show_date_header {
            let day = calendar_day(tz, message.timestamp_ms);
            elements.push(MessageListElement::DateSeparator(date_label(day, today)));
        }

        let is_own = &message.sender_id == me;
        let is_system = message.kind == MessageKind::System;
        let sender_name = chat.sender_name(&message.sender_id, me);

        elements.push(MessageListElement::Message(MessageRow {
            time: format_time(tz, message.timestamp_ms),
            sender: (placement.is_first_in_group && !is_system).then(|| sender_name.clone()),
            is_own,
            is_system,
            avatar_gutter: is_group,
            avatar: placement
                .show_avatar
                .then(|| initials_of(&sender_name)),
            content: message.display_content(),
            reply: message.reply_to.as_ref().map(|reply| {
                format!("{}: {}", reply.sender_name, single_line(&reply.content))
            }),
            attachments: message.attachments.iter().map(attachment_label).collect(),
            reactions: reactions_label(&message.reactions),
            status: is_own.then_some(message.status),
            edited: message.is_edited(),
            pinned: message.pinned,
            marked: false,
        }));
    }

    if let Some(typing) = typing_label(&chat.typing) {
        elements.push(MessageListElement::Typing(typing));
    }

    elements
}

/// Flags the rows of `messages` for which `is_marked` holds.
pub fn mark_rows(
    elements: &mut [MessageListElement],
    messages: &[Message],
    is_marked: impl Fn(&MessageId) -> bool,
) {
    let rows = elements.iter_mut().filter_map(|element| match element {
        MessageListElement::Message(row) => Some(row),
        _ => None,
    });
    for (row, message) in rows.zip(messages) {
        row.marked = is_marked(&message.id);
    }
}

/// Converts a message index to the corresponding element index in the list.
///
/// Since the element list contains both messages and date separators,
/// this function finds the element index for a given message index.
/// Returns `None` if the message index is out of range.
pub fn message_index_to_element_index(
    elements: &[MessageListElement],
    message_index: usize,
) -> Option<usize> {
    elements
        .iter()
        .enumerate()
        .filter(|(_, element)| matches!(element, MessageListElement::Message(_)))
        .nth(message_index)
        .map(|(element_index, _)| element_index)
}

/// Tick glyphs for a delivery status.
pub fn status_ticks(status: DeliveryStatus) -> &'static str {
    match status {
        DeliveryStatus::Sending => "\u{25F7}",
        DeliveryStatus::Sent => "\u{2713}",
        DeliveryStatus::Delivered | DeliveryStatus::Read => "\u{2713}\u{2713}",
    }
}

/// Converts a list element to a ListItem for ratatui rendering.
pub fn element_to_list_item(element: &MessageListElement) -> ListItem<'static> {
    match element {
        MessageListElement::DateSeparator(date) => date_separator_item(date),
        MessageListElement::Message(row) => ListItem::new(message_lines(row)),
        MessageListElement::Typing(text) => ListItem::new(Line::from(vec![
            Span::raw(INDENT),
            Span::styled(text.clone(), styles::typing_style()),
        ])),
    }
}

fn date_separator_item(date: &str) -> ListItem<'static> {
    let separator = format!("——— {} ———", date);
    let line = Line::from(vec![Span::styled(
        separator,
        styles::date_separator_style(),
    )])
    .alignment(Alignment::Center);
    ListItem::new(vec![Line::default(), line, Line::default()])
}

fn message_lines(row: &MessageRow) -> Vec<Line<'static>> {
    let mut body = body_lines(row);
    let mut lines = Vec::with_capacity(body.len() + 1);

    let time = Span::styled(format!("{:>5} ", row.time), styles::message_time_style());
    if let Some(sender) = &row.sender {
        let sender_style = if row.is_own {
            styles::own_sender_style()
        } else {
            styles::message_sender_style()
        };
        let mut header = vec![time, Span::styled(format!("{}:", sender), sender_style)];
        header.extend(marker_spans(row));
        lines.push(Line::from(header));

        for spans in body {
            lines.push(indented(spans));
        }
    } else {
        // Grouped message: the time shares a row with the first body line.
        let mut first = vec![time];
        first.extend(body.remove(0));
        first.extend(marker_spans(row));
        lines.push(Line::from(first));

        for spans in body {
            lines.push(indented(spans));
        }
    }

    if row.avatar_gutter {
        let last = lines.len() - 1;
        lines = lines
            .into_iter()
            .enumerate()
            .map(|(index, line)| {
                let gutter = match (&row.avatar, index == last) {
                    (Some(initials), true) => {
                        Span::styled(format!("{:<2}", initials), styles::avatar_style())
                    }
                    _ => Span::raw("  "),
                };
                let mut spans = vec![gutter, Span::raw(" ")];
                spans.extend(line.spans);
                Line::from(spans)
            })
            .collect();
    }

    lines
}

/// Body lines without the leading indent; never empty.
fn body_lines(row: &MessageRow) -> Vec<Vec<Span<'static>>> {
    let mut body = Vec::new();

    if let Some(reply) = &row.reply {
        body.push(vec![Span::styled(
            format!("\u{21AA} {}", reply),
            styles::reply_preview_style(),
        )]);
    }

    for text_line in row.content.lines() {
        if row.is_system {
            body.push(vec![Span::styled(
                text_line.to_owned(),
                styles::system_message_style(),
            )]);
        } else {
            body.push(build_content_line_spans(text_line));
        }
    }

    for attachment in &row.attachments {
        body.push(vec![Span::styled(
            attachment.clone(),
            styles::message_media_style(),
        )]);
    }

    if let Some(reactions) = &row.reactions {
        body.push(vec![Span::styled(reactions.clone(), styles::reactions_style())]);
    }

    if body.is_empty() {
        body.push(vec![Span::styled(
            EMPTY_MESSAGE,
            styles::message_media_style(),
        )]);
    }

    body
}

fn indented(spans: Vec<Span<'static>>) -> Line<'static> {
    let mut line = vec![Span::raw(INDENT)];
    line.extend(spans);
    Line::from(line)
}

fn marker_spans(row: &MessageRow) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    if row.marked {
        spans.push(Span::styled(" \u{2611}", styles::marked_message_style()));
    }
    if row.edited {
        spans.push(Span::styled(" edited", styles::message_marker_style()));
    }
    if row.pinned {
        spans.push(Span::styled(" \u{1F4CC}", styles::message_marker_style()));
    }
    if let Some(status) = row.status {
        spans.push(Span::styled(
            format!(" {}", status_ticks(status)),
            styles::delivery_status_style(status),
        ));
    }
    spans
}

/// Builds styled spans for content line, highlighting media indicators in cyan.
fn build_content_line_spans(text: &str) -> Vec<Span<'static>> {
    if text.starts_with('[') {
        if let Some(end_bracket) = text.find(']') {
            let media_part = &text[..=end_bracket];
            let rest = text[end_bracket + 1..].trim_start();

            if rest.is_empty() {
                return vec![Span::styled(
                    media_part.to_owned(),
                    styles::message_media_style(),
                )];
            }
            return vec![
                Span::styled(media_part.to_owned(), styles::message_media_style()),
                Span::raw(" "),
                Span::styled(rest.to_owned(), styles::message_text_style()),
            ];
        }
    }

    vec![Span::styled(text.to_owned(), styles::message_text_style())]
}

fn attachment_label(attachment: &Attachment) -> String {
    let tag = match attachment.kind {
        AttachmentKind::Image => "Photo",
        AttachmentKind::Video => "Video",
        AttachmentKind::File => "File",
        AttachmentKind::Voice => "Voice",
    };

    let mut label = match (attachment.kind, attachment.duration_secs) {
        (AttachmentKind::Voice | AttachmentKind::Video, Some(secs)) => {
            format!("[{}] {}:{:02}", tag, secs / 60, secs % 60)
        }
        _ => format!("[{}] {}", tag, attachment.file_name()),
    };
    if let Some(size) = attachment.size_bytes {
        label.push_str(&format!(" ({})", format_size(size)));
    }
    label
}

fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    match bytes {
        b if b >= MB => format!("{:.1} MB", b as f64 / MB as f64),
        b if b >= KB => format!("{:.1} KB", b as f64 / KB as f64),
        b => format!("{} B", b),
    }
}

/// Collapses repeated emoji into "👍×2", keeping first-seen order.
fn reactions_label(reactions: &[String]) -> Option<String> {
    if reactions.is_empty() {
        return None;
    }

    let mut counts: Vec<(&str, usize)> = Vec::new();
    for emoji in reactions {
        match counts.iter_mut().find(|(seen, _)| *seen == emoji.as_str()) {
            Some((_, count)) => *count += 1,
            None => counts.push((emoji.as_str(), 1)),
        }
    }

    let parts: Vec<String> = counts
        .into_iter()
        .map(|(emoji, count)| match count {
            1 => emoji.to_owned(),
            n => format!("{}\u{00D7}{}", emoji, n),
        })
        .collect();
    Some(parts.join(" "))
}

fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn date_label(day: NaiveDate, today: NaiveDate) -> String {
    if day == today {
        "Today".to_owned()
    } else if today.pred_opt() == Some(day) {
        "Yesterday".to_owned()
    } else if day.year() == today.year() {
        day.format("%A, %B %-d").to_string()
    } else {
        day.format("%A, %B %-d, %Y").to_string()
    }
}

fn format_time<Tz: TimeZone>(tz: &Tz, timestamp_ms: i64) -> String {
    match tz.timestamp_millis_opt(timestamp_ms) {
        chrono::LocalResult::Single(dt) => dt.naive_local().format("%H:%M").to_string(),
        chrono::LocalResult::Ambiguous(dt, _) => dt.naive_local().format("%H:%M").to_string(),
        chrono::LocalResult::None => "??:??".to_owned(),
    }
}
