//! Modal overlays: pickers, forms, small option dialogs, the chat info panel
//! and the call log.

use ratatui::{
    layout::{Constraint, Flex, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::domain::{
    call::{Call, CallStatus},
    chat::{ChatKind, MuteDuration},
    chat_info::ChatInfo,
    modal_state::{
        fields, ChatOption, ChatOptionItem, FormKind, FormState, ModalState, PickerState,
        REACTION_EMOJIS,
    },
    store::country_flag,
};

use super::styles;

const MODAL_WIDTH_PERCENT: u16 = 60;
/// Picker rows shown at once; the window follows the cursor.
const PICKER_ROWS: usize = 10;

pub fn render_modal(frame: &mut Frame<'_>, modal: &ModalState, now_ms: i64) {
    let (title, lines) = modal_content(modal, now_ms);
    // Two rows of border plus the footer hint.
    let height = (lines.len() + 3).min(u16::MAX as usize) as u16;
    let area = centered_rect(frame.area(), MODAL_WIDTH_PERCENT, height);

    let mut body = lines;
    body.push(Line::from(Span::styled(
        footer_hint(modal),
        styles::status_hint_style(),
    )));

    let paragraph = Paragraph::new(body).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(styles::modal_border_style()),
    );
    frame.render_widget(Clear, area);
    frame.render_widget(paragraph, area);
}

fn centered_rect(area: Rect, width_percent: u16, height: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height.min(area.height))])
        .flex(Flex::Center)
        .areas(area);
    let [cell] = Layout::horizontal([Constraint::Percentage(width_percent)])
        .flex(Flex::Center)
        .areas(row);
    cell
}

fn modal_content(modal: &ModalState, now_ms: i64) -> (String, Vec<Line<'static>>) {
    match modal {
        ModalState::Contacts(picker) => ("Contacts".to_owned(), picker_lines(picker)),
        ModalState::Forward {
            message_ids,
            picker,
            ..
        } => (
            format!("Forward {} message(s) to", message_ids.len()),
            picker_lines(picker),
        ),
        ModalState::Members { form, picker } => (
            format!("{}: add members", form.kind().title()),
            picker_lines(picker),
        ),
        ModalState::Reactions { selected, .. } => ("React".to_owned(), vec![reaction_line(*selected)]),
        ModalState::Mute { selected, .. } => ("Mute notifications".to_owned(), mute_lines(*selected)),
        ModalState::ConfirmDelete { title, kind, .. } => (
            kind.delete_action_label().to_owned(),
            confirm_lines(title, *kind),
        ),
        ModalState::Form(form) => (form.kind().title().to_owned(), form_lines(form)),
        ModalState::ChatInfo(info) => (info.name.clone(), info_lines(info)),
        ModalState::ChatOptions {
            items, selected, ..
        } => ("Chat options".to_owned(), option_lines(items, *selected)),
        ModalState::Calls { calls, selected } => (
            format!("Calls ({})", calls.len()),
            call_lines(calls, *selected, now_ms),
        ),
    }
}

fn footer_hint(modal: &ModalState) -> &'static str {
    match modal {
        ModalState::Contacts(_) => "type to filter | Up/Down: move | Enter: open chat | Esc: close",
        ModalState::Forward { .. } | ModalState::Members { .. } => {
            "type to filter | Up/Down: move | Tab: select | Enter: confirm | Esc: back"
        }
        ModalState::Reactions { .. } => "Left/Right: choose | Enter: toggle | Esc: close",
        ModalState::Mute { .. } => "Up/Down: choose | Enter: mute | Esc: close",
        ModalState::ConfirmDelete { .. } => "y: confirm | n: cancel",
        ModalState::Form(form) if form.kind().picks_members() => {
            "Tab: next field | Enter: choose members | Esc: cancel"
        }
        ModalState::Form(_) => "Tab: next field | Enter: save | Esc: cancel",
        ModalState::ChatInfo(info) if info.deletable => "m: mute/unmute | d: delete | Esc: close",
        ModalState::ChatInfo(_) => "m: mute/unmute | Esc: close",
        ModalState::ChatOptions { .. } => "Up/Down: choose | Enter: select | Esc: close",
        ModalState::Calls { .. } => "j/k: move | d: delete | D: delete all | Esc: close",
    }
}

fn picker_lines(picker: &PickerState) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(vec![
        Span::styled("Filter: ", styles::modal_label_style()),
        Span::styled(picker.filter().to_owned(), styles::input_text_style()),
    ])];

    let visible = picker.visible();
    if visible.is_empty() {
        lines.push(Line::from(Span::styled(
            "Nothing found",
            styles::input_placeholder_style(),
        )));
        return lines;
    }

    let start = picker.cursor().saturating_sub(PICKER_ROWS - 1);
    for (index, item) in visible.iter().enumerate().skip(start).take(PICKER_ROWS) {
        let mut spans = Vec::with_capacity(3);
        let mark = match (picker.is_multi(), picker.is_chosen(&item.id)) {
            (false, _) => "",
            (true, true) => "[x] ",
            (true, false) => "[ ] ",
        };
        spans.push(Span::raw(format!("{}{}", mark, item.label)));
        if let Some(detail) = &item.detail {
            spans.push(Span::styled(
                format!("  {}", detail),
                styles::chat_details_style(),
            ));
        }

        let line = Line::from(spans);
        lines.push(if index == picker.cursor() {
            line.style(styles::selection_highlight_style())
        } else {
            line
        });
    }

    lines
}

fn reaction_line(selected: usize) -> Line<'static> {
    let spans: Vec<Span<'static>> = REACTION_EMOJIS
        .iter()
        .enumerate()
        .map(|(index, emoji)| {
            let text = format!(" {} ", emoji);
            if index == selected {
                Span::styled(text, styles::selection_highlight_style())
            } else {
                Span::raw(text)
            }
        })
        .collect();
    Line::from(spans)
}

fn mute_lines(selected: usize) -> Vec<Line<'static>> {
    MuteDuration::ALL
        .iter()
        .enumerate()
        .map(|(index, duration)| {
            let line = Line::from(duration.label());
            if index == selected {
                line.style(styles::selection_highlight_style())
            } else {
                line
            }
        })
        .collect()
}

fn confirm_lines(title: &str, kind: ChatKind) -> Vec<Line<'static>> {
    let question = match kind {
        ChatKind::Private => format!("Delete the chat with {}?", title),
        ChatKind::Group => format!("Leave the group {}?", title),
        ChatKind::Channel => format!("Leave the channel {}?", title),
    };
    vec![
        Line::from(question),
        Line::from(Span::styled(
            "This removes the whole history.",
            styles::danger_style(),
        )),
    ]
}

fn info_lines(info: &ChatInfo) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for detail in [&info.subtitle, &info.description, &info.link].into_iter().flatten() {
        lines.push(Line::from(Span::styled(
            detail.clone(),
            styles::chat_details_style(),
        )));
    }

    let notifications = if info.muted { "Off" } else { "On" };
    lines.push(Line::from(vec![
        Span::styled("Notifications: ", styles::modal_label_style()),
        Span::raw(notifications),
    ]));
    let shared = info.shared;
    lines.push(Line::from(vec![
        Span::styled("Shared: ", styles::modal_label_style()),
        Span::raw(format!(
            "{} media \u{2022} {} files \u{2022} {} voice \u{2022} {} links",
            shared.media, shared.files, shared.voice, shared.links
        )),
    ]));

    if !info.members.is_empty() {
        lines.push(Line::from(Span::styled(
            format!("Members ({})", info.members.len()),
            styles::modal_label_style(),
        )));
        for member in info.members.iter().take(PICKER_ROWS) {
            lines.push(Line::from(vec![
                Span::raw(format!("  {}", member.name)),
                Span::styled(format!("  {}", member.status), styles::chat_details_style()),
            ]));
        }
        if info.members.len() > PICKER_ROWS {
            lines.push(Line::from(Span::styled(
                format!("  +{} more", info.members.len() - PICKER_ROWS),
                styles::chat_details_style(),
            )));
        }
    }

    if info.deletable {
        lines.push(Line::from(Span::styled(
            info.kind.delete_action_label(),
            styles::danger_style(),
        )));
    }
    lines
}

fn option_lines(items: &[ChatOptionItem], selected: usize) -> Vec<Line<'static>> {
    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let line = if item.option == ChatOption::Delete {
                Line::from(Span::styled(item.label, styles::danger_style()))
            } else {
                Line::from(item.label)
            };
            if index == selected {
                line.style(styles::selection_highlight_style())
            } else {
                line
            }
        })
        .collect()
}

fn call_lines(calls: &[Call], selected: usize, now_ms: i64) -> Vec<Line<'static>> {
    if calls.is_empty() {
        return vec![Line::from(Span::styled(
            "No calls yet",
            styles::input_placeholder_style(),
        ))];
    }

    let start = selected.saturating_sub(PICKER_ROWS - 1);
    calls
        .iter()
        .enumerate()
        .skip(start)
        .take(PICKER_ROWS)
        .map(|(index, call)| {
            let summary_style = if call.status == CallStatus::Missed {
                styles::danger_style()
            } else {
                styles::chat_details_style()
            };
            let line = Line::from(vec![
                Span::raw(call.user_name.clone()),
                Span::styled(format!("  {}", call.summary(now_ms)), summary_style),
            ]);
            if index == selected {
                line.style(styles::selection_highlight_style())
            } else {
                line
            }
        })
        .collect()
}

fn form_lines(form: &FormState) -> Vec<Line<'static>> {
    form.kind()
        .field_labels()
        .iter()
        .enumerate()
        .map(|(index, label)| {
            let focused = index == form.focused();
            let marker = if focused { "> " } else { "  " };
            let mut spans = vec![
                Span::styled(marker, styles::input_prompt_style()),
                Span::styled(format!("{}: ", label), styles::modal_label_style()),
            ];

            if form.kind() == FormKind::AddContact && index == fields::CONTACT_COUNTRY_CODE {
                let code = form.value(index);
                if let Some(flag) = country_flag(&code) {
                    spans.push(Span::raw(format!("{} ", flag)));
                }
                spans.push(Span::raw("+"));
            }

            let value = form.value(index);
            if value.is_empty() && !focused {
                spans.push(Span::styled("-", styles::input_placeholder_style()));
            } else {
                spans.push(Span::styled(value, styles::input_text_style()));
            }
            Line::from(spans)
        })
        .collect()
}
