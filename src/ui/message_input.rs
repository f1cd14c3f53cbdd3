//! Composer and search bar rendering.

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::domain::{
    message_input_state::MessageInputState,
    search_state::MessageSearchState,
    shell_state::{ActivePane, ComposeMode},
};

use super::styles;

/// Placeholder text shown when the input is not focused and empty.
const PLACEHOLDER_TEXT: &str = "Press 'i' to type a message...";

/// Prompt symbol shown before the input text.
const PROMPT_SYMBOL: &str = "> ";
const SEARCH_PROMPT: &str = "Search: ";

/// Rows the composer needs: borders, text and an optional banner.
pub fn input_height(compose_mode: Option<&ComposeMode>) -> u16 {
    if compose_mode.is_some() {
        4
    } else {
        3
    }
}

/// Renders the message input field.
pub fn render_message_input(
    frame: &mut Frame<'_>,
    area: Rect,
    input_state: &MessageInputState,
    compose_mode: Option<&ComposeMode>,
    active_pane: ActivePane,
) {
    let is_focused = active_pane == ActivePane::MessageInput;

    let border_style = if is_focused {
        styles::active_panel_border_style()
    } else {
        styles::inactive_panel_border_style()
    };

    let mut lines = Vec::with_capacity(2);
    if let Some(banner) = compose_mode.map(build_banner_line) {
        lines.push(banner);
    }
    let text_row = lines.len() as u16;
    lines.push(build_input_line(input_state, is_focused));

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style),
    );

    frame.render_widget(paragraph, area);

    if is_focused {
        // Saturating arithmetic keeps very long inputs from overflowing.
        let cursor_x = area
            .x
            .saturating_add(1)
            .saturating_add(PROMPT_SYMBOL.len() as u16)
            .saturating_add(cursor_column(input_state));
        let cursor_y = area.y.saturating_add(1).saturating_add(text_row);
        frame.set_cursor_position((cursor_x, cursor_y));
    }
}

/// Renders the in-chat search bar in place of the composer.
pub fn render_search_bar(
    frame: &mut Frame<'_>,
    area: Rect,
    search: &MessageSearchState,
    active_pane: ActivePane,
) {
    let is_focused = active_pane == ActivePane::MessageSearch;
    let border_style = if is_focused {
        styles::active_panel_border_style()
    } else {
        styles::inactive_panel_border_style()
    };

    let paragraph = Paragraph::new(build_search_line(search)).block(
        Block::default()
            .title("Search")
            .borders(Borders::ALL)
            .border_style(border_style),
    );
    frame.render_widget(paragraph, area);

    if is_focused {
        let cursor_x = area
            .x
            .saturating_add(1)
            .saturating_add(SEARCH_PROMPT.len() as u16)
            .saturating_add(search.query().chars().count().min(u16::MAX as usize) as u16);
        frame.set_cursor_position((cursor_x, area.y.saturating_add(1)));
    }
}

/// Display width of the text left of the cursor.
fn cursor_column(input_state: &MessageInputState) -> u16 {
    let (before, _) = input_state.split_at_cursor();
    before.width().min(u16::MAX as usize) as u16
}

fn build_banner_line(mode: &ComposeMode) -> Line<'static> {
    let text = match mode {
        ComposeMode::Reply {
            preview,
            sender_name,
            ..
        } => format!("Replying to {sender_name}: {preview} (Esc to cancel)"),
        ComposeMode::Edit { .. } => "Editing message (Esc to cancel)".to_owned(),
    };
    Line::from(Span::styled(text, styles::compose_banner_style()))
}

/// Builds the line content for the input field.
fn build_input_line(input_state: &MessageInputState, is_focused: bool) -> Line<'static> {
    let prompt = Span::styled(PROMPT_SYMBOL, styles::input_prompt_style());

    if !is_focused && input_state.is_empty() {
        Line::from(vec![
            prompt,
            Span::styled(PLACEHOLDER_TEXT, styles::input_placeholder_style()),
        ])
    } else {
        Line::from(vec![
            prompt,
            Span::styled(input_state.text(), styles::input_text_style()),
        ])
    }
}

fn build_search_line(search: &MessageSearchState) -> Line<'static> {
    let mut spans = vec![
        Span::styled(SEARCH_PROMPT, styles::input_prompt_style()),
        Span::styled(search.query().to_owned(), styles::input_text_style()),
    ];

    let position = match search.position_label() {
        Some(label) => label,
        None if search.query().is_empty() => String::new(),
        None => "no results".to_owned(),
    };
    if !position.is_empty() {
        spans.push(Span::styled(
            format!("  [{position}]"),
            styles::input_placeholder_style(),
        ));
    }

    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ids::MessageId;

    fn line_text(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn build_input_line_shows_placeholder_when_empty_and_unfocused() {
        let state = MessageInputState::default();
        let text = line_text(&build_input_line(&state, false));

        assert!(text.contains(PLACEHOLDER_TEXT));
        assert!(text.starts_with(PROMPT_SYMBOL));
    }

    #[test]
    fn build_input_line_shows_empty_prompt_when_focused_and_empty() {
        let state = MessageInputState::default();
        let text = line_text(&build_input_line(&state, true));

        assert_eq!(text, PROMPT_SYMBOL);
    }

    #[test]
    fn build_input_line_shows_text_when_has_content() {
        let mut state = MessageInputState::default();
        state.set_text("Hi");

        let text = line_text(&build_input_line(&state, false));

        assert!(text.contains("Hi"));
        assert!(!text.contains(PLACEHOLDER_TEXT));
    }

    #[test]
    fn cursor_column_counts_display_width() {
        let mut state = MessageInputState::default();
        state.set_text("日本x");
        state.move_cursor_left();

        assert_eq!(cursor_column(&state), 4);
    }

    #[test]
    fn reply_banner_names_the_sender() {
        let mode = ComposeMode::Reply {
            message_id: MessageId::from("m1"),
            preview: "Hi there".to_owned(),
            sender_name: "Alice".to_owned(),
        };

        let text = line_text(&build_banner_line(&mode));

        assert_eq!(text, "Replying to Alice: Hi there (Esc to cancel)");
        assert_eq!(input_height(Some(&mode)), 4);
        assert_eq!(input_height(None), 3);
    }

    #[test]
    fn edit_banner_is_shown_for_edits() {
        let mode = ComposeMode::Edit {
            message_id: MessageId::from("m2"),
        };

        assert!(line_text(&build_banner_line(&mode)).starts_with("Editing"));
    }

    #[test]
    fn search_line_reports_position_or_no_results() {
        let mut search = MessageSearchState::default();
        assert_eq!(line_text(&build_search_line(&search)), SEARCH_PROMPT);

        search.push_char('h');
        assert!(line_text(&build_search_line(&search)).ends_with("[no results]"));

        search.set_results(vec![MessageId::from("m1"), MessageId::from("m2")]);
        assert!(line_text(&build_search_line(&search)).contains("[1/2]"));
    }
}
