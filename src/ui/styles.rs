//! Style definitions for the UI components.

use ratatui::style::{Color, Modifier, Style};

use crate::domain::message::DeliveryStatus;

// =============================================================================
// Panel styles
// =============================================================================

pub fn active_panel_border_style() -> Style {
    Style::default().fg(Color::Cyan)
}

pub fn inactive_panel_border_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

pub fn selection_highlight_style() -> Style {
    Style::default().add_modifier(Modifier::REVERSED | Modifier::BOLD)
}

// =============================================================================
// Chat list styles
// =============================================================================

/// Style for chat name (bold, bright).
pub fn chat_name_style() -> Style {
    Style::default()
        .fg(Color::White)
        .add_modifier(Modifier::BOLD)
}

/// Style for message preview text (dimmed).
pub fn chat_preview_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

/// "is typing..." previews stand out from regular ones.
pub fn typing_style() -> Style {
    Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::ITALIC)
}

/// Style for unread count badge (green).
pub fn unread_count_style() -> Style {
    Style::default().fg(Color::Green)
}

/// Muted chats keep their badge but lose the color.
pub fn muted_unread_count_style() -> Style {
    Style::default().fg(Color::Gray)
}

pub fn muted_marker_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

/// Style for section headers like "-- Pinned --".
pub fn section_header_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

/// Style for timestamp column.
pub fn timestamp_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

/// Style for separator between timestamp and content.
pub fn separator_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

pub fn online_indicator_style() -> Style {
    Style::default().fg(Color::Green)
}

pub fn group_sender_style() -> Style {
    Style::default().fg(Color::Yellow)
}

// =============================================================================
// Message list styles
// =============================================================================

/// Style for message sender name (white, bold).
pub fn message_sender_style() -> Style {
    Style::default()
        .fg(Color::White)
        .add_modifier(Modifier::BOLD)
}

pub fn own_sender_style() -> Style {
    Style::default()
        .fg(Color::LightBlue)
        .add_modifier(Modifier::BOLD)
}

pub fn avatar_style() -> Style {
    Style::default().fg(Color::Black).bg(Color::Yellow)
}

/// Style for message time in the messages panel.
pub fn message_time_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

/// Style for message text content.
pub fn message_text_style() -> Style {
    Style::default().fg(Color::White)
}

/// Style for media type indicators like [Photo], [Voice].
pub fn message_media_style() -> Style {
    Style::default().fg(Color::Cyan)
}

/// Style for date separator line.
pub fn date_separator_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

pub fn system_message_style() -> Style {
    Style::default()
        .fg(Color::DarkGray)
        .add_modifier(Modifier::ITALIC)
}

pub fn reply_preview_style() -> Style {
    Style::default().fg(Color::Magenta)
}

pub fn reactions_style() -> Style {
    Style::default().fg(Color::Yellow)
}

/// "edited" and pin markers after the message time.
pub fn message_marker_style() -> Style {
    Style::default()
        .fg(Color::DarkGray)
        .add_modifier(Modifier::ITALIC)
}

pub fn marked_message_style() -> Style {
    Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD)
}

/// Ticks turn blue once the message has been read.
pub fn delivery_status_style(status: DeliveryStatus) -> Style {
    match status {
        DeliveryStatus::Sending => Style::default().fg(Color::DarkGray),
        DeliveryStatus::Sent | DeliveryStatus::Delivered => Style::default().fg(Color::Gray),
        DeliveryStatus::Read => Style::default().fg(Color::LightBlue),
    }
}

pub fn pinned_banner_style() -> Style {
    Style::default().fg(Color::Yellow)
}

pub fn chat_details_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

// =============================================================================
// Input styles
// =============================================================================

pub fn input_prompt_style() -> Style {
    Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
}

pub fn input_text_style() -> Style {
    Style::default().fg(Color::White)
}

pub fn input_placeholder_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

/// "Replying to" / "Editing" banner above the composer text.
pub fn compose_banner_style() -> Style {
    Style::default().fg(Color::Magenta)
}

// =============================================================================
// Status bar and modal styles
// =============================================================================

pub fn status_hint_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

pub fn notice_style() -> Style {
    Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD)
}

pub fn modal_border_style() -> Style {
    Style::default().fg(Color::Yellow)
}

pub fn modal_label_style() -> Style {
    Style::default().fg(Color::Gray)
}

pub fn danger_style() -> Style {
    Style::default()
        .fg(Color::Red)
        .add_modifier(Modifier::BOLD)
}
