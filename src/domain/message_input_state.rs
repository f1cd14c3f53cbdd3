//! Single-line text buffer with a character cursor.
//!
//! Backs the composer as well as every text field of the modal forms.

/// Longest text a buffer accepts, in characters.
pub const MAX_INPUT_LENGTH: usize = 4096;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MessageInputState {
    chars: Vec<char>,
    cursor: usize,
}

impl MessageInputState {
    pub fn text(&self) -> String {
        self.chars.iter().collect()
    }

    pub fn cursor_position(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Text left of the cursor and from the cursor on, for cursor rendering.
    pub fn split_at_cursor(&self) -> (String, String) {
        let (before, after) = self.chars.split_at(self.cursor);
        (before.iter().collect(), after.iter().collect())
    }

    /// Returns false once the buffer is full.
    pub fn insert_char(&mut self, ch: char) -> bool {
        if self.chars.len() >= MAX_INPUT_LENGTH {
            return false;
        }
        self.chars.insert(self.cursor, ch);
        self.cursor += 1;
        true
    }

    pub fn delete_char_before(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        self.chars.remove(self.cursor);
    }

    pub fn delete_char_at(&mut self) {
        if self.cursor < self.chars.len() {
            self.chars.remove(self.cursor);
        }
    }

    pub fn move_cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_cursor_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.chars.len());
    }

    pub fn move_cursor_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_cursor_end(&mut self) {
        self.cursor = self.chars.len();
    }

    /// Replaces the content (truncated to the length cap), cursor at the end.
    pub fn set_text(&mut self, text: &str) {
        self.chars = text.chars().take(MAX_INPUT_LENGTH).collect();
        self.cursor = self.chars.len();
    }

    pub fn clear(&mut self) {
        self.chars.clear();
        self.cursor = 0;
    }
}
