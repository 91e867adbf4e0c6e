//! Single-line text editing shared by form text fields and list filters.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::shortcuts::{InputShortcuts, matches_shortcut};

/// Editable text with a character-indexed cursor.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TextInput {
    value: String,
    /// Cursor position in characters.
    cursor: usize,
}

impl TextInput {
    /// Start with `value` and the cursor at its end.
    pub fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        let cursor = value.chars().count();
        Self { value, cursor }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    #[cfg(test)]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Byte offset of the character at `idx`.
    fn byte_at(&self, idx: usize) -> usize {
        self.value
            .char_indices()
            .nth(idx)
            .map_or(self.value.len(), |(b, _)| b)
    }

    pub fn insert_char(&mut self, c: char) {
        let at = self.byte_at(self.cursor);
        self.value.insert(at, c);
        self.cursor += 1;
    }

    /// Remove the character before the cursor.
    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            let at = self.byte_at(self.cursor - 1);
            self.value.remove(at);
            self.cursor -= 1;
        }
    }

    /// Remove the character under the cursor.
    pub fn delete(&mut self) {
        if self.cursor < self.value.chars().count() {
            let at = self.byte_at(self.cursor);
            self.value.remove(at);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.value.chars().count() {
            self.cursor += 1;
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.value.chars().count();
    }

    pub fn clear_line(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    /// Apply an editing key. Returns false when the key is not an edit.
    pub fn handle_key(&mut self, k: &KeyEvent, sc: &InputShortcuts) -> bool {
        if matches_shortcut(k, &sc.backspace) {
            self.backspace();
        } else if matches_shortcut(k, &sc.delete) {
            self.delete();
        } else if matches_shortcut(k, &sc.left) {
            self.move_left();
        } else if matches_shortcut(k, &sc.right) {
            self.move_right();
        } else if matches_shortcut(k, &sc.home) {
            self.move_home();
        } else if matches_shortcut(k, &sc.end) {
            self.move_end();
        } else if matches_shortcut(k, &sc.clear_line) {
            self.clear_line();
        } else if let KeyCode::Char(c) = k.code {
            if k.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
                return false;
            }
            self.insert_char(c);
        } else {
            return false;
        }
        true
    }

    /// Visible slice of the value with a `|` at the cursor, scrolled to fit `width`.
    pub fn display(&self, width: usize) -> String {
        let chars: Vec<char> = self.value.chars().collect();
        let room = width.saturating_sub(1).max(1);
        let offset = self.cursor.saturating_sub(room);
        let end = (offset + room).min(chars.len());
        let before: String = chars[offset..self.cursor].iter().collect();
        let after: String = chars[self.cursor..end.max(self.cursor)].iter().collect();
        format!("{before}|{after}")
    }
}
