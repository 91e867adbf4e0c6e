//! Navigable, filterable row collections with identity-preserving reloads.

use crossterm::event::KeyEvent;

use crate::{
    input::TextInput,
    shortcuts::{Shortcuts, matches_shortcut},
};

/// A row that can be found again after its collection is replaced.
pub trait Identify {
    /// Stable key, usually the backend id.
    fn identity(&self) -> &str;
    /// Text the free-text filter matches against.
    fn filter_text(&self) -> String;
}

/// Filter bar state.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Filter {
    #[default]
    Off,
    /// Operator is typing; every key goes to the filter.
    Editing(TextInput),
    /// Filter applied, normal navigation resumed.
    Applied(String),
}

/// Rows plus a cursor over the currently visible (filtered) rows.
#[derive(Clone, Debug)]
pub struct SelectList<T> {
    items: Vec<T>,
    cursor: usize,
    filter: Filter,
    /// Rows that fit on screen; used to page the viewport.
    height: usize,
}

impl<T> Default for SelectList<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            cursor: 0,
            filter: Filter::Off,
            height: 10,
        }
    }
}

impl<T: Identify> SelectList<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items,
            ..Self::default()
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn filter(&self) -> &Filter {
        &self.filter
    }

    /// Filter query in effect, while typing or applied.
    fn query(&self) -> Option<String> {
        match &self.filter {
            Filter::Off => None,
            Filter::Editing(t) => Some(t.value().to_lowercase()),
            Filter::Applied(q) => Some(q.to_lowercase()),
        }
        .filter(|q| !q.is_empty())
    }

    /// Rows that pass the current filter, in original order.
    pub fn visible(&self) -> Vec<&T> {
        match self.query() {
            None => self.items.iter().collect(),
            Some(q) => self
                .items
                .iter()
                .filter(|r| r.filter_text().to_lowercase().contains(&q))
                .collect(),
        }
    }

    /// Cursor index into [`visible`](Self::visible).
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn selected(&self) -> Option<&T> {
        self.visible().get(self.cursor).copied()
    }

    /// Move by `delta` rows, clamped to the visible range.
    pub fn move_cursor(&mut self, delta: isize) {
        let len = self.visible().len();
        if len == 0 {
            self.cursor = 0;
            return;
        }
        let next = self.cursor as isize + delta;
        self.cursor = next.clamp(0, len as isize - 1) as usize;
    }

    /// Replace the rows, keeping the cursor on the same identity if it survives.
    pub fn reload(&mut self, items: Vec<T>) {
        let previous = self.selected().map(|r| r.identity().to_string());
        self.items = items;
        self.cursor = 0;
        if let Some(id) = previous {
            if let Some(pos) = self.visible().iter().position(|r| r.identity() == id) {
                self.cursor = pos;
            }
        }
    }

    /// Point the cursor at the row with `id`, if visible.
    pub fn select_identity(&mut self, id: &str) -> bool {
        match self.visible().iter().position(|r| r.identity() == id) {
            Some(pos) => {
                self.cursor = pos;
                true
            }
            None => false,
        }
    }

    pub fn set_height(&mut self, height: usize) {
        self.height = height.max(1);
    }

    /// First row index of the viewport so the cursor stays on screen.
    pub fn offset(&self) -> usize {
        self.cursor.saturating_sub(self.height - 1)
    }

    pub fn is_filtering(&self) -> bool {
        matches!(self.filter, Filter::Editing(_))
    }

    pub fn has_applied_filter(&self) -> bool {
        matches!(self.filter, Filter::Applied(_))
    }

    pub fn start_filter(&mut self) {
        let seed = match &self.filter {
            Filter::Applied(q) => q.clone(),
            _ => String::new(),
        };
        self.filter = Filter::Editing(TextInput::new(seed));
        self.cursor = 0;
    }

    pub fn clear_filter(&mut self) {
        let previous = self.selected().map(|r| r.identity().to_string());
        self.filter = Filter::Off;
        self.cursor = 0;
        if let Some(id) = previous {
            self.select_identity(&id);
        }
    }

    /// Route a key while the filter bar is being edited.
    pub fn handle_filter_key(&mut self, k: &KeyEvent, sc: &Shortcuts) {
        let Filter::Editing(input) = &mut self.filter else {
            return;
        };
        if matches_shortcut(k, &sc.filter.apply) {
            let q = input.value().trim().to_string();
            self.filter = if q.is_empty() {
                Filter::Off
            } else {
                Filter::Applied(q)
            };
        } else if matches_shortcut(k, &sc.filter.cancel) {
            self.filter = Filter::Off;
            self.cursor = 0;
        } else if input.handle_key(k, &sc.input) {
            self.cursor = 0;
        }
    }
}

/// Row-type-erased navigation, so key routing can drive whichever list
/// the active screen shows.
pub trait Navigable {
    fn move_cursor(&mut self, delta: isize);
    fn is_filtering(&self) -> bool;
    fn has_applied_filter(&self) -> bool;
    fn start_filter(&mut self);
    fn clear_filter(&mut self);
    fn handle_filter_key(&mut self, k: &KeyEvent, sc: &Shortcuts);
}

impl<T: Identify> Navigable for SelectList<T> {
    fn move_cursor(&mut self, delta: isize) {
        SelectList::move_cursor(self, delta)
    }
    fn is_filtering(&self) -> bool {
        SelectList::is_filtering(self)
    }
    fn has_applied_filter(&self) -> bool {
        SelectList::has_applied_filter(self)
    }
    fn start_filter(&mut self) {
        SelectList::start_filter(self)
    }
    fn clear_filter(&mut self) {
        SelectList::clear_filter(self)
    }
    fn handle_filter_key(&mut self, k: &KeyEvent, sc: &Shortcuts) {
        SelectList::handle_filter_key(self, k, sc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};

    #[derive(Clone, Debug, PartialEq)]
    struct Row(&'static str);

    impl Identify for Row {
        fn identity(&self) -> &str {
            self.0
        }
        fn filter_text(&self) -> String {
            format!("row {}", self.0)
        }
    }

    fn rows(ids: &[&'static str]) -> Vec<Row> {
        ids.iter().map(|s| Row(*s)).collect()
    }

    fn key(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::empty())
    }

    #[test]
    fn reload_keeps_selected_identity() {
        let mut l = SelectList::new(rows(&["A", "B", "C"]));
        l.move_cursor(1);
        assert_eq!(l.selected(), Some(&Row("B")));

        l.reload(rows(&["A", "B", "C", "D"]));
        assert_eq!(l.selected(), Some(&Row("B")));

        l.reload(rows(&["D", "A", "B"]));
        assert_eq!(l.cursor(), 2);
        assert_eq!(l.selected(), Some(&Row("B")));
    }

    #[test]
    fn reload_without_selected_identity_resets_to_first_row() {
        let mut l = SelectList::new(rows(&["A", "B", "C"]));
        l.move_cursor(1);
        l.reload(rows(&["A", "C", "D"]));
        assert_eq!(l.cursor(), 0);
        assert_eq!(l.selected(), Some(&Row("A")));
    }

    #[test]
    fn cursor_is_clamped() {
        let mut l = SelectList::new(rows(&["A", "B"]));
        l.move_cursor(-3);
        assert_eq!(l.cursor(), 0);
        l.move_cursor(10);
        assert_eq!(l.cursor(), 1);

        let mut empty: SelectList<Row> = SelectList::default();
        empty.move_cursor(1);
        assert_eq!(empty.selected(), None);
    }

    #[test]
    fn filter_captures_keys_until_applied() {
        let sc = Shortcuts::default();
        let mut l = SelectList::new(rows(&["A", "B", "C"]));
        l.start_filter();
        assert!(l.is_filtering());

        l.handle_filter_key(&key('c'), &sc);
        assert_eq!(l.visible(), vec![&Row("C")]);

        l.handle_filter_key(&KeyEvent::new(KeyCode::Enter, KeyModifiers::empty()), &sc);
        assert!(!l.is_filtering());
        assert!(l.has_applied_filter());
        assert_eq!(l.selected(), Some(&Row("C")));

        l.clear_filter();
        assert_eq!(l.visible().len(), 3);
        assert_eq!(l.selected(), Some(&Row("C")));
    }

    #[test]
    fn escape_discards_filter() {
        let sc = Shortcuts::default();
        let mut l = SelectList::new(rows(&["A", "B"]));
        l.start_filter();
        l.handle_filter_key(&key('b'), &sc);
        l.handle_filter_key(&KeyEvent::new(KeyCode::Esc, KeyModifiers::empty()), &sc);
        assert_eq!(l.filter(), &Filter::Off);
        assert_eq!(l.visible().len(), 2);
    }

    #[test]
    fn viewport_follows_cursor() {
        let mut l = SelectList::new(rows(&["A", "B", "C", "D", "E"]));
        l.set_height(2);
        l.move_cursor(3);
        assert_eq!(l.offset(), 2);
    }
}
