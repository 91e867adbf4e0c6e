//! Screen area helpers.

use ratatui::prelude::*;

/// The four stacked regions of every screen.
pub struct MainLayout {
    /// Breadcrumb plus the top hint.
    pub header: Rect,
    pub body: Rect,
    pub help_bar: Rect,
    pub status_bar: Rect,
}

pub fn create_main_layout(area: Rect) -> MainLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // breadcrumb + hint
            Constraint::Min(1),
            Constraint::Length(3),
            Constraint::Length(3),
        ])
        .split(area);

    MainLayout {
        header: chunks[0],
        body: chunks[1],
        help_bar: chunks[2],
        status_bar: chunks[3],
    }
}

/// Rows available to a bordered list with a header line in `body`.
pub fn list_height(body: Rect) -> usize {
    body.height.saturating_sub(3).max(1) as usize
}

/// Body area for a given terminal size, used to size lists and forms
/// without waiting for the next draw.
pub fn body_for(width: u16, height: u16) -> Rect {
    create_main_layout(Rect::new(0, 0, width, height)).body
}
