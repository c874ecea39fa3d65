// Screen layout: panel arrangement and sizing.
//
// +--------------------------------------------------+
// | Title Bar (1 row)                                 |
// +--------------------------------------------------+
// | Heading: title + subtitle (2 rows)                |
// +-------------------------+------------------------+
// | Candidate card (50%)     | Candidate card (50%)   |
// +-------------------------+------------------------+
// | Receipts (6 rows)                                 |
// +--------------------------------------------------+
// | Notice Bar (1 row)                                |
// | Help Bar (1 row)                                  |
// +--------------------------------------------------+

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Resolved screen areas.
#[derive(Debug, Clone)]
pub struct AppLayout {
    /// App name, chain, account and connect/logout hint.
    pub title_bar: Rect,
    pub heading: Rect,
    /// One card per candidate, in ballot order.
    pub cards: [Rect; 2],
    /// Votes sent this session.
    pub receipts: Rect,
    /// Outcome of the last connect or vote.
    pub notice_bar: Rect,
    /// Keyboard shortcut hints.
    pub help_bar: Rect,
}

pub fn build_layout(area: Rect) -> AppLayout {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // title bar
            Constraint::Length(2), // heading
            Constraint::Min(7),    // cards
            Constraint::Length(6), // receipts
            Constraint::Length(1), // notice bar
            Constraint::Length(1), // help bar
        ])
        .split(area);

    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(vertical[2]);

    AppLayout {
        title_bar: vertical[0],
        heading: vertical[1],
        cards: [cards[0], cards[1]],
        receipts: vertical[3],
        notice_bar: vertical[4],
        help_bar: vertical[5],
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
