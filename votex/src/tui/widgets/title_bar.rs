// Title bar widget: app name, chain, wallet connection state.

use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::tui::ViewState;

/// Render the title bar into the given area.
///
/// Layout: [app name] [chain id] ........ [account label] [action hint]
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let left = Line::from(vec![
        Span::styled(
            format!(" {} ", state.app_name),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("chain {}", state.chain_id),
            Style::default().fg(Color::Gray),
        ),
    ]);
    frame.render_widget(
        Paragraph::new(left).style(Style::default().bg(Color::Black)),
        area,
    );

    let (label, color) = account_label(state);
    let right = Line::from(vec![
        Span::styled(label, Style::default().fg(color)),
        Span::raw("  "),
        Span::styled(
            action_hint(state),
            Style::default()
                .fg(Color::Black)
                .bg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
    ]);
    frame.render_widget(Paragraph::new(right).alignment(Alignment::Right), area);
}

/// Connection text and its color.
pub fn account_label(state: &ViewState) -> (String, Color) {
    match &state.snapshot.account {
        Some(account) => (format!("Connected: {}", account.short()), Color::Green),
        None if state.snapshot.connecting => ("Connecting...".to_string(), Color::Yellow),
        None => ("Not connected".to_string(), Color::Red),
    }
}

pub fn action_hint(state: &ViewState) -> &'static str {
    if state.is_connected() {
        "[l] Logout"
    } else {
        "[c] Connect Wallet"
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
