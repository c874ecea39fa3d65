// Candidate card widget: avatar, name, vote count, vote button.

use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::ballot::Candidate;
use crate::tui::ViewState;

/// Render one candidate's card into the given area.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState, candidate: Candidate) {
    let highlighted = state.is_highlighted(candidate);
    let border_color = if highlighted { Color::Green } else { Color::Gray };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));

    let mut lines = vec![
        Line::from(Span::styled(
            format!(" {} ", candidate.initials()),
            Style::default()
                .fg(Color::Black)
                .bg(Color::Gray)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            candidate.display_name(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(votes_label(state.snapshot.tally.get(candidate))),
    ];

    let pending = state.snapshot.pending.get(candidate);
    lines.push(if pending > 0 {
        Line::from(Span::styled(
            format!("{} awaiting wallet", pending),
            Style::default().fg(Color::Yellow),
        ))
    } else {
        Line::default()
    });

    lines.push(Line::from(Span::styled(
        format!("[ {} ]", candidate.button_label()),
        button_style(state.vote_enabled(), highlighted),
    )));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

/// Vote count label, e.g. "3 Votes".
pub fn votes_label(count: u64) -> String {
    format!("{} Votes", count)
}

/// Disabled buttons are dimmed; the last successful vote shows green.
pub fn button_style(enabled: bool, highlighted: bool) -> Style {
    if !enabled {
        Style::default().fg(Color::DarkGray)
    } else if highlighted {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Green)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
            .fg(Color::White)
            .bg(Color::Blue)
            .add_modifier(Modifier::BOLD)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
