// Receipts panel: transactions sent this session, newest first.

use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::ballot::VoteReceipt;

pub fn render(frame: &mut Frame, area: Rect, receipts: &[VoteReceipt]) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Receipts ");

    let lines: Vec<Line> = if receipts.is_empty() {
        vec![Line::from(Span::styled(
            "No votes cast yet",
            Style::default().fg(Color::DarkGray),
        ))]
    } else {
        receipts.iter().map(receipt_line).collect()
    };

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// "HH:MM:SS  Donald Trump  0x1234...abcd"
pub fn receipt_line(receipt: &VoteReceipt) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            receipt.cast_at.format("%H:%M:%S").to_string(),
            Style::default().fg(Color::Gray),
        ),
        Span::raw("  "),
        Span::raw(receipt.candidate.display_name()),
        Span::raw("  "),
        Span::styled(receipt.tx_hash.short(), Style::default().fg(Color::Cyan)),
    ])
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
