// Terminal UI: layout, input handling, and widget rendering.
//
// The TUI owns a `ViewState` that mirrors the latest `AppSnapshot`. The app
// orchestrator pushes `UiUpdate` messages over an mpsc channel; the TUI
// applies them to `ViewState` and re-renders at ~30 fps.

pub mod input;
pub mod layout;
pub mod widgets;

use std::time::Duration;

use crossterm::event::{Event, EventStream};
use futures_util::StreamExt;
use ratatui::layout::Alignment;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use tokio::sync::mpsc;

use crate::ballot::Candidate;
use crate::config::Config;
use crate::protocol::{AppSnapshot, Notice, UiUpdate, UserCommand};

use layout::{build_layout, AppLayout};

// ---------------------------------------------------------------------------
// ViewState
// ---------------------------------------------------------------------------

/// TUI-local state for rendering.
pub struct ViewState {
    pub app_name: String,
    pub title: String,
    pub subtitle: String,
    pub chain_id: u64,
    /// Latest state pushed by the app orchestrator.
    pub snapshot: AppSnapshot,
    /// Outcome of the last connect or vote, if any.
    pub notice: Option<Notice>,
    /// Whether the quit confirmation dialog is showing.
    pub confirm_quit: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        ViewState {
            app_name: "Votex".to_string(),
            title: String::new(),
            subtitle: String::new(),
            chain_id: 0,
            snapshot: AppSnapshot::default(),
            notice: None,
            confirm_quit: false,
        }
    }
}

impl ViewState {
    pub fn from_config(config: &Config) -> Self {
        ViewState {
            app_name: config.app.name.clone(),
            title: config.app.title.clone(),
            subtitle: config.app.subtitle.clone(),
            chain_id: config.wallet.chain_id,
            ..ViewState::default()
        }
    }

    pub fn is_connected(&self) -> bool {
        self.snapshot.account.is_some()
    }

    /// Vote buttons only work with a connected account.
    pub fn vote_enabled(&self) -> bool {
        self.is_connected()
    }

    /// The button of the most recent successful vote is highlighted.
    pub fn is_highlighted(&self, candidate: Candidate) -> bool {
        self.snapshot.last_vote == Some(candidate)
    }
}

// ---------------------------------------------------------------------------
// UiUpdate processing
// ---------------------------------------------------------------------------

/// Apply a single UiUpdate to the ViewState.
pub fn apply_ui_update(state: &mut ViewState, update: UiUpdate) {
    match update {
        UiUpdate::StateSnapshot(snapshot) => {
            state.snapshot = *snapshot;
        }
        UiUpdate::Notice(notice) => {
            state.notice = Some(notice);
        }
    }
}

// ---------------------------------------------------------------------------
// Render frame
// ---------------------------------------------------------------------------

/// Render the complete screen.
pub fn render_frame(frame: &mut Frame, state: &ViewState) {
    let layout = build_layout(frame.area());

    widgets::title_bar::render(frame, layout.title_bar, state);
    render_heading(frame, &layout, state);
    for (candidate, area) in Candidate::ALL.into_iter().zip(layout.cards) {
        widgets::candidate_card::render(frame, area, state, candidate);
    }
    widgets::receipts::render(frame, layout.receipts, &state.snapshot.receipts);
    render_notice_bar(frame, &layout, state);
    render_help_bar(frame, &layout, state);

    if state.confirm_quit {
        widgets::quit_confirm::render(frame, frame.area());
    }
}

fn render_heading(frame: &mut Frame, layout: &AppLayout, state: &ViewState) {
    let lines = vec![
        Line::from(Span::styled(
            state.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            state.subtitle.clone(),
            Style::default().fg(Color::Gray),
        )),
    ];
    let paragraph = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(paragraph, layout.heading);
}

fn render_notice_bar(frame: &mut Frame, layout: &AppLayout, state: &ViewState) {
    let Some(notice) = &state.notice else {
        return;
    };
    let color = if notice.is_error() {
        Color::Red
    } else {
        Color::Green
    };
    let paragraph = Paragraph::new(Line::from(Span::styled(
        format!(" {}", notice.text()),
        Style::default().fg(color),
    )));
    frame.render_widget(paragraph, layout.notice_bar);
}

/// Key hints for the current connection state.
pub fn help_text(state: &ViewState) -> &'static str {
    if state.is_connected() {
        " 1/t:Vote Trump | 2/b:Vote Biden | l:Logout | Esc:Dismiss | q:Quit"
    } else {
        " c:Connect Wallet | Esc:Dismiss | q:Quit"
    }
}

fn render_help_bar(frame: &mut Frame, layout: &AppLayout, state: &ViewState) {
    let paragraph = Paragraph::new(Line::from(Span::styled(
        help_text(state),
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::DIM),
    )))
    .style(Style::default().bg(Color::DarkGray));
    frame.render_widget(paragraph, layout.help_bar);
}

// ---------------------------------------------------------------------------
// Main TUI loop
// ---------------------------------------------------------------------------

/// Run the TUI event loop.
///
/// Enters raw mode and the alternate screen, installs a panic hook that
/// restores the terminal, then selects over UI updates, keyboard input and
/// render ticks until the user quits or the app closes the update channel.
pub async fn run(
    mut view_state: ViewState,
    mut ui_rx: mpsc::Receiver<UiUpdate>,
    cmd_tx: mpsc::Sender<UserCommand>,
) -> anyhow::Result<()> {
    let mut terminal = ratatui::init();

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = ratatui::restore();
        original_hook(panic_info);
    }));

    let mut event_stream = EventStream::new();

    let mut render_tick = tokio::time::interval(Duration::from_millis(33));
    render_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    let result = loop {
        tokio::select! {
            update = ui_rx.recv() => {
                match update {
                    Some(ui_update) => apply_ui_update(&mut view_state, ui_update),
                    // App is shutting down
                    None => break Ok(()),
                }
            }

            maybe_event = event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key_event))) => {
                        if let Some(cmd) = input::handle_key(key_event, &mut view_state) {
                            let quit = cmd == UserCommand::Quit;
                            let _ = cmd_tx.send(cmd).await;
                            if quit {
                                break Ok(());
                            }
                        }
                    }
                    // Mouse and resize events; resize is picked up on the next draw
                    Some(Ok(_)) => {}
                    Some(Err(e)) => break Err(anyhow::Error::new(e).context("terminal input error")),
                    None => break Ok(()),
                }
            }

            _ = render_tick.tick() => {
                if let Err(e) = terminal.draw(|frame| render_frame(frame, &view_state)) {
                    break Err(anyhow::Error::new(e).context("failed to draw frame"));
                }
            }
        }
    };

    ratatui::restore();
    result
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
