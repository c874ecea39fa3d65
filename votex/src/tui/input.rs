// Keyboard input handling and command dispatch.
//
// Translates crossterm key events into UserCommand messages for the app
// orchestrator, or into local ViewState changes (quit dialog, dismissing the
// notice).

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::ViewState;
use crate::ballot::Candidate;
use crate::protocol::UserCommand;

/// Handle a keyboard event.
///
/// Returns the command to forward to the app orchestrator, or `None` when
/// the key was handled locally or is not available in the current state.
pub fn handle_key(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    // crossterm reports Release/Repeat on some platforms; act on Press only.
    if key_event.kind != KeyEventKind::Press {
        return None;
    }

    if key_event.modifiers.contains(KeyModifiers::CONTROL) && key_event.code == KeyCode::Char('c')
    {
        return Some(UserCommand::Quit);
    }

    if view_state.confirm_quit {
        return handle_confirm_quit(key_event, view_state);
    }

    match key_event.code {
        KeyCode::Char('c') if !view_state.is_connected() => Some(UserCommand::Connect),
        KeyCode::Char('l') | KeyCode::Char('d') if view_state.is_connected() => {
            Some(UserCommand::Disconnect)
        }
        KeyCode::Char('1') | KeyCode::Char('t') => vote(view_state, Candidate::Trump),
        KeyCode::Char('2') | KeyCode::Char('b') => vote(view_state, Candidate::Biden),
        KeyCode::Esc => {
            view_state.notice = None;
            None
        }
        KeyCode::Char('q') => {
            view_state.confirm_quit = true;
            None
        }
        _ => None,
    }
}

/// Vote keys are inert while the buttons are disabled.
fn vote(view_state: &ViewState, candidate: Candidate) -> Option<UserCommand> {
    view_state
        .vote_enabled()
        .then_some(UserCommand::Vote(candidate))
}

/// `y`/`q` confirm, `n`/Esc cancel, everything else is swallowed.
fn handle_confirm_quit(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Char('q') | KeyCode::Char('Q') => {
            Some(UserCommand::Quit)
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            view_state.confirm_quit = false;
            None
        }
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
