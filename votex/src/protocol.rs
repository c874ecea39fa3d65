// Messages exchanged between the TUI, the app orchestrator and wallet tasks.

use crate::ballot::{Candidate, Tally, VoteReceipt};
use crate::wallet::{Account, ProviderError, TxHash};

// ---------------------------------------------------------------------------
// TUI -> app
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserCommand {
    Connect,
    Disconnect,
    Vote(Candidate),
    Quit,
}

// ---------------------------------------------------------------------------
// Wallet tasks -> app
// ---------------------------------------------------------------------------

/// Results of provider calls made off the event loop, plus account-change
/// notifications from the watcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalletEvent {
    /// The wallet now exposes this account set (possibly empty). `epoch` is
    /// the session epoch the watcher polled under; reports from an older
    /// epoch are stale.
    AccountsChanged { accounts: Vec<Account>, epoch: u64 },
    /// An `eth_chainId` call finished.
    ChainChecked(Result<u64, ProviderError>),
    /// An `eth_requestAccounts` call finished.
    ConnectSettled(Result<Vec<Account>, ProviderError>),
    /// An `eth_sendTransaction` call for a vote finished.
    VoteSettled {
        candidate: Candidate,
        result: Result<TxHash, ProviderError>,
    },
}

// ---------------------------------------------------------------------------
// App -> TUI
// ---------------------------------------------------------------------------

/// Submissions awaiting the wallet, per candidate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PendingVotes {
    pub trump: usize,
    pub biden: usize,
}

impl PendingVotes {
    pub fn get(&self, candidate: Candidate) -> usize {
        match candidate {
            Candidate::Trump => self.trump,
            Candidate::Biden => self.biden,
        }
    }

    pub fn total(&self) -> usize {
        self.trump + self.biden
    }

    fn slot(&mut self, candidate: Candidate) -> &mut usize {
        match candidate {
            Candidate::Trump => &mut self.trump,
            Candidate::Biden => &mut self.biden,
        }
    }

    pub fn begin(&mut self, candidate: Candidate) {
        *self.slot(candidate) += 1;
    }

    pub fn finish(&mut self, candidate: Candidate) {
        let slot = self.slot(candidate);
        *slot = slot.saturating_sub(1);
    }
}

/// Everything the TUI needs to draw, captured in one piece.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppSnapshot {
    pub account: Option<Account>,
    pub connecting: bool,
    pub tally: Tally,
    pub last_vote: Option<Candidate>,
    pub pending: PendingVotes,
    /// Newest first.
    pub receipts: Vec<VoteReceipt>,
}

/// One-line message for the notice bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Info(String),
    Error(String),
}

impl Notice {
    pub fn text(&self) -> &str {
        match self {
            Notice::Info(text) | Notice::Error(text) => text,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Notice::Error(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum UiUpdate {
    StateSnapshot(Box<AppSnapshot>),
    Notice(Notice),
}
