// Vote submission and the in-memory tally it updates.
//
// Nothing here is persisted: the tally, last-vote marker and receipts exist
// for the lifetime of the process only.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use super::candidate::{encode_vote_data, Candidate};
use crate::wallet::session::SessionManager;
use crate::wallet::{Account, ProviderError, TransactionRequest, TxHash, WalletProvider};

/// Transaction value for a vote: nothing is transferred.
pub const ZERO_VALUE: &str = "0x0";

/// Receipts kept for display, newest first.
pub const MAX_RECEIPTS: usize = 50;

// ---------------------------------------------------------------------------
// Tally
// ---------------------------------------------------------------------------

/// Vote count per candidate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Tally {
    pub trump: u64,
    pub biden: u64,
}

impl Tally {
    pub fn get(&self, candidate: Candidate) -> u64 {
        match candidate {
            Candidate::Trump => self.trump,
            Candidate::Biden => self.biden,
        }
    }

    pub fn total(&self) -> u64 {
        self.trump + self.biden
    }

    fn increment(&mut self, candidate: Candidate) {
        match candidate {
            Candidate::Trump => self.trump += 1,
            Candidate::Biden => self.biden += 1,
        }
    }
}

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// A vote the wallet accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VoteReceipt {
    pub candidate: Candidate,
    pub tx_hash: TxHash,
    pub cast_at: DateTime<Utc>,
}

/// Result of one submission, handed back to the caller to surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoteOutcome {
    /// The wallet returned a transaction hash; the tally was incremented.
    Cast(VoteReceipt),
    /// No connected account; nothing was sent.
    Skipped,
    /// The wallet or transport failed; nothing changed.
    Failed {
        candidate: Candidate,
        reason: String,
    },
}

/// The marker transaction for a vote: sent from the account to itself,
/// zero value, with the vote message as payload.
pub fn build_vote_request(account: &Account, candidate: Candidate) -> TransactionRequest {
    TransactionRequest {
        to: account.clone(),
        from: account.clone(),
        value: ZERO_VALUE.to_string(),
        data: encode_vote_data(candidate),
    }
}

// ---------------------------------------------------------------------------
// Ballot
// ---------------------------------------------------------------------------

/// Tally, last successful vote and recent receipts.
#[derive(Debug, Default)]
pub struct Ballot {
    tally: Tally,
    last_vote: Option<Candidate>,
    receipts: VecDeque<VoteReceipt>,
}

impl Ballot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tally(&self) -> Tally {
        self.tally
    }

    /// Candidate of the most recent successful vote.
    pub fn last_vote(&self) -> Option<Candidate> {
        self.last_vote
    }

    /// Receipts, newest first.
    pub fn receipts(&self) -> impl Iterator<Item = &VoteReceipt> {
        self.receipts.iter()
    }

    /// Build the transaction for a vote, or `None` when no account is
    /// connected.
    pub fn prepare(
        &self,
        session: &SessionManager,
        candidate: Candidate,
    ) -> Option<TransactionRequest> {
        session
            .account()
            .map(|account| build_vote_request(account, candidate))
    }

    /// Apply the wallet's answer to a submission. Only a success touches
    /// the tally, the marker and the receipts.
    pub fn settle(
        &mut self,
        candidate: Candidate,
        result: Result<TxHash, ProviderError>,
    ) -> VoteOutcome {
        match result {
            Ok(tx_hash) => {
                self.tally.increment(candidate);
                self.last_vote = Some(candidate);
                let receipt = VoteReceipt {
                    candidate,
                    tx_hash,
                    cast_at: Utc::now(),
                };
                self.receipts.push_front(receipt.clone());
                self.receipts.truncate(MAX_RECEIPTS);
                info!(
                    "Vote for {} recorded (tx {}), tally now {}/{}",
                    candidate, receipt.tx_hash, self.tally.trump, self.tally.biden
                );
                VoteOutcome::Cast(receipt)
            }
            Err(e) => {
                warn!("Transaction failed for vote {}: {}", candidate, e);
                VoteOutcome::Failed {
                    candidate,
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Submit a vote and wait for the wallet.
    ///
    /// Without a connected account this returns `Skipped` without calling the
    /// provider. Concurrent submissions are neither queued nor de-duplicated.
    pub async fn submit_vote(
        &mut self,
        session: &SessionManager,
        provider: &dyn WalletProvider,
        candidate: Candidate,
    ) -> VoteOutcome {
        let Some(request) = self.prepare(session, candidate) else {
            info!("Vote for {} ignored: no wallet connected", candidate);
            return VoteOutcome::Skipped;
        };
        let result = provider.send_transaction(&request).await;
        self.settle(candidate, result)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
