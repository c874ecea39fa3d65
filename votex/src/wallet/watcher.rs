// Account-change notifications.
//
// A JSON-RPC wallet has no push channel over plain HTTP, so changes are
// detected by polling `eth_accounts` and diffing against the last answer.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use super::{Account, WalletProvider};
use crate::protocol::WalletEvent;

/// Remembers the last reported account set and the session epoch it was
/// observed under.
#[derive(Debug, Default)]
pub struct AccountWatcher {
    last_seen: Option<Vec<Account>>,
    epoch: u64,
}

impl AccountWatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a poll made under session `epoch`.
    ///
    /// The first observation, and the first one after the epoch moves, is
    /// the baseline and is not reported. Otherwise any difference from the
    /// previous observation is returned.
    pub fn observe(&mut self, epoch: u64, accounts: Vec<Account>) -> Option<Vec<Account>> {
        if epoch != self.epoch {
            debug!("Session epoch {} -> {}, re-baselining", self.epoch, epoch);
            self.epoch = epoch;
            self.last_seen = None;
        }
        match &self.last_seen {
            None => {
                debug!("Account watcher baseline: {} account(s)", accounts.len());
                self.last_seen = Some(accounts);
                None
            }
            Some(previous) if *previous == accounts => None,
            Some(_) => {
                self.last_seen = Some(accounts.clone());
                Some(accounts)
            }
        }
    }
}

/// Poll the provider every `interval`, forwarding changes as
/// `WalletEvent::AccountsChanged` tagged with the session epoch read before
/// the poll. Returns once the receiver is dropped.
pub async fn run(
    provider: Arc<dyn WalletProvider>,
    interval: Duration,
    session_rx: watch::Receiver<u64>,
    tx: mpsc::Sender<WalletEvent>,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut watcher = AccountWatcher::new();

    info!("Account watcher started ({:?} interval)", interval);
    loop {
        ticker.tick().await;
        if tx.is_closed() {
            break;
        }

        let epoch = *session_rx.borrow();
        let accounts = match provider.accounts().await {
            Ok(accounts) => accounts,
            Err(e) => {
                debug!("eth_accounts poll failed: {}", e);
                continue;
            }
        };

        if let Some(changed) = watcher.observe(epoch, accounts) {
            info!("Wallet accounts changed: {} account(s)", changed.len());
            let event = WalletEvent::AccountsChanged {
                accounts: changed,
                epoch,
            };
            if tx.send(event).await.is_err() {
                break;
            }
        }
    }
    info!("Account watcher stopped");
}
