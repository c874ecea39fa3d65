// Application state and orchestration logic.
//
// The event loop owns the session, the ballot and the pending counters. It
// reacts to user commands from the TUI and to wallet events (account
// changes from the watcher, settled provider calls from spawned tasks), and
// pushes snapshots back to the TUI. Provider calls never run on the loop
// itself, so a wallet that is slow to answer does not freeze the UI.

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use crate::ballot::{Ballot, Candidate, VoteOutcome};
use crate::config::Config;
use crate::protocol::{AppSnapshot, Notice, PendingVotes, UiUpdate, UserCommand, WalletEvent};
use crate::wallet::session::SessionManager;
use crate::wallet::{Account, WalletProvider};

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

/// The complete application state.
pub struct AppState {
    pub config: Config,
    pub session: SessionManager,
    pub ballot: Ballot,
    /// Vote submissions awaiting the wallet.
    pub pending: PendingVotes,
    /// An `eth_requestAccounts` call is in flight.
    pub connecting: bool,
    pub provider: Arc<dyn WalletProvider>,
    /// Spawned provider tasks report back through clones of this sender.
    pub wallet_tx: mpsc::Sender<WalletEvent>,
    /// Bumped whenever the app itself changes the session (connect, logout).
    /// The account watcher re-baselines on every bump.
    session_epoch: watch::Sender<u64>,
}

impl AppState {
    pub fn new(
        config: Config,
        provider: Arc<dyn WalletProvider>,
        wallet_tx: mpsc::Sender<WalletEvent>,
    ) -> Self {
        AppState {
            config,
            session: SessionManager::new(),
            ballot: Ballot::new(),
            pending: PendingVotes::default(),
            connecting: false,
            provider,
            wallet_tx,
            session_epoch: watch::Sender::new(0),
        }
    }

    /// Receiver for the account watcher.
    pub fn subscribe_session(&self) -> watch::Receiver<u64> {
        self.session_epoch.subscribe()
    }

    pub fn session_epoch(&self) -> u64 {
        *self.session_epoch.borrow()
    }

    fn bump_session_epoch(&self) {
        self.session_epoch.send_modify(|epoch| *epoch += 1);
    }

    /// Forget the connected account. Returns the account that was dropped.
    pub fn disconnect(&mut self) -> Option<Account> {
        let previous = self.session.disconnect();
        if previous.is_some() {
            self.bump_session_epoch();
        }
        previous
    }

    /// Ask the wallet which chain it is on, on a spawned task.
    pub fn start_chain_check(&self) {
        let provider = Arc::clone(&self.provider);
        let tx = self.wallet_tx.clone();
        tokio::spawn(async move {
            let result = provider.chain_id().await;
            let _ = tx.send(WalletEvent::ChainChecked(result)).await;
        });
    }

    pub fn build_snapshot(&self) -> AppSnapshot {
        AppSnapshot {
            account: self.session.account().cloned(),
            connecting: self.connecting,
            tally: self.ballot.tally(),
            last_vote: self.ballot.last_vote(),
            pending: self.pending,
            receipts: self.ballot.receipts().cloned().collect(),
        }
    }

    /// Ask the wallet for account access on a spawned task.
    ///
    /// Returns `false` when a request is already outstanding.
    pub fn start_connect(&mut self) -> bool {
        if self.connecting {
            debug!("Connect already in flight, ignoring");
            return false;
        }
        self.connecting = true;

        let provider = Arc::clone(&self.provider);
        let tx = self.wallet_tx.clone();
        tokio::spawn(async move {
            let result = provider.request_accounts().await;
            let _ = tx.send(WalletEvent::ConnectSettled(result)).await;
        });
        info!("Requested wallet account access");
        true
    }

    /// Submit a vote on a spawned task.
    ///
    /// Without a connected account nothing is sent and `false` is returned.
    /// Overlapping submissions are allowed; each settles on its own.
    pub fn start_vote(&mut self, candidate: Candidate) -> bool {
        let Some(request) = self.ballot.prepare(&self.session, candidate) else {
            info!("Vote for {} ignored: no wallet connected", candidate);
            return false;
        };
        self.pending.begin(candidate);

        let provider = Arc::clone(&self.provider);
        let tx = self.wallet_tx.clone();
        tokio::spawn(async move {
            let result = provider.send_transaction(&request).await;
            let _ = tx.send(WalletEvent::VoteSettled { candidate, result }).await;
        });
        info!(
            "Submitted vote for {} ({} pending)",
            candidate,
            self.pending.get(candidate)
        );
        true
    }

    /// Apply a wallet event. Returns a notice for the TUI when the event
    /// deserves one.
    pub fn handle_wallet_event(&mut self, event: WalletEvent) -> Option<Notice> {
        match event {
            WalletEvent::AccountsChanged { accounts, epoch } => {
                if epoch != self.session_epoch() {
                    debug!(
                        "Dropping account report from epoch {} (now {})",
                        epoch,
                        self.session_epoch()
                    );
                    return None;
                }
                self.session.on_accounts_changed(&accounts);
                None
            }
            WalletEvent::ChainChecked(result) => {
                let expected = self.config.wallet.chain_id;
                match result {
                    Ok(chain_id) if chain_id == expected => {
                        info!("Wallet is on chain {}", chain_id);
                        None
                    }
                    Ok(chain_id) => {
                        warn!(
                            "Wallet is on chain {}, config expects {}",
                            chain_id, expected
                        );
                        Some(Notice::Error(format!(
                            "Wallet is on chain {chain_id}, expected {expected}"
                        )))
                    }
                    Err(e) => {
                        debug!("eth_chainId failed: {}", e);
                        None
                    }
                }
            }
            WalletEvent::ConnectSettled(result) => {
                self.connecting = false;
                match self.session.apply_connect(result) {
                    Ok(account) => {
                        self.bump_session_epoch();
                        Some(Notice::Info(format!("Connected: {}", account.short())))
                    }
                    Err(e) => {
                        warn!("Wallet connection failed: {}", e);
                        Some(Notice::Error(format!("Connection failed: {e}")))
                    }
                }
            }
            WalletEvent::VoteSettled { candidate, result } => {
                self.pending.finish(candidate);
                match self.ballot.settle(candidate, result) {
                    VoteOutcome::Cast(receipt) => Some(Notice::Info(format!(
                        "Vote for {} sent: {}",
                        candidate.display_name(),
                        receipt.tx_hash.short()
                    ))),
                    VoteOutcome::Failed { reason, .. } => Some(Notice::Error(format!(
                        "Vote for {} failed: {reason}",
                        candidate.display_name()
                    ))),
                    VoteOutcome::Skipped => None,
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Main event loop
// ---------------------------------------------------------------------------

/// Run the application event loop until the user quits or the command
/// channel closes.
pub async fn run(
    mut wallet_rx: mpsc::Receiver<WalletEvent>,
    mut cmd_rx: mpsc::Receiver<UserCommand>,
    ui_tx: mpsc::Sender<UiUpdate>,
    mut state: AppState,
) -> anyhow::Result<()> {
    info!("Application event loop started");
    state.start_chain_check();
    send_snapshot(&state, &ui_tx).await;

    loop {
        tokio::select! {
            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(UserCommand::Quit) => {
                        info!("Quit command received, shutting down");
                        break;
                    }
                    Some(cmd) => handle_user_command(&mut state, cmd, &ui_tx).await,
                    None => {
                        info!("Command channel closed, shutting down");
                        break;
                    }
                }
            }

            event = wallet_rx.recv() => {
                // `state` holds a sender, so the channel cannot close here.
                let Some(event) = event else { break };
                if let Some(notice) = state.handle_wallet_event(event) {
                    let _ = ui_tx.send(UiUpdate::Notice(notice)).await;
                }
                send_snapshot(&state, &ui_tx).await;
            }
        }
    }

    if state.pending.total() > 0 {
        info!(
            "Exiting with {} vote(s) still awaiting the wallet",
            state.pending.total()
        );
    }
    info!("Application event loop exiting");
    Ok(())
}

async fn handle_user_command(
    state: &mut AppState,
    cmd: UserCommand,
    ui_tx: &mpsc::Sender<UiUpdate>,
) {
    match cmd {
        UserCommand::Connect => {
            if !state.start_connect() {
                return;
            }
        }
        UserCommand::Disconnect => {
            if state.disconnect().is_some() {
                let _ = ui_tx
                    .send(UiUpdate::Notice(Notice::Info("Logged out".into())))
                    .await;
            }
        }
        UserCommand::Vote(candidate) => {
            if !state.start_vote(candidate) {
                return;
            }
        }
        UserCommand::Quit => {
            // Handled in the main loop
            return;
        }
    }
    send_snapshot(state, ui_tx).await;
}

async fn send_snapshot(state: &AppState, ui_tx: &mpsc::Sender<UiUpdate>) {
    let _ = ui_tx
        .send(UiUpdate::StateSnapshot(Box::new(state.build_snapshot())))
        .await;
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
