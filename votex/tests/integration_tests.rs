// Integration tests for Votex.
//
// These exercise the library crate's public API end-to-end against the
// in-memory NullWallet: session lifecycle, vote submission, account-change
// handling, and the app event loop as the TUI drives it.

use std::sync::Arc;
use std::time::Duration;

use votex::app::{self, AppState};
use votex::ballot::{encode_vote_data, Ballot, Candidate, Tally, VoteOutcome};
use votex::config::{AppConfig, Config, WalletConfig};
use votex::protocol::*;
use votex::tui::{apply_ui_update, ViewState};
use votex::wallet::null::NullWallet;
use votex::wallet::session::SessionManager;
use votex::wallet::{Account, ProviderError, WalletProvider};

use tokio::sync::{mpsc, watch};

// ===========================================================================
// Test helpers
// ===========================================================================

const ALICE: &str = "0xABC1230000000000000000000000000000000001";
const BOB: &str = "0xB0B0000000000000000000000000000000000002";

fn test_config() -> Config {
    Config {
        app: AppConfig {
            name: "Votex".into(),
            title: "Presidential Election 2024".into(),
            subtitle: String::new(),
        },
        wallet: WalletConfig {
            rpc_url: "http://127.0.0.1:8545".into(),
            chain_id: 8453,
            account_poll_ms: 2000,
        },
    }
}

async fn connected_session(wallet: &NullWallet) -> SessionManager {
    let mut session = SessionManager::new();
    session.connect(wallet).await.unwrap();
    session
}

struct Harness {
    wallet: Arc<NullWallet>,
    wallet_tx: mpsc::Sender<WalletEvent>,
    session_rx: watch::Receiver<u64>,
    cmd_tx: mpsc::Sender<UserCommand>,
    ui_rx: mpsc::Receiver<UiUpdate>,
    view: ViewState,
    handle: tokio::task::JoinHandle<anyhow::Result<()>>,
}

fn spawn_app(wallet: NullWallet) -> Harness {
    let wallet = Arc::new(wallet);
    let (wallet_tx, wallet_rx) = mpsc::channel(64);
    let (cmd_tx, cmd_rx) = mpsc::channel(64);
    let (ui_tx, ui_rx) = mpsc::channel(256);

    let provider: Arc<dyn WalletProvider> = wallet.clone();
    let state = AppState::new(test_config(), provider, wallet_tx.clone());
    let session_rx = state.subscribe_session();
    let handle = tokio::spawn(app::run(wallet_rx, cmd_rx, ui_tx, state));

    Harness {
        wallet,
        wallet_tx,
        session_rx,
        cmd_tx,
        ui_rx,
        view: ViewState::from_config(&test_config()),
        handle,
    }
}

impl Harness {
    /// Apply UI updates until `pred` holds for the view.
    async fn wait_until(&mut self, pred: impl Fn(&ViewState) -> bool) {
        let deadline = Duration::from_secs(2);
        tokio::time::timeout(deadline, async {
            while !pred(&self.view) {
                match self.ui_rx.recv().await {
                    Some(update) => apply_ui_update(&mut self.view, update),
                    None => panic!("app closed the UI channel"),
                }
            }
        })
        .await
        .expect("timed out waiting for UI state");
    }

    /// Report an account set the way the watcher would.
    async fn accounts_changed(&self, accounts: Vec<Account>) {
        let epoch = *self.session_rx.borrow();
        self.wallet_tx
            .send(WalletEvent::AccountsChanged { accounts, epoch })
            .await
            .unwrap();
    }

    async fn send(&self, cmd: UserCommand) {
        self.cmd_tx.send(cmd).await.unwrap();
    }

    async fn quit(self) {
        self.cmd_tx.send(UserCommand::Quit).await.unwrap();
        self.handle.await.unwrap().unwrap();
    }
}

// ===========================================================================
// Session and ballot through the public API
// ===========================================================================

#[tokio::test]
async fn fresh_app_is_disconnected_with_votes_disabled() {
    let session = SessionManager::new();
    assert!(!session.is_connected());
    assert!(!ViewState::from_config(&test_config()).vote_enabled());
    assert_eq!(Ballot::new().tally(), Tally::default());
}

#[tokio::test]
async fn connect_adopts_first_granted_account() {
    let wallet = NullWallet::with_accounts([ALICE, BOB]);
    let session = connected_session(&wallet).await;
    assert_eq!(session.account(), Some(&Account::new(ALICE)));
}

#[tokio::test]
async fn denied_connect_leaves_session_empty() {
    let wallet = NullWallet::with_accounts([ALICE]);
    wallet.fail_connect(ProviderError::UserRejected);

    let mut session = SessionManager::new();
    let err = session.connect(&wallet).await.unwrap_err();
    assert_eq!(err, ProviderError::UserRejected);
    assert!(!session.is_connected());
}

#[tokio::test]
async fn vote_without_session_is_skipped_and_never_reaches_wallet() {
    let wallet = NullWallet::with_accounts([ALICE]);
    let mut ballot = Ballot::new();

    let outcome = ballot
        .submit_vote(&SessionManager::new(), &wallet, Candidate::Trump)
        .await;

    assert_eq!(outcome, VoteOutcome::Skipped);
    assert_eq!(ballot.tally(), Tally::default());
    assert!(wallet.sent().is_empty());
}

#[tokio::test]
async fn successful_vote_counts_once_and_sends_self_transfer() {
    let wallet = NullWallet::with_accounts([ALICE]);
    let session = connected_session(&wallet).await;
    let mut ballot = Ballot::new();

    let outcome = ballot
        .submit_vote(&session, &wallet, Candidate::Trump)
        .await;

    assert!(matches!(outcome, VoteOutcome::Cast(_)));
    assert_eq!(ballot.tally(), Tally { trump: 1, biden: 0 });
    assert_eq!(ballot.last_vote(), Some(Candidate::Trump));

    let sent = wallet.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, Account::new(ALICE));
    assert_eq!(sent[0].from, Account::new(ALICE));
    assert_eq!(sent[0].value, "0x0");
    assert_eq!(sent[0].data, encode_vote_data(Candidate::Trump));
}

#[tokio::test]
async fn rejected_vote_leaves_tally_and_marker() {
    let wallet = NullWallet::with_accounts([ALICE]);
    let session = connected_session(&wallet).await;
    let mut ballot = Ballot::new();
    ballot
        .submit_vote(&session, &wallet, Candidate::Biden)
        .await;

    wallet.fail_send(ProviderError::UserRejected);
    let outcome = ballot
        .submit_vote(&session, &wallet, Candidate::Trump)
        .await;

    assert_eq!(
        outcome,
        VoteOutcome::Failed {
            candidate: Candidate::Trump,
            reason: ProviderError::UserRejected.to_string(),
        }
    );
    assert_eq!(ballot.tally(), Tally { trump: 0, biden: 1 });
    assert_eq!(ballot.last_vote(), Some(Candidate::Biden));
}

#[tokio::test]
async fn empty_account_notification_clears_session() {
    let wallet = NullWallet::with_accounts([ALICE]);
    let mut session = connected_session(&wallet).await;

    assert!(session.on_accounts_changed(&[]));
    assert!(!session.is_connected());
}

// ===========================================================================
// App event loop
// ===========================================================================

#[tokio::test]
async fn biden_vote_scenario_through_event_loop() {
    let mut h = spawn_app(NullWallet::with_accounts([ALICE]));
    h.wait_until(|v| v.snapshot.tally == Tally::default()).await;

    h.send(UserCommand::Connect).await;
    h.wait_until(|v| v.is_connected()).await;
    assert_eq!(h.view.snapshot.account, Some(Account::new(ALICE)));

    h.send(UserCommand::Vote(Candidate::Biden)).await;
    h.wait_until(|v| v.snapshot.tally.biden == 1).await;

    assert_eq!(h.view.snapshot.tally, Tally { trump: 0, biden: 1 });
    assert!(h.view.is_highlighted(Candidate::Biden));
    assert!(!h.view.is_highlighted(Candidate::Trump));
    assert_eq!(h.view.snapshot.receipts.len(), 1);
    assert_eq!(h.view.snapshot.pending.total(), 0);

    h.quit().await;
}

#[tokio::test]
async fn rejected_vote_surfaces_error_notice() {
    let mut h = spawn_app(NullWallet::with_accounts([ALICE]));
    h.wallet.fail_send(ProviderError::UserRejected);

    h.send(UserCommand::Connect).await;
    h.wait_until(|v| v.is_connected()).await;

    h.send(UserCommand::Vote(Candidate::Trump)).await;
    h.wait_until(|v| v.notice.as_ref().is_some_and(|n| n.is_error()))
        .await;

    assert!(h.view.notice.as_ref().unwrap().text().contains("failed"));
    assert_eq!(h.view.snapshot.tally, Tally::default());
    assert_eq!(h.view.snapshot.last_vote, None);

    h.quit().await;
}

#[tokio::test]
async fn vote_before_connect_is_ignored() {
    let mut h = spawn_app(NullWallet::with_accounts([ALICE]));
    h.wait_until(|v| !v.is_connected()).await;

    h.send(UserCommand::Vote(Candidate::Trump)).await;
    h.send(UserCommand::Connect).await;
    h.wait_until(|v| v.is_connected()).await;

    assert!(h.wallet.sent().is_empty());
    assert_eq!(h.view.snapshot.tally, Tally::default());

    h.quit().await;
}

#[tokio::test]
async fn logout_clears_session_and_disables_votes() {
    let mut h = spawn_app(NullWallet::with_accounts([ALICE]));

    h.send(UserCommand::Connect).await;
    h.wait_until(|v| v.is_connected()).await;

    h.send(UserCommand::Disconnect).await;
    h.wait_until(|v| !v.is_connected()).await;
    assert!(!h.view.vote_enabled());

    h.quit().await;
}

#[tokio::test]
async fn account_switch_and_lock_follow_wallet() {
    let mut h = spawn_app(NullWallet::with_accounts([ALICE]));

    h.send(UserCommand::Connect).await;
    h.wait_until(|v| v.is_connected()).await;

    h.accounts_changed(vec![Account::new(BOB)]).await;
    h.wait_until(|v| v.snapshot.account == Some(Account::new(BOB)))
        .await;

    h.accounts_changed(vec![]).await;
    h.wait_until(|v| !v.is_connected()).await;

    h.quit().await;
}

#[tokio::test]
async fn overlapping_votes_each_settle() {
    let mut h = spawn_app(NullWallet::with_accounts([ALICE]));

    h.send(UserCommand::Connect).await;
    h.wait_until(|v| v.is_connected()).await;

    h.send(UserCommand::Vote(Candidate::Trump)).await;
    h.send(UserCommand::Vote(Candidate::Trump)).await;
    h.wait_until(|v| v.snapshot.tally.trump == 2).await;

    assert_eq!(h.wallet.sent().len(), 2);
    assert_eq!(h.view.snapshot.receipts.len(), 2);

    h.quit().await;
}

#[tokio::test]
async fn wallet_on_wrong_chain_is_reported_at_startup() {
    let wallet = NullWallet::with_accounts([ALICE]);
    wallet.set_chain_id(1);
    let mut h = spawn_app(wallet);

    h.wait_until(|v| v.notice.as_ref().is_some_and(|n| n.is_error()))
        .await;
    assert!(h.view.notice.as_ref().unwrap().text().contains("chain 1"));

    h.quit().await;
}

#[tokio::test]
async fn account_report_from_before_logout_is_ignored() {
    let mut h = spawn_app(NullWallet::with_accounts([ALICE]));

    h.send(UserCommand::Connect).await;
    h.wait_until(|v| v.is_connected()).await;
    let connected_epoch = *h.session_rx.borrow();

    h.send(UserCommand::Disconnect).await;
    h.wait_until(|v| !v.is_connected()).await;

    h.wallet_tx
        .send(WalletEvent::AccountsChanged {
            accounts: vec![Account::new(ALICE)],
            epoch: connected_epoch,
        })
        .await
        .unwrap();
    h.send(UserCommand::Vote(Candidate::Trump)).await;

    tokio::time::sleep(Duration::from_millis(50)).await;
    while let Ok(update) = h.ui_rx.try_recv() {
        apply_ui_update(&mut h.view, update);
        assert!(!h.view.is_connected());
    }
    assert!(h.wallet.sent().is_empty());

    h.quit().await;
}
