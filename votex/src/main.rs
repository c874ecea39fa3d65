// Votex entry point.
//
// Startup sequence:
// 1. Initialize tracing (log to file, not terminal)
// 2. Load config
// 3. Build the JSON-RPC wallet provider
// 4. Create mpsc channels
// 5. Spawn the account watcher (re-baselined by the app on connect/logout)
// 6. Spawn app logic task
// 7. Run the TUI until the user quits
// 8. Cleanup on exit

use std::sync::Arc;
use std::time::Duration;

use votex::app;
use votex::config;
use votex::tui;
use votex::wallet::{self, rpc::JsonRpcProvider, WalletProvider};

use anyhow::Context;
use tokio::sync::mpsc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing()?;
    info!("Votex starting up");

    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: app={}, rpc={}, chain={}",
        config.app.name, config.wallet.rpc_url, config.wallet.chain_id
    );

    let rpc = JsonRpcProvider::from_config(&config);
    info!("Wallet provider at {}", rpc.url());
    let provider: Arc<dyn WalletProvider> = Arc::new(rpc);

    let (wallet_tx, wallet_rx) = mpsc::channel(64);
    let (cmd_tx, cmd_rx) = mpsc::channel(64);
    let (ui_tx, ui_rx) = mpsc::channel(256);

    let poll_interval = config.wallet.account_poll_interval();
    let view_state = tui::ViewState::from_config(&config);
    let app_state = app::AppState::new(config, provider.clone(), wallet_tx.clone());

    let watcher_handle = tokio::spawn(wallet::watcher::run(
        provider,
        poll_interval,
        app_state.subscribe_session(),
        wallet_tx,
    ));

    let app_handle = tokio::spawn(async move {
        if let Err(e) = app::run(wallet_rx, cmd_rx, ui_tx, app_state).await {
            error!("Application loop error: {}", e);
        }
    });

    info!("Application ready");

    // Blocks until the user quits.
    if let Err(e) = tui::run(view_state, ui_rx, cmd_tx).await {
        error!("TUI error: {}", e);
    }

    let _ = tokio::time::timeout(Duration::from_secs(5), async {
        let _ = app_handle.await;
    })
    .await;

    // The watcher polls forever while a sender is alive.
    watcher_handle.abort();

    info!("Votex shut down cleanly");
    Ok(())
}

/// Initialize tracing to log to a file (not the terminal, which is used by the TUI).
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("votex.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("votex=info,warn")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
