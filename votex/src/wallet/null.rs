// Nullable wallet: an in-memory provider that records what it was asked to
// do instead of talking to a real wallet.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use super::{Account, ProviderError, TransactionRequest, TxHash, WalletProvider};

/// Scriptable in-memory wallet.
///
/// Grants its account list on `request_accounts` (unless a connect failure is
/// scripted), returns sequential fake hashes from `send_transaction` (unless a
/// send failure is scripted), and records every submitted request.
#[derive(Default)]
pub struct NullWallet {
    accounts: Mutex<Vec<Account>>,
    connect_error: Mutex<Option<ProviderError>>,
    accounts_error: Mutex<Option<ProviderError>>,
    chain_id: Mutex<Option<u64>>,
    send_error: Mutex<Option<ProviderError>>,
    sent: Mutex<Vec<TransactionRequest>>,
    account_requests: AtomicUsize,
}

impl NullWallet {
    /// A wallet holding no accounts.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_accounts<I, S>(accounts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let wallet = Self::new();
        wallet.set_accounts(accounts);
        wallet
    }

    /// Replace the exposed accounts, as when the user switches accounts in
    /// their wallet.
    pub fn set_accounts<I, S>(&self, accounts: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        *lock(&self.accounts) = accounts.into_iter().map(Account::new).collect();
    }

    /// Make every following `request_accounts` fail with `error`.
    pub fn fail_connect(&self, error: ProviderError) {
        *lock(&self.connect_error) = Some(error);
    }

    /// Make every following `accounts` poll fail with `error`.
    pub fn fail_accounts(&self, error: ProviderError) {
        *lock(&self.accounts_error) = Some(error);
    }

    /// Clear a scripted poll failure.
    pub fn succeed_accounts(&self) {
        *lock(&self.accounts_error) = None;
    }

    /// Chain reported by `chain_id`. Until set, `chain_id` fails as if the
    /// wallet did not support `eth_chainId`.
    pub fn set_chain_id(&self, chain_id: u64) {
        *lock(&self.chain_id) = Some(chain_id);
    }

    /// Make every following `send_transaction` fail with `error`.
    pub fn fail_send(&self, error: ProviderError) {
        *lock(&self.send_error) = Some(error);
    }

    /// Clear a scripted send failure.
    pub fn succeed_send(&self) {
        *lock(&self.send_error) = None;
    }

    /// Every request passed to `send_transaction`, in call order.
    pub fn sent(&self) -> Vec<TransactionRequest> {
        lock(&self.sent).clone()
    }

    /// Number of `request_accounts` calls.
    pub fn account_requests(&self) -> usize {
        self.account_requests.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WalletProvider for NullWallet {
    async fn request_accounts(&self) -> Result<Vec<Account>, ProviderError> {
        self.account_requests.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = lock(&self.connect_error).clone() {
            return Err(error);
        }
        Ok(lock(&self.accounts).clone())
    }

    async fn accounts(&self) -> Result<Vec<Account>, ProviderError> {
        if let Some(error) = lock(&self.accounts_error).clone() {
            return Err(error);
        }
        Ok(lock(&self.accounts).clone())
    }

    async fn chain_id(&self) -> Result<u64, ProviderError> {
        let chain_id = *lock(&self.chain_id);
        chain_id.ok_or_else(|| ProviderError::Rpc {
            code: -32601,
            message: "the method eth_chainId does not exist".into(),
        })
    }

    async fn send_transaction(
        &self,
        request: &TransactionRequest,
    ) -> Result<TxHash, ProviderError> {
        let mut sent = lock(&self.sent);
        sent.push(request.clone());
        if let Some(error) = lock(&self.send_error).clone() {
            return Err(error);
        }
        Ok(TxHash::new(format!("0x{:064x}", sent.len())))
    }
}

/// Lock ignoring poisoning; the guarded data stays consistent on panic.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
