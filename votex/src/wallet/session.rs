// Wallet session: which account, if any, the app is connected with.

use tracing::info;

use super::{Account, ProviderError, WalletProvider};

/// Connection state owned by the app orchestrator.
///
/// Mutated only by connect/disconnect and account-change notifications.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SessionManager {
    account: Option<Account>,
}

impl SessionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// The connected account, if any.
    pub fn account(&self) -> Option<&Account> {
        self.account.as_ref()
    }

    pub fn is_connected(&self) -> bool {
        self.account.is_some()
    }

    /// Request account access and adopt the first account.
    ///
    /// A denial propagates to the caller and leaves the session as it was.
    /// Nothing is retried.
    pub async fn connect(
        &mut self,
        provider: &dyn WalletProvider,
    ) -> Result<Account, ProviderError> {
        let result = provider.request_accounts().await;
        self.apply_connect(result)
    }

    /// Apply the result of an `eth_requestAccounts` call made elsewhere
    /// (the app loop runs the call in a spawned task).
    pub fn apply_connect(
        &mut self,
        result: Result<Vec<Account>, ProviderError>,
    ) -> Result<Account, ProviderError> {
        let account = result?
            .into_iter()
            .next()
            .ok_or(ProviderError::NoAccounts)?;
        info!("Wallet connected: {}", account);
        self.account = Some(account.clone());
        Ok(account)
    }

    /// Forget the account locally. The wallet is not told.
    pub fn disconnect(&mut self) -> Option<Account> {
        let previous = self.account.take();
        if let Some(ref account) = previous {
            info!("Wallet disconnected: {}", account);
        }
        previous
    }

    /// The wallet reported a new account set: adopt its first entry, or
    /// clear the session when the set is empty. Returns whether the session
    /// changed.
    pub fn on_accounts_changed(&mut self, accounts: &[Account]) -> bool {
        let next = accounts.first().cloned();
        if next == self.account {
            return false;
        }
        match &next {
            Some(account) => info!("Wallet switched to account {}", account),
            None => info!("Wallet reported no accounts, clearing session"),
        }
        self.account = next;
        true
    }
}
