// Wallet provider abstraction and the types that cross it.
//
// The provider is the external wallet that holds the user's accounts and
// signs transactions. Everything else in the crate talks to it through the
// `WalletProvider` trait so the JSON-RPC client can be swapped for
// `null::NullWallet` in tests.

pub mod error;
pub mod null;
pub mod rpc;
pub mod session;
pub mod watcher;

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use error::ProviderError;

// ---------------------------------------------------------------------------
// Account / TxHash
// ---------------------------------------------------------------------------

/// A wallet-held address, e.g. `0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Account(String);

impl Account {
    pub fn new(address: impl Into<String>) -> Self {
        Account(address.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Shortened form for the title bar: `0x5aAe...eAed`.
    pub fn short(&self) -> String {
        abbreviate(&self.0)
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Account {
    fn from(s: &str) -> Self {
        Account::new(s)
    }
}

/// Transaction hash returned by `eth_sendTransaction`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxHash(String);

impl TxHash {
    pub fn new(hash: impl Into<String>) -> Self {
        TxHash(hash.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn short(&self) -> String {
        abbreviate(&self.0)
    }
}

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Keep the first six and last four characters of a hex string.
/// Strings of ten characters or fewer are returned unchanged.
pub fn abbreviate(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() <= 10 {
        return s.to_string();
    }
    let head: String = chars[..6].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}

// ---------------------------------------------------------------------------
// TransactionRequest
// ---------------------------------------------------------------------------

/// Parameters for `eth_sendTransaction`. `value` and `data` are 0x-prefixed
/// hex strings, as wallets expect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRequest {
    pub to: Account,
    pub from: Account,
    pub value: String,
    pub data: String,
}

// ---------------------------------------------------------------------------
// WalletProvider
// ---------------------------------------------------------------------------

/// The external wallet: account access and transaction submission.
///
/// Calls may suspend indefinitely; callers apply no timeout.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Ask the wallet for account access (`eth_requestAccounts`). Fails when
    /// the user denies the request.
    async fn request_accounts(&self) -> Result<Vec<Account>, ProviderError>;

    /// Accounts currently exposed to the app (`eth_accounts`), without
    /// prompting the user.
    async fn accounts(&self) -> Result<Vec<Account>, ProviderError>;

    /// Chain the wallet is connected to (`eth_chainId`).
    async fn chain_id(&self) -> Result<u64, ProviderError>;

    /// Submit a transaction for signing and broadcast (`eth_sendTransaction`).
    async fn send_transaction(
        &self,
        request: &TransactionRequest,
    ) -> Result<TxHash, ProviderError>;
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
