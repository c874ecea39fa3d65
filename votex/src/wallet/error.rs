// Wallet provider errors.

use thiserror::Error;

/// Any failure reported by, or while talking to, the wallet provider.
///
/// Callers treat every variant the same way (log it, change nothing), but the
/// variants are kept apart for log and notice text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    #[error("request rejected in wallet")]
    UserRejected,

    #[error("wallet returned no accounts")]
    NoAccounts,

    #[error("wallet error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("wallet endpoint returned HTTP {0}")]
    Http(u16),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("malformed wallet response: {0}")]
    Malformed(String),
}

impl From<reqwest::Error> for ProviderError {
    fn from(e: reqwest::Error) -> Self {
        ProviderError::Transport(e.to_string())
    }
}
