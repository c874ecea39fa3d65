// JSON-RPC 2.0 wallet client over HTTP.
//
// Posts EIP-1193 style requests (`eth_requestAccounts`, `eth_accounts`,
// `eth_chainId`, `eth_sendTransaction`) to a wallet endpoint and maps JSON-RPC error
// objects onto `ProviderError`.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use super::{Account, ProviderError, TransactionRequest, TxHash, WalletProvider};
use crate::config::Config;

/// EIP-1193 "User Rejected Request".
pub const USER_REJECTED_CODE: i64 = 4001;

/// Wallet provider backed by a JSON-RPC endpoint.
pub struct JsonRpcProvider {
    http: reqwest::Client,
    url: String,
    next_id: AtomicU64,
}

impl JsonRpcProvider {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: url.into(),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.wallet.rpc_url.clone())
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Issue one JSON-RPC call and return its `result`.
    async fn call(&self, method: &str, params: Value) -> Result<Value, ProviderError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });
        debug!(method, id, "json-rpc request");

        let response = self.http.post(&self.url).json(&body).send().await?;
        let status = response.status();
        let text = response.text().await?;

        // Some endpoints pair an error object with a non-2xx status; prefer
        // the error object when there is one.
        match serde_json::from_str::<Value>(&text) {
            Ok(value) if status.is_success() || value.get("error").is_some() => {
                parse_response(value)
            }
            Err(e) if status.is_success() => Err(ProviderError::Malformed(e.to_string())),
            _ => Err(ProviderError::Http(status.as_u16())),
        }
    }
}

#[async_trait]
impl WalletProvider for JsonRpcProvider {
    async fn request_accounts(&self) -> Result<Vec<Account>, ProviderError> {
        let result = self.call("eth_requestAccounts", json!([])).await?;
        parse_accounts(result)
    }

    async fn accounts(&self) -> Result<Vec<Account>, ProviderError> {
        let result = self.call("eth_accounts", json!([])).await?;
        parse_accounts(result)
    }

    async fn chain_id(&self) -> Result<u64, ProviderError> {
        let result = self.call("eth_chainId", json!([])).await?;
        parse_chain_id(result)
    }

    async fn send_transaction(
        &self,
        request: &TransactionRequest,
    ) -> Result<TxHash, ProviderError> {
        let result = self.call("eth_sendTransaction", json!([request])).await?;
        parse_tx_hash(result)
    }
}

// ---------------------------------------------------------------------------
// Response parsing helpers
// ---------------------------------------------------------------------------

/// Split a JSON-RPC response into its `result` or a `ProviderError`.
pub(crate) fn parse_response(value: Value) -> Result<Value, ProviderError> {
    if let Some(error) = value.get("error") {
        let code = error.get("code").and_then(Value::as_i64).unwrap_or_default();
        if code == USER_REJECTED_CODE {
            return Err(ProviderError::UserRejected);
        }
        let message = error
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("unknown error")
            .to_string();
        return Err(ProviderError::Rpc { code, message });
    }

    match value.get("result") {
        Some(result) => Ok(result.clone()),
        None => Err(ProviderError::Malformed(
            "response has neither result nor error".into(),
        )),
    }
}

/// Expected shape: `["0xabc...", "0xdef..."]`.
pub(crate) fn parse_accounts(result: Value) -> Result<Vec<Account>, ProviderError> {
    serde_json::from_value(result)
        .map_err(|e| ProviderError::Malformed(format!("account list: {e}")))
}

/// Expected shape: a hex quantity such as `"0x2105"`.
pub(crate) fn parse_chain_id(result: Value) -> Result<u64, ProviderError> {
    result
        .as_str()
        .and_then(|quantity| quantity.strip_prefix("0x"))
        .and_then(|digits| u64::from_str_radix(digits, 16).ok())
        .ok_or_else(|| ProviderError::Malformed(format!("expected chain id quantity, got {result}")))
}

/// Expected shape: `"0x<64 hex digits>"`.
pub(crate) fn parse_tx_hash(result: Value) -> Result<TxHash, ProviderError> {
    match result.as_str() {
        Some(hash) if !hash.is_empty() => Ok(TxHash::new(hash)),
        _ => Err(ProviderError::Malformed(format!(
            "expected transaction hash string, got {result}"
        ))),
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
