/*
[INPUT]:  JSON-RPC method calls, contract calldata and signing requests
[OUTPUT]: Chain results and signatures on behalf of one account
[POS]:    Provider layer - capability surface shared by every login path
[UPDATE]: When the capability set or eth_call shape changes
*/

pub mod signing;

use alloy_primitives::{Address, Bytes};
use async_trait::async_trait;
use serde_json::Value;

use crate::http::{AvalonError, Result};
use crate::types::{EthCallRequest, TransactionRequest};

pub use signing::SigningProvider;

/// Signing + query capability bound to one account
///
/// Callers never learn which login path produced the provider.
#[async_trait]
pub trait Provider: Send + Sync {
    /// JSON-RPC shaped request
    async fn request(&self, method: &str, params: Value) -> Result<Value>;

    /// Accounts controlled by this provider
    async fn accounts(&self) -> Result<Vec<Address>>;

    /// EIP-191 personal signature, `0x`-prefixed hex
    async fn sign_message(&self, message: &[u8]) -> Result<String>;

    /// Signed raw transaction, `0x`-prefixed hex; never broadcast
    async fn sign_transaction(&self, tx: &TransactionRequest) -> Result<String>;

    /// Read-only contract call at the latest block
    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes> {
        let call = serde_json::to_value(EthCallRequest { to, data })?;
        let result = self
            .request("eth_call", Value::Array(vec![call, Value::from("latest")]))
            .await?;
        decode_hex_bytes(&result)
    }
}

/// Decode a `0x`-prefixed hex string result
pub(crate) fn decode_hex_bytes(value: &Value) -> Result<Bytes> {
    let raw = value
        .as_str()
        .ok_or_else(|| AvalonError::InvalidResponse(format!("expected hex string, got {value}")))?;
    raw.parse::<Bytes>()
        .map_err(|e| AvalonError::InvalidResponse(format!("invalid hex data {raw:?}: {e}")))
}
