/*
[INPUT]:  Wallet signer, RPC client, chain descriptor and session handle
[OUTPUT]: Provider answering account/signing calls locally and forwarding the rest
[POS]:    Provider layer - concrete provider produced by every login path
[UPDATE]: When changing locally answered methods or session checks
*/

use std::sync::Arc;

use alloy_primitives::{Address, U256};
use async_trait::async_trait;
use serde_json::{Value, json};
use tracing::debug;
use uuid::Uuid;

use crate::auth::{SessionData, SessionManager, WalletSigner};
use crate::http::{AvalonError, Result, RpcClient};
use crate::provider::Provider;
use crate::types::{ChainConfig, TransactionRequest};

/// EIP-1193 "Unsupported Method"
const UNSUPPORTED_METHOD: i64 = 4200;

/// Provider backed by a local signer and a JSON-RPC endpoint
pub struct SigningProvider {
    rpc: RpcClient,
    wallet: Arc<dyn WalletSigner>,
    chain: ChainConfig,
    sessions: SessionManager,
    session_id: Uuid,
}

impl std::fmt::Debug for SigningProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningProvider")
            .field("address", &self.wallet.address())
            .field("chain_id", &self.chain.chain_id)
            .field("rpc_url", &self.rpc.rpc_url().as_str())
            .field("session_id", &self.session_id)
            .finish()
    }
}

impl SigningProvider {
    /// Bind a signer to `session`; the provider dies with that session
    pub fn new(
        rpc: RpcClient,
        wallet: Arc<dyn WalletSigner>,
        chain: ChainConfig,
        sessions: SessionManager,
        session: &SessionData,
    ) -> Self {
        Self {
            rpc,
            wallet,
            chain,
            sessions,
            session_id: session.id,
        }
    }

    pub fn address(&self) -> Address {
        self.wallet.address()
    }

    pub fn chain(&self) -> &ChainConfig {
        &self.chain
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Whether the session this provider belongs to is still active
    pub fn is_valid(&self) -> bool {
        self.sessions.is_active(self.session_id)
    }

    /// Native balance of the account, in wei
    pub async fn native_balance(&self) -> Result<U256> {
        let result = self
            .request("eth_getBalance", json!([self.address(), "latest"]))
            .await?;
        let raw = result
            .as_str()
            .ok_or_else(|| AvalonError::InvalidResponse(format!("expected quantity, got {result}")))?;
        raw.parse::<U256>()
            .map_err(|e| AvalonError::InvalidResponse(format!("invalid quantity {raw:?}: {e}")))
    }

    fn ensure_active(&self) -> Result<()> {
        self.sessions.ensure_active(self.session_id)
    }

    async fn personal_sign(&self, params: &Value) -> Result<Value> {
        let payload = params
            .get(0)
            .and_then(Value::as_str)
            .ok_or_else(|| AvalonError::Config("personal_sign expects [message, address]".to_string()))?;

        let message = match payload.strip_prefix("0x").map(hex::decode) {
            Some(Ok(bytes)) => bytes,
            _ => payload.as_bytes().to_vec(),
        };

        let signature = self.wallet.sign_message(&message).await?;
        Ok(Value::String(signature))
    }
}

#[async_trait]
impl Provider for SigningProvider {
    async fn request(&self, method: &str, params: Value) -> Result<Value> {
        self.ensure_active()?;

        match method {
            "eth_accounts" | "eth_requestAccounts" => Ok(json!([self.address()])),
            "eth_chainId" => Ok(Value::String(self.chain.chain_id_hex())),
            "personal_sign" => self.personal_sign(&params).await,
            // key material never leaves the signer
            "eth_private_key" => Err(AvalonError::Rpc {
                code: UNSUPPORTED_METHOD,
                message: format!("{method} is not supported"),
                data: None,
            }),
            _ => {
                debug!(method, "forwarding request to rpc endpoint");
                let result = self.rpc.request(method, params).await;
                // logout may have happened while the request was in flight
                self.ensure_active()?;
                result
            }
        }
    }

    async fn accounts(&self) -> Result<Vec<Address>> {
        self.ensure_active()?;
        Ok(vec![self.address()])
    }

    async fn sign_message(&self, message: &[u8]) -> Result<String> {
        self.ensure_active()?;
        self.wallet.sign_message(message).await
    }

    async fn sign_transaction(&self, tx: &TransactionRequest) -> Result<String> {
        self.ensure_active()?;
        self.wallet.sign_transaction(tx, self.chain.chain_id).await
    }
}
