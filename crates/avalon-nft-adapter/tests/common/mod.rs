/*
[INPUT]:  Test configuration and mock server requirements
[OUTPUT]: Shared test utilities, fixtures, and mock helpers
[POS]:    Test infrastructure - shared across all test modules
[UPDATE]: When adding new test patterns or fixtures
*/

//! Common test utilities for avalon-nft-adapter tests

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

use alloy_sol_types::{SolCall, SolValue};
use async_trait::async_trait;
use avalon_nft_adapter::contract::IERC721Enumerable;
use avalon_nft_adapter::{Address, AvalonError, Bytes, Provider, Result, TransactionRequest, U256};
use serde_json::Value;
use wiremock::MockServer;

/// Hardhat account #0
pub const TEST_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
pub const TEST_ADDRESS: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

/// Setup a mock HTTP server for testing
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

pub fn owner() -> Address {
    Address::repeat_byte(0x11)
}

/// Scripted ERC-721 contract answering `eth_call` without a network
pub struct MockProvider {
    accounts: Vec<Address>,
    first_owner: Address,
    token_ids: Vec<U256>,
    balance_override: Option<U256>,
    index_delays: HashMap<u64, Duration>,
    failing_indices: HashSet<u64>,
    token_uris: HashMap<U256, String>,
    call_delay: Option<Duration>,
    completed: Mutex<Vec<u64>>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self {
            accounts: vec![owner()],
            first_owner: Address::repeat_byte(0x22),
            token_ids: Vec::new(),
            balance_override: None,
            index_delays: HashMap::new(),
            failing_indices: HashSet::new(),
            token_uris: HashMap::new(),
            call_delay: None,
            completed: Mutex::new(Vec::new()),
        }
    }

    pub fn with_accounts(mut self, accounts: Vec<Address>) -> Self {
        self.accounts = accounts;
        self
    }

    pub fn with_first_owner(mut self, first_owner: Address) -> Self {
        self.first_owner = first_owner;
        self
    }

    /// Tokens held by [`owner`], in enumeration order
    pub fn with_tokens(mut self, token_ids: &[u64]) -> Self {
        self.token_ids = token_ids.iter().map(|id| U256::from(*id)).collect();
        self
    }

    /// Report `balance` for [`owner`] regardless of the tokens held
    pub fn with_balance(mut self, balance: U256) -> Self {
        self.balance_override = Some(balance);
        self
    }

    /// Delay the `tokenOfOwnerByIndex` answer for `index`
    pub fn with_index_delay(mut self, index: u64, delay: Duration) -> Self {
        self.index_delays.insert(index, delay);
        self
    }

    /// Make `tokenOfOwnerByIndex(index)` fail with an RPC error
    pub fn with_failing_index(mut self, index: u64) -> Self {
        self.failing_indices.insert(index);
        self
    }

    pub fn with_token_uri(mut self, token_id: u64, uri: impl Into<String>) -> Self {
        self.token_uris.insert(U256::from(token_id), uri.into());
        self
    }

    /// Delay every contract call
    pub fn with_call_delay(mut self, delay: Duration) -> Self {
        self.call_delay = Some(delay);
        self
    }

    /// Indices whose `tokenOfOwnerByIndex` lookup ran to completion, in completion order
    pub fn completed_indices(&self) -> Vec<u64> {
        self.completed.lock().unwrap().clone()
    }

    async fn token_of_owner_by_index(&self, holder: Address, index: U256) -> Result<Bytes> {
        let index = u64::try_from(index).unwrap();
        if let Some(delay) = self.index_delays.get(&index) {
            tokio::time::sleep(*delay).await;
        }
        if self.failing_indices.contains(&index) {
            return Err(AvalonError::Rpc {
                code: -32000,
                message: "header not found".to_string(),
                data: None,
            });
        }
        if holder != owner() {
            return Err(revert("ERC721Enumerable: owner index out of bounds"));
        }

        let token_id = self
            .token_ids
            .get(index as usize)
            .copied()
            .ok_or_else(|| revert("ERC721Enumerable: owner index out of bounds"))?;
        self.completed.lock().unwrap().push(index);
        Ok(encode(token_id))
    }
}

#[async_trait]
impl Provider for MockProvider {
    async fn request(&self, method: &str, _params: Value) -> Result<Value> {
        Err(AvalonError::Rpc {
            code: -32601,
            message: format!("method {method} not supported by mock"),
            data: None,
        })
    }

    async fn accounts(&self) -> Result<Vec<Address>> {
        Ok(self.accounts.clone())
    }

    async fn sign_message(&self, _message: &[u8]) -> Result<String> {
        Ok("0xmock_signature".to_string())
    }

    async fn sign_transaction(&self, _tx: &TransactionRequest) -> Result<String> {
        Ok("0xmock_signature".to_string())
    }

    async fn call(&self, _to: Address, data: Bytes) -> Result<Bytes> {
        if let Some(delay) = self.call_delay {
            tokio::time::sleep(delay).await;
        }

        let selector: [u8; 4] = data[..4].try_into().unwrap();
        if selector == IERC721Enumerable::ownerOfCall::SELECTOR {
            return Ok(encode(self.first_owner));
        }
        if selector == IERC721Enumerable::balanceOfCall::SELECTOR {
            let call = IERC721Enumerable::balanceOfCall::abi_decode(&data).unwrap();
            let balance = if call.owner == owner() {
                self.balance_override
                    .unwrap_or(U256::from(self.token_ids.len()))
            } else {
                U256::ZERO
            };
            return Ok(encode(balance));
        }
        if selector == IERC721Enumerable::tokenOfOwnerByIndexCall::SELECTOR {
            let call = IERC721Enumerable::tokenOfOwnerByIndexCall::abi_decode(&data).unwrap();
            return self.token_of_owner_by_index(call.owner, call.index).await;
        }
        if selector == IERC721Enumerable::tokenURICall::SELECTOR {
            let call = IERC721Enumerable::tokenURICall::abi_decode(&data).unwrap();
            return match self.token_uris.get(&call.tokenId) {
                Some(uri) => Ok(encode(uri.clone())),
                None => Err(revert("ERC721Metadata: URI query for nonexistent token")),
            };
        }
        panic!("unexpected selector {selector:?}");
    }
}

/// ABI-encode a single return value
pub fn encode<T: SolValue>(value: T) -> Bytes {
    Bytes::from((value,).abi_encode_params())
}

fn revert(reason: &str) -> AvalonError {
    AvalonError::Rpc {
        code: 3,
        message: format!("execution reverted: {reason}"),
        data: None,
    }
}
