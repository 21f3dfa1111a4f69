/*
[INPUT]:  Messages and transaction fields to sign
[OUTPUT]: Hex-encoded signatures and raw signed transactions
[POS]:    Auth layer - wallet integration abstraction
[UPDATE]: When adding new wallet types or changing signature format
*/

use alloy_primitives::Address;
use async_trait::async_trait;

use crate::http::Result;
use crate::types::TransactionRequest;

/// Trait for wallet signing operations
///
/// The trait is async to support hardware wallets and external signers.
#[async_trait]
pub trait WalletSigner: Send + Sync {
    /// Get the wallet address
    fn address(&self) -> Address;

    /// Sign an EIP-191 personal message, returning `0x`-prefixed r||s||v
    async fn sign_message(&self, message: &[u8]) -> Result<String>;

    /// Sign an EIP-1559 transaction, returning the `0x`-prefixed EIP-2718 envelope
    async fn sign_transaction(&self, tx: &TransactionRequest, chain_id: u64) -> Result<String>;
}

/// Mock wallet signer for testing
#[derive(Debug, Clone)]
pub struct MockWalletSigner {
    address: Address,
    signature: String,
}

impl MockWalletSigner {
    /// Create a new mock signer with predetermined signature
    pub fn new(address: Address, signature: &str) -> Self {
        Self {
            address,
            signature: signature.to_string(),
        }
    }
}

#[async_trait]
impl WalletSigner for MockWalletSigner {
    fn address(&self) -> Address {
        self.address
    }

    async fn sign_message(&self, _message: &[u8]) -> Result<String> {
        Ok(self.signature.clone())
    }

    async fn sign_transaction(&self, _tx: &TransactionRequest, _chain_id: u64) -> Result<String> {
        Ok(self.signature.clone())
    }
}
