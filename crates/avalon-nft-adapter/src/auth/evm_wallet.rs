/*
[INPUT]:  EVM private key (hex string)
[OUTPUT]: Signed messages, signed transactions and wallet address
[POS]:    Auth layer - EVM wallet implementation
[UPDATE]: When key validation, signing logic or address formatting changes
*/

use std::str::FromStr;

use alloy_consensus::{SignableTransaction, TxEip1559, TxEnvelope};
use alloy_eips::eip2718::Encodable2718;
use alloy_primitives::{Address, TxKind};
use alloy_signer::Signer;
use alloy_signer_local::PrivateKeySigner;
use async_trait::async_trait;

use crate::auth::WalletSigner;
use crate::http::{AvalonError, Result};
use crate::types::TransactionRequest;

const PRIVATE_KEY_HEX_LEN: usize = 64;

/// Signer for EVM-compatible wallets backed by a local secp256k1 key
pub struct EvmWalletSigner {
    signer: PrivateKeySigner,
    address: Address,
}

impl std::fmt::Debug for EvmWalletSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EvmWalletSigner")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

impl EvmWalletSigner {
    /// Create a new EVM wallet signer from a hex-encoded private key
    ///
    /// Supports both "0x"-prefixed and non-prefixed hex strings. The format is
    /// checked before the key reaches the signer.
    pub fn new(private_key_hex: &str) -> Result<Self> {
        let private_key_hex = validate_private_key(private_key_hex)?;
        let signer = PrivateKeySigner::from_str(private_key_hex)
            .map_err(|e| AvalonError::InvalidKey(format!("not a valid secp256k1 key: {e}")))?;

        let address = signer.address();

        Ok(Self { signer, address })
    }

    /// Checksummed address string
    pub fn checksum_address(&self) -> String {
        self.address.to_checksum(None)
    }
}

/// Check length and charset of a hex private key, returning the bare hex
pub fn validate_private_key(private_key_hex: &str) -> Result<&str> {
    let trimmed = private_key_hex.trim();
    let hex_part = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);

    if hex_part.len() != PRIVATE_KEY_HEX_LEN {
        return Err(AvalonError::InvalidKey(format!(
            "expected {PRIVATE_KEY_HEX_LEN} hex characters, got {}",
            hex_part.len()
        )));
    }
    if !hex_part.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(AvalonError::InvalidKey(
            "key contains non-hex characters".to_string(),
        ));
    }

    Ok(hex_part)
}

#[async_trait]
impl WalletSigner for EvmWalletSigner {
    fn address(&self) -> Address {
        self.address
    }

    async fn sign_message(&self, message: &[u8]) -> Result<String> {
        let signature = self
            .signer
            .sign_message(message)
            .await
            .map_err(|e| AvalonError::Internal(format!("Failed to sign EVM message: {e}")))?;

        Ok(format!("0x{}", hex::encode(signature.as_bytes())))
    }

    async fn sign_transaction(&self, tx: &TransactionRequest, chain_id: u64) -> Result<String> {
        let unsigned = TxEip1559 {
            chain_id,
            nonce: tx.nonce,
            gas_limit: tx.gas_limit,
            max_fee_per_gas: tx.max_fee_per_gas,
            max_priority_fee_per_gas: tx.max_priority_fee_per_gas,
            to: tx.to.map(TxKind::Call).unwrap_or(TxKind::Create),
            value: tx.value,
            access_list: Default::default(),
            input: tx.data.clone(),
        };

        let signature = self
            .signer
            .sign_hash(&unsigned.signature_hash())
            .await
            .map_err(|e| AvalonError::Internal(format!("Failed to sign EVM transaction: {e}")))?;

        let envelope = TxEnvelope::from(unsigned.into_signed(signature));
        Ok(format!("0x{}", hex::encode(envelope.encoded_2718())))
    }
}
