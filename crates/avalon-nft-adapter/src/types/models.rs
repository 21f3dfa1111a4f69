/*
[INPUT]:  Chain descriptor, contract results and metadata documents
[OUTPUT]: Typed Rust structs with serialization support
[POS]:    Data layer - domain models
[UPDATE]: When chain config, NFT records or metadata schema change
*/

use alloy_primitives::{Address, Bytes, U256};
use serde::{Deserialize, Serialize};

use super::enums::ChainNamespace;

pub const RINKEBY_CHAIN_ID: u64 = 4;

/// Static description of the network every provider is bound to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainConfig {
    #[serde(default)]
    pub namespace: ChainNamespace,
    pub chain_id: u64,
    pub rpc_target: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_explorer: Option<String>,
    #[serde(default = "default_ticker")]
    pub ticker: String,
    #[serde(default = "default_ticker_name")]
    pub ticker_name: String,
}

impl ChainConfig {
    /// Rinkeby test network served by the given RPC endpoint
    pub fn rinkeby(rpc_target: impl Into<String>) -> Self {
        Self {
            namespace: ChainNamespace::Eip155,
            chain_id: RINKEBY_CHAIN_ID,
            rpc_target: rpc_target.into(),
            display_name: "rinkeby".to_string(),
            block_explorer: Some("https://rinkeby.etherscan.io/".to_string()),
            ticker: default_ticker(),
            ticker_name: default_ticker_name(),
        }
    }

    /// Chain id as the `0x`-prefixed quantity returned by `eth_chainId`
    pub fn chain_id_hex(&self) -> String {
        format!("0x{:x}", self.chain_id)
    }
}

fn default_ticker() -> String {
    "ETH".to_string()
}

fn default_ticker_name() -> String {
    "Ethereum".to_string()
}

/// An owned token with its displayable image
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Nft {
    #[serde(
        serialize_with = "serde_helpers::serialize_u256_decimal",
        deserialize_with = "serde_helpers::deserialize_u256_decimal"
    )]
    pub token_id: U256,
    pub image_url: String,
}

/// Token metadata document referenced by `tokenURI`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenMetadata {
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<serde_json::Value>,
}

/// Profile reported by the hosted login service
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verifier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verifier_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub login_type: Option<String>,
}

/// EIP-1559 transaction fields to sign locally
///
/// `to: None` signs a contract creation. The chain id is taken from the
/// provider's [`ChainConfig`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRequest {
    #[serde(default)]
    pub to: Option<Address>,
    #[serde(default)]
    pub value: U256,
    #[serde(default)]
    pub data: Bytes,
    pub nonce: u64,
    pub gas_limit: u64,
    pub max_fee_per_gas: u128,
    pub max_priority_fee_per_gas: u128,
}

mod serde_helpers {
    use alloy_primitives::U256;
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn serialize_u256_decimal<S>(value: &U256, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize_u256_decimal<'de, D>(deserializer: D) -> Result<U256, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse::<U256>().map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nft_serializes_decimal_token_id() {
        let nft = Nft {
            token_id: U256::from(7),
            image_url: "https://ipfs.io/ipfs/abc/7.png".to_string(),
        };
        let value = serde_json::to_value(&nft).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"tokenId": "7", "imageUrl": "https://ipfs.io/ipfs/abc/7.png"})
        );

        let back: Nft = serde_json::from_value(value).unwrap();
        assert_eq!(back, nft);
    }

    #[test]
    fn test_metadata_keeps_optional_fields() {
        let metadata: TokenMetadata = serde_json::from_value(serde_json::json!({
            "name": "Avalon #7",
            "image": "ipfs://abc/7.png",
            "attributes": [{"trait_type": "tier", "value": "gold"}]
        }))
        .unwrap();

        assert_eq!(metadata.image, "ipfs://abc/7.png");
        assert_eq!(metadata.name.as_deref(), Some("Avalon #7"));
        assert!(metadata.description.is_none());
        assert_eq!(metadata.attributes.len(), 1);
    }

    #[test]
    fn test_chain_config_defaults_from_yaml_shape() {
        let chain: ChainConfig = serde_json::from_value(serde_json::json!({
            "chain_id": 4,
            "rpc_target": "https://rinkeby.example"
        }))
        .unwrap();

        assert_eq!(chain.namespace, ChainNamespace::Eip155);
        assert_eq!(chain.ticker, "ETH");
        assert_eq!(chain.chain_id_hex(), "0x4");
    }
}
