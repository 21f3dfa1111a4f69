/*
[INPUT]:  Provider handle, contract address, reader configuration
[OUTPUT]: Owner, token URI, balance, owned token ids and resolved NFT images
[POS]:    Contract layer - ERC-721 queries and scatter/gather aggregation
[UPDATE]: When adding queries or changing fan-out/error policy
*/

use std::sync::Arc;
use std::time::Duration;

use alloy_primitives::{Address, Bytes, U256, address};
use alloy_sol_types::{SolCall, SolError};
use futures_util::future::try_join_all;
use serde_json::Value;
use tracing::{debug, info};

use crate::contract::IERC721Enumerable;
use crate::http::{AvalonError, ClientConfig, IpfsGateway, MetadataClient, Result, RetryConfig};
use crate::provider::Provider;
use crate::types::{Nft, TokenMetadata};

/// The Avalon collection on Rinkeby
pub const AVALON_CONTRACT_ADDRESS: Address = address!("0xa37664d42d11f2645d9949148eda6bbb9d45eacb");

const NONEXISTENT_TOKEN_MARKERS: [&str; 3] = [
    "nonexistent token",
    "invalid token id",
    "owner query for nonexistent",
];

/// Largest balance [`NftReader::list_owned_token_ids`] will enumerate by default
pub const DEFAULT_MAX_ENUMERABLE: u64 = 10_000;

/// Reader configuration
#[derive(Debug, Clone)]
pub struct ReaderConfig {
    /// Upper bound for each individual contract read
    pub call_timeout: Duration,
    /// HTTP timeouts for metadata fetches
    pub http: ClientConfig,
    pub gateway: IpfsGateway,
    pub retry: RetryConfig,
    /// Balances above this fail enumeration instead of fanning out
    pub max_enumerable: u64,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            call_timeout: Duration::from_secs(30),
            http: ClientConfig::default(),
            gateway: IpfsGateway::default(),
            retry: RetryConfig::default(),
            max_enumerable: DEFAULT_MAX_ENUMERABLE,
        }
    }
}

/// Read-only view of one ERC-721 contract through a provider
pub struct NftReader {
    provider: Arc<dyn Provider>,
    contract: Address,
    account: Option<Address>,
    metadata: MetadataClient,
    call_timeout: Duration,
    max_enumerable: u64,
}

impl std::fmt::Debug for NftReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NftReader")
            .field("contract", &self.contract)
            .field("account", &self.account)
            .field("call_timeout", &self.call_timeout)
            .field("max_enumerable", &self.max_enumerable)
            .finish_non_exhaustive()
    }
}

impl NftReader {
    /// Reader for the Avalon collection with default configuration
    pub fn new(provider: Arc<dyn Provider>) -> Result<Self> {
        Self::with_config(provider, AVALON_CONTRACT_ADDRESS, ReaderConfig::default())
    }

    pub fn with_config(provider: Arc<dyn Provider>, contract: Address, config: ReaderConfig) -> Result<Self> {
        let metadata = MetadataClient::with_config(&config.http, config.gateway, config.retry)?;
        Ok(Self {
            provider,
            contract,
            account: None,
            metadata,
            call_timeout: config.call_timeout,
            max_enumerable: config.max_enumerable,
        })
    }

    /// Pin the account that balance and enumeration queries run for
    pub fn with_account(mut self, account: Address) -> Self {
        self.account = Some(account);
        self
    }

    pub fn contract(&self) -> Address {
        self.contract
    }

    /// The pinned account, or the provider's first account
    pub async fn active_account(&self) -> Result<Address> {
        if let Some(account) = self.account {
            return Ok(account);
        }
        let accounts = self.provider.accounts().await?;
        accounts.first().copied().ok_or(AvalonError::ProviderInvalidated)
    }

    /// Owner of token 0, a fixed lookup that need not belong to the caller
    pub async fn owner_of_first_token(&self) -> Result<Address> {
        self.read(IERC721Enumerable::ownerOfCall { tokenId: U256::ZERO })
            .await
    }

    /// Metadata URI of `token_id`
    pub async fn token_uri(&self, token_id: U256) -> Result<String> {
        let call = IERC721Enumerable::tokenURICall { tokenId: token_id };
        let output = match self.call_raw(&call).await {
            Ok(output) => output,
            Err(err) if is_nonexistent_token(&err) => {
                return Err(AvalonError::TokenNotFound { token_id });
            }
            Err(err) => return Err(contract_error(IERC721Enumerable::tokenURICall::SIGNATURE, err)),
        };
        decode_returns::<IERC721Enumerable::tokenURICall>(&output)
    }

    /// Number of tokens held by the active account
    pub async fn balance_of(&self) -> Result<U256> {
        let account = self.active_account().await?;
        self.balance_of_account(account).await
    }

    /// Token ids of the active account, in index order
    ///
    /// All `tokenOfOwnerByIndex` lookups run concurrently. The first failure
    /// fails the whole list and drops the lookups still in flight. A balance
    /// above the configured `max_enumerable` is rejected before any lookup.
    pub async fn list_owned_token_ids(&self) -> Result<Vec<U256>> {
        let account = self.active_account().await?;
        let balance = self.balance_of_account(account).await?;
        let count = u64::try_from(balance)
            .ok()
            .filter(|count| *count <= self.max_enumerable)
            .ok_or_else(|| AvalonError::ContractCall {
                method: IERC721Enumerable::balanceOfCall::SIGNATURE.to_string(),
                message: format!(
                    "balance {balance} exceeds the enumeration limit of {}",
                    self.max_enumerable
                ),
            })?;

        debug!(%account, count, "enumerating owned tokens");
        let lookups = (0..count).map(|index| {
            self.read(IERC721Enumerable::tokenOfOwnerByIndexCall {
                owner: account,
                index: U256::from(index),
            })
        });
        try_join_all(lookups).await
    }

    /// Full metadata document of `token_id`
    pub async fn token_metadata(&self, token_id: U256) -> Result<TokenMetadata> {
        let uri = self.token_uri(token_id).await?;
        self.metadata.fetch_metadata(&uri).await
    }

    /// Resolve `token_id` to its gateway image URL
    pub async fn resolve_metadata_image(&self, token_id: U256) -> Result<Nft> {
        let metadata = self.token_metadata(token_id).await?;
        Ok(Nft {
            token_id,
            image_url: self.metadata.gateway().rewrite(&metadata.image),
        })
    }

    /// Every owned token with its image, in index order
    pub async fn list_owned_nfts_with_images(&self) -> Result<Vec<Nft>> {
        let token_ids = self.list_owned_token_ids().await?;
        let nfts = try_join_all(
            token_ids
                .iter()
                .map(|token_id| self.resolve_metadata_image(*token_id)),
        )
        .await?;

        info!(count = nfts.len(), contract = %self.contract, "resolved owned nfts");
        Ok(nfts)
    }

    async fn balance_of_account(&self, owner: Address) -> Result<U256> {
        self.read(IERC721Enumerable::balanceOfCall { owner }).await
    }

    async fn read<C: SolCall>(&self, call: C) -> Result<C::Return> {
        let output = self
            .call_raw(&call)
            .await
            .map_err(|err| contract_error(C::SIGNATURE, err))?;
        decode_returns::<C>(&output)
    }

    /// `eth_call` under the per-call timeout; provider errors are not mapped
    async fn call_raw<C: SolCall>(&self, call: &C) -> Result<Bytes> {
        let data = Bytes::from(call.abi_encode());
        match tokio::time::timeout(self.call_timeout, self.provider.call(self.contract, data)).await {
            Ok(result) => result,
            Err(_) => Err(AvalonError::ContractCall {
                method: C::SIGNATURE.to_string(),
                message: format!("timed out after {}ms", self.call_timeout.as_millis()),
            }),
        }
    }
}

fn decode_returns<C: SolCall>(output: &[u8]) -> Result<C::Return> {
    C::abi_decode_returns(output).map_err(|e| AvalonError::ContractCall {
        method: C::SIGNATURE.to_string(),
        message: format!("failed to decode return data: {e}"),
    })
}

/// Collapse a provider failure into `ContractCall`, keeping session and token errors
fn contract_error(method: &str, err: AvalonError) -> AvalonError {
    match err {
        err @ (AvalonError::ProviderInvalidated
        | AvalonError::TokenNotFound { .. }
        | AvalonError::ContractCall { .. }) => err,
        other => AvalonError::ContractCall {
            method: method.to_string(),
            message: other.to_string(),
        },
    }
}

fn is_nonexistent_token(err: &AvalonError) -> bool {
    let AvalonError::Rpc { message, data, .. } = err else {
        return false;
    };

    let message = message.to_ascii_lowercase();
    if NONEXISTENT_TOKEN_MARKERS
        .iter()
        .any(|marker| message.contains(marker))
    {
        return true;
    }

    revert_data(data.as_ref())
        .is_some_and(|bytes| bytes.starts_with(&IERC721Enumerable::ERC721NonexistentToken::SELECTOR))
}

/// Revert payload as a bare string or nested under `data`
fn revert_data(data: Option<&Value>) -> Option<Bytes> {
    let raw = match data? {
        Value::String(raw) => raw.as_str(),
        Value::Object(map) => map.get("data")?.as_str()?,
        _ => return None,
    };
    raw.parse::<Bytes>().ok()
}
