/*
[INPUT]:  Crate modules and public type definitions
[OUTPUT]: Public Avalon NFT adapter crate surface
[POS]:    Crate root - module wiring
[UPDATE]: When public modules or exports change
*/

pub mod auth;
pub mod contract;
pub mod http;
pub mod provider;
pub mod types;

// Re-export commonly used types from auth
pub use auth::{
    EvmWalletSigner,
    LoginFlow,
    LoginGrant,
    LoginPath,
    MockLoginFlow,
    MockWalletSigner,
    ProviderFactory,
    SessionManager,
    WalletSigner,
};

// Re-export commonly used types from contract
pub use contract::{AVALON_CONTRACT_ADDRESS, DEFAULT_MAX_ENUMERABLE, NftReader, ReaderConfig};

// Re-export commonly used types from http
pub use http::{
    AvalonError,
    ClientConfig,
    DEFAULT_IPFS_GATEWAY,
    IpfsGateway,
    MetadataClient,
    Result,
    RetryConfig,
    RpcClient,
    rewrite_ipfs_uri,
};

// Re-export provider capability
pub use provider::{Provider, SigningProvider};

// Re-export all types
pub use types::*;

pub use alloy_primitives::{Address, Bytes, U256};
