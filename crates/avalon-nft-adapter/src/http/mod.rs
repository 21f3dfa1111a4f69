/*
[INPUT]:  HTTP client configuration, RPC endpoint and metadata URIs
[OUTPUT]: JSON-RPC results, metadata documents and typed errors
[POS]:    HTTP layer - chain RPC and off-chain metadata communication
[UPDATE]: When adding transports or changing client behavior
*/

pub mod client;
pub mod error;
pub mod ipfs;
pub mod metadata;
pub mod retry;

pub use error::{AvalonError, Result};
pub use ipfs::{DEFAULT_IPFS_GATEWAY, IpfsGateway, rewrite_ipfs_uri};
pub use metadata::MetadataClient;
pub use retry::RetryConfig;

pub use client::{ClientConfig, RpcClient};
