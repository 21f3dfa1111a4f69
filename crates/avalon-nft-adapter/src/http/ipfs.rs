/*
[INPUT]:  Token and image URIs, optionally using the ipfs:// scheme
[OUTPUT]: HTTP(S) URLs fetchable through a gateway
[POS]:    HTTP layer - IPFS gateway rewriting
[UPDATE]: When changing the default gateway or rewrite rules
*/

use crate::http::{AvalonError, Result};

pub const IPFS_SCHEME: &str = "ipfs://";
pub const DEFAULT_IPFS_GATEWAY: &str = "https://ipfs.io/ipfs/";

/// Rewrite `ipfs://X` to `https://ipfs.io/ipfs/X`; anything else is returned as-is
pub fn rewrite_ipfs_uri(uri: &str) -> String {
    IpfsGateway::default().rewrite(uri)
}

/// HTTP gateway used to resolve `ipfs://` URIs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IpfsGateway {
    base: String,
}

impl Default for IpfsGateway {
    fn default() -> Self {
        Self {
            base: DEFAULT_IPFS_GATEWAY.to_string(),
        }
    }
}

impl IpfsGateway {
    /// Create a gateway from its base URL, e.g. `https://cloudflare-ipfs.com/ipfs/`
    ///
    /// The base must be http(s) so that rewritten URIs never carry the
    /// `ipfs://` scheme again.
    pub fn new(base: impl Into<String>) -> Result<Self> {
        let mut base = base.into().trim().to_string();
        if !(base.starts_with("https://") || base.starts_with("http://")) {
            return Err(AvalonError::Config(format!(
                "IPFS gateway must be an http(s) URL, got {base:?}"
            )));
        }
        if !base.ends_with('/') {
            base.push('/');
        }
        Ok(Self { base })
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// Rewrite an `ipfs://` URI through this gateway
    pub fn rewrite(&self, uri: &str) -> String {
        match uri.strip_prefix(IPFS_SCHEME) {
            Some(path) => format!("{}{}", self.base, path),
            None => uri.to_string(),
        }
    }
}
