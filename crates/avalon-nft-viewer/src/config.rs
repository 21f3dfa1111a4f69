/*
[INPUT]:  YAML configuration file
[OUTPUT]: Parsed viewer configuration and derived adapter settings
[POS]:    Configuration layer - chain, contract and network tuning
[UPDATE]: When adding new configuration options
*/

use std::time::Duration;

use anyhow::{Context, bail};
use avalon_nft_adapter::{
    AVALON_CONTRACT_ADDRESS, Address, ChainConfig, ClientConfig, DEFAULT_MAX_ENUMERABLE, IpfsGateway,
    ReaderConfig, RetryConfig,
};
use serde::{Deserialize, Serialize};

/// Top-level configuration for the NFT viewer
///
/// The private key is deliberately absent; it comes from the command line or
/// the environment.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ViewerConfig {
    /// Network the provider is bound to
    pub chain: ChainConfig,
    /// ERC-721 contract to read
    #[serde(default = "default_contract")]
    pub contract: Address,
    /// Account to query instead of the provider's first account
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account: Option<Address>,
    /// IPFS gateway base URL, e.g. `https://ipfs.io/ipfs/`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipfs_gateway: Option<String>,
    /// Largest token balance that `token-ids` and `nfts` will enumerate
    #[serde(default = "default_max_enumerable")]
    pub max_enumerable: u64,
    #[serde(default)]
    pub timeouts: TimeoutConfig,
    #[serde(default)]
    pub retry: RetrySettings,
}

/// Network timeouts in seconds
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TimeoutConfig {
    /// Upper bound for each contract read
    #[serde(default = "default_call_timeout_secs")]
    pub call_secs: u64,
    /// Whole-request HTTP timeout
    #[serde(default = "default_request_timeout_secs")]
    pub request_secs: u64,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            call_secs: default_call_timeout_secs(),
            request_secs: default_request_timeout_secs(),
            connect_secs: default_connect_timeout_secs(),
        }
    }
}

/// Retry policy for metadata fetches
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RetrySettings {
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_min_delay_ms")]
    pub min_delay_ms: u64,
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            min_delay_ms: default_min_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
        }
    }
}

fn default_contract() -> Address {
    AVALON_CONTRACT_ADDRESS
}

fn default_max_enumerable() -> u64 {
    DEFAULT_MAX_ENUMERABLE
}

fn default_call_timeout_secs() -> u64 {
    30
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_max_retries() -> u32 {
    RetryConfig::default().max_retries
}

fn default_min_delay_ms() -> u64 {
    RetryConfig::default().min_delay.as_millis() as u64
}

fn default_max_delay_ms() -> u64 {
    RetryConfig::default().max_delay.as_millis() as u64
}

impl ViewerConfig {
    /// Load configuration from YAML file
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path).with_context(|| format!("read {path}"))?;
        let config: Self = serde_yaml::from_str(&content).context("parse yaml")?;
        Ok(config)
    }

    /// Reject settings that would only fail later at request time
    pub fn validate(&self) -> anyhow::Result<()> {
        let rpc = self.chain.rpc_target.trim();
        if !(rpc.starts_with("http://") || rpc.starts_with("https://")) {
            bail!("chain.rpc_target must be an http(s) URL, got {rpc:?}");
        }
        if self.chain.chain_id == 0 {
            bail!("chain.chain_id must be non-zero");
        }
        if self.timeouts.call_secs == 0 || self.timeouts.request_secs == 0 {
            bail!("timeouts must be at least one second");
        }
        if self.retry.min_delay_ms > self.retry.max_delay_ms {
            bail!(
                "retry.min_delay_ms ({}) exceeds retry.max_delay_ms ({})",
                self.retry.min_delay_ms,
                self.retry.max_delay_ms
            );
        }
        if self.max_enumerable == 0 {
            bail!("max_enumerable must be at least 1");
        }
        self.gateway().context("ipfs_gateway")?;
        Ok(())
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            timeout: Duration::from_secs(self.timeouts.request_secs),
            connect_timeout: Duration::from_secs(self.timeouts.connect_secs),
        }
    }

    pub fn reader_config(&self) -> anyhow::Result<ReaderConfig> {
        Ok(ReaderConfig {
            call_timeout: Duration::from_secs(self.timeouts.call_secs),
            http: self.client_config(),
            gateway: self.gateway()?,
            retry: RetryConfig {
                max_retries: self.retry.max_retries,
                min_delay: Duration::from_millis(self.retry.min_delay_ms),
                max_delay: Duration::from_millis(self.retry.max_delay_ms),
            },
            max_enumerable: self.max_enumerable,
        })
    }

    fn gateway(&self) -> anyhow::Result<IpfsGateway> {
        match &self.ipfs_gateway {
            Some(base) => Ok(IpfsGateway::new(base.as_str())?),
            None => Ok(IpfsGateway::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
chain:
  chain_id: 4
  rpc_target: "https://rinkeby.example/v3/key"
"#;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config: ViewerConfig = serde_yaml::from_str(MINIMAL).unwrap();
        config.validate().unwrap();

        assert_eq!(config.contract, AVALON_CONTRACT_ADDRESS);
        assert!(config.account.is_none());
        assert_eq!(config.chain.ticker, "ETH");

        let reader = config.reader_config().unwrap();
        assert_eq!(reader.call_timeout, Duration::from_secs(30));
        assert_eq!(reader.gateway.base(), "https://ipfs.io/ipfs/");
        assert_eq!(reader.retry, RetryConfig::default());
        assert_eq!(reader.max_enumerable, DEFAULT_MAX_ENUMERABLE);
    }

    #[test]
    fn test_from_file_reads_yaml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, MINIMAL.as_bytes()).unwrap();

        let config = ViewerConfig::from_file(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.chain.chain_id, 4);
        assert!(ViewerConfig::from_file("/nonexistent/avalon.yaml").is_err());
    }

    #[test]
    fn test_full_config() {
        let yaml = r#"
chain:
  chain_id: 4
  rpc_target: "https://rinkeby.example/v3/key"
  display_name: rinkeby
contract: "0xa37664d42D11F2645D9949148eDa6bBb9d45eacB"
account: "0x1111111111111111111111111111111111111111"
ipfs_gateway: "https://cloudflare-ipfs.com/ipfs"
max_enumerable: 500
timeouts:
  call_secs: 5
retry:
  max_retries: 0
"#;
        let config: ViewerConfig = serde_yaml::from_str(yaml).unwrap();
        config.validate().unwrap();

        assert_eq!(config.account, Some(Address::repeat_byte(0x11)));
        let reader = config.reader_config().unwrap();
        assert_eq!(reader.call_timeout, Duration::from_secs(5));
        assert_eq!(reader.gateway.base(), "https://cloudflare-ipfs.com/ipfs/");
        assert_eq!(reader.retry.max_retries, 0);
        assert_eq!(reader.max_enumerable, 500);
        assert_eq!(config.client_config().connect_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_validate_rejects_bad_settings() {
        let mut config: ViewerConfig = serde_yaml::from_str(MINIMAL).unwrap();
        config.chain.rpc_target = "ws://rinkeby.example".to_string();
        assert!(config.validate().is_err());

        let mut config: ViewerConfig = serde_yaml::from_str(MINIMAL).unwrap();
        config.ipfs_gateway = Some("ipfs://gateway".to_string());
        assert!(config.validate().is_err());

        let mut config: ViewerConfig = serde_yaml::from_str(MINIMAL).unwrap();
        config.retry.min_delay_ms = 5_000;
        assert!(config.validate().is_err());

        let mut config: ViewerConfig = serde_yaml::from_str(MINIMAL).unwrap();
        config.max_enumerable = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_private_key_field_is_not_part_of_config() {
        let yaml = format!("{MINIMAL}private_key: \"0xdeadbeef\"\n");
        let config: ViewerConfig = serde_yaml::from_str(&yaml).unwrap();
        let rendered = serde_yaml::to_string(&config).unwrap();
        assert!(!rendered.contains("deadbeef"));
    }
}
