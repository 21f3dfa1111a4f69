/*
[INPUT]:  Token metadata URIs (ipfs:// or http(s)://)
[OUTPUT]: Parsed token metadata documents
[POS]:    HTTP layer - off-chain metadata resolution with bounded retry
[UPDATE]: When changing fetch policy or metadata schema handling
*/

use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};

use crate::http::{AvalonError, ClientConfig, IpfsGateway, Result, RetryConfig};
use crate::types::TokenMetadata;

/// Fetches token metadata JSON through an IPFS gateway
///
/// Every call hits the network; there is no cache.
#[derive(Debug, Clone)]
pub struct MetadataClient {
    http_client: Client,
    gateway: IpfsGateway,
    retry: RetryConfig,
}

impl MetadataClient {
    /// Create a client with default timeouts, gateway and retry policy
    pub fn new() -> Result<Self> {
        Self::with_config(&ClientConfig::default(), IpfsGateway::default(), RetryConfig::default())
    }

    pub fn with_config(config: &ClientConfig, gateway: IpfsGateway, retry: RetryConfig) -> Result<Self> {
        Ok(Self {
            http_client: config.build_http_client()?,
            gateway,
            retry,
        })
    }

    pub fn gateway(&self) -> &IpfsGateway {
        &self.gateway
    }

    pub fn retry_config(&self) -> &RetryConfig {
        &self.retry
    }

    /// Resolve a metadata URI and parse the document
    pub async fn fetch_metadata(&self, uri: &str) -> Result<TokenMetadata> {
        let url = self.gateway.rewrite(uri);
        let document = self.fetch_json(&url).await?;
        parse_metadata(&url, document)
    }

    /// GET a JSON document, retrying transient failures with backoff
    pub async fn fetch_json(&self, url: &str) -> Result<Value> {
        let mut attempt = 0;
        loop {
            let err = match self.fetch_once(url).await {
                Ok(document) => return Ok(document),
                Err(err) => err,
            };
            let Some(delay) = err.retry_delay(&self.retry, attempt) else {
                return Err(err);
            };

            warn!(
                url,
                attempt,
                delay_ms = delay.as_millis() as u64,
                error = %err,
                "metadata fetch failed, retrying"
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }

    async fn fetch_once(&self, url: &str) -> Result<Value> {
        debug!(url, "fetching token metadata");
        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|err| transport_error(url, err))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AvalonError::metadata_status(url, status));
        }

        let body = response.bytes().await.map_err(|err| transport_error(url, err))?;
        serde_json::from_slice(&body).map_err(|err| AvalonError::MetadataFetch {
            url: url.to_string(),
            message: format!("response body is not JSON: {err}"),
            transient: false,
        })
    }
}

fn transport_error(url: &str, err: reqwest::Error) -> AvalonError {
    AvalonError::MetadataFetch {
        url: url.to_string(),
        transient: err.is_timeout() || err.is_connect() || err.is_body(),
        message: err.to_string(),
    }
}

fn parse_metadata(url: &str, document: Value) -> Result<TokenMetadata> {
    match document.get("image") {
        Some(Value::String(_)) => {}
        Some(other) => {
            return Err(AvalonError::MetadataShape {
                url: url.to_string(),
                message: format!("`image` must be a string, got {other}"),
            });
        }
        None => {
            return Err(AvalonError::MetadataShape {
                url: url.to_string(),
                message: "document has no `image` field".to_string(),
            });
        }
    }

    serde_json::from_value(document).map_err(|err| AvalonError::MetadataShape {
        url: url.to_string(),
        message: err.to_string(),
    })
}
