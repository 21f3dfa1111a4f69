/*
[INPUT]:  HTTP configuration (timeouts) and the chain RPC endpoint
[OUTPUT]: Configured reqwest client issuing JSON-RPC calls
[POS]:    HTTP layer - core client implementation
[UPDATE]: When adding connection options or changing client behavior
*/

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::http::{AvalonError, Result};
use crate::types::{JsonRpcRequest, JsonRpcResponse};

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

impl ClientConfig {
    pub(crate) fn build_http_client(&self) -> Result<Client> {
        Ok(Client::builder()
            .timeout(self.timeout)
            .connect_timeout(self.connect_timeout)
            .build()?)
    }
}

/// JSON-RPC client for the configured chain endpoint
#[derive(Debug)]
pub struct RpcClient {
    http_client: Client,
    rpc_url: Url,
    timeout: Duration,
    next_id: AtomicU64,
}

impl RpcClient {
    /// Create a new client with default configuration
    pub fn new(rpc_url: &str) -> Result<Self> {
        Self::with_config(ClientConfig::default(), rpc_url)
    }

    /// Create a new client with custom configuration
    pub fn with_config(config: ClientConfig, rpc_url: &str) -> Result<Self> {
        let rpc_url = Url::parse(rpc_url.trim())?;
        if !matches!(rpc_url.scheme(), "http" | "https") {
            return Err(AvalonError::Config(format!(
                "RPC target must be http(s), got {rpc_url}"
            )));
        }

        Ok(Self {
            http_client: config.build_http_client()?,
            rpc_url,
            timeout: config.timeout,
            next_id: AtomicU64::new(1),
        })
    }

    /// Endpoint this client posts to
    pub fn rpc_url(&self) -> &Url {
        &self.rpc_url
    }

    /// Send one JSON-RPC request and unwrap its result
    pub async fn request(&self, method: &str, params: Value) -> Result<Value> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        debug!(method, id, "sending json-rpc request");

        let body = JsonRpcRequest::new(id, method, params);
        let builder = self.http_client.post(self.rpc_url.clone()).json(&body);
        let response: JsonRpcResponse = self.send_json(builder).await?;
        response.into_result()
    }

    /// Send a request and decode a JSON body, mapping status and timeouts
    pub(crate) async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let response = builder.send().await.map_err(|err| self.map_send_error(err))?;
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(AvalonError::rpc_status(status, text));
        }

        let bytes = response.bytes().await.map_err(|err| self.map_send_error(err))?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    fn map_send_error(&self, err: reqwest::Error) -> AvalonError {
        if err.is_timeout() {
            AvalonError::Timeout {
                duration_ms: self.timeout.as_millis() as u64,
            }
        } else {
            AvalonError::Http(err)
        }
    }
}
