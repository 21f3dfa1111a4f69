/*
[INPUT]:  JSON-RPC method names and parameters
[OUTPUT]: Serializable request envelopes
[POS]:    Data layer - outbound JSON-RPC payloads
[UPDATE]: When the RPC envelope or eth_call shape changes
*/

use alloy_primitives::{Address, Bytes};
use serde::Serialize;
use serde_json::Value;

pub const JSONRPC_VERSION: &str = "2.0";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JsonRpcRequest<'a> {
    pub jsonrpc: &'static str,
    pub id: u64,
    pub method: &'a str,
    pub params: Value,
}

impl<'a> JsonRpcRequest<'a> {
    pub fn new(id: u64, method: &'a str, params: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            method,
            params,
        }
    }
}

/// Call object for `eth_call`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EthCallRequest {
    pub to: Address,
    pub data: Bytes,
}
