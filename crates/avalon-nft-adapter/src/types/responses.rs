/*
[INPUT]:  Raw JSON-RPC response bodies
[OUTPUT]: Typed response envelopes and error objects
[POS]:    Data layer - inbound JSON-RPC payloads
[UPDATE]: When the RPC envelope changes
*/

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::http::{AvalonError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcErrorObject {
    pub code: i64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<JsonRpcErrorObject>,
}

impl JsonRpcResponse {
    /// Unwrap the envelope; an absent result is a JSON `null`
    pub fn into_result(self) -> Result<Value> {
        match self.error {
            Some(error) => Err(AvalonError::Rpc {
                code: error.code,
                message: error.message,
                data: error.data,
            }),
            None => Ok(self.result.unwrap_or(Value::Null)),
        }
    }
}
