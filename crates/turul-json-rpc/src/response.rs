use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::JsonRpcErrorObject;
use crate::types::{JsonRpcVersion, RequestId, present};

/// A JSON-RPC response.
///
/// A well-formed response carries exactly one of `result` and `error`. Both
/// members are independently optional here so that a malformed response from
/// a peer can still be decoded and then rejected by the client. An explicit
/// `"result": null` is a defined result and decodes as `Some(Value::Null)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    #[serde(rename = "jsonrpc")]
    pub version: JsonRpcVersion,
    pub id: RequestId,
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcErrorObject>,
}

impl JsonRpcResponse {
    pub fn success(id: RequestId, result: Value) -> Self {
        Self {
            version: JsonRpcVersion::V2_0,
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn error(id: RequestId, error: JsonRpcErrorObject) -> Self {
        Self {
            version: JsonRpcVersion::V2_0,
            id,
            result: None,
            error: Some(error),
        }
    }

    /// Success result and no error
    pub fn is_success(&self) -> bool {
        self.result.is_some() && self.error.is_none()
    }

    /// Error object and no result
    pub fn is_error(&self) -> bool {
        self.result.is_none() && self.error.is_some()
    }
}

/// Build a well-formed error response.
///
/// `data` is omitted from the wire entirely when `None`.
pub fn build_error_response(
    id: RequestId,
    code: impl Into<i64>,
    message: impl Into<String>,
    data: Option<Value>,
) -> JsonRpcResponse {
    JsonRpcResponse::error(
        id,
        JsonRpcErrorObject {
            code: code.into(),
            message: message.into(),
            data,
        },
    )
}
