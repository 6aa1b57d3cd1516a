use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use thiserror::Error;

use crate::response::JsonRpcResponse;

/// Message used when a handler failure carries no text of its own
pub(crate) const FALLBACK_ERROR_MESSAGE: &str = "An unexpected error occurred";

/// Failure returned by a method handler
pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Handler failure raised when a handler panics instead of returning.
///
/// The panic text stays local: it reaches the logger and the error observer,
/// while the peer only sees the generic message.
#[derive(Debug, Error)]
#[error("{}", FALLBACK_ERROR_MESSAGE)]
pub struct HandlerPanic {
    /// The panic payload, when it was a string
    pub message: Option<String>,
}

impl HandlerPanic {
    #[cfg(feature = "async")]
    pub(crate) fn from_payload(payload: Box<dyn std::any::Any + Send>) -> Self {
        let message = match payload.downcast::<String>() {
            Ok(message) => Some(*message),
            Err(payload) => payload.downcast_ref::<&str>().map(|s| s.to_string()),
        };
        Self { message }
    }
}

/// JSON-RPC error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonRpcErrorCode {
    ParseError,
    InvalidRequest,
    MethodNotFound,
    InvalidParams,
    InternalError,
    /// Implementation-defined code raised by application handlers
    Application(i64),
}

impl JsonRpcErrorCode {
    pub fn code(&self) -> i64 {
        match self {
            JsonRpcErrorCode::ParseError => crate::error_codes::PARSE_ERROR,
            JsonRpcErrorCode::InvalidRequest => crate::error_codes::INVALID_REQUEST,
            JsonRpcErrorCode::MethodNotFound => crate::error_codes::METHOD_NOT_FOUND,
            JsonRpcErrorCode::InvalidParams => crate::error_codes::INVALID_PARAMS,
            JsonRpcErrorCode::InternalError => crate::error_codes::INTERNAL_ERROR,
            JsonRpcErrorCode::Application(code) => *code,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            JsonRpcErrorCode::ParseError => "Parse error",
            JsonRpcErrorCode::InvalidRequest => "Invalid Request",
            JsonRpcErrorCode::MethodNotFound => "Method not found",
            JsonRpcErrorCode::InvalidParams => "Invalid params",
            JsonRpcErrorCode::InternalError => "Internal error",
            JsonRpcErrorCode::Application(_) => FALLBACK_ERROR_MESSAGE,
        }
    }

    /// Whether the code belongs to the reserved protocol set
    pub fn is_reserved(&self) -> bool {
        !matches!(self, JsonRpcErrorCode::Application(_))
    }
}

impl From<i64> for JsonRpcErrorCode {
    fn from(code: i64) -> Self {
        match code {
            crate::error_codes::PARSE_ERROR => JsonRpcErrorCode::ParseError,
            crate::error_codes::INVALID_REQUEST => JsonRpcErrorCode::InvalidRequest,
            crate::error_codes::METHOD_NOT_FOUND => JsonRpcErrorCode::MethodNotFound,
            crate::error_codes::INVALID_PARAMS => JsonRpcErrorCode::InvalidParams,
            crate::error_codes::INTERNAL_ERROR => JsonRpcErrorCode::InternalError,
            other => JsonRpcErrorCode::Application(other),
        }
    }
}

impl From<JsonRpcErrorCode> for i64 {
    fn from(code: JsonRpcErrorCode) -> Self {
        code.code()
    }
}

impl fmt::Display for JsonRpcErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code(), self.message())
    }
}

/// JSON-RPC Error object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcErrorObject {
    pub code: i64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonRpcErrorObject {
    pub fn new(code: JsonRpcErrorCode, message: Option<String>, data: Option<Value>) -> Self {
        Self {
            code: code.code(),
            message: message.unwrap_or_else(|| code.message().to_string()),
            data,
        }
    }

    pub fn parse_error(data: Option<Value>) -> Self {
        Self::new(JsonRpcErrorCode::ParseError, None, data)
    }

    pub fn invalid_request(data: Option<Value>) -> Self {
        Self::new(JsonRpcErrorCode::InvalidRequest, None, data)
    }

    pub fn method_not_found() -> Self {
        Self::new(JsonRpcErrorCode::MethodNotFound, None, None)
    }

    pub fn invalid_params(message: Option<String>, data: Option<Value>) -> Self {
        Self::new(JsonRpcErrorCode::InvalidParams, message, data)
    }

    pub fn internal_error(message: Option<String>, data: Option<Value>) -> Self {
        Self::new(JsonRpcErrorCode::InternalError, message, data)
    }

    pub fn kind(&self) -> JsonRpcErrorCode {
        JsonRpcErrorCode::from(self.code)
    }
}

/// A failure reported by the remote side in a response's `error` member.
///
/// Only [`crate::JsonRpcClient`] constructs this; servers emit plain
/// [`JsonRpcErrorObject`]s.
#[derive(Debug, Clone, Error)]
#[error("JSON-RPC remote error {code}: {message}")]
pub struct RemoteError {
    pub code: i64,
    pub message: String,
    pub data: Option<Value>,
    /// The full response the error was read from
    pub response: Option<JsonRpcResponse>,
}

impl RemoteError {
    pub fn new(
        code: i64,
        message: impl Into<String>,
        response: Option<JsonRpcResponse>,
        data: Option<Value>,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            data,
            response,
        }
    }

    /// Build from an error object, keeping the response it came in
    pub fn from_response(error: &JsonRpcErrorObject, response: JsonRpcResponse) -> Self {
        Self::new(
            error.code,
            error.message.clone(),
            Some(response),
            error.data.clone(),
        )
    }

    pub fn kind(&self) -> JsonRpcErrorCode {
        JsonRpcErrorCode::from(self.code)
    }
}

/// Local protocol failures detected by the client
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("No response returned from send function")]
    NoResponse,

    #[error("Response must carry exactly one of result or error (id {id})")]
    InconsistentResponse { id: crate::RequestId },

    #[error("Result could not be decoded: {0}")]
    UnexpectedResult(#[from] serde_json::Error),
}

/// Errors returned by [`crate::JsonRpcClient`].
///
/// The variant is the discriminant between a failure of the transport, a
/// failure reported by the remote peer, and a malformed exchange.
#[derive(Debug, Error)]
pub enum ClientError<E>
where
    E: std::error::Error + 'static,
{
    /// The send function failed; its error is carried unchanged
    #[error(transparent)]
    Transport(E),

    #[error(transparent)]
    Remote(#[from] RemoteError),

    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),
}

impl<E> ClientError<E>
where
    E: std::error::Error + 'static,
{
    pub fn is_remote(&self) -> bool {
        matches!(self, ClientError::Remote(_))
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, ClientError::Transport(_))
    }

    pub fn is_protocol(&self) -> bool {
        matches!(self, ClientError::Protocol(_))
    }

    pub fn as_remote(&self) -> Option<&RemoteError> {
        match self {
            ClientError::Remote(err) => Some(err),
            _ => None,
        }
    }

    /// Recover the transport's own error, if that is what failed
    pub fn into_transport(self) -> Result<E, Self> {
        match self {
            ClientError::Transport(err) => Ok(err),
            other => Err(other),
        }
    }
}

/// Returned by [`crate::JsonRpcServer::process`] when the payload is not a
/// structurally valid request. No response is produced in this case.
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("Received an invalid JSON-RPC request")]
    InvalidRequest { payload: Value },

    #[error("Received an invalid JSON-RPC request: {source}")]
    Undecodable {
        payload: Value,
        #[source]
        source: serde_json::Error,
    },
}

impl ProcessError {
    /// The payload that was rejected
    pub fn payload(&self) -> &Value {
        match self {
            ProcessError::InvalidRequest { payload } => payload,
            ProcessError::Undecodable { payload, .. } => payload,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RequestId;
    use serde_json::json;

    #[test]
    fn test_error_codes() {
        assert_eq!(JsonRpcErrorCode::ParseError.code(), -32700);
        assert_eq!(JsonRpcErrorCode::InvalidRequest.code(), -32600);
        assert_eq!(JsonRpcErrorCode::MethodNotFound.code(), -32601);
        assert_eq!(JsonRpcErrorCode::InvalidParams.code(), -32602);
        assert_eq!(JsonRpcErrorCode::InternalError.code(), -32603);
        assert_eq!(JsonRpcErrorCode::from(-32601), JsonRpcErrorCode::MethodNotFound);
        assert_eq!(JsonRpcErrorCode::from(0), JsonRpcErrorCode::Application(0));
        assert!(!JsonRpcErrorCode::Application(0).is_reserved());
    }

    #[test]
    fn test_reserved_error_constructors() {
        let cases = [
            (JsonRpcErrorObject::parse_error(None), -32700, "Parse error"),
            (JsonRpcErrorObject::invalid_request(None), -32600, "Invalid Request"),
            (JsonRpcErrorObject::method_not_found(), -32601, "Method not found"),
            (JsonRpcErrorObject::invalid_params(None, None), -32602, "Invalid params"),
            (JsonRpcErrorObject::internal_error(None, None), -32603, "Internal error"),
        ];
        for (error, code, message) in cases {
            assert_eq!(error.code, code);
            assert_eq!(error.message, message);
            assert_eq!(error.data, None);
            assert!(error.kind().is_reserved());
        }

        let error = JsonRpcErrorObject::parse_error(Some(json!("unexpected EOF")));
        assert_eq!(error.message, "Parse error");
        assert_eq!(error.data, Some(json!("unexpected EOF")));

        let error = JsonRpcErrorObject::invalid_request(Some(json!(false)));
        assert_eq!(
            serde_json::to_value(&error).unwrap(),
            json!({"code": -32600, "message": "Invalid Request", "data": false})
        );

        let error = JsonRpcErrorObject::invalid_params(
            Some("Parameter 'a' must be a number".to_string()),
            Some(json!({"field": "a"})),
        );
        assert_eq!(error.kind(), JsonRpcErrorCode::InvalidParams);
        assert_eq!(error.message, "Parameter 'a' must be a number");
        assert_eq!(error.data, Some(json!({"field": "a"})));

        let error = JsonRpcErrorObject::internal_error(Some("db down".to_string()), None);
        assert_eq!(
            serde_json::to_value(&error).unwrap(),
            json!({"code": -32603, "message": "db down"})
        );
    }

    #[test]
    fn test_error_object_omits_missing_data() {
        let error = JsonRpcErrorObject::method_not_found();
        let json = serde_json::to_value(&error).unwrap();
        assert_eq!(json, json!({"code": -32601, "message": "Method not found"}));
    }

    #[test]
    fn test_remote_error_keeps_response() {
        let error = JsonRpcErrorObject::new(
            JsonRpcErrorCode::Application(7),
            Some("nope".to_string()),
            Some(json!({"retry": false})),
        );
        let response = JsonRpcResponse::error(RequestId::Number(3), error.clone());
        let remote = RemoteError::from_response(&error, response.clone());

        assert_eq!(remote.code, 7);
        assert_eq!(remote.message, "nope");
        assert_eq!(remote.data, Some(json!({"retry": false})));
        assert_eq!(remote.response, Some(response));
        assert_eq!(remote.to_string(), "JSON-RPC remote error 7: nope");
    }

    #[test]
    fn test_client_error_discriminants() {
        let remote: ClientError<std::io::Error> =
            RemoteError::new(0, "boom", None, None).into();
        assert!(remote.is_remote());
        assert_eq!(remote.as_remote().map(|e| e.message.as_str()), Some("boom"));

        let protocol: ClientError<std::io::Error> = ProtocolError::NoResponse.into();
        assert!(protocol.is_protocol());
        assert!(!protocol.is_remote());

        let transport = ClientError::Transport(std::io::Error::other("down"));
        assert!(transport.is_transport());
        let inner = transport.into_transport().unwrap();
        assert_eq!(inner.to_string(), "down");
    }
}
