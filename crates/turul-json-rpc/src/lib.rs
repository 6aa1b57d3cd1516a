//! # JSON-RPC 2.0 Client and Server Core
//!
//! A transport-agnostic JSON-RPC 2.0 implementation. The crate works on
//! already-decoded messages: the caller side hands requests to a send function
//! you supply, the callee side turns decoded payloads into responses. Moving
//! bytes and encoding JSON text stay with the transport.
//!
//! ## Features
//! - Wire types for requests, responses and error objects
//! - Structural validation of arbitrary decoded payloads
//! - Client with pluggable correlation ids and typed remote errors
//! - Server with a method registry, notification handling and error mapping
//!
//! ```rust
//! use std::convert::Infallible;
//! use std::sync::Arc;
//!
//! use serde_json::{json, Value};
//! use turul_json_rpc::prelude::*;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let mut server = JsonRpcServer::<()>::new();
//! server.add_method("echo", |params, _| async move {
//!     let text = params.and_then(|p| p.get("text").cloned()).unwrap_or(Value::Null);
//!     Ok::<_, HandlerError>(text)
//! });
//! let server = Arc::new(server);
//!
//! let client = JsonRpcClient::new(move |request: JsonRpcRequest, context: Option<()>| {
//!     let server = Arc::clone(&server);
//!     async move { Ok::<_, Infallible>(server.process_request(request, context).await) }
//! });
//!
//! let result = client
//!     .call("echo", Some(json!({"text": "hi"}).try_into().unwrap()), None)
//!     .await
//!     .unwrap();
//! assert_eq!(result, json!("hi"));
//! # }
//! ```

pub mod config;
pub mod error;
pub mod prelude;
pub mod request;
pub mod response;
pub mod types;
pub mod validation;

#[cfg(feature = "async")]
pub mod client;
#[cfg(feature = "async")]
pub mod server;

// Re-export main types
pub use config::{Logger, NoopLogger, ServerOptions, TracingLogger, DEFAULT_ERROR_CODE};
pub use error::{
    ClientError, HandlerError, HandlerPanic, JsonRpcErrorCode, JsonRpcErrorObject, ProcessError,
    ProtocolError, RemoteError,
};
pub use request::{JsonRpcRequest, RequestParams};
pub use response::{JsonRpcResponse, build_error_response};
pub use types::{JsonRpcVersion, RequestId};
pub use validation::{is_valid_request, is_valid_response};

#[cfg(feature = "async")]
pub use client::{IdGenerator, JsonRpcClient, SendRequest, SequentialIdGenerator};
#[cfg(feature = "async")]
pub use server::{FunctionHandler, JsonRpcHandler, JsonRpcServer};

/// JSON-RPC 2.0 version constant
pub const JSONRPC_VERSION: &str = "2.0";

/// Standard JSON-RPC 2.0 error codes
pub mod error_codes {
    pub const PARSE_ERROR: i64 = -32700;
    pub const INVALID_REQUEST: i64 = -32600;
    pub const METHOD_NOT_FOUND: i64 = -32601;
    pub const INVALID_PARAMS: i64 = -32602;
    pub const INTERNAL_ERROR: i64 = -32603;
}
