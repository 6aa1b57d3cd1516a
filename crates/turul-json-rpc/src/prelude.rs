//! # JSON-RPC Prelude
//!
//! ```rust
//! use turul_json_rpc::prelude::*;
//! ```

pub use crate::config::{Logger, ServerOptions, TracingLogger};
pub use crate::error::{
    ClientError, HandlerError, HandlerPanic, JsonRpcErrorCode, JsonRpcErrorObject, ProcessError,
    ProtocolError, RemoteError,
};
pub use crate::request::{JsonRpcRequest, RequestParams};
pub use crate::response::{JsonRpcResponse, build_error_response};
pub use crate::types::{JsonRpcVersion, RequestId};
pub use crate::validation::{is_valid_request, is_valid_response};

#[cfg(feature = "async")]
pub use crate::client::{IdGenerator, JsonRpcClient, SendRequest};
#[cfg(feature = "async")]
pub use crate::server::{JsonRpcHandler, JsonRpcServer};

pub use crate::error_codes::*;
