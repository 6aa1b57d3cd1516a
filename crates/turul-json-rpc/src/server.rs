use std::collections::HashMap;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use async_trait::async_trait;
use futures::FutureExt;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::config::{ResolvedOptions, ServerOptions};
use crate::error::{
    FALLBACK_ERROR_MESSAGE, HandlerError, HandlerPanic, JsonRpcErrorObject, ProcessError,
};
use crate::request::{JsonRpcRequest, RequestParams};
use crate::response::{JsonRpcResponse, build_error_response};
use crate::types::RequestId;
use crate::validation::is_valid_request;

/// Application logic registered under a method name
#[async_trait]
pub trait JsonRpcHandler<C = ()>: Send + Sync {
    /// Handle a call or notification.
    ///
    /// A returned `Value::Null` is sent as `"result": null`. Errors are turned
    /// into error responses by the server; they never escape `process`. A
    /// panic is caught and handled like an error ([`HandlerPanic`]).
    async fn handle(
        &self,
        params: Option<RequestParams>,
        context: Option<C>,
    ) -> Result<Value, HandlerError>;
}

/// Adapts an async closure into a [`JsonRpcHandler`].
///
/// The closure's success value is serialized with `serde_json`; `()` becomes
/// `null`.
pub struct FunctionHandler<F> {
    handler_fn: F,
}

impl<F> FunctionHandler<F> {
    pub fn new(handler_fn: F) -> Self {
        Self { handler_fn }
    }
}

#[async_trait]
impl<C, F, Fut, R, E> JsonRpcHandler<C> for FunctionHandler<F>
where
    C: Send + 'static,
    F: Fn(Option<RequestParams>, Option<C>) -> Fut + Send + Sync,
    Fut: Future<Output = Result<R, E>> + Send + 'static,
    R: Serialize + Send + 'static,
    E: Into<HandlerError> + Send + 'static,
{
    async fn handle(
        &self,
        params: Option<RequestParams>,
        context: Option<C>,
    ) -> Result<Value, HandlerError> {
        let value = (self.handler_fn)(params, context)
            .await
            .map_err(Into::<HandlerError>::into)?;
        Ok(serde_json::to_value(value)?)
    }
}

/// JSON-RPC server: a method registry plus the request state machine.
///
/// Methods are registered through `&mut self` during setup; `process` only
/// needs `&self`, so a fully configured server can be shared (e.g. in an
/// `Arc`) and driven concurrently.
pub struct JsonRpcServer<C = ()> {
    methods: HashMap<String, Arc<dyn JsonRpcHandler<C>>>,
    options: ResolvedOptions,
}

impl<C> JsonRpcServer<C>
where
    C: Send + 'static,
{
    pub fn new() -> Self {
        Self {
            methods: HashMap::new(),
            options: ResolvedOptions::default(),
        }
    }

    pub fn with_options(options: ServerOptions) -> Self {
        Self {
            methods: HashMap::new(),
            options: options.resolve(),
        }
    }

    /// Register an async closure under `name`, replacing any previous handler
    pub fn add_method<F, Fut, R, E>(&mut self, name: impl Into<String>, method: F)
    where
        F: Fn(Option<RequestParams>, Option<C>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<R, E>> + Send + 'static,
        R: Serialize + Send + 'static,
        E: Into<HandlerError> + Send + 'static,
    {
        self.add_handler(name, FunctionHandler::new(method));
    }

    /// Register a handler under `name`, replacing any previous handler
    pub fn add_handler<H>(&mut self, name: impl Into<String>, handler: H)
    where
        H: JsonRpcHandler<C> + 'static,
    {
        let name = name.into();
        if self.methods.insert(name.clone(), Arc::new(handler)).is_some() {
            debug!(method = %name, "Replaced JSON-RPC method handler");
        }
    }

    pub fn has_method(&self, name: &str) -> bool {
        self.methods.contains_key(name)
    }

    pub fn registered_methods(&self) -> Vec<String> {
        self.methods.keys().cloned().collect()
    }

    /// Process a decoded inbound payload.
    ///
    /// Returns `Ok(None)` for notifications, `Ok(Some(response))` for calls,
    /// and `Err` when the payload is not a valid request at all. In the error
    /// case no response exists; the transport decides what to send upstream.
    pub async fn process(
        &self,
        payload: Value,
        context: Option<C>,
    ) -> Result<Option<JsonRpcResponse>, ProcessError> {
        if !is_valid_request(&payload) {
            self.options
                .logger
                .warn(&format!("Received an invalid JSON-RPC request: {}", payload));
            return Err(ProcessError::InvalidRequest { payload });
        }

        let request = match JsonRpcRequest::deserialize(&payload) {
            Ok(request) => request,
            Err(source) => {
                self.options.logger.warn(&format!(
                    "Received an invalid JSON-RPC request: {} ({})",
                    payload, source
                ));
                return Err(ProcessError::Undecodable { payload, source });
            }
        };

        Ok(self.process_request(request, context).await)
    }

    /// Dispatch an already-typed request
    pub async fn process_request(
        &self,
        request: JsonRpcRequest,
        context: Option<C>,
    ) -> Option<JsonRpcResponse> {
        let is_notification = request.is_notification();
        debug!(
            method = %request.method,
            notification = is_notification,
            "Dispatching JSON-RPC request"
        );

        let Some(handler) = self.methods.get(&request.method) else {
            debug!(method = %request.method, "JSON-RPC method not found");
            return request
                .id
                .map(|id| JsonRpcResponse::error(id, JsonRpcErrorObject::method_not_found()));
        };

        let outcome = AssertUnwindSafe(handler.handle(request.params, context))
            .catch_unwind()
            .await
            .unwrap_or_else(|payload| Err(HandlerPanic::from_payload(payload).into()));

        let response = match outcome {
            Ok(result) => request.id.map(|id| JsonRpcResponse::success(id, result)),
            Err(error) => {
                let detail = match error.downcast_ref::<HandlerPanic>() {
                    Some(HandlerPanic { message: Some(message) }) => {
                        format!("handler panicked: {}", message)
                    }
                    _ => error.to_string(),
                };
                self.options.logger.error(&format!(
                    "Error occurred handling JSON-RPC request '{}': {}",
                    request.method, detail
                ));
                (self.options.on_error)(&error);
                request.id.map(|id| self.error_response(id, &error))
            }
        };

        if is_notification { None } else { response }
    }

    fn error_response(&self, id: RequestId, error: &HandlerError) -> JsonRpcResponse {
        let message = error.to_string();
        let message = if message.is_empty() {
            FALLBACK_ERROR_MESSAGE.to_string()
        } else {
            message
        };

        build_error_response(
            id,
            self.options.default_error_code,
            message,
            (self.options.error_data)(error),
        )
    }
}

impl<C> Default for JsonRpcServer<C>
where
    C: Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}
