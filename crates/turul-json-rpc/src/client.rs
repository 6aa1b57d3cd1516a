//! Caller side: issues calls and notifications through a caller-supplied
//! send function and interprets the responses.

use std::future::Future;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{ClientError, ProtocolError, RemoteError};
use crate::request::{JsonRpcRequest, RequestParams};
use crate::response::JsonRpcResponse;
use crate::types::RequestId;

/// Delivers a request and yields the peer's response, if any.
///
/// The client never looks at how bytes move; it only interprets the returned
/// response. Any error is handed back to the caller unchanged inside
/// [`ClientError::Transport`]. Closures of the shape
/// `Fn(JsonRpcRequest, Option<C>) -> impl Future<Output = Result<Option<JsonRpcResponse>, E>>`
/// implement this trait.
#[async_trait]
pub trait SendRequest<C = ()>: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    async fn send(
        &self,
        request: JsonRpcRequest,
        context: Option<C>,
    ) -> Result<Option<JsonRpcResponse>, Self::Error>;
}

#[async_trait]
impl<C, F, Fut, E> SendRequest<C> for F
where
    C: Send + 'static,
    F: Fn(JsonRpcRequest, Option<C>) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Option<JsonRpcResponse>, E>> + Send + 'static,
    E: std::error::Error + Send + Sync + 'static,
{
    type Error = E;

    async fn send(
        &self,
        request: JsonRpcRequest,
        context: Option<C>,
    ) -> Result<Option<JsonRpcResponse>, E> {
        (self)(request, context).await
    }
}

/// Source of correlation ids for calls
pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> RequestId;
}

impl<F> IdGenerator for F
where
    F: Fn() -> RequestId + Send + Sync,
{
    fn next_id(&self) -> RequestId {
        self()
    }
}

/// Monotonically increasing integer ids; the first id is `1`
#[derive(Debug, Default)]
pub struct SequentialIdGenerator {
    counter: AtomicI64,
}

impl SequentialIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&self) -> RequestId {
        RequestId::Number(self.counter.fetch_add(1, Ordering::SeqCst) + 1)
    }
}

/// JSON-RPC client.
///
/// Single shot per call: no retries, no timeouts, no queuing. Those belong to
/// the transport behind `S`.
pub struct JsonRpcClient<S, C = ()> {
    sender: S,
    id_generator: Box<dyn IdGenerator>,
    _context: PhantomData<fn(C)>,
}

impl<S, C> JsonRpcClient<S, C>
where
    S: SendRequest<C>,
    C: Send + 'static,
{
    pub fn new(sender: S) -> Self {
        Self::with_id_generator(sender, SequentialIdGenerator::new())
    }

    pub fn with_id_generator<G>(sender: S, id_generator: G) -> Self
    where
        G: IdGenerator + 'static,
    {
        Self {
            sender,
            id_generator: Box::new(id_generator),
            _context: PhantomData,
        }
    }

    /// Invoke `method` and return its result.
    ///
    /// Fails with [`ClientError::Remote`] when the peer answered with an error
    /// object, [`ClientError::Protocol`] when the exchange itself was
    /// malformed, and [`ClientError::Transport`] when the send function failed.
    pub async fn call(
        &self,
        method: &str,
        params: Option<RequestParams>,
        context: Option<C>,
    ) -> Result<Value, ClientError<S::Error>> {
        let id = self.id_generator.next_id();
        debug!(method = method, id = %id, "Sending JSON-RPC call");

        let request = JsonRpcRequest::new(id.clone(), method, params);
        let response = self
            .sender
            .send(request, context)
            .await
            .map_err(ClientError::Transport)?
            .ok_or(ProtocolError::NoResponse)?;

        if response.id != id && !response.id.is_null() {
            warn!(
                expected = %id,
                received = %response.id,
                "JSON-RPC response id does not match the request"
            );
        }

        interpret(response)
    }

    /// [`Self::call`], then decode the result into `T`
    pub async fn call_typed<T>(
        &self,
        method: &str,
        params: Option<RequestParams>,
        context: Option<C>,
    ) -> Result<T, ClientError<S::Error>>
    where
        T: DeserializeOwned,
    {
        let result = self.call(method, params, context).await?;
        serde_json::from_value(result).map_err(|e| ProtocolError::UnexpectedResult(e).into())
    }

    /// Fire and forget. Never allocates an id and ignores whatever the send
    /// function returns, but still surfaces its failure.
    pub async fn notify(
        &self,
        method: &str,
        params: Option<RequestParams>,
        context: Option<C>,
    ) -> Result<(), ClientError<S::Error>> {
        debug!(method = method, "Sending JSON-RPC notification");

        let request = JsonRpcRequest::notification(method, params);
        self.sender
            .send(request, context)
            .await
            .map_err(ClientError::Transport)?;
        Ok(())
    }
}

fn interpret<E>(response: JsonRpcResponse) -> Result<Value, ClientError<E>>
where
    E: std::error::Error + 'static,
{
    match (response.result, response.error) {
        (Some(result), None) => Ok(result),
        (None, Some(error)) => {
            let remote = RemoteError::from_response(
                &error,
                JsonRpcResponse::error(response.id, error.clone()),
            );
            Err(remote.into())
        }
        _ => Err(ProtocolError::InconsistentResponse { id: response.id }.into()),
    }
}
