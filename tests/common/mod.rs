//! In-process transport used by the integration tests.
//!
//! `Loopback` pushes every request through its JSON form into
//! `JsonRpcServer::process` and decodes the response the same way, so the
//! client only ever sees what a real peer would have put on the wire.

#![allow(dead_code)]

use std::sync::{Arc, Mutex, Once};

use async_trait::async_trait;
use turul_json_rpc::{
    JsonRpcRequest, JsonRpcResponse, JsonRpcServer, ProcessError, RequestId, SendRequest,
};

static TRACING: Once = Once::new();

/// Install a test subscriber once per binary. `RUST_LOG` controls output.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

pub struct Loopback<C> {
    server: Arc<JsonRpcServer<C>>,
}

impl<C> Loopback<C> {
    pub fn new(server: Arc<JsonRpcServer<C>>) -> Self {
        Self { server }
    }
}

#[async_trait]
impl<C> SendRequest<C> for Loopback<C>
where
    C: Send + 'static,
{
    type Error = ProcessError;

    async fn send(
        &self,
        request: JsonRpcRequest,
        context: Option<C>,
    ) -> Result<Option<JsonRpcResponse>, ProcessError> {
        let payload = serde_json::to_value(&request).expect("request serializes");
        let response = self.server.process(payload, context).await?;

        Ok(response.map(|response| {
            let wire = serde_json::to_string(&response).expect("response serializes");
            serde_json::from_str(&wire).expect("response decodes")
        }))
    }
}

pub type SeenIds = Arc<Mutex<Vec<Option<RequestId>>>>;

/// Wraps another sender and records the id of every outgoing request
pub struct RecordIds<S> {
    inner: S,
    seen: SeenIds,
}

impl<S> RecordIds<S> {
    pub fn new(inner: S) -> (Self, SeenIds) {
        let seen: SeenIds = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                inner,
                seen: seen.clone(),
            },
            seen,
        )
    }
}

#[async_trait]
impl<C, S> SendRequest<C> for RecordIds<S>
where
    C: Send + 'static,
    S: SendRequest<C>,
{
    type Error = S::Error;

    async fn send(
        &self,
        request: JsonRpcRequest,
        context: Option<C>,
    ) -> Result<Option<JsonRpcResponse>, S::Error> {
        self.seen.lock().unwrap().push(request.id.clone());
        self.inner.send(request, context).await
    }
}
