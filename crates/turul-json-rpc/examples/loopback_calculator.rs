//! Loopback Calculator JSON-RPC Example
//!
//! Wires a client straight into a server in the same process. The send
//! function stands in for a real transport: it round-trips each request
//! through JSON text, hands it to `process`, and encodes the response back.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::{Value, json};
use tracing::info;
use turul_json_rpc::prelude::*;

#[derive(Debug, Deserialize)]
struct Operands {
    a: f64,
    b: f64,
}

#[derive(Debug, thiserror::Error)]
enum CalculatorError {
    #[error("Division by zero")]
    DivisionByZero,
    #[error("Invalid operands: {0}")]
    InvalidOperands(#[from] serde_json::Error),
}

fn operands(params: Option<RequestParams>) -> Result<Operands, CalculatorError> {
    Ok(params.unwrap_or(RequestParams::Array(vec![])).parse()?)
}

fn build_server() -> JsonRpcServer<String> {
    let options = ServerOptions::new()
        .with_logger(TracingLogger)
        .with_error_data(|err| {
            err.downcast_ref::<CalculatorError>()
                .map(|e| json!({"kind": format!("{:?}", e)}))
        });

    let mut server = JsonRpcServer::with_options(options);
    server.add_method("add", |params, _| async move {
        let Operands { a, b } = operands(params)?;
        Ok::<_, CalculatorError>(a + b)
    });
    server.add_method("divide", |params, _| async move {
        let Operands { a, b } = operands(params)?;
        if b == 0.0 {
            return Err(CalculatorError::DivisionByZero);
        }
        Ok(a / b)
    });
    server.add_method("log", |params, session: Option<String>| async move {
        info!(session = ?session, params = ?params, "log notification");
        Ok::<_, HandlerError>(())
    });
    server
}

/// Push the request through its wire form, as a socket would
async fn round_trip(
    server: Arc<JsonRpcServer<String>>,
    request: JsonRpcRequest,
    session: Option<String>,
) -> Result<Option<JsonRpcResponse>, std::io::Error> {
    let payload: Value = serde_json::from_str(&serde_json::to_string(&request)?)?;
    let response = server
        .process(payload, session)
        .await
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

    match response {
        Some(response) => Ok(Some(serde_json::from_str(&serde_json::to_string(&response)?)?)),
        None => Ok(None),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,turul_json_rpc=debug".into()),
        )
        .init();

    let server = Arc::new(build_server());

    let transport = {
        let server = Arc::clone(&server);
        move |request: JsonRpcRequest, session: Option<String>| {
            round_trip(Arc::clone(&server), request, session)
        }
    };
    let client = JsonRpcClient::new(transport);
    let session = Some("session-1".to_string());

    let sum = client
        .call("add", Some(json!({"a": 5, "b": 3}).try_into()?), session.clone())
        .await?;
    info!("add(5, 3) = {}", sum);

    let quotient: f64 = client
        .call_typed("divide", Some(json!([10, 4]).try_into()?), session.clone())
        .await?;
    info!("divide(10, 4) = {}", quotient);

    match client
        .call("divide", Some(json!({"a": 1, "b": 0}).try_into()?), session.clone())
        .await
    {
        Err(ClientError::Remote(remote)) => {
            info!(
                code = remote.code,
                data = ?remote.data,
                "divide(1, 0) failed remotely: {}",
                remote.message
            )
        }
        other => info!("unexpected outcome: {:?}", other),
    }

    match client.call("multiply", None, session.clone()).await {
        Err(ClientError::Remote(remote)) => info!("multiply: {}", remote.kind()),
        other => info!("unexpected outcome: {:?}", other),
    }

    client
        .notify("log", Some(json!({"message": "done"}).try_into()?), session)
        .await?;

    Ok(())
}
