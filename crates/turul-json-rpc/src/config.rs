//! Server configuration
//!
//! Every option is optional. The server resolves the options into concrete
//! hooks once at construction, substituting no-ops for anything left unset.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::error::HandlerError;

/// Produces the `data` member of an error response from a handler failure
pub type ErrorDataExtractor = Arc<dyn Fn(&HandlerError) -> Option<Value> + Send + Sync>;

/// Side-effecting hook invoked for every handler failure
pub type ErrorObserver = Arc<dyn Fn(&HandlerError) + Send + Sync>;

/// Application error code used when a handler fails
pub const DEFAULT_ERROR_CODE: i64 = 0;

/// Minimal logging surface used by the server for request-level events
pub trait Logger: Send + Sync {
    fn info(&self, message: &str);
    fn warn(&self, message: &str);
    fn error(&self, message: &str);
}

/// Discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLogger;

impl Logger for NoopLogger {
    fn info(&self, _message: &str) {}
    fn warn(&self, _message: &str) {}
    fn error(&self, _message: &str) {}
}

/// Forwards to the `tracing` macros
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn info(&self, message: &str) {
        tracing::info!(target: "turul_json_rpc", "{}", message);
    }

    fn warn(&self, message: &str) {
        tracing::warn!(target: "turul_json_rpc", "{}", message);
    }

    fn error(&self, message: &str) {
        tracing::error!(target: "turul_json_rpc", "{}", message);
    }
}

/// Options accepted by [`crate::JsonRpcServer::with_options`]
#[derive(Clone, Default)]
pub struct ServerOptions {
    pub error_data: Option<ErrorDataExtractor>,
    pub on_error: Option<ErrorObserver>,
    pub logger: Option<Arc<dyn Logger>>,
    pub default_error_code: Option<i64>,
}

impl ServerOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach structured `data` to error responses built from handler failures
    pub fn with_error_data<F>(mut self, extractor: F) -> Self
    where
        F: Fn(&HandlerError) -> Option<Value> + Send + Sync + 'static,
    {
        self.error_data = Some(Arc::new(extractor));
        self
    }

    /// Observe handler failures (logging, telemetry). Does not alter responses.
    pub fn on_error<F>(mut self, observer: F) -> Self
    where
        F: Fn(&HandlerError) + Send + Sync + 'static,
    {
        self.on_error = Some(Arc::new(observer));
        self
    }

    pub fn with_logger<L>(mut self, logger: L) -> Self
    where
        L: Logger + 'static,
    {
        self.logger = Some(Arc::new(logger));
        self
    }

    /// Override the code used for handler failures (defaults to `0`)
    pub fn with_default_error_code(mut self, code: i64) -> Self {
        self.default_error_code = Some(code);
        self
    }

    pub(crate) fn resolve(self) -> ResolvedOptions {
        ResolvedOptions {
            error_data: self.error_data.unwrap_or_else(|| Arc::new(no_error_data)),
            on_error: self.on_error.unwrap_or_else(|| Arc::new(ignore_error)),
            logger: self.logger.unwrap_or_else(|| Arc::new(NoopLogger)),
            default_error_code: self.default_error_code.unwrap_or(DEFAULT_ERROR_CODE),
        }
    }
}

fn no_error_data(_: &HandlerError) -> Option<Value> {
    None
}

fn ignore_error(_: &HandlerError) {}

impl fmt::Debug for ServerOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerOptions")
            .field("error_data", &self.error_data.is_some())
            .field("on_error", &self.on_error.is_some())
            .field("logger", &self.logger.is_some())
            .field("default_error_code", &self.default_error_code)
            .finish()
    }
}

#[derive(Clone)]
pub(crate) struct ResolvedOptions {
    pub error_data: ErrorDataExtractor,
    pub on_error: ErrorObserver,
    pub logger: Arc<dyn Logger>,
    pub default_error_code: i64,
}

impl Default for ResolvedOptions {
    fn default() -> Self {
        ServerOptions::default().resolve()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_defaults_are_noops() {
        let resolved = ServerOptions::new().resolve();
        let error: HandlerError = "boom".into();

        assert_eq!(resolved.default_error_code, DEFAULT_ERROR_CODE);
        assert_eq!((resolved.error_data)(&error), None);
        (resolved.on_error)(&error);
        resolved.logger.warn("ignored");
    }

    #[test]
    fn test_configured_hooks_are_used() {
        let seen = Arc::new(AtomicUsize::new(0));
        let counter = seen.clone();

        let resolved = ServerOptions::new()
            .with_error_data(|err| Some(json!({"detail": err.to_string()})))
            .on_error(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .with_logger(TracingLogger)
            .with_default_error_code(-32000)
            .resolve();

        let error: HandlerError = "boom".into();
        assert_eq!((resolved.error_data)(&error), Some(json!({"detail": "boom"})));
        (resolved.on_error)(&error);
        assert_eq!(seen.load(Ordering::SeqCst), 1);
        assert_eq!(resolved.default_error_code, -32000);
    }

    #[test]
    fn test_debug_hides_closures() {
        let options = ServerOptions::new().with_default_error_code(5);
        let rendered = format!("{:?}", options);
        assert!(rendered.contains("default_error_code: Some(5)"));
        assert!(rendered.contains("error_data: false"));
    }
}
