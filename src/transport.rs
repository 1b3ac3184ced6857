//! The seam between the bridge and whatever carries calls to the backend.

use anishelf_core::{Command, TaggedResult};
use async_trait::async_trait;
use futures::FutureExt;
use futures::future::BoxFuture;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("no backend procedure is registered for `{0}`")]
    UnhandledCommand(String),
    #[error("connection to the backend was lost: {0}")]
    Disconnected(String),
    #[error("could not decode the backend message: {0}")]
    Decode(String),
}

/// Delivers one named call to the backend and returns its raw answer.
///
/// Implementations may be invoked concurrently; each call must resolve to the
/// answer for its own arguments.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn invoke(&self, command: &str, args: Value) -> Result<Value, TransportError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn invoke(&self, command: &str, args: Value) -> Result<Value, TransportError> {
        (**self).invoke(command, args).await
    }
}

type Handler =
    Arc<dyn Fn(Value) -> BoxFuture<'static, Result<Value, TransportError>> + Send + Sync>;

/// In-process transport that hands each call to a registered async handler.
///
/// Handlers see the named-argument object and return the raw answer, so a
/// handler may reply with a tagged result or with a bare value.
#[derive(Clone, Default)]
pub struct Router {
    handlers: HashMap<String, Handler>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a raw handler, replacing any previous one for `command`.
    pub fn route<F, Fut>(mut self, command: &str, handler: F) -> Self
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value, TransportError>> + Send + 'static,
    {
        let handler: Handler = Arc::new(move |args| handler(args).boxed());
        self.handlers.insert(command.to_string(), handler);
        self
    }

    /// Registers a typed handler for `C`; its answer is sent as a tagged result.
    pub fn route_command<C, E, F, Fut>(self, handler: F) -> Self
    where
        C: Command + DeserializeOwned,
        C::Output: Serialize,
        E: Serialize + Send + 'static,
        F: Fn(C) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<C::Output, E>> + Send + 'static,
    {
        let handler = Arc::new(handler);
        self.route(C::NAME, move |args| {
            let handler = Arc::clone(&handler);
            async move {
                let command: C = serde_json::from_value(args).map_err(|err| {
                    TransportError::Decode(format!("arguments for `{}`: {err}", C::NAME))
                })?;
                let tagged = TaggedResult::from(handler(command).await);
                serde_json::to_value(tagged).map_err(|err| {
                    TransportError::Decode(format!("answer from `{}`: {err}", C::NAME))
                })
            }
        })
    }

    pub fn handles(&self, command: &str) -> bool {
        self.handlers.contains_key(command)
    }
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut commands: Vec<_> = self.handlers.keys().collect();
        commands.sort();
        f.debug_struct("Router").field("commands", &commands).finish()
    }
}

#[async_trait]
impl Transport for Router {
    async fn invoke(&self, command: &str, args: Value) -> Result<Value, TransportError> {
        let handler = self
            .handlers
            .get(command)
            .cloned()
            .ok_or_else(|| TransportError::UnhandledCommand(command.to_string()))?;
        handler(args).await
    }
}

/// Logs every call passing through the wrapped transport.
#[derive(Debug, Clone)]
pub struct Traced<T> {
    inner: T,
}

impl<T> Traced<T> {
    pub fn new(inner: T) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<T: Transport> Transport for Traced<T> {
    async fn invoke(&self, command: &str, args: Value) -> Result<Value, TransportError> {
        debug!(command, "Dispatching backend command");
        let result = self.inner.invoke(command, args).await;
        match &result {
            Ok(_) => debug!(command, "Backend command answered"),
            Err(err) => warn!(command, "Backend command did not answer: {err}"),
        }
        result
    }
}
