use anishelf_core::{BackendFault, SchemaError};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Which part of a call went wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The backend answered with a `Failure` tagged result.
    Backend,
    /// The answer broke the tagged-result or declared-result contract.
    MalformedResponse,
    /// No answer was obtained (encoding, connection, decoding).
    Transport,
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            FailureKind::Backend => "backend failure",
            FailureKind::MalformedResponse => "malformed response",
            FailureKind::Transport => "transport failure",
        };
        f.write_str(label)
    }
}

/// Failure surfaced to call sites for one command invocation.
///
/// For [`FailureKind::Backend`] the detail is exactly what the backend put in
/// the `error` field. For the other kinds it is a string describing the
/// protocol violation.
#[derive(Debug, Clone, PartialEq, Serialize, thiserror::Error)]
#[error("`{command}` {kind}: {}", render_detail(.detail))]
pub struct BridgeError {
    command: String,
    kind: FailureKind,
    detail: Value,
}

impl BridgeError {
    pub fn backend(command: &str, detail: Value) -> Self {
        Self {
            command: command.to_string(),
            kind: FailureKind::Backend,
            detail,
        }
    }

    pub fn malformed(command: &str, reason: impl Into<String>) -> Self {
        Self {
            command: command.to_string(),
            kind: FailureKind::MalformedResponse,
            detail: Value::String(reason.into()),
        }
    }

    pub fn transport(command: &str, reason: impl Into<String>) -> Self {
        Self {
            command: command.to_string(),
            kind: FailureKind::Transport,
            detail: Value::String(reason.into()),
        }
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn kind(&self) -> FailureKind {
        self.kind
    }

    pub fn detail(&self) -> &Value {
        &self.detail
    }

    pub fn into_detail(self) -> Value {
        self.detail
    }

    pub fn is_backend_failure(&self) -> bool {
        self.kind == FailureKind::Backend
    }

    /// Decodes a backend-defined detail; `None` for synthetic details or when
    /// the detail has a different shape.
    pub fn decode_detail<E: DeserializeOwned>(&self) -> Option<E> {
        if !self.is_backend_failure() {
            return None;
        }
        E::deserialize(&self.detail).ok()
    }

    /// The detail as the collection backend's `{code, message}` record.
    pub fn fault(&self) -> Option<BackendFault> {
        self.decode_detail()
    }

    /// Best-effort text for displaying the failure to the user.
    pub fn message(&self) -> String {
        if let Some(fault) = self.fault() {
            return fault.message;
        }
        render_detail(&self.detail)
    }
}

fn render_detail(detail: &Value) -> String {
    match detail {
        Value::Null => "no detail".to_string(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Failure of a dynamically named call.
///
/// Schema errors mean the call site built a bad request and nothing was sent;
/// call sites are not expected to recover from them.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DispatchError {
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error(transparent)]
    Bridge(#[from] BridgeError),
}

impl DispatchError {
    pub fn as_bridge(&self) -> Option<&BridgeError> {
        match self {
            DispatchError::Bridge(err) => Some(err),
            DispatchError::Schema(_) => None,
        }
    }
}
