//! Command dispatch bridge.
//!
//! Every UI-to-backend call goes through [`Bridge`]. One call is one pass:
//! encode the arguments, await the transport, probe the answer for a tagged
//! result, then hand back either the payload or a [`BridgeError`]. The bridge
//! keeps no per-call state, so concurrent calls never observe each other.

use crate::error::{BridgeError, DispatchError};
use crate::transport::Transport;
use anishelf_core::{Command, Response, SchemaRegistry, TaggedResult, classify};
use serde_json::Value;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct Bridge<T> {
    transport: T,
    registry: Arc<SchemaRegistry>,
}

impl<T: Transport> Bridge<T> {
    /// Bridge over `transport` using the built-in command registry.
    pub fn new(transport: T) -> Self {
        Self::with_registry(transport, anishelf_core::registry())
    }

    pub fn with_registry(transport: T, registry: Arc<SchemaRegistry>) -> Self {
        Self {
            transport,
            registry,
        }
    }

    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Sends `command` and returns its success payload.
    ///
    /// The command struct fixes the name, the arguments and the payload type at
    /// compile time. A `Failure` answer comes back as a backend [`BridgeError`]
    /// carrying the detail untouched.
    pub async fn call<C: Command>(&self, command: C) -> Result<C::Output, BridgeError> {
        let args = serde_json::to_value(&command).map_err(|err| {
            BridgeError::transport(C::NAME, format!("failed to encode arguments: {err}"))
        })?;
        let payload = self.dispatch(C::NAME, args).await?;
        serde_json::from_value(payload).map_err(|err| {
            BridgeError::malformed(
                C::NAME,
                format!("payload does not match the declared result type: {err}"),
            )
        })
    }

    /// Sends a command chosen at runtime with positional arguments.
    ///
    /// The name and arguments are checked against the registry before anything
    /// is sent; a mismatch is returned as [`DispatchError::Schema`].
    pub async fn invoke(&self, command: &str, args: Vec<Value>) -> Result<Value, DispatchError> {
        let signature = self.registry.lookup(command)?;
        let named = signature.bind(args)?;
        let payload = self.dispatch(signature.name(), Value::Object(named)).await?;
        if !signature.result().accepts(&payload) {
            return Err(BridgeError::malformed(
                signature.name(),
                format!(
                    "payload does not match the declared result type {}",
                    signature.result()
                ),
            )
            .into());
        }
        Ok(payload)
    }

    async fn dispatch(&self, command: &str, args: Value) -> Result<Value, BridgeError> {
        let raw = self
            .transport
            .invoke(command, args)
            .await
            .map_err(|err| BridgeError::transport(command, err.to_string()))?;
        unwrap_response(command, raw)
    }
}

/// Turns a raw answer into the payload, or the error it stands for.
pub fn unwrap_response(command: &str, raw: Value) -> Result<Value, BridgeError> {
    match classify(raw) {
        Ok(Response::Untagged(payload)) => Ok(payload),
        Ok(Response::Tagged(TaggedResult::Success { data })) => Ok(data),
        Ok(Response::Tagged(TaggedResult::Failure { error })) => {
            Err(BridgeError::backend(command, error))
        }
        Err(violation) => Err(BridgeError::malformed(command, violation.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FailureKind;
    use crate::transport::{Router, TransportError};
    use anishelf_core::{SchemaError, ValueType};
    use anishelf_core::commands::{CreateCollection, DeleteCollection, GetCollection};
    use anishelf_core::{BackendFault, Collection};
    use futures::future::join_all;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn answering(command: &'static str, answer: Value) -> Bridge<Router> {
        Bridge::new(Router::new().route(command, move |_| {
            let answer = answer.clone();
            async move { Ok::<_, TransportError>(answer) }
        }))
    }

    fn favorites() -> Value {
        json!({
            "id": "c1",
            "name": "Favorites",
            "description": null,
            "animeIds": [],
            "createdAt": 1_700_000_000_000_i64,
            "updatedAt": 1_700_000_000_000_i64,
        })
    }

    #[tokio::test]
    async fn create_collection_returns_payload_unchanged() {
        let seen = Arc::new(std::sync::Mutex::new(None));
        let recorder = Arc::clone(&seen);
        let bridge = Bridge::new(Router::new().route("createCollection", move |args| {
            if let Ok(mut slot) = recorder.lock() {
                *slot = Some(args);
            }
            async { Ok::<_, TransportError>(json!({"status": "ok", "data": favorites()})) }
        }));

        let created = bridge
            .call(CreateCollection {
                name: "Favorites".to_string(),
                description: None,
            })
            .await
            .expect("createCollection succeeds");

        let expected: Collection = serde_json::from_value(favorites()).expect("fixture");
        assert_eq!(created, expected);
        let sent = seen.lock().map(|slot| slot.clone()).unwrap_or_default();
        assert_eq!(sent, Some(json!({"name": "Favorites", "description": null})));
    }

    #[tokio::test]
    async fn delete_missing_collection_raises_backend_error() {
        let bridge = answering(
            "deleteCollection",
            json!({"status": "error", "error": "not found"}),
        );
        let err = bridge
            .call(DeleteCollection {
                id: "missing".to_string(),
            })
            .await
            .expect_err("deleteCollection fails");
        assert_eq!(err.command(), "deleteCollection");
        assert_eq!(err.kind(), FailureKind::Backend);
        assert_eq!(err.detail(), &json!("not found"));
    }

    #[tokio::test]
    async fn failure_detail_is_passed_through_for_any_shape() {
        for detail in [
            json!("not found"),
            json!({"code": "not_found", "message": "gone", "extra": [1, 2]}),
            Value::Null,
            json!(404),
        ] {
            let bridge = answering(
                "getCollection",
                json!({"status": "error", "error": detail.clone()}),
            );
            let err = bridge
                .call(GetCollection {
                    id: "c1".to_string(),
                })
                .await
                .expect_err("backend failure");
            assert_eq!(err.command(), "getCollection");
            assert!(err.is_backend_failure());
            assert_eq!(err.detail(), &detail);
        }
    }

    #[tokio::test]
    async fn structured_failure_can_be_matched_by_callers() {
        let bridge = answering(
            "getCollection",
            json!({"status": "error", "error": {"code": "not_found", "message": "gone"}}),
        );
        let err = bridge
            .call(GetCollection {
                id: "c9".to_string(),
            })
            .await
            .expect_err("backend failure");
        assert_eq!(err.fault(), Some(BackendFault::new("not_found", "gone")));
    }

    #[tokio::test]
    async fn untagged_answers_pass_through() {
        let bridge = answering("getCollection", favorites());
        let collection = bridge
            .call(GetCollection {
                id: "c1".to_string(),
            })
            .await
            .expect("untagged payload");
        assert_eq!(collection.name, "Favorites");

        for raw in [json!(["a", "b"]), json!(42), json!({"airingStatus": "airing"})] {
            let bridge = Bridge::new(Router::new().route("getAnime", {
                let raw = raw.clone();
                move |_| {
                    let raw = raw.clone();
                    async move { Ok::<_, TransportError>(raw) }
                }
            }));
            // Raw dispatch skips the declared-result check so identity is visible.
            let payload = bridge
                .dispatch("getAnime", json!({}))
                .await
                .expect("untagged passthrough");
            assert_eq!(payload, raw);
        }
    }

    #[tokio::test]
    async fn unit_results_decode_from_null_data() {
        let bridge = answering("deleteCollection", json!({"status": "ok", "data": null}));
        bridge
            .call(DeleteCollection {
                id: "c1".to_string(),
            })
            .await
            .expect("delete succeeds");
    }

    #[tokio::test]
    async fn both_variants_populated_is_an_error() {
        let bridge = answering(
            "getCollection",
            json!({"status": "ok", "data": favorites(), "error": "not found"}),
        );
        let err = bridge
            .call(GetCollection {
                id: "c1".to_string(),
            })
            .await
            .expect_err("malformed");
        assert_eq!(err.kind(), FailureKind::MalformedResponse);
        assert_eq!(err.command(), "getCollection");
    }

    #[tokio::test]
    async fn neither_variant_populated_is_an_error() {
        let bridge = answering("getCollection", json!({"status": "ok"}));
        let err = bridge
            .call(GetCollection {
                id: "c1".to_string(),
            })
            .await
            .expect_err("malformed");
        assert_eq!(err.kind(), FailureKind::MalformedResponse);
    }

    #[tokio::test]
    async fn payload_of_wrong_type_is_malformed() {
        let bridge = answering("getCollection", json!({"status": "ok", "data": [1, 2]}));
        let err = bridge
            .call(GetCollection {
                id: "c1".to_string(),
            })
            .await
            .expect_err("wrong payload type");
        assert_eq!(err.kind(), FailureKind::MalformedResponse);
    }

    #[tokio::test]
    async fn transport_failures_become_bridge_errors() {
        let bridge = Bridge::new(Router::new().route("getCollection", |_| async {
            Err::<Value, _>(TransportError::Disconnected("backend exited".to_string()))
        }));
        let err = bridge
            .call(GetCollection {
                id: "c1".to_string(),
            })
            .await
            .expect_err("transport failure");
        assert_eq!(err.kind(), FailureKind::Transport);
        assert_eq!(err.command(), "getCollection");
        assert!(err.message().contains("backend exited"));
    }

    #[tokio::test]
    async fn failures_are_never_retried() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let bridge = Bridge::new(Router::new().route("getCollection", move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            async { Ok::<_, TransportError>(json!({"status": "error", "error": "busy"})) }
        }));
        let _ = bridge
            .call(GetCollection {
                id: "c1".to_string(),
            })
            .await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn concurrent_calls_resolve_to_their_own_answers() {
        let router = Router::new().route_command(|command: GetCollection| async move {
            // Later ids answer first so completion order differs from call order.
            let delay = 40_u64.saturating_sub(command.id.len() as u64 * 5);
            tokio::time::sleep(Duration::from_millis(delay)).await;
            if command.id.ends_with('x') {
                return Err(format!("{} rejected", command.id));
            }
            Ok(Collection {
                name: format!("Collection {}", command.id),
                id: command.id,
                description: None,
                anime_ids: Vec::new(),
                created_at: 0,
                updated_at: 0,
            })
        });
        let bridge = Bridge::new(router);
        let ids = ["a", "bb", "cccx", "dddd", "eeeeex", "ffffff"];

        let results = join_all(ids.iter().map(|id| {
            bridge.call(GetCollection {
                id: (*id).to_string(),
            })
        }))
        .await;

        for (id, result) in ids.iter().zip(results) {
            match result {
                Ok(collection) => {
                    assert_eq!(collection.id, *id);
                    assert_eq!(collection.name, format!("Collection {id}"));
                }
                Err(err) => {
                    assert!(id.ends_with('x'), "unexpected failure for {id}");
                    assert_eq!(err.detail(), &json!(format!("{id} rejected")));
                }
            }
        }
    }

    #[tokio::test]
    async fn dropped_calls_do_not_disturb_later_ones() {
        let router = Router::new()
            .route("getCollections", |_| async {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok::<_, TransportError>(json!([]))
            })
            .route("getCollection", |_| async {
                Ok::<_, TransportError>(json!({"status": "ok", "data": favorites()}))
            });
        let bridge = Bridge::new(router);
        let pending = bridge.invoke("getCollections", Vec::new());
        assert!(
            tokio::time::timeout(Duration::from_millis(10), pending)
                .await
                .is_err()
        );
        let collection = bridge
            .call(GetCollection {
                id: "c1".to_string(),
            })
            .await
            .expect("later call succeeds");
        assert_eq!(collection.id, "c1");
    }

    #[tokio::test]
    async fn invoke_rejects_unknown_commands_before_dispatch() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let bridge = Bridge::new(Router::new().route("renameCollection", move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            async { Ok::<_, TransportError>(Value::Null) }
        }));
        let err = bridge
            .invoke("renameCollection", vec![json!("c1")])
            .await
            .expect_err("unknown command");
        assert_eq!(
            err,
            DispatchError::Schema(SchemaError::UnknownCommand(
                "renameCollection".to_string()
            ))
        );
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn invoke_rejects_bad_arguments_before_dispatch() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let bridge = Bridge::new(Router::new().route("createCollection", move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            async { Ok::<_, TransportError>(json!({"status": "ok", "data": favorites()})) }
        }));

        let arity = bridge
            .invoke("createCollection", vec![json!("Favorites")])
            .await
            .expect_err("missing description");
        assert!(matches!(
            arity,
            DispatchError::Schema(SchemaError::ArityMismatch {
                expected: 2,
                actual: 1,
                ..
            })
        ));

        let typed = bridge
            .invoke("createCollection", vec![json!(5), json!(null)])
            .await
            .expect_err("numeric name");
        assert!(matches!(
            typed,
            DispatchError::Schema(SchemaError::ArgumentType { .. })
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        let created = bridge
            .invoke("createCollection", vec![json!("Favorites"), Value::Null])
            .await
            .expect("valid call");
        assert_eq!(created, favorites());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn invoke_checks_declared_result_type() {
        let bridge = answering("getCollections", json!({"status": "ok", "data": "nope"}));
        let err = bridge
            .invoke("getCollections", Vec::new())
            .await
            .expect_err("string is not Collection[]");
        assert_eq!(
            err.as_bridge().map(BridgeError::kind),
            Some(FailureKind::MalformedResponse)
        );

        let bridge = answering(
            "deleteCollection",
            json!({"status": "error", "error": "not found"}),
        );
        let err = bridge
            .invoke("deleteCollection", vec![json!("missing")])
            .await
            .expect_err("backend failure");
        assert_eq!(
            err,
            DispatchError::Bridge(BridgeError::backend("deleteCollection", json!("not found")))
        );
    }

    fn conforming(value_type: &ValueType) -> Value {
        match value_type {
            ValueType::Any | ValueType::String => json!("x"),
            ValueType::Null => Value::Null,
            ValueType::Bool => json!(true),
            ValueType::Integer => json!(3),
            ValueType::Number => json!(1.5),
            ValueType::Array(item) => json!([conforming(item)]),
            ValueType::Object(name) => json!({"kind": name}),
            ValueType::Nullable(inner) => conforming(inner),
        }
    }

    #[tokio::test]
    async fn every_registered_command_passes_payload_and_detail_through() {
        let registry = anishelf_core::registry();
        let mut succeeding = Router::new();
        let mut failing = Router::new();
        for signature in registry.iter() {
            let payload = conforming(signature.result());
            let detail = json!({"code": "rejected", "command": signature.name()});
            succeeding = succeeding.route(signature.name(), move |_| {
                let payload = payload.clone();
                async move { Ok::<_, TransportError>(json!({"status": "ok", "data": payload})) }
            });
            failing = failing.route(signature.name(), move |_| {
                let detail = detail.clone();
                async move { Ok::<_, TransportError>(json!({"status": "error", "error": detail})) }
            });
        }
        let succeeding = Bridge::new(succeeding);
        let failing = Bridge::new(failing);

        for signature in registry.iter() {
            let args: Vec<Value> = signature
                .args()
                .iter()
                .map(|arg| conforming(&arg.value_type))
                .collect();

            let payload = succeeding
                .invoke(signature.name(), args.clone())
                .await
                .unwrap_or_else(|err| panic!("{} failed: {err}", signature.name()));
            assert_eq!(payload, conforming(signature.result()), "{}", signature.name());

            let err = failing
                .invoke(signature.name(), args)
                .await
                .expect_err("backend failure");
            let bridge_err = err.as_bridge().expect("bridge error");
            assert_eq!(bridge_err.kind(), FailureKind::Backend);
            assert_eq!(bridge_err.command(), signature.name());
            assert_eq!(
                bridge_err.detail(),
                &json!({"code": "rejected", "command": signature.name()})
            );
        }
    }

    #[tokio::test]
    async fn unknown_status_is_malformed_not_success() {
        let bridge = answering(
            "getCollection",
            json!({"status": "failure", "error": "not found"}),
        );
        let err = bridge
            .invoke("getCollection", vec![json!("c1")])
            .await
            .expect_err("unknown status");
        assert_eq!(
            err.as_bridge().map(BridgeError::kind),
            Some(FailureKind::MalformedResponse)
        );

        let err = unwrap_response("getCollection", json!({"status": "Error", "error": "boom"}))
            .expect_err("case-sensitive status");
        assert_eq!(err.kind(), FailureKind::MalformedResponse);
    }
}
