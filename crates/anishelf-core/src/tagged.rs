//! Tagged success/failure results returned by backend commands.
//!
//! On the wire a tagged result is an object with a `status` discriminant:
//! `{"status":"ok","data":...}` or `{"status":"error","error":...}`. Commands
//! that have not adopted the convention return bare values without a `status`
//! key, which pass through untouched.

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DISCRIMINANT_FIELD: &str = "status";
pub const SUCCESS_TAG: &str = "ok";
pub const FAILURE_TAG: &str = "error";
pub const SUCCESS_FIELD: &str = "data";
pub const FAILURE_FIELD: &str = "error";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status")]
pub enum TaggedResult<T, E> {
    #[serde(rename = "ok")]
    Success { data: T },
    #[serde(rename = "error")]
    Failure { error: E },
}

impl<T, E> TaggedResult<T, E> {
    pub fn success(data: T) -> Self {
        TaggedResult::Success { data }
    }

    pub fn failure(error: E) -> Self {
        TaggedResult::Failure { error }
    }

    pub fn into_result(self) -> Result<T, E> {
        match self {
            TaggedResult::Success { data } => Ok(data),
            TaggedResult::Failure { error } => Err(error),
        }
    }
}

impl<T, E> From<Result<T, E>> for TaggedResult<T, E> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(data) => TaggedResult::Success { data },
            Err(error) => TaggedResult::Failure { error },
        }
    }
}

/// Outcome of probing a raw backend response.
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    Tagged(TaggedResult<Value, Value>),
    Untagged(Value),
}

impl Response {
    /// Collapses the response into the payload or the opaque failure detail.
    pub fn into_result(self) -> Result<Value, Value> {
        match self {
            Response::Tagged(tagged) => tagged.into_result(),
            Response::Untagged(value) => Ok(value),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShapeViolation {
    #[error("tagged result has unknown status {found}")]
    UnknownDiscriminant { found: String },
    #[error("tagged result populates both `data` and `error`")]
    BothVariants,
    #[error("tagged result with status `{status}` populates neither `data` nor `error`")]
    NeitherVariant { status: &'static str },
    #[error("tagged result with status `{status}` populates only `{found}`")]
    MismatchedVariant {
        status: &'static str,
        found: &'static str,
    },
}

/// Probes `raw` once for the discriminant and splits it into a tagged or
/// untagged response.
///
/// Any object carrying a `status` key is tagged and must use `"ok"` or
/// `"error"`; a key that is present with a `null` value counts as populated.
pub fn classify(raw: Value) -> Result<Response, ShapeViolation> {
    let mut fields = match raw {
        Value::Object(fields) => fields,
        other => return Ok(Response::Untagged(other)),
    };
    let tag = match fields.get(DISCRIMINANT_FIELD) {
        None => return Ok(Response::Untagged(Value::Object(fields))),
        Some(Value::String(tag)) if tag == SUCCESS_TAG => SUCCESS_TAG,
        Some(Value::String(tag)) if tag == FAILURE_TAG => FAILURE_TAG,
        Some(other) => {
            return Err(ShapeViolation::UnknownDiscriminant {
                found: other.to_string(),
            });
        }
    };

    let data = fields.remove(SUCCESS_FIELD);
    let error = fields.remove(FAILURE_FIELD);
    match (tag, data, error) {
        (_, Some(_), Some(_)) => Err(ShapeViolation::BothVariants),
        (SUCCESS_TAG, Some(data), None) => Ok(Response::Tagged(TaggedResult::Success { data })),
        (FAILURE_TAG, None, Some(error)) => {
            Ok(Response::Tagged(TaggedResult::Failure { error }))
        }
        (status, None, None) => Err(ShapeViolation::NeitherVariant { status }),
        (status, Some(_), None) => Err(ShapeViolation::MismatchedVariant {
            status,
            found: SUCCESS_FIELD,
        }),
        (status, None, Some(_)) => Err(ShapeViolation::MismatchedVariant {
            status,
            found: FAILURE_FIELD,
        }),
    }
}
