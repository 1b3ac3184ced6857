//! Command schema registry.
//!
//! Every backend command is described by a [`CommandSignature`]: its name, its
//! ordered arguments and its result type. Typed call sites go through the
//! [`Command`] trait and get these checks from the compiler; dynamic call sites
//! validate against the [`SchemaRegistry`] before anything is dispatched.

use serde::de::DeserializeOwned;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

/// Runtime description of the JSON shape a value must have.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueType {
    Any,
    Null,
    Bool,
    Integer,
    Number,
    String,
    Array(Box<ValueType>),
    /// A named record; only objectness is checked.
    Object(&'static str),
    Nullable(Box<ValueType>),
}

impl ValueType {
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            ValueType::Any => true,
            ValueType::Null => value.is_null(),
            ValueType::Bool => value.is_boolean(),
            ValueType::Integer => value.is_i64() || value.is_u64(),
            ValueType::Number => value.is_number(),
            ValueType::String => value.is_string(),
            ValueType::Array(item) => value
                .as_array()
                .is_some_and(|items| items.iter().all(|entry| item.accepts(entry))),
            ValueType::Object(_) => value.is_object(),
            ValueType::Nullable(inner) => value.is_null() || inner.accepts(value),
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueType::Any => write!(f, "unknown"),
            ValueType::Null => write!(f, "null"),
            ValueType::Bool => write!(f, "boolean"),
            ValueType::Integer => write!(f, "integer"),
            ValueType::Number => write!(f, "number"),
            ValueType::String => write!(f, "string"),
            ValueType::Array(item) => match item.as_ref() {
                ValueType::Nullable(_) => write!(f, "({item})[]"),
                _ => write!(f, "{item}[]"),
            },
            ValueType::Object(name) => write!(f, "{name}"),
            ValueType::Nullable(inner) => write!(f, "{inner} | null"),
        }
    }
}

impl Serialize for ValueType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Short label for the JSON kind of `value`, used in mismatch reports.
pub fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(number) if number.is_f64() => "number",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Maps a Rust type onto the [`ValueType`] it serializes to.
pub trait SchemaType {
    fn value_type() -> ValueType;
}

macro_rules! scalar_schema {
    ($value_type:expr => $($ty:ty),* $(,)?) => {
        $(
            impl SchemaType for $ty {
                fn value_type() -> ValueType {
                    $value_type
                }
            }
        )*
    };
}

scalar_schema!(ValueType::String => String);
scalar_schema!(ValueType::Bool => bool);
scalar_schema!(ValueType::Integer => u8, u16, u32, u64, usize, i8, i16, i32, i64, isize);
scalar_schema!(ValueType::Number => f32, f64);
scalar_schema!(ValueType::Null => ());
scalar_schema!(ValueType::Any => Value);

impl<T: SchemaType> SchemaType for Option<T> {
    fn value_type() -> ValueType {
        ValueType::Nullable(Box::new(T::value_type()))
    }
}

impl<T: SchemaType> SchemaType for Vec<T> {
    fn value_type() -> ValueType {
        ValueType::Array(Box::new(T::value_type()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArgSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub value_type: ValueType,
}

impl ArgSpec {
    /// Builds an argument from its Rust field name; the wire name is camelCased.
    pub fn new(field: &str, value_type: ValueType) -> Self {
        Self {
            name: wire_name(field),
            value_type,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandSignature {
    name: &'static str,
    args: Vec<ArgSpec>,
    result: ValueType,
}

impl CommandSignature {
    pub fn new(name: &'static str, args: Vec<ArgSpec>, result: ValueType) -> Self {
        Self { name, args, result }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn args(&self) -> &[ArgSpec] {
        &self.args
    }

    pub fn result(&self) -> &ValueType {
        &self.result
    }

    /// Checks positional `values` against the declared arguments and returns
    /// the named argument object sent to the backend.
    pub fn bind(&self, values: Vec<Value>) -> Result<Map<String, Value>, SchemaError> {
        if values.len() != self.args.len() {
            return Err(SchemaError::ArityMismatch {
                command: self.name.to_string(),
                expected: self.args.len(),
                actual: values.len(),
            });
        }

        let mut bound = Map::with_capacity(values.len());
        for (arg, value) in self.args.iter().zip(values) {
            if !arg.value_type.accepts(&value) {
                return Err(SchemaError::ArgumentType {
                    command: self.name.to_string(),
                    argument: arg.name.clone(),
                    expected: arg.value_type.to_string(),
                    actual: json_kind(&value),
                });
            }
            bound.insert(arg.name.clone(), value);
        }
        Ok(bound)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("command `{0}` is not registered")]
    UnknownCommand(String),
    #[error("command `{0}` is registered more than once")]
    DuplicateCommand(String),
    #[error("command `{command}` takes {expected} argument(s), got {actual}")]
    ArityMismatch {
        command: String,
        expected: usize,
        actual: usize,
    },
    #[error("argument `{argument}` of `{command}` expects {expected}, got {actual}")]
    ArgumentType {
        command: String,
        argument: String,
        expected: String,
        actual: &'static str,
    },
}

/// A backend command whose implementing struct is its argument record.
///
/// The struct serializes to the named-argument object; `Output` is the payload
/// type carried by a successful result.
pub trait Command: Serialize + Send + Sync + 'static {
    const NAME: &'static str;
    type Output: DeserializeOwned + Send;

    fn signature() -> CommandSignature;
}

/// Immutable name-to-signature table, built once before any dispatch.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct SchemaRegistry {
    commands: BTreeMap<&'static str, CommandSignature>,
}

impl SchemaRegistry {
    pub fn new(
        signatures: impl IntoIterator<Item = CommandSignature>,
    ) -> Result<Self, SchemaError> {
        let mut commands = BTreeMap::new();
        for signature in signatures {
            let name = signature.name();
            if commands.insert(name, signature).is_some() {
                return Err(SchemaError::DuplicateCommand(name.to_string()));
            }
        }
        Ok(Self { commands })
    }

    pub fn get(&self, name: &str) -> Option<&CommandSignature> {
        self.commands.get(name)
    }

    /// Like [`SchemaRegistry::get`], reporting unknown names as a schema error.
    pub fn lookup(&self, name: &str) -> Result<&CommandSignature, SchemaError> {
        self.get(name)
            .ok_or_else(|| SchemaError::UnknownCommand(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.commands.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CommandSignature> {
        self.commands.values()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

/// Collects signatures without the duplicate check; a later entry replaces an
/// earlier one of the same name.
impl FromIterator<CommandSignature> for SchemaRegistry {
    fn from_iter<I: IntoIterator<Item = CommandSignature>>(iter: I) -> Self {
        Self {
            commands: iter
                .into_iter()
                .map(|signature| (signature.name(), signature))
                .collect(),
        }
    }
}

/// Converts a snake_case field name into the camelCase key serde emits.
pub fn wire_name(field: &str) -> String {
    let mut name = String::with_capacity(field.len());
    let mut upper_next = false;
    for ch in field.chars() {
        if ch == '_' {
            upper_next = !name.is_empty();
        } else if upper_next {
            name.extend(ch.to_uppercase());
            upper_next = false;
        } else {
            name.push(ch);
        }
    }
    name
}
