//! Shared contract between the AniShelf UI and its collection backend: the
//! domain model, the tagged result convention, the command schema and the
//! persisted display preferences.

pub mod commands;
pub mod config;
pub mod model;
pub mod schema;
pub mod tagged;

pub use commands::{COMMAND_NAMES, registry};
pub use model::{AiringStatus, Anime, BackendFault, Collection, ImportReport};
pub use schema::{ArgSpec, Command, CommandSignature, SchemaError, SchemaRegistry, ValueType};
pub use tagged::{Response, ShapeViolation, TaggedResult, classify};
