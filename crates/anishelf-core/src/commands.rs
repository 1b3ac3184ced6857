//! Commands exposed by the collection backend.
//!
//! The table below is the single source of truth: it expands into one argument
//! struct per command, the [`COMMAND_NAMES`] slice and the static registry.

use crate::model::{Anime, Collection, ImportReport};
use crate::schema::{ArgSpec, Command, CommandSignature, SchemaRegistry, SchemaType};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

macro_rules! bridge_commands {
    ($callback:ident) => {
        $callback! {
            /// Lists every collection.
            GetCollections = "getCollections" {} -> Vec<Collection>;
            GetCollection = "getCollection" { id: String } -> Collection;
            CreateCollection = "createCollection" {
                name: String,
                description: Option<String>,
            } -> Collection;
            /// `None` fields are left unchanged by the backend.
            UpdateCollection = "updateCollection" {
                id: String,
                name: Option<String>,
                description: Option<String>,
            } -> Collection;
            DeleteCollection = "deleteCollection" { id: String } -> ();
            AddAnimeToCollection = "addAnimeToCollection" {
                collection_id: String,
                anime_id: String,
            } -> Collection;
            RemoveAnimeFromCollection = "removeAnimeFromCollection" {
                collection_id: String,
                anime_id: String,
            } -> Collection;
            GetCollectionAnime = "getCollectionAnime" { collection_id: String } -> Vec<Anime>;
            GetAnime = "getAnime" { id: String } -> Anime;
            SearchAnime = "searchAnime" {
                query: String,
                limit: Option<u32>,
            } -> Vec<Anime>;
            /// Resolves free-form titles and, when a collection is given, adds the matches to it.
            ImportAnimeBatch = "importAnimeBatch" {
                collection_id: Option<String>,
                titles: Vec<String>,
            } -> ImportReport;
        }
    };
}

macro_rules! as_command_structs {
    ($(
        $(#[$meta:meta])*
        $command:ident = $name:literal { $($field:ident : $ty:ty),* $(,)? } -> $output:ty;
    )*) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
            #[serde(rename_all = "camelCase")]
            pub struct $command {
                $(pub $field: $ty,)*
            }

            impl Command for $command {
                const NAME: &'static str = $name;
                type Output = $output;

                fn signature() -> CommandSignature {
                    CommandSignature::new(
                        $name,
                        vec![$(ArgSpec::new(stringify!($field), <$ty as SchemaType>::value_type())),*],
                        <$output as SchemaType>::value_type(),
                    )
                }
            }
        )*
    };
}

macro_rules! as_command_name_slice {
    ($(
        $(#[$meta:meta])*
        $command:ident = $name:literal { $($field:ident : $ty:ty),* $(,)? } -> $output:ty;
    )*) => {
        &[$($name),*]
    };
}

macro_rules! as_signature_list {
    ($(
        $(#[$meta:meta])*
        $command:ident = $name:literal { $($field:ident : $ty:ty),* $(,)? } -> $output:ty;
    )*) => {
        vec![$(<$command as Command>::signature()),*]
    };
}

bridge_commands!(as_command_structs);

pub const COMMAND_NAMES: &[&str] = bridge_commands!(as_command_name_slice);

/// Signatures of every backend command, in declaration order.
pub fn signatures() -> Vec<CommandSignature> {
    bridge_commands!(as_signature_list)
}

static REGISTRY: Lazy<Arc<SchemaRegistry>> =
    Lazy::new(|| Arc::new(signatures().into_iter().collect()));

/// The registry shared by every bridge that does not bring its own.
pub fn registry() -> Arc<SchemaRegistry> {
    Arc::clone(&REGISTRY)
}
