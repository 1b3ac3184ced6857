//! Feature-level call sites, one per business operation.
//!
//! Each method forwards a fixed command through the [`Bridge`] and reports the
//! outcome in the log; rendering the error is left to the page that asked.

use crate::bridge::Bridge;
use crate::error::BridgeError;
use crate::transport::Transport;
use anishelf_core::commands::{
    AddAnimeToCollection, CreateCollection, DeleteCollection, GetAnime, GetCollection,
    GetCollectionAnime, GetCollections, ImportAnimeBatch, RemoveAnimeFromCollection, SearchAnime,
    UpdateCollection,
};
use anishelf_core::{Anime, Collection, Command, ImportReport};
use tracing::{info, warn};

const MAX_SEARCH_LIMIT: u32 = 100;

#[derive(Debug, Clone)]
pub struct Library<T> {
    bridge: Bridge<T>,
}

impl<T: Transport> Library<T> {
    pub fn new(bridge: Bridge<T>) -> Self {
        Self { bridge }
    }

    pub async fn collections(&self) -> Result<Vec<Collection>, BridgeError> {
        self.forward(GetCollections {}).await
    }

    pub async fn collection(&self, id: &str) -> Result<Collection, BridgeError> {
        self.forward(GetCollection { id: id.to_string() }).await
    }

    pub async fn create_collection(
        &self,
        name: &str,
        description: Option<&str>,
    ) -> Result<Collection, BridgeError> {
        let created = self
            .forward(CreateCollection {
                name: name.trim().to_string(),
                description: normalize_description(description),
            })
            .await?;
        info!(collection_id = %created.id, name = %created.name, "Created collection");
        Ok(created)
    }

    /// Renames and/or re-describes a collection; `None` leaves a field as is.
    ///
    /// A blank description is sent as `""` so the backend clears it.
    pub async fn update_collection(
        &self,
        id: &str,
        name: Option<&str>,
        description: Option<&str>,
    ) -> Result<Collection, BridgeError> {
        let updated = self
            .forward(UpdateCollection {
                id: id.to_string(),
                name: name.map(|name| name.trim().to_string()),
                description: description.map(|text| text.trim().to_string()),
            })
            .await?;
        info!(collection_id = %updated.id, "Updated collection");
        Ok(updated)
    }

    pub async fn delete_collection(&self, id: &str) -> Result<(), BridgeError> {
        self.forward(DeleteCollection { id: id.to_string() }).await?;
        info!(collection_id = id, "Deleted collection");
        Ok(())
    }

    pub async fn add_anime(
        &self,
        collection_id: &str,
        anime_id: &str,
    ) -> Result<Collection, BridgeError> {
        let collection = self
            .forward(AddAnimeToCollection {
                collection_id: collection_id.to_string(),
                anime_id: anime_id.to_string(),
            })
            .await?;
        info!(
            collection_id,
            anime_id,
            size = collection.anime_ids.len(),
            "Added anime to collection"
        );
        Ok(collection)
    }

    pub async fn remove_anime(
        &self,
        collection_id: &str,
        anime_id: &str,
    ) -> Result<Collection, BridgeError> {
        let collection = self
            .forward(RemoveAnimeFromCollection {
                collection_id: collection_id.to_string(),
                anime_id: anime_id.to_string(),
            })
            .await?;
        info!(
            collection_id,
            anime_id,
            size = collection.anime_ids.len(),
            "Removed anime from collection"
        );
        Ok(collection)
    }

    pub async fn collection_anime(&self, collection_id: &str) -> Result<Vec<Anime>, BridgeError> {
        self.forward(GetCollectionAnime {
            collection_id: collection_id.to_string(),
        })
        .await
    }

    pub async fn anime(&self, id: &str) -> Result<Anime, BridgeError> {
        self.forward(GetAnime { id: id.to_string() }).await
    }

    pub async fn search_anime(
        &self,
        query: &str,
        limit: Option<u32>,
    ) -> Result<Vec<Anime>, BridgeError> {
        self.forward(SearchAnime {
            query: query.trim().to_string(),
            limit: limit.map(|limit| limit.clamp(1, MAX_SEARCH_LIMIT)),
        })
        .await
    }

    /// Sends titles gathered by the import flow in one batch.
    pub async fn import_batch(
        &self,
        collection_id: Option<&str>,
        titles: Vec<String>,
    ) -> Result<ImportReport, BridgeError> {
        let submitted = titles.len();
        let report = self
            .forward(ImportAnimeBatch {
                collection_id: collection_id.map(str::to_string),
                titles,
            })
            .await?;
        info!(
            submitted,
            imported = report.imported.len(),
            unmatched = report.unmatched.len(),
            "Imported anime batch"
        );
        Ok(report)
    }

    async fn forward<C: Command>(&self, command: C) -> Result<C::Output, BridgeError> {
        self.bridge.call(command).await.inspect_err(|err| {
            warn!(
                command = C::NAME,
                kind = %err.kind(),
                "Backend command failed: {}",
                err.message()
            );
        })
    }
}

fn normalize_description(description: Option<&str>) -> Option<String> {
    description
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}
