use crate::schema::{SchemaType, ValueType};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Collection {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub anime_ids: Vec<String>,
    /// Unix epoch milliseconds.
    #[ts(type = "number")]
    pub created_at: i64,
    #[ts(type = "number")]
    pub updated_at: i64,
}

impl Collection {
    pub fn contains_anime(&self, anime_id: &str) -> bool {
        self.anime_ids.iter().any(|id| id == anime_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum AiringStatus {
    Airing,
    Finished,
    Upcoming,
    #[default]
    Unknown,
}

impl std::fmt::Display for AiringStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            AiringStatus::Airing => "Airing",
            AiringStatus::Finished => "Finished",
            AiringStatus::Upcoming => "Upcoming",
            AiringStatus::Unknown => "Unknown",
        };
        write!(f, "{label}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Anime {
    pub id: String,
    pub title: String,
    pub episodes: Option<u32>,
    /// Serialized as `airingStatus`; a bare `status` key is reserved for tagged results.
    #[serde(default)]
    pub airing_status: AiringStatus,
    pub year: Option<i32>,
    pub cover_image: Option<String>,
    pub synopsis: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ImportReport {
    pub imported: Vec<Anime>,
    /// Titles the backend could not resolve to an anime.
    pub unmatched: Vec<String>,
    pub collection: Option<Collection>,
}

/// Structured failure detail emitted by the collection backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BackendFault {
    pub code: String,
    pub message: String,
}

impl BackendFault {
    pub fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for BackendFault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

macro_rules! object_schema {
    ($($model:ident),* $(,)?) => {
        $(
            impl SchemaType for $model {
                fn value_type() -> ValueType {
                    ValueType::Object(stringify!($model))
                }
            }
        )*
    };
}

object_schema!(Collection, Anime, ImportReport, BackendFault);

impl SchemaType for AiringStatus {
    fn value_type() -> ValueType {
        ValueType::String
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn collection_uses_camel_case_wire_names() {
        let collection = Collection {
            id: "c1".to_string(),
            name: "Favorites".to_string(),
            description: None,
            anime_ids: vec!["a1".to_string()],
            created_at: 10,
            updated_at: 20,
        };
        let value = serde_json::to_value(&collection).expect("serialize collection");
        assert_eq!(
            value,
            json!({
                "id": "c1",
                "name": "Favorites",
                "description": null,
                "animeIds": ["a1"],
                "createdAt": 10,
                "updatedAt": 20,
            })
        );
        assert!(collection.contains_anime("a1"));
        assert!(!collection.contains_anime("a2"));
    }

    #[test]
    fn anime_airing_status_never_serializes_as_status() {
        let anime = Anime {
            id: "a1".to_string(),
            title: "Mushishi".to_string(),
            episodes: Some(26),
            airing_status: AiringStatus::Finished,
            year: Some(2005),
            cover_image: None,
            synopsis: None,
        };
        let value = serde_json::to_value(&anime).expect("serialize anime");
        assert!(value.get("status").is_none());
        assert_eq!(value.get("airingStatus"), Some(&json!("finished")));
    }

    #[test]
    fn anime_without_airing_status_defaults_to_unknown() {
        let anime: Anime = serde_json::from_value(json!({
            "id": "a2",
            "title": "Haibane Renmei",
            "episodes": 13,
            "year": null,
            "coverImage": null,
            "synopsis": null,
        }))
        .expect("deserialize anime");
        assert_eq!(anime.airing_status, AiringStatus::Unknown);
    }
}
