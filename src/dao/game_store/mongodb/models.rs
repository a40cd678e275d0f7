use mongodb::bson::{DateTime, Document, doc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::MongoDaoError;
use crate::{dao::models::GameEntity, dto::game::GameDraft};

/// Stored shape of a game in the `games` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MongoGameDocument {
    #[serde(rename = "_id")]
    id: String,
    title: String,
    league: String,
    date: String,
    time: String,
    venue: String,
    city: String,
    price: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    image_url: Option<String>,
    summary: String,
    created_at: DateTime,
    updated_at: DateTime,
}

impl From<GameEntity> for MongoGameDocument {
    fn from(value: GameEntity) -> Self {
        let GameDraft {
            title,
            league,
            date,
            time,
            venue,
            city,
            price,
            image_url,
            summary,
        } = value.draft;

        Self {
            id: value.id.to_string(),
            title,
            league,
            date,
            time,
            venue,
            city,
            price,
            image_url,
            summary,
            created_at: DateTime::from_system_time(value.created_at),
            updated_at: DateTime::from_system_time(value.updated_at),
        }
    }
}

impl TryFrom<MongoGameDocument> for GameEntity {
    type Error = MongoDaoError;

    fn try_from(value: MongoGameDocument) -> Result<Self, Self::Error> {
        let id = Uuid::parse_str(&value.id).map_err(|_| MongoDaoError::CorruptId {
            id: value.id.clone(),
        })?;

        Ok(Self {
            id,
            draft: GameDraft {
                title: value.title,
                league: value.league,
                date: value.date,
                time: value.time,
                venue: value.venue,
                city: value.city,
                price: value.price,
                image_url: value.image_url,
                summary: value.summary,
            },
            created_at: value.created_at.to_system_time(),
            updated_at: value.updated_at.to_system_time(),
        })
    }
}

pub fn doc_id(id: Uuid) -> Document {
    doc! {"_id": id.to_string()}
}
