use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use validator::{Validate, ValidationErrors};

use crate::{
    dao::models::GameEntity,
    dto::{
        format_system_time,
        validation::{GameField, PRICE_RULE, PriceRule, TEXT_RULES, TextRule, validate_game},
    },
};

/// Candidate game as submitted by a client, before validation.
///
/// Every field is optional so that missing values surface as field-level
/// violations rather than as a body rejection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", from = "RawGamePayload")]
pub struct GamePayload {
    pub title: Option<String>,
    pub league: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub venue: Option<String>,
    pub city: Option<String>,
    /// Number, or a numeric string that is coerced during validation.
    #[schema(value_type = Option<f64>)]
    pub price: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub summary: Option<String>,
    /// Text fields that arrived as some other JSON type.
    #[serde(skip)]
    pub(crate) non_text: Vec<GameField>,
}

/// Wire shape accepted on input, including the legacy `img`/`image` fields.
///
/// Text fields stay untyped here so a wrong JSON type becomes a field
/// violation instead of rejecting the whole body.
#[derive(Debug, Deserialize)]
struct RawGamePayload {
    title: Option<Value>,
    league: Option<Value>,
    date: Option<Value>,
    time: Option<Value>,
    venue: Option<Value>,
    city: Option<Value>,
    price: Option<Value>,
    #[serde(rename = "imageUrl")]
    image_url: Option<Value>,
    img: Option<Value>,
    image: Option<Value>,
    summary: Option<Value>,
}

enum RawText {
    Absent,
    Text(String),
    Other,
}

impl From<Option<Value>> for RawText {
    fn from(value: Option<Value>) -> Self {
        match value {
            None | Some(Value::Null) => RawText::Absent,
            Some(Value::String(text)) => RawText::Text(text),
            Some(_) => RawText::Other,
        }
    }
}

impl From<RawGamePayload> for GamePayload {
    fn from(raw: RawGamePayload) -> Self {
        let mut non_text = Vec::new();
        let mut text = |field: GameField, value: Option<Value>| match RawText::from(value) {
            RawText::Absent => None,
            RawText::Text(text) => Some(text),
            RawText::Other => {
                non_text.push(field);
                None
            }
        };

        let title = text(GameField::Title, raw.title);
        let league = text(GameField::League, raw.league);
        let date = text(GameField::Date, raw.date);
        let time = text(GameField::Time, raw.time);
        let venue = text(GameField::Venue, raw.venue);
        let city = text(GameField::City, raw.city);
        let summary = text(GameField::Summary, raw.summary);

        // First non-blank spelling wins: imageUrl, then img, then image.
        let candidates = [raw.image_url, raw.img, raw.image].map(RawText::from);
        let image_url = candidates.iter().find_map(|candidate| match candidate {
            RawText::Text(text) if !text.trim().is_empty() => Some(text.clone()),
            _ => None,
        });
        if image_url.is_none()
            && candidates
                .iter()
                .any(|candidate| matches!(candidate, RawText::Other))
        {
            non_text.push(GameField::ImageUrl);
        }

        Self {
            title,
            league,
            date,
            time,
            venue,
            city,
            price: raw.price,
            image_url,
            summary,
            non_text,
        }
    }
}

impl GamePayload {
    /// Raw text submitted for a field (the price is not text and yields `None`).
    pub fn text(&self, field: GameField) -> Option<&str> {
        let value = match field {
            GameField::Title => &self.title,
            GameField::League => &self.league,
            GameField::Date => &self.date,
            GameField::Time => &self.time,
            GameField::Venue => &self.venue,
            GameField::City => &self.city,
            GameField::ImageUrl => &self.image_url,
            GameField::Summary => &self.summary,
            GameField::Price => return None,
        };
        value.as_deref()
    }

    /// True when `field` was sent as a JSON type other than a string.
    pub fn is_non_text(&self, field: GameField) -> bool {
        self.non_text.contains(&field)
    }

    /// Validate and normalize into a [`GameDraft`].
    pub fn normalize(&self) -> Result<GameDraft, ValidationErrors> {
        validate_game(self)
    }
}

impl Validate for GamePayload {
    fn validate(&self) -> Result<(), ValidationErrors> {
        validate_game(self).map(|_| ())
    }
}

/// Validated game fields, ready to be persisted or sent to the API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GameDraft {
    pub title: String,
    pub league: String,
    pub date: String,
    pub time: String,
    pub venue: String,
    pub city: String,
    pub price: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub summary: String,
}

impl GameDraft {
    pub(crate) fn set_text(&mut self, field: GameField, value: Option<String>) {
        if field == GameField::ImageUrl {
            self.image_url = value;
            return;
        }

        let value = value.unwrap_or_default();
        match field {
            GameField::Title => self.title = value,
            GameField::League => self.league = value,
            GameField::Date => self.date = value,
            GameField::Time => self.time = value,
            GameField::Venue => self.venue = value,
            GameField::City => self.city = value,
            GameField::Summary => self.summary = value,
            GameField::Price | GameField::ImageUrl => {}
        }
    }
}

impl From<GameDraft> for GamePayload {
    fn from(draft: GameDraft) -> Self {
        Self {
            title: Some(draft.title),
            league: Some(draft.league),
            date: Some(draft.date),
            time: Some(draft.time),
            venue: Some(draft.venue),
            city: Some(draft.city),
            price: Some(Value::from(draft.price)),
            image_url: draft.image_url,
            summary: Some(draft.summary),
            non_text: Vec::new(),
        }
    }
}

/// Public projection of a stored game.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GameView {
    pub id: String,
    pub title: String,
    pub league: String,
    pub date: String,
    pub time: String,
    pub venue: String,
    pub city: String,
    pub price: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub summary: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<GameEntity> for GameView {
    fn from(entity: GameEntity) -> Self {
        let GameEntity {
            id,
            draft,
            created_at,
            updated_at,
        } = entity;

        Self {
            id: id.to_string(),
            title: draft.title,
            league: draft.league,
            date: draft.date,
            time: draft.time,
            venue: draft.venue,
            city: draft.city,
            price: draft.price,
            image_url: draft.image_url,
            summary: draft.summary,
            created_at: format_system_time(created_at),
            updated_at: format_system_time(updated_at),
        }
    }
}

/// Body returned by `GET /api/games/{id}`.
#[derive(Debug, Serialize, ToSchema)]
pub struct GameEnvelope {
    pub game: GameView,
}

/// Body returned by create, update and delete.
#[derive(Debug, Serialize, ToSchema)]
pub struct GameMutationResponse {
    pub message: String,
    pub game: GameView,
}

impl GameMutationResponse {
    pub fn new(message: &str, game: GameView) -> Self {
        Self {
            message: message.to_owned(),
            game,
        }
    }
}

/// Machine-readable copy of the validation rule set.
#[derive(Debug, Serialize, ToSchema)]
pub struct GameSchemaDescription {
    pub text: Vec<TextRule>,
    pub price: PriceRule,
}

impl GameSchemaDescription {
    pub fn current() -> Self {
        Self {
            text: TEXT_RULES.to_vec(),
            price: PRICE_RULE,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn legacy_image_fields_fold_into_image_url() {
        let payload: GamePayload =
            serde_json::from_value(json!({ "img": "/images/a.png" })).unwrap();
        assert_eq!(payload.image_url.as_deref(), Some("/images/a.png"));

        let payload: GamePayload = serde_json::from_value(json!({
            "imageUrl": "",
            "img": "  ",
            "image": "https://cdn.example.com/b.png"
        }))
        .unwrap();
        assert_eq!(
            payload.image_url.as_deref(),
            Some("https://cdn.example.com/b.png")
        );
    }

    #[test]
    fn image_url_takes_precedence_over_legacy_names() {
        let payload: GamePayload = serde_json::from_value(json!({
            "imageUrl": "/new.png",
            "img": "/old.png"
        }))
        .unwrap();
        assert_eq!(payload.image_url.as_deref(), Some("/new.png"));
    }

    #[test]
    fn wrong_json_types_are_recorded_per_field() {
        let payload: GamePayload = serde_json::from_value(json!({
            "title": 123,
            "league": "NBA",
            "city": null,
            "img": false
        }))
        .unwrap();
        assert_eq!(payload.title, None);
        assert!(payload.is_non_text(GameField::Title));
        assert!(payload.is_non_text(GameField::ImageUrl));
        assert!(!payload.is_non_text(GameField::League));
        assert!(!payload.is_non_text(GameField::City));
    }

    #[test]
    fn a_text_image_alias_outranks_a_mistyped_one() {
        let payload: GamePayload =
            serde_json::from_value(json!({ "imageUrl": 7, "image": "/images/a.png" })).unwrap();
        assert_eq!(payload.image_url.as_deref(), Some("/images/a.png"));
        assert!(!payload.is_non_text(GameField::ImageUrl));
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let payload: GamePayload =
            serde_json::from_value(json!({ "_id": "abc", "title": "Kings vs Hawks" })).unwrap();
        assert_eq!(payload.title.as_deref(), Some("Kings vs Hawks"));
    }

    #[test]
    fn draft_serializes_with_camel_case_names() {
        let draft = GameDraft {
            image_url: Some("/a.png".into()),
            ..GameDraft::default()
        };
        let value = serde_json::to_value(&draft).unwrap();
        assert_eq!(value["imageUrl"], "/a.png");
        assert!(value.get("image_url").is_none());
    }

    #[test]
    fn schema_description_lists_every_rule() {
        let description = GameSchemaDescription::current();
        assert_eq!(description.text.len() + 1, GameField::ALL.len());
        let value = serde_json::to_value(&description).unwrap();
        assert_eq!(value["text"][0]["field"], "title");
        assert_eq!(value["price"]["max"], 5000);
    }
}
