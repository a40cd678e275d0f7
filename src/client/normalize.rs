//! Tolerant decoding of game payloads.
//!
//! Older deployments wrapped responses differently and spelled some fields
//! differently (`img`/`image`, `_id`, `matchup`, ...). Everything coming back
//! from the API passes through here once, so the rest of the client only ever
//! sees [`RemoteGame`].

use serde_json::Value;

/// A game as seen by the client, with every alias folded into one field.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteGame {
    pub id: String,
    pub title: String,
    pub league: String,
    pub date: String,
    pub time: String,
    pub venue: String,
    pub city: String,
    pub price: Option<f64>,
    /// Image reference exactly as stored.
    pub image_url: Option<String>,
    /// Image reference resolved against the API base URL, ready to load.
    pub image_src: String,
    pub summary: String,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

/// Extract the list of games from a bare array or a `{games}`/`{data}` wrapper.
pub fn normalize_list(payload: &Value) -> Vec<Value> {
    [Some(payload), payload.get("games"), payload.get("data")]
        .into_iter()
        .flatten()
        .find_map(Value::as_array)
        .cloned()
        .unwrap_or_default()
}

/// Decode a single game from a bare object or a `{game}`/`{data}` wrapper.
pub fn normalize_game(payload: &Value, base_url: &str) -> Option<RemoteGame> {
    let game = payload
        .get("game")
        .or_else(|| payload.get("data"))
        .filter(|inner| inner.is_object())
        .unwrap_or(payload);
    game.as_object()?;

    let image_url = first_text(game, &["imageUrl", "img", "image"]);
    let image_src = image_url
        .as_deref()
        .map(|path| resolve_image_url(base_url, path))
        .unwrap_or_default();

    Some(RemoteGame {
        id: identifier(game).unwrap_or_default(),
        title: text_or(game, &["title", "matchup"], "Matchup"),
        league: text_or(game, &["league", "competition"], "League"),
        date: text_or(game, &["date", "gameday"], "TBD"),
        time: text_or(game, &["time", "start"], ""),
        venue: text_or(game, &["venue", "stadium"], "Venue"),
        city: text_or(game, &["city", "location"], "Venue"),
        price: price(game.get("price")),
        image_url,
        image_src,
        summary: text_or(game, &["summary", "description"], ""),
        created_at: first_text(game, &["createdAt"]),
        updated_at: first_text(game, &["updatedAt"]),
    })
}

/// Turn a stored image reference into a loadable URL.
///
/// Absolute `http(s)` URLs pass through; anything else is served by the API host.
pub fn resolve_image_url(base_url: &str, path: &str) -> String {
    let path = path.trim();
    if path.is_empty() {
        return String::new();
    }

    let lower = path.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        return path.to_owned();
    }

    let base = base_url.trim_end_matches('/');
    if path.starts_with('/') {
        format!("{base}{path}")
    } else {
        format!("{base}/{path}")
    }
}

fn first_text(game: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| game.get(*key)?.as_str())
        .map(str::trim)
        .find(|text| !text.is_empty())
        .map(str::to_owned)
}

fn text_or(game: &Value, keys: &[&str], fallback: &str) -> String {
    first_text(game, keys).unwrap_or_else(|| fallback.to_owned())
}

fn identifier(game: &Value) -> Option<String> {
    ["id", "_id"].iter().find_map(|key| match game.get(*key)? {
        Value::String(id) if !id.is_empty() => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        // Extended JSON object ids.
        Value::Object(map) => map.get("$oid")?.as_str().map(str::to_owned),
        _ => None,
    })
}

fn price(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}
