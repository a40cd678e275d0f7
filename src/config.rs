//! Runtime configuration: server settings from the environment and the seed
//! games used by the in-memory store.

use std::{env, fs, io::ErrorKind, path::PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

use crate::dto::{
    game::{GameDraft, GamePayload},
    validation::field_violations,
};

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "GAME_DAY_CONFIG_PATH";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_MONGO_URI: &str = "mongodb://localhost:27017";

#[derive(Debug, Clone, PartialEq, Eq)]
/// Which persistence adapter backs the API.
pub enum StorageBackend {
    /// Process-local store, seeded from [`AppConfig`].
    Memory,
    /// MongoDB document store.
    Mongo {
        uri: String,
        database: Option<String>,
    },
}

impl StorageBackend {
    /// Short name reported by the landing route.
    pub fn label(&self) -> &'static str {
        match self {
            StorageBackend::Memory => "memory",
            StorageBackend::Mongo { .. } => "mongodb",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Settings read from environment variables at startup.
pub struct ServerSettings {
    pub port: u16,
    pub storage: StorageBackend,
}

impl ServerSettings {
    /// Read `PORT`, `STORAGE_BACKEND`, `MONGODB_URI` and `MONGO_DB`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let port = match lookup("PORT") {
            Some(raw) => raw.trim().parse::<u16>().unwrap_or_else(|_| {
                warn!(value = %raw, "invalid PORT; using default");
                DEFAULT_PORT
            }),
            None => DEFAULT_PORT,
        };

        let requested = lookup("STORAGE_BACKEND").map(|value| value.trim().to_ascii_lowercase());
        let use_mongo = match requested.as_deref() {
            None => cfg!(feature = "mongo-store"),
            Some("memory") => false,
            Some("mongo") | Some("mongodb") => true,
            Some(other) => {
                warn!(value = other, "unknown STORAGE_BACKEND; using default");
                cfg!(feature = "mongo-store")
            }
        };

        let storage = if use_mongo && !cfg!(feature = "mongo-store") {
            warn!("MongoDB support not compiled in; falling back to the in-memory store");
            StorageBackend::Memory
        } else if use_mongo {
            StorageBackend::Mongo {
                uri: lookup("MONGODB_URI").unwrap_or_else(|| DEFAULT_MONGO_URI.into()),
                database: lookup("MONGO_DB").filter(|name| !name.trim().is_empty()),
            }
        } else {
            StorageBackend::Memory
        };

        Self { port, storage }
    }
}

#[derive(Debug, Clone)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    seed_games: Vec<GameDraft>,
}

impl AppConfig {
    /// Load the application configuration from disk, falling back to the baked-in seed games.
    pub fn load() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => {
                    let app_config: Self = raw.into();
                    info!(
                        path = %path.display(),
                        count = app_config.seed_games.len(),
                        "loaded seed games from config"
                    );
                    app_config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }

    /// Games inserted into the in-memory store at startup, oldest first.
    pub fn seed_games(&self) -> &[GameDraft] {
        &self.seed_games
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            seed_games: default_seed_games(),
        }
    }
}

#[derive(Debug, Deserialize)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    #[serde(default)]
    seed_games: Vec<GamePayload>,
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        let seed_games = value
            .seed_games
            .into_iter()
            .enumerate()
            .filter_map(|(index, payload)| match payload.normalize() {
                Ok(draft) => Some(draft),
                Err(errors) => {
                    warn!(
                        index,
                        violations = ?field_violations(&errors),
                        "skipping invalid seed game"
                    );
                    None
                }
            })
            .collect();
        Self { seed_games }
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

/// Built-in seed games shipped with the binary.
fn default_seed_games() -> Vec<GameDraft> {
    vec![
        GameDraft {
            title: "Lakers vs Celtics".into(),
            league: "NBA".into(),
            date: "2024-12-15".into(),
            time: "20:00".into(),
            venue: "Crypto.com Arena".into(),
            city: "Los Angeles, CA".into(),
            price: 150,
            image_url: Some("/images/lakers-celtics.jpg".into()),
            summary: "A classic rivalry matchup between two historic franchises.".into(),
        },
        GameDraft {
            title: "Falcons vs Saints".into(),
            league: "NFL".into(),
            date: "2024-12-20".into(),
            time: "13:00".into(),
            venue: "Mercedes-Benz Stadium".into(),
            city: "Atlanta, GA".into(),
            price: 120,
            image_url: Some("/images/falcons-saints.jpg".into()),
            summary: "Divisional rivalry game with playoff implications.".into(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn settings(vars: &[(&str, &str)]) -> ServerSettings {
        let vars = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect::<HashMap<_, _>>();
        ServerSettings::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn memory_backend_ignores_mongo_variables() {
        let parsed = settings(&[
            ("PORT", "8081"),
            ("STORAGE_BACKEND", "Memory"),
            ("MONGODB_URI", "mongodb://db:27017"),
        ]);
        assert_eq!(parsed.port, 8081);
        assert_eq!(parsed.storage, StorageBackend::Memory);
    }

    #[test]
    fn invalid_port_falls_back_to_default() {
        let parsed = settings(&[("PORT", "eighty"), ("STORAGE_BACKEND", "memory")]);
        assert_eq!(parsed.port, DEFAULT_PORT);
    }

    #[cfg(feature = "mongo-store")]
    #[test]
    fn mongo_backend_reads_connection_settings() {
        let parsed = settings(&[
            ("STORAGE_BACKEND", "mongo"),
            ("MONGODB_URI", "mongodb://db:27017"),
            ("MONGO_DB", "gameday_test"),
        ]);
        assert_eq!(
            parsed.storage,
            StorageBackend::Mongo {
                uri: "mongodb://db:27017".into(),
                database: Some("gameday_test".into()),
            }
        );
    }

    #[test]
    fn built_in_seeds_pass_validation() {
        for draft in default_seed_games() {
            let payload: GamePayload = draft.clone().into();
            assert_eq!(payload.normalize().unwrap(), draft);
        }
    }

    #[test]
    fn invalid_seed_games_are_skipped() {
        let raw: RawConfig = serde_json::from_str(
            r#"{
                "seed_games": [
                    {"title": "x"},
                    {
                        "title": "Kings vs Hawks",
                        "league": "NBA",
                        "date": "2024-10-25",
                        "time": "20:00",
                        "venue": "Golden 1 Center",
                        "city": "Sacramento, CA",
                        "price": 95,
                        "image": "/images/kings-hawks.jpg",
                        "summary": "Pace-and-space showdown out west."
                    }
                ]
            }"#,
        )
        .unwrap();

        let config: AppConfig = raw.into();
        assert_eq!(config.seed_games().len(), 1);
        assert_eq!(
            config.seed_games()[0].image_url.as_deref(),
            Some("/images/kings-hawks.jpg")
        );
    }
}
