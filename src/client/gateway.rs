//! HTTP gateway to the Game Day API.

use std::{env, sync::Arc};

use futures::future::BoxFuture;
use reqwest::{
    Client, Method, StatusCode,
    header::{ACCEPT, CONTENT_TYPE},
};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    client::normalize::{RemoteGame, normalize_game, normalize_list},
    dto::{game::GameDraft, validation::FieldViolation},
};

/// Environment variable holding the API base URL.
pub const BASE_URL_ENV: &str = "GAME_DAY_API_BASE_URL";
/// Base URL used when [`BASE_URL_ENV`] is unset.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// Every failure the gateway can report, normalized into one shape.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The server could not be reached at all.
    #[error("Network error: Unable to reach the API server. Please check your connection.")]
    Network {
        /// Transport failure reported by reqwest.
        #[source]
        source: reqwest::Error,
    },
    /// The server answered with an error status.
    #[error("{message}")]
    Api {
        /// Server supplied message, or a generic one built from the status.
        message: String,
        /// HTTP status of the response.
        status: StatusCode,
        /// Field-level violations reported by the server, if any.
        details: Vec<FieldViolation>,
    },
    /// The server answered but the body could not be understood.
    #[error("Invalid response from server: {status}")]
    InvalidResponse {
        /// HTTP status of the response.
        status: StatusCode,
    },
    /// An operation needing an identifier was given an empty one.
    #[error("Game id is required")]
    MissingId,
    /// Building the HTTP client failed (invalid TLS setup, etc).
    #[error("failed to build HTTP client")]
    ClientBuilder {
        /// Builder failure reported by reqwest.
        #[source]
        source: reqwest::Error,
    },
}

impl GatewayError {
    /// HTTP status of the response that caused the error, when there was one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            GatewayError::Api { status, .. } | GatewayError::InvalidResponse { status } => {
                Some(*status)
            }
            _ => None,
        }
    }

    /// Field-level violations carried by the error.
    pub fn details(&self) -> &[FieldViolation] {
        match self {
            GatewayError::Api { details, .. } => details,
            _ => &[],
        }
    }

    /// True when the server was never reached.
    pub fn is_network(&self) -> bool {
        matches!(self, GatewayError::Network { .. })
    }
}

/// Operations the client needs from the API; implemented over HTTP by
/// [`GameClient`] and by fakes in tests.
pub trait GameApi: Send + Sync {
    fn list_games(&self) -> BoxFuture<'_, Result<Vec<RemoteGame>, GatewayError>>;
    fn get_game(&self, id: String) -> BoxFuture<'_, Result<RemoteGame, GatewayError>>;
    fn create_game(&self, draft: GameDraft) -> BoxFuture<'_, Result<RemoteGame, GatewayError>>;
    fn update_game(
        &self,
        id: String,
        draft: GameDraft,
    ) -> BoxFuture<'_, Result<RemoteGame, GatewayError>>;
    fn delete_game(&self, id: String) -> BoxFuture<'_, Result<RemoteGame, GatewayError>>;
}

/// reqwest-backed client for the `/api/games` routes.
#[derive(Clone)]
pub struct GameClient {
    client: Client,
    base_url: Arc<str>,
}

impl GameClient {
    /// Build a client for `base_url`; trailing slashes are ignored.
    pub fn new(base_url: &str) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .build()
            .map_err(|source| GatewayError::ClientBuilder { source })?;

        Ok(Self {
            client,
            base_url: Arc::from(base_url.trim().trim_end_matches('/')),
        })
    }

    /// Build a client from [`BASE_URL_ENV`], falling back to [`DEFAULT_BASE_URL`].
    pub fn from_env() -> Result<Self, GatewayError> {
        let base_url = env::var(BASE_URL_ENV)
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_owned());
        debug!(%base_url, "resolved API base URL");
        Self::new(&base_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Join `path` onto the base URL, adding the leading slash when missing.
    pub fn build_url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{path}", self.base_url)
        } else {
            format!("{}/{path}", self.base_url)
        }
    }

    /// Issue a request and return the decoded body, or a normalized error.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&GameDraft>,
    ) -> Result<Value, GatewayError> {
        let url = self.build_url(path);
        let mut builder = self
            .client
            .request(method, &url)
            .header(ACCEPT, "application/json");
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|source| GatewayError::Network { source })?;

        let status = response.status();
        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.contains("application/json"));

        let text = response
            .text()
            .await
            .map_err(|_| GatewayError::InvalidResponse { status })?;
        let body = if is_json {
            serde_json::from_str::<Value>(&text)
                .map_err(|_| GatewayError::InvalidResponse { status })?
        } else {
            Value::String(text)
        };

        if status.is_success() {
            return Ok(body);
        }

        warn!(%status, %url, "API returned an error response");
        Err(api_error(status, &body))
    }

    fn decode_game(&self, body: &Value) -> Result<RemoteGame, GatewayError> {
        normalize_game(body, &self.base_url).ok_or(GatewayError::InvalidResponse {
            status: StatusCode::OK,
        })
    }

    async fn send_for_game(
        &self,
        method: Method,
        path: &str,
        body: Option<&GameDraft>,
    ) -> Result<RemoteGame, GatewayError> {
        let body = self.request(method, path, body).await?;
        self.decode_game(&body)
    }
}

fn game_path(id: &str) -> Result<String, GatewayError> {
    let id = id.trim();
    if id.is_empty() {
        return Err(GatewayError::MissingId);
    }
    Ok(format!("/api/games/{id}"))
}

/// Build the normalized error for a non-success response.
fn api_error(status: StatusCode, body: &Value) -> GatewayError {
    let message = match body {
        Value::String(text) if !text.trim().is_empty() => text.clone(),
        _ => ["message", "error"]
            .iter()
            .find_map(|key| body.get(*key)?.as_str())
            .map(str::to_owned)
            .unwrap_or_else(|| format!("Request failed with status {}", status.as_u16())),
    };

    let details = body
        .get("errors")
        .cloned()
        .and_then(|errors| serde_json::from_value::<Vec<FieldViolation>>(errors).ok())
        .unwrap_or_default();

    GatewayError::Api {
        message,
        status,
        details,
    }
}

impl GameApi for GameClient {
    fn list_games(&self) -> BoxFuture<'_, Result<Vec<RemoteGame>, GatewayError>> {
        Box::pin(async move {
            let body = self.request(Method::GET, "/api/games", None).await?;
            Ok(normalize_list(&body)
                .iter()
                .filter_map(|game| normalize_game(game, &self.base_url))
                .collect())
        })
    }

    fn get_game(&self, id: String) -> BoxFuture<'_, Result<RemoteGame, GatewayError>> {
        Box::pin(async move {
            let path = game_path(&id)?;
            self.send_for_game(Method::GET, &path, None).await
        })
    }

    fn create_game(&self, draft: GameDraft) -> BoxFuture<'_, Result<RemoteGame, GatewayError>> {
        Box::pin(async move {
            self.send_for_game(Method::POST, "/api/games", Some(&draft))
                .await
        })
    }

    fn update_game(
        &self,
        id: String,
        draft: GameDraft,
    ) -> BoxFuture<'_, Result<RemoteGame, GatewayError>> {
        Box::pin(async move {
            let path = game_path(&id)?;
            self.send_for_game(Method::PUT, &path, Some(&draft)).await
        })
    }

    fn delete_game(&self, id: String) -> BoxFuture<'_, Result<RemoteGame, GatewayError>> {
        Box::pin(async move {
            let path = game_path(&id)?;
            self.send_for_game(Method::DELETE, &path, None).await
        })
    }
}
