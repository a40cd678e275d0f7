use axum::{Json, Router, extract::State, routing::get};
use indexmap::IndexMap;

use crate::{
    dto::health::{ApiIndex, HealthResponse},
    services::health_service,
    state::SharedState,
};

#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses((status = 200, description = "Service health", body = HealthResponse))
)]
/// Return the current health status of the backend and ping the store.
pub async fn healthcheck(State(state): State<SharedState>) -> Json<HealthResponse> {
    let status = health_service::health_status(&state).await;
    Json(status)
}

#[utoipa::path(
    get,
    path = "/",
    tag = "health",
    responses((status = 200, description = "API landing page", body = ApiIndex))
)]
/// Describe the API surface.
pub async fn index(State(state): State<SharedState>) -> Json<ApiIndex> {
    let endpoints = [
        ("GET /api/games", "Get all games"),
        ("GET /api/games/{id}", "Get a single game"),
        ("POST /api/games", "Create a new game"),
        ("PUT /api/games/{id}", "Update a game"),
        ("DELETE /api/games/{id}", "Delete a game"),
        ("GET /api/schema/game", "Validation rules for games"),
    ]
    .into_iter()
    .map(|(route, description)| (route.to_owned(), description.to_owned()))
    .collect::<IndexMap<_, _>>();

    Json(ApiIndex {
        message: "Game Day API".into(),
        endpoints,
        storage: state.storage_label().to_owned(),
    })
}

/// Configure the health and landing routes.
pub fn router() -> Router<SharedState> {
    Router::<SharedState>::new()
        .route("/", get(index))
        .route("/health", get(healthcheck))
}
