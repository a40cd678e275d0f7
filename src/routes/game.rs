use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    routing::get,
};

use crate::{
    dto::game::{GameEnvelope, GameMutationResponse, GamePayload, GameSchemaDescription, GameView},
    error::{AppError, ErrorBody},
    services::game_service,
    state::SharedState,
};

/// Routes exposing CRUD operations over games.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/api/games", get(list_games).post(create_game))
        .route(
            "/api/games/{id}",
            get(get_game).put(update_game).delete(delete_game),
        )
        .route("/api/schema/game", get(game_schema))
}

/// List every game, newest first.
#[utoipa::path(
    get,
    path = "/api/games",
    tag = "games",
    responses(
        (status = 200, description = "All games, newest first", body = [GameView]),
        (status = 500, description = "Storage failure", body = ErrorBody),
        (status = 503, description = "Storage not ready", body = ErrorBody)
    )
)]
pub async fn list_games(State(state): State<SharedState>) -> Result<Json<Vec<GameView>>, AppError> {
    Ok(Json(game_service::list_games(&state).await?))
}

/// Retrieve a single game.
#[utoipa::path(
    get,
    path = "/api/games/{id}",
    tag = "games",
    params(("id" = String, Path, description = "Identifier of the game")),
    responses(
        (status = 200, description = "Game found", body = GameEnvelope),
        (status = 404, description = "Unknown or malformed identifier", body = ErrorBody)
    )
)]
pub async fn get_game(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<GameEnvelope>, AppError> {
    let game = game_service::get_game(&state, &id).await?;
    Ok(Json(GameEnvelope { game }))
}

/// Validate and store a new game.
#[utoipa::path(
    post,
    path = "/api/games",
    tag = "games",
    request_body = GamePayload,
    responses(
        (status = 201, description = "Game created", body = GameMutationResponse),
        (status = 400, description = "Validation failed", body = ErrorBody),
        (status = 503, description = "Storage not ready", body = ErrorBody)
    )
)]
pub async fn create_game(
    State(state): State<SharedState>,
    payload: Result<Json<GamePayload>, JsonRejection>,
) -> Result<(StatusCode, Json<GameMutationResponse>), AppError> {
    let Json(payload) = payload.map_err(reject_body)?;
    let game = game_service::create_game(&state, payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(GameMutationResponse::new("Game created successfully", game)),
    ))
}

/// Validate and replace an existing game.
#[utoipa::path(
    put,
    path = "/api/games/{id}",
    tag = "games",
    params(("id" = String, Path, description = "Identifier of the game")),
    request_body = GamePayload,
    responses(
        (status = 200, description = "Game updated", body = GameMutationResponse),
        (status = 400, description = "Validation failed", body = ErrorBody),
        (status = 404, description = "Unknown or malformed identifier", body = ErrorBody)
    )
)]
pub async fn update_game(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    payload: Result<Json<GamePayload>, JsonRejection>,
) -> Result<Json<GameMutationResponse>, AppError> {
    let Json(payload) = payload.map_err(reject_body)?;
    let game = game_service::update_game(&state, &id, payload).await?;
    Ok(Json(GameMutationResponse::new("Game updated successfully", game)))
}

/// Delete a game and echo it back.
#[utoipa::path(
    delete,
    path = "/api/games/{id}",
    tag = "games",
    params(("id" = String, Path, description = "Identifier of the game")),
    responses(
        (status = 200, description = "Game deleted", body = GameMutationResponse),
        (status = 404, description = "Unknown or malformed identifier", body = ErrorBody)
    )
)]
pub async fn delete_game(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<GameMutationResponse>, AppError> {
    let game = game_service::delete_game(&state, &id).await?;
    Ok(Json(GameMutationResponse::new("Game deleted successfully", game)))
}

/// Publish the validation rule set so other clients can enforce it too.
#[utoipa::path(
    get,
    path = "/api/schema/game",
    tag = "games",
    responses((status = 200, description = "Validation rules", body = GameSchemaDescription))
)]
pub async fn game_schema() -> Json<GameSchemaDescription> {
    Json(GameSchemaDescription::current())
}

fn reject_body(rejection: JsonRejection) -> AppError {
    AppError::BadRequest(format!("Invalid request body: {}", rejection.body_text()))
}
