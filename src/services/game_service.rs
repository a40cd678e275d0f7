//! Game CRUD operations backing the `/api/games` routes.
//!
//! Every operation first requires a usable store, so a missing database
//! surfaces as a service-unavailable error before any validation happens.
//! Writes go straight to the store; concurrent updates of the same game race
//! and the last one wins.

use tracing::{debug, info};

use crate::{
    dto::game::{GamePayload, GameView},
    error::ServiceError,
    state::SharedState,
};

/// Return every stored game, newest first.
pub async fn list_games(state: &SharedState) -> Result<Vec<GameView>, ServiceError> {
    let store = state.require_game_store().await?;
    let games = store.list_games().await?;
    debug!(count = games.len(), "listed games");
    Ok(games.into_iter().map(Into::into).collect())
}

/// Look up a single game; malformed identifiers are reported as not found.
pub async fn get_game(state: &SharedState, id: &str) -> Result<GameView, ServiceError> {
    let store = state.require_game_store().await?;
    let Some(game) = store.find_game(id.to_owned()).await? else {
        return Err(not_found(id));
    };
    Ok(game.into())
}

/// Validate the payload and persist it as a new game.
pub async fn create_game(
    state: &SharedState,
    payload: GamePayload,
) -> Result<GameView, ServiceError> {
    let store = state.require_game_store().await?;
    let draft = payload.normalize()?;

    let game = store.insert_game(draft).await?;
    info!(id = %game.id, title = %game.draft.title, "game created");
    Ok(game.into())
}

/// Validate the payload and replace the fields of an existing game.
pub async fn update_game(
    state: &SharedState,
    id: &str,
    payload: GamePayload,
) -> Result<GameView, ServiceError> {
    let store = state.require_game_store().await?;
    let draft = payload.normalize()?;

    let Some(game) = store.replace_game(id.to_owned(), draft).await? else {
        return Err(not_found(id));
    };
    info!(id = %game.id, "game updated");
    Ok(game.into())
}

/// Delete a game, returning the removed record.
pub async fn delete_game(state: &SharedState, id: &str) -> Result<GameView, ServiceError> {
    let store = state.require_game_store().await?;
    let Some(game) = store.delete_game(id.to_owned()).await? else {
        return Err(not_found(id));
    };
    info!(id = %game.id, "game deleted");
    Ok(game.into())
}

fn not_found(id: &str) -> ServiceError {
    ServiceError::NotFound(format!("game `{id}` not found"))
}
