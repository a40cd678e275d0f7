pub mod memory;
#[cfg(feature = "mongo-store")]
pub mod mongodb;

use crate::dao::models::GameEntity;
use crate::dao::storage::StorageResult;
use crate::dto::game::GameDraft;
use futures::future::BoxFuture;

/// Abstraction over the persistence layer for games.
///
/// Identifiers are passed exactly as received from clients; implementations
/// treat an identifier they cannot parse as a missing record.
pub trait GameStore: Send + Sync {
    /// Every game, newest first by creation time.
    fn list_games(&self) -> BoxFuture<'static, StorageResult<Vec<GameEntity>>>;
    fn find_game(&self, id: String) -> BoxFuture<'static, StorageResult<Option<GameEntity>>>;
    /// Persist a new game, assigning its identifier and timestamps.
    fn insert_game(&self, draft: GameDraft) -> BoxFuture<'static, StorageResult<GameEntity>>;
    /// Replace the fields of an existing game, returning the updated record.
    fn replace_game(
        &self,
        id: String,
        draft: GameDraft,
    ) -> BoxFuture<'static, StorageResult<Option<GameEntity>>>;
    /// Remove a game, returning the removed record.
    fn delete_game(&self, id: String) -> BoxFuture<'static, StorageResult<Option<GameEntity>>>;
    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>>;
}
