//! Process-local game store used for development, tests, and as the fallback
//! backend when no document database is configured.

use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use dashmap::DashMap;
use futures::future::BoxFuture;
use uuid::Uuid;

use crate::{
    dao::{
        game_store::GameStore,
        models::{GameEntity, parse_game_id},
        storage::StorageResult,
    },
    dto::game::GameDraft,
};

#[derive(Clone, Default)]
pub struct MemoryGameStore {
    inner: Arc<MemoryInner>,
}

#[derive(Default)]
struct MemoryInner {
    games: DashMap<Uuid, StoredGame>,
    next_sequence: AtomicU64,
}

struct StoredGame {
    /// Insertion order, used to break creation-time ties.
    sequence: u64,
    entity: GameEntity,
}

impl MemoryGameStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store pre-populated with the given games, inserted in order.
    pub fn with_games(drafts: impl IntoIterator<Item = GameDraft>) -> Self {
        let store = Self::new();
        for draft in drafts {
            store.insert(draft);
        }
        store
    }

    pub fn len(&self) -> usize {
        self.inner.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.games.is_empty()
    }

    fn insert(&self, draft: GameDraft) -> GameEntity {
        let entity = GameEntity::new(draft);
        let sequence = self.inner.next_sequence.fetch_add(1, Ordering::Relaxed);
        self.inner.games.insert(
            entity.id,
            StoredGame {
                sequence,
                entity: entity.clone(),
            },
        );
        entity
    }

    fn list(&self) -> Vec<GameEntity> {
        let mut games = self
            .inner
            .games
            .iter()
            .map(|entry| (entry.sequence, entry.entity.clone()))
            .collect::<Vec<_>>();

        games.sort_by(|(left_seq, left), (right_seq, right)| {
            right
                .created_at
                .cmp(&left.created_at)
                .then(right_seq.cmp(left_seq))
        });

        games.into_iter().map(|(_, entity)| entity).collect()
    }

    fn find(&self, id: &str) -> Option<GameEntity> {
        let id = parse_game_id(id)?;
        self.inner
            .games
            .get(&id)
            .map(|entry| entry.entity.clone())
    }

    fn replace(&self, id: &str, draft: GameDraft) -> Option<GameEntity> {
        let id = parse_game_id(id)?;
        let mut entry = self.inner.games.get_mut(&id)?;
        let updated = entry.entity.clone().replaced_with(draft);
        entry.entity = updated.clone();
        Some(updated)
    }

    fn delete(&self, id: &str) -> Option<GameEntity> {
        let id = parse_game_id(id)?;
        self.inner
            .games
            .remove(&id)
            .map(|(_, stored)| stored.entity)
    }
}

impl GameStore for MemoryGameStore {
    fn list_games(&self) -> BoxFuture<'static, StorageResult<Vec<GameEntity>>> {
        let store = self.clone();
        Box::pin(async move { Ok(store.list()) })
    }

    fn find_game(&self, id: String) -> BoxFuture<'static, StorageResult<Option<GameEntity>>> {
        let store = self.clone();
        Box::pin(async move { Ok(store.find(&id)) })
    }

    fn insert_game(&self, draft: GameDraft) -> BoxFuture<'static, StorageResult<GameEntity>> {
        let store = self.clone();
        Box::pin(async move { Ok(store.insert(draft)) })
    }

    fn replace_game(
        &self,
        id: String,
        draft: GameDraft,
    ) -> BoxFuture<'static, StorageResult<Option<GameEntity>>> {
        let store = self.clone();
        Box::pin(async move { Ok(store.replace(&id, draft)) })
    }

    fn delete_game(&self, id: String) -> BoxFuture<'static, StorageResult<Option<GameEntity>>> {
        let store = self.clone();
        Box::pin(async move { Ok(store.delete(&id)) })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }
}
