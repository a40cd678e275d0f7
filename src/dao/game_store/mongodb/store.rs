use std::sync::Arc;

use futures::{TryStreamExt, future::BoxFuture};
use mongodb::{Client, Collection, Database, IndexModel, bson::doc, options::IndexOptions};
use tokio::sync::RwLock;

use super::{
    config::MongoConfig,
    connection::establish_connection,
    error::{MongoDaoError, MongoResult},
    models::{MongoGameDocument, doc_id},
};
use crate::{
    dao::{
        game_store::GameStore,
        models::{GameEntity, parse_game_id},
        storage::StorageResult,
    },
    dto::game::GameDraft,
};

const GAME_COLLECTION_NAME: &str = "games";

#[derive(Clone)]
pub struct MongoGameStore {
    inner: Arc<MongoInner>,
}

struct MongoInner {
    state: RwLock<MongoState>,
    config: MongoConfig,
}

struct MongoState {
    client: Client,
}

impl MongoInner {
    async fn database(&self) -> Database {
        let guard = self.state.read().await;
        guard.client.database(&self.config.database_name)
    }

    async fn ping(&self) -> MongoResult<()> {
        self.database()
            .await
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|source| MongoDaoError::HealthPing { source })?;
        Ok(())
    }

    async fn reconnect(&self) -> MongoResult<()> {
        let (client, _) =
            establish_connection(&self.config.options, &self.config.database_name).await?;
        let mut guard = self.state.write().await;
        guard.client = client;
        Ok(())
    }
}

impl MongoGameStore {
    /// Establish a connection to MongoDB and ensure indexes are present.
    pub async fn connect(config: MongoConfig) -> MongoResult<Self> {
        let (client, _) = establish_connection(&config.options, &config.database_name).await?;

        let inner = Arc::new(MongoInner {
            state: RwLock::new(MongoState { client }),
            config,
        });

        let store = Self { inner };
        store.ensure_indexes().await?;
        Ok(store)
    }

    async fn ensure_indexes(&self) -> MongoResult<()> {
        let collection = self.collection().await;
        let index = IndexModel::builder()
            .keys(doc! {"createdAt": -1})
            .options(
                IndexOptions::builder()
                    .name(Some("game_created_at_idx".to_owned()))
                    .build(),
            )
            .build();

        collection
            .create_index(index)
            .await
            .map_err(|source| MongoDaoError::EnsureIndex {
                collection: GAME_COLLECTION_NAME,
                index: "createdAt",
                source,
            })?;

        Ok(())
    }

    async fn collection(&self) -> Collection<MongoGameDocument> {
        self.inner
            .database()
            .await
            .collection::<MongoGameDocument>(GAME_COLLECTION_NAME)
    }

    async fn list_games(&self) -> MongoResult<Vec<GameEntity>> {
        let collection = self.collection().await;

        let documents: Vec<MongoGameDocument> = collection
            .find(doc! {})
            .sort(doc! {"createdAt": -1})
            .await
            .map_err(|source| MongoDaoError::ListGames { source })?
            .try_collect()
            .await
            .map_err(|source| MongoDaoError::ListGames { source })?;

        documents.into_iter().map(GameEntity::try_from).collect()
    }

    async fn find_game(&self, raw_id: String) -> MongoResult<Option<GameEntity>> {
        let Some(id) = parse_game_id(&raw_id) else {
            return Ok(None);
        };
        let collection = self.collection().await;

        collection
            .find_one(doc_id(id))
            .await
            .map_err(|source| MongoDaoError::LoadGame { id: raw_id, source })?
            .map(GameEntity::try_from)
            .transpose()
    }

    async fn insert_game(&self, draft: GameDraft) -> MongoResult<GameEntity> {
        let entity = GameEntity::new(draft);
        let document: MongoGameDocument = entity.clone().into();
        let collection = self.collection().await;

        collection
            .insert_one(&document)
            .await
            .map_err(|source| MongoDaoError::InsertGame {
                id: entity.id.to_string(),
                source,
            })?;

        Ok(entity)
    }

    async fn replace_game(
        &self,
        raw_id: String,
        draft: GameDraft,
    ) -> MongoResult<Option<GameEntity>> {
        let Some(existing) = self.find_game(raw_id.clone()).await? else {
            return Ok(None);
        };

        let updated = existing.replaced_with(draft);
        let document: MongoGameDocument = updated.clone().into();
        let collection = self.collection().await;

        let result = collection
            .replace_one(doc_id(updated.id), &document)
            .await
            .map_err(|source| MongoDaoError::ReplaceGame { id: raw_id, source })?;

        // Deleted between the lookup and the write.
        if result.matched_count == 0 {
            return Ok(None);
        }

        Ok(Some(updated))
    }

    async fn delete_game(&self, raw_id: String) -> MongoResult<Option<GameEntity>> {
        let Some(id) = parse_game_id(&raw_id) else {
            return Ok(None);
        };
        let collection = self.collection().await;

        collection
            .find_one_and_delete(doc_id(id))
            .await
            .map_err(|source| MongoDaoError::DeleteGame { id: raw_id, source })?
            .map(GameEntity::try_from)
            .transpose()
    }
}

impl GameStore for MongoGameStore {
    fn list_games(&self) -> BoxFuture<'static, StorageResult<Vec<GameEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.list_games().await.map_err(Into::into) })
    }

    fn find_game(&self, id: String) -> BoxFuture<'static, StorageResult<Option<GameEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.find_game(id).await.map_err(Into::into) })
    }

    fn insert_game(&self, draft: GameDraft) -> BoxFuture<'static, StorageResult<GameEntity>> {
        let store = self.clone();
        Box::pin(async move { store.insert_game(draft).await.map_err(Into::into) })
    }

    fn replace_game(
        &self,
        id: String,
        draft: GameDraft,
    ) -> BoxFuture<'static, StorageResult<Option<GameEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.replace_game(id, draft).await.map_err(Into::into) })
    }

    fn delete_game(&self, id: String) -> BoxFuture<'static, StorageResult<Option<GameEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.delete_game(id).await.map_err(Into::into) })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.inner.ping().await.map_err(Into::into) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.inner.reconnect().await.map_err(Into::into) })
    }
}
