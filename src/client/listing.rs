use tracing::warn;

use crate::client::{
    gateway::{GameApi, GatewayError},
    normalize::RemoteGame,
};

/// The game list as displayed by the client.
///
/// Each load is tagged with a generation so that a slow response from an
/// earlier request cannot overwrite the result of a newer one.
#[derive(Debug, Default)]
pub struct GameList {
    games: Vec<RemoteGame>,
    loading: bool,
    error: Option<String>,
    generation: u64,
}

impl GameList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn games(&self) -> &[RemoteGame] {
        &self.games
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Mark a load as started and return its generation.
    pub fn begin(&mut self) -> u64 {
        self.generation += 1;
        self.loading = true;
        self.error = None;
        self.generation
    }

    /// Apply the outcome of the load tagged `generation`.
    ///
    /// Returns false when a newer load has started since, in which case the
    /// outcome is dropped.
    pub fn finish(
        &mut self,
        generation: u64,
        result: Result<Vec<RemoteGame>, GatewayError>,
    ) -> bool {
        if generation != self.generation {
            return false;
        }

        self.loading = false;
        match result {
            Ok(games) => {
                self.games = games;
                self.error = None;
            }
            Err(err) => {
                warn!(error = %err, "failed to load games");
                self.error = Some(err.to_string());
            }
        }
        true
    }

    /// Fetch the list through `api`.
    pub async fn load(&mut self, api: &dyn GameApi) {
        let generation = self.begin();
        let result = api.list_games().await;
        self.finish(generation, result);
    }

    /// Re-issue the list request after a failure.
    pub async fn retry(&mut self, api: &dyn GameApi) {
        self.load(api).await;
    }

    /// Drop a game that was deleted elsewhere.
    pub fn remove(&mut self, id: &str) -> Option<RemoteGame> {
        let index = self.games.iter().position(|game| game.id == id)?;
        Some(self.games.remove(index))
    }

    /// Show a freshly created game at the top of the list.
    pub fn prepend(&mut self, game: RemoteGame) {
        self.games.retain(|existing| existing.id != game.id);
        self.games.insert(0, game);
    }
}
