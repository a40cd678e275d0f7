use std::sync::Arc;

use game_day_api::{
    client::GameClient,
    dao::game_store::memory::MemoryGameStore,
    dto::game::GameDraft,
    routes,
    state::{AppState, SharedState},
};
use tokio::net::TcpListener;

pub struct TestApp {
    pub address: String,
    pub client: GameClient,
    pub state: SharedState,
}

/// Serve the router on an ephemeral port backed by an empty in-memory store.
pub async fn spawn_app() -> TestApp {
    let state = AppState::with_store("memory", Arc::new(MemoryGameStore::new())).await;
    serve(state).await
}

/// Serve the router without any store installed, as while the database is down.
pub async fn spawn_degraded_app() -> TestApp {
    serve(AppState::new("mongodb")).await
}

async fn serve(state: SharedState) -> TestApp {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{port}");

    let app = routes::router(state.clone());
    tokio::spawn(async move {
        axum::serve(listener, app.into_make_service())
            .await
            .expect("server error");
    });

    TestApp {
        client: GameClient::new(&address).expect("Failed to build client"),
        address,
        state,
    }
}

pub fn lakers_vs_celtics() -> GameDraft {
    GameDraft {
        title: "Lakers vs Celtics".into(),
        league: "NBA".into(),
        date: "2024-12-15".into(),
        time: "20:00".into(),
        venue: "Crypto.com Arena".into(),
        city: "Los Angeles, CA".into(),
        price: 150,
        image_url: None,
        summary: "A classic rivalry matchup between two historic franchises.".into(),
    }
}

pub fn titled(title: &str) -> GameDraft {
    GameDraft {
        title: title.into(),
        ..lakers_vs_celtics()
    }
}
