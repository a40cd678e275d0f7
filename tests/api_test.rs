#![cfg(feature = "client")]

mod common;

use common::{lakers_vs_celtics, spawn_app, spawn_degraded_app, titled};
use game_day_api::{
    client::{GameApi, GameClient, GameForm, GameList, GatewayError},
    dto::validation::GameField,
};
use reqwest::StatusCode;
use serde_json::{Value, json};

#[tokio::test]
async fn created_game_is_returned_by_get_one() {
    let app = spawn_app().await;

    let created = app.client.create_game(lakers_vs_celtics()).await.unwrap();
    assert!(!created.id.is_empty());
    assert!(created.created_at.is_some());

    let fetched = app.client.get_game(created.id.clone()).await.unwrap();
    assert_eq!(fetched.title, "Lakers vs Celtics");
    assert_eq!(fetched.league, "NBA");
    assert_eq!(fetched.date, "2024-12-15");
    assert_eq!(fetched.time, "20:00");
    assert_eq!(fetched.venue, "Crypto.com Arena");
    assert_eq!(fetched.city, "Los Angeles, CA");
    assert_eq!(fetched.price, Some(150.0));
    assert_eq!(fetched.image_url, None);
    assert_eq!(fetched.created_at, created.created_at);
}

#[tokio::test]
async fn create_responds_with_201_and_message() {
    let app = spawn_app().await;

    let response = reqwest::Client::new()
        .post(format!("{}/api/games", app.address))
        .json(&lakers_vs_celtics())
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Game created successfully");
    assert_eq!(body["game"]["title"], "Lakers vs Celtics");
    assert!(body["game"]["id"].is_string());
    assert!(body["game"]["createdAt"].is_string());
}

#[tokio::test]
async fn validation_failures_name_every_field_and_write_nothing() {
    let app = spawn_app().await;

    let mut draft = lakers_vs_celtics();
    draft.title = "LA".into();
    draft.summary = "Short".into();

    let err = app.client.create_game(draft).await.unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::BAD_REQUEST));
    assert_eq!(err.to_string(), "Validation failed");
    let fields = err
        .details()
        .iter()
        .map(|violation| violation.field.as_str())
        .collect::<Vec<_>>();
    assert_eq!(fields, vec!["title", "summary"]);

    assert!(app.client.list_games().await.unwrap().is_empty());
}

#[tokio::test]
async fn single_violation_names_its_field() {
    let app = spawn_app().await;

    let response = reqwest::Client::new()
        .post(format!("{}/api/games", app.address))
        .json(&json!({
            "title": "Lakers vs Celtics",
            "league": "NBA",
            "date": "2024-12-15",
            "time": "20:00",
            "venue": "Crypto.com Arena",
            "city": "Los Angeles, CA",
            "price": -1,
            "summary": "A classic rivalry matchup between two historic franchises."
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Validation failed");
    assert_eq!(
        body["errors"],
        json!([{ "field": "price", "message": "Price cannot be negative." }])
    );
}

#[tokio::test]
async fn wrong_field_types_are_reported_with_other_violations() {
    let app = spawn_app().await;

    let response = reqwest::Client::new()
        .post(format!("{}/api/games", app.address))
        .json(&json!({
            "title": 123,
            "league": "NBA",
            "date": "2024-12-15",
            "time": "20:00",
            "venue": "Crypto.com Arena",
            "city": "Los Angeles, CA",
            "price": -5,
            "summary": "A classic rivalry matchup between two historic franchises."
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Validation failed");
    assert_eq!(
        body["errors"],
        json!([
            { "field": "title", "message": "Title must be text." },
            { "field": "price", "message": "Price cannot be negative." }
        ])
    );
    assert!(app.client.list_games().await.unwrap().is_empty());
}

#[tokio::test]
async fn malformed_json_is_a_bad_request() {
    let app = spawn_app().await;

    let response = reqwest::Client::new()
        .post(format!("{}/api/games", app.address))
        .header("content-type", "application/json")
        .body("{\"title\": ")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = response.json().await.unwrap();
    assert!(body["message"].as_str().unwrap().starts_with("Invalid request body"));
    assert!(body.get("errors").is_none());
}

#[tokio::test]
async fn missing_and_malformed_ids_are_not_found() {
    let app = spawn_app().await;
    let missing = uuid::Uuid::new_v4().to_string();

    for id in [missing.as_str(), "not-a-real-id"] {
        let err = app.client.get_game(id.into()).await.unwrap_err();
        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
        assert_eq!(err.to_string(), "Game not found");

        let err = app
            .client
            .update_game(id.into(), lakers_vs_celtics())
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));

        let err = app.client.delete_game(id.into()).await.unwrap_err();
        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
    }
}

#[tokio::test]
async fn update_preserves_id_and_creation_time() {
    let app = spawn_app().await;
    let created = app.client.create_game(lakers_vs_celtics()).await.unwrap();

    let mut changed = lakers_vs_celtics();
    changed.price = 175;
    changed.image_url = Some("https://cdn.example.com/lakers.png".into());
    let updated = app
        .client
        .update_game(created.id.clone(), changed)
        .await
        .unwrap();

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.created_at, created.created_at);
    assert_eq!(updated.price, Some(175.0));
    assert_eq!(updated.image_src, "https://cdn.example.com/lakers.png");
}

#[tokio::test]
async fn deleted_game_is_gone() {
    let app = spawn_app().await;
    let created = app.client.create_game(lakers_vs_celtics()).await.unwrap();

    let deleted = app.client.delete_game(created.id.clone()).await.unwrap();
    assert_eq!(deleted.id, created.id);

    let err = app.client.get_game(created.id).await.unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
}

#[tokio::test]
async fn list_is_newest_first() {
    let app = spawn_app().await;
    for title in ["Game A vs B", "Game C vs D", "Game E vs F"] {
        app.client.create_game(titled(title)).await.unwrap();
    }

    let titles = app
        .client
        .list_games()
        .await
        .unwrap()
        .into_iter()
        .map(|game| game.title)
        .collect::<Vec<_>>();
    assert_eq!(titles, vec!["Game E vs F", "Game C vs D", "Game A vs B"]);
}

#[tokio::test]
async fn degraded_server_answers_503_before_validating() {
    let app = spawn_degraded_app().await;

    let err = app.client.list_games().await.unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::SERVICE_UNAVAILABLE));
    assert_eq!(
        err.to_string(),
        "Database connection not ready. Please try again in a moment."
    );

    // An invalid body still gets 503 rather than 400.
    let mut draft = lakers_vs_celtics();
    draft.title = String::new();
    let err = app.client.create_game(draft).await.unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::SERVICE_UNAVAILABLE));
    assert!(err.details().is_empty());

    let health: Value = reqwest::get(format!("{}/health", app.address))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(health["status"], "degraded");

    let body: Value = reqwest::get(format!("{}/api/games", app.address))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["error"], "Database unavailable");
    assert!(app.state.is_degraded());
}

#[tokio::test]
async fn schema_and_index_describe_the_api() {
    let app = spawn_app().await;

    let schema: Value = reqwest::get(format!("{}/api/schema/game", app.address))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(schema["price"]["max"], 5000);
    assert_eq!(schema["text"].as_array().unwrap().len(), 8);

    let index: Value = reqwest::get(format!("{}/", app.address))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(index["storage"], "memory");
    assert!(index["endpoints"]["GET /api/games"].is_string());
}

#[tokio::test]
async fn form_and_list_drive_the_api_end_to_end() {
    let app = spawn_app().await;
    let mut list = GameList::new();

    let mut form = GameForm::create();
    for (field, value) in [
        (GameField::Title, "Kings vs Hawks"),
        (GameField::League, "NBA"),
        (GameField::Date, "2024-10-25"),
        (GameField::Time, "20:00"),
        (GameField::Venue, "Golden 1 Center"),
        (GameField::City, "Sacramento, CA"),
        (GameField::Price, "95"),
        (GameField::ImageUrl, "/images/kings-hawks.jpg"),
        (GameField::Summary, "Pace-and-space showdown out west."),
    ] {
        form.set_value(field, value);
    }
    let created = form.submit(&app.client).await.unwrap();
    assert_eq!(
        created.image_src,
        format!("{}/images/kings-hawks.jpg", app.address)
    );

    list.load(&app.client).await;
    assert_eq!(list.games().len(), 1);

    let mut edit = GameForm::edit(&created);
    edit.set_value(GameField::Time, "7pm");
    assert!(edit.submit(&app.client).await.is_err());
    assert_eq!(edit.error(GameField::Time), Some("Use 24-hour HH:mm format."));

    app.client.delete_game(created.id.clone()).await.unwrap();
    list.remove(&created.id);
    assert!(list.games().is_empty());
}

#[tokio::test]
async fn unreachable_server_reports_a_network_error() {
    let client = GameClient::new("http://127.0.0.1:9").unwrap();
    let err = client.get_game("abc".into()).await.unwrap_err();
    assert!(matches!(err, GatewayError::Network { .. }));
    assert_eq!(
        err.to_string(),
        "Network error: Unable to reach the API server. Please check your connection."
    );
}
