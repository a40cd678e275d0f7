use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for the Game Day API.
#[openapi(
    paths(
        crate::routes::health::index,
        crate::routes::health::healthcheck,
        crate::routes::game::list_games,
        crate::routes::game::get_game,
        crate::routes::game::create_game,
        crate::routes::game::update_game,
        crate::routes::game::delete_game,
        crate::routes::game::game_schema,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::health::ApiIndex,
            crate::dto::game::GamePayload,
            crate::dto::game::GameView,
            crate::dto::game::GameEnvelope,
            crate::dto::game::GameMutationResponse,
            crate::dto::game::GameSchemaDescription,
            crate::dto::validation::FieldViolation,
            crate::dto::validation::GameField,
            crate::dto::validation::TextRule,
            crate::dto::validation::TextFormat,
            crate::dto::validation::PriceRule,
            crate::error::ErrorBody,
        )
    ),
    tags(
        (name = "games", description = "Game CRUD operations"),
        (name = "health", description = "Health and landing endpoints"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_every_game_route() {
        let doc = ApiDoc::openapi();
        for path in ["/api/games", "/api/games/{id}", "/api/schema/game", "/health", "/"] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
