use indexmap::IndexMap;
use serde::Serialize;
use utoipa::ToSchema;

/// Simple health response returned by the `/health` route.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Health status ("ok" or "degraded").
    pub status: String,
    /// Storage connectivity ("connected" or "disconnected").
    pub database: String,
}

impl HealthResponse {
    /// Create a health response indicating the system is operational.
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            database: "connected".to_string(),
        }
    }

    /// Create a health response indicating the system is in degraded mode.
    pub fn degraded() -> Self {
        Self {
            status: "degraded".to_string(),
            database: "disconnected".to_string(),
        }
    }
}

/// Landing payload served at `/`, listing the available endpoints.
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiIndex {
    pub message: String,
    #[schema(value_type = Object)]
    pub endpoints: IndexMap<String, String>,
    pub storage: String,
}
