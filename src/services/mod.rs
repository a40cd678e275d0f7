/// OpenAPI documentation generation.
pub mod documentation;
/// Game CRUD operations.
pub mod game_service;
/// Health check service.
pub mod health_service;
/// Storage connection supervisor toggling degraded mode.
pub mod storage_supervisor;
