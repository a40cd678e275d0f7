/// Game storage and retrieval operations.
pub mod game_store;
/// Persisted record definitions.
pub mod models;
/// Storage abstraction layer for database operations.
pub mod storage;
