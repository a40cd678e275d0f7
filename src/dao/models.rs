use std::time::{Duration, SystemTime, UNIX_EPOCH};

use uuid::Uuid;

use crate::dto::game::GameDraft;

/// Representation of a game stored in persistence and shared across layers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameEntity {
    /// Stable identifier assigned on first insert.
    pub id: Uuid,
    /// Validated game fields.
    pub draft: GameDraft,
    /// Set once on insert, preserved by every update.
    pub created_at: SystemTime,
    /// Refreshed on every update.
    pub updated_at: SystemTime,
}

impl GameEntity {
    /// Build a brand-new record with a fresh identifier and timestamps.
    pub fn new(draft: GameDraft) -> Self {
        let now = now_millis();
        Self {
            id: Uuid::new_v4(),
            draft,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace the record fields, keeping the identifier and creation time.
    pub fn replaced_with(self, draft: GameDraft) -> Self {
        Self {
            draft,
            updated_at: now_millis().max(self.created_at),
            ..self
        }
    }
}

/// Current time truncated to whole milliseconds, the precision BSON dates keep.
fn now_millis() -> SystemTime {
    let now = SystemTime::now();
    match now.duration_since(UNIX_EPOCH) {
        Ok(elapsed) => {
            let millis = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
            UNIX_EPOCH + Duration::from_millis(millis)
        }
        Err(_) => now,
    }
}

/// Parse a client supplied identifier; malformed input simply matches no record.
pub fn parse_game_id(raw: &str) -> Option<Uuid> {
    Uuid::parse_str(raw.trim()).ok()
}
