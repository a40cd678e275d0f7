//! Create/edit form state for a single game.

use indexmap::IndexMap;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::{
    client::{
        gateway::{GameApi, GatewayError},
        normalize::RemoteGame,
    },
    dto::{
        game::{GameDraft, GamePayload},
        validation::{FieldViolation, GameField, field_violations},
    },
};

/// Status shown under the form when local validation fails.
pub const FIX_FIELDS_MESSAGE: &str = "Please fix the highlighted fields.";

/// Whether the form creates a new game or edits an existing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    /// Submitting creates a game and clears the form.
    Create,
    /// Submitting updates the game `id` and keeps the values.
    Edit {
        /// Identifier of the game being edited.
        id: String,
    },
}

/// Submission status shown under the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormStatus {
    /// Nothing submitted since the last edit.
    Idle,
    /// A request is in flight.
    Submitting,
    /// The last submission succeeded.
    Success(String),
    /// The last submission failed.
    Error(String),
}

/// Why a submission did not produce a game.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// Local validation failed; no request was sent.
    #[error("Please fix the highlighted fields.")]
    Invalid(Vec<FieldViolation>),
    /// The request was sent and the API or network failed.
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

/// Field values, per-field errors and submission status of the game form.
#[derive(Debug, Clone)]
pub struct GameForm {
    mode: FormMode,
    values: IndexMap<GameField, String>,
    errors: IndexMap<GameField, String>,
    status: FormStatus,
}

impl GameForm {
    /// Empty form for a new game.
    pub fn create() -> Self {
        Self {
            mode: FormMode::Create,
            values: empty_values(),
            errors: IndexMap::new(),
            status: FormStatus::Idle,
        }
    }

    /// Form pre-filled from an existing game.
    pub fn edit(game: &RemoteGame) -> Self {
        let mut values = empty_values();
        for field in GameField::ALL {
            let value = match field {
                GameField::Title => game.title.clone(),
                GameField::League => game.league.clone(),
                GameField::Date => game.date.clone(),
                GameField::Time => game.time.clone(),
                GameField::Venue => game.venue.clone(),
                GameField::City => game.city.clone(),
                GameField::Price => game.price.map(|price| price.to_string()).unwrap_or_default(),
                GameField::ImageUrl => game.image_url.clone().unwrap_or_default(),
                GameField::Summary => game.summary.clone(),
            };
            values.insert(field, value);
        }

        Self {
            mode: FormMode::Edit {
                id: game.id.clone(),
            },
            values,
            errors: IndexMap::new(),
            status: FormStatus::Idle,
        }
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn status(&self) -> &FormStatus {
        &self.status
    }

    pub fn value(&self, field: GameField) -> &str {
        self.values.get(&field).map(String::as_str).unwrap_or_default()
    }

    pub fn error(&self, field: GameField) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    /// Current field errors, in display order.
    pub fn errors(&self) -> impl Iterator<Item = (GameField, &str)> {
        self.errors.iter().map(|(field, message)| (*field, message.as_str()))
    }

    /// Record an edit; the field's error and any status message are cleared.
    pub fn set_value(&mut self, field: GameField, value: impl Into<String>) {
        self.values.insert(field, value.into());
        self.errors.shift_remove(&field);
        self.status = FormStatus::Idle;
    }

    /// The values as a payload for the shared rule set.
    pub fn payload(&self) -> GamePayload {
        let text = |field| Some(self.value(field).to_owned());
        let price = self.value(GameField::Price).trim();

        GamePayload {
            title: text(GameField::Title),
            league: text(GameField::League),
            date: text(GameField::Date),
            time: text(GameField::Time),
            venue: text(GameField::Venue),
            city: text(GameField::City),
            price: (!price.is_empty()).then(|| Value::String(price.to_owned())),
            image_url: text(GameField::ImageUrl),
            summary: text(GameField::Summary),
            non_text: Vec::new(),
        }
    }

    /// Run the shared rules, replacing the field errors with the outcome.
    pub fn validate(&mut self) -> Result<GameDraft, Vec<FieldViolation>> {
        self.errors.clear();
        match self.payload().normalize() {
            Ok(draft) => Ok(draft),
            Err(errors) => {
                let violations = field_violations(&errors);
                self.apply_violations(&violations);
                Err(violations)
            }
        }
    }

    /// Validate locally, then create or update through `api`.
    pub async fn submit(&mut self, api: &dyn GameApi) -> Result<RemoteGame, SubmitError> {
        let draft = match self.validate() {
            Ok(draft) => draft,
            Err(violations) => {
                self.status = FormStatus::Error(FIX_FIELDS_MESSAGE.to_owned());
                return Err(SubmitError::Invalid(violations));
            }
        };

        self.status = FormStatus::Submitting;
        let outcome = match &self.mode {
            FormMode::Create => api.create_game(draft).await,
            FormMode::Edit { id } => api.update_game(id.clone(), draft).await,
        };

        match outcome {
            Ok(game) => {
                let message = match self.mode {
                    FormMode::Create => {
                        self.values = empty_values();
                        "Game created successfully"
                    }
                    FormMode::Edit { .. } => "Game updated successfully",
                };
                debug!(id = %game.id, "game form submitted");
                self.status = FormStatus::Success(message.to_owned());
                Ok(game)
            }
            Err(err) => {
                self.apply_violations(err.details());
                self.status = FormStatus::Error(err.to_string());
                Err(err.into())
            }
        }
    }

    fn apply_violations(&mut self, violations: &[FieldViolation]) {
        for violation in violations {
            if let Some(field) = GameField::from_wire(&violation.field) {
                self.errors
                    .entry(field)
                    .or_insert_with(|| violation.message.clone());
            }
        }
        self.errors
            .sort_by(|left, _, right, _| display_position(*left).cmp(&display_position(*right)));
    }
}

fn display_position(field: GameField) -> usize {
    GameField::ALL
        .iter()
        .position(|known| *known == field)
        .unwrap_or(GameField::ALL.len())
}

fn empty_values() -> IndexMap<GameField, String> {
    GameField::ALL
        .into_iter()
        .map(|field| (field, String::new()))
        .collect()
}
