//! Validation rules for game payloads.
//!
//! The same rule set is enforced by the REST handlers before any write and by
//! the client form controller before a request is issued, so both ends agree
//! on what a valid game looks like.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::{Date, macros::format_description};
use utoipa::ToSchema;
use validator::{ValidationError, ValidationErrors};

use crate::dto::game::{GameDraft, GamePayload};

/// Fields of a game that accept user input, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum GameField {
    /// Matchup title, e.g. "Lakers vs Celtics".
    Title,
    /// League or competition name.
    League,
    /// Game day as `YYYY-MM-DD`.
    Date,
    /// Kick/tip time as `HH:mm`.
    Time,
    /// Stadium or arena.
    Venue,
    /// City the venue is in.
    City,
    /// Ticket price estimate in whole dollars.
    Price,
    /// Optional image path or URL.
    ImageUrl,
    /// Short description of the matchup.
    Summary,
}

impl GameField {
    /// Every field in display order.
    pub const ALL: [GameField; 9] = [
        GameField::Title,
        GameField::League,
        GameField::Date,
        GameField::Time,
        GameField::Venue,
        GameField::City,
        GameField::Price,
        GameField::ImageUrl,
        GameField::Summary,
    ];

    /// Name used for the field in JSON payloads and violation reports.
    pub fn wire_name(self) -> &'static str {
        match self {
            GameField::Title => "title",
            GameField::League => "league",
            GameField::Date => "date",
            GameField::Time => "time",
            GameField::Venue => "venue",
            GameField::City => "city",
            GameField::Price => "price",
            GameField::ImageUrl => "imageUrl",
            GameField::Summary => "summary",
        }
    }

    /// Resolve a wire name, accepting the legacy `img`/`image` spellings.
    pub fn from_wire(name: &str) -> Option<Self> {
        match name {
            "img" | "image" | "image_url" => Some(GameField::ImageUrl),
            other => Self::ALL
                .into_iter()
                .find(|field| field.wire_name() == other),
        }
    }
}

/// Shape constraint applied to a text field once length checks pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum TextFormat {
    /// Calendar date written as `YYYY-MM-DD`.
    IsoDate,
    /// 24-hour clock written as `HH:mm`.
    Clock24,
    /// Absolute `http(s)://` URL or a root-relative path.
    ImageLocation,
}

/// Declarative constraints for one text field.
#[derive(Debug, Clone, Copy, Serialize, ToSchema)]
pub struct TextRule {
    pub field: GameField,
    /// Label used when composing length messages.
    #[schema(value_type = String)]
    pub label: &'static str,
    pub required: bool,
    /// Message reported when a required value is missing or blank.
    #[schema(value_type = String)]
    pub required_message: &'static str,
    pub min_chars: Option<usize>,
    pub max_chars: usize,
    pub format: Option<TextFormat>,
}

/// Declarative constraints for the price field.
#[derive(Debug, Clone, Copy, Serialize, ToSchema)]
pub struct PriceRule {
    pub min: u32,
    pub max: u32,
    pub whole_number: bool,
}

/// Text constraints, in display order.
pub const TEXT_RULES: [TextRule; 8] = [
    TextRule {
        field: GameField::Title,
        label: "Title",
        required: true,
        required_message: "Matchup title is required.",
        min_chars: Some(3),
        max_chars: 100,
        format: None,
    },
    TextRule {
        field: GameField::League,
        label: "League",
        required: true,
        required_message: "League is required.",
        min_chars: Some(2),
        max_chars: 60,
        format: None,
    },
    TextRule {
        field: GameField::Date,
        label: "Date",
        required: true,
        required_message: "Date is required.",
        min_chars: None,
        max_chars: 32,
        format: Some(TextFormat::IsoDate),
    },
    TextRule {
        field: GameField::Time,
        label: "Time",
        required: true,
        required_message: "Kick/tip time is required.",
        min_chars: None,
        max_chars: 32,
        format: Some(TextFormat::Clock24),
    },
    TextRule {
        field: GameField::Venue,
        label: "Venue",
        required: true,
        required_message: "Venue is required.",
        min_chars: Some(3),
        max_chars: 120,
        format: None,
    },
    TextRule {
        field: GameField::City,
        label: "City",
        required: true,
        required_message: "City is required.",
        min_chars: Some(3),
        max_chars: 120,
        format: None,
    },
    TextRule {
        field: GameField::ImageUrl,
        label: "Image URL",
        required: false,
        required_message: "Image path or URL is required.",
        min_chars: None,
        max_chars: 500,
        format: Some(TextFormat::ImageLocation),
    },
    TextRule {
        field: GameField::Summary,
        label: "Summary",
        required: true,
        required_message: "Summary is required.",
        min_chars: Some(10),
        max_chars: 280,
        format: None,
    },
];

/// Price constraints.
pub const PRICE_RULE: PriceRule = PriceRule {
    min: 0,
    max: 5000,
    whole_number: true,
};

/// A single field-level violation as reported over the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

fn violation(code: &'static str, message: String) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}

impl TextRule {
    /// Check a raw value, returning the trimmed text (or `None` for an
    /// omitted optional field).
    pub fn check(&self, value: Option<&str>) -> Result<Option<String>, ValidationError> {
        let trimmed = value.map(str::trim).unwrap_or_default();
        if trimmed.is_empty() {
            if self.required {
                return Err(violation("required", self.required_message.to_owned()));
            }
            return Ok(None);
        }

        let length = trimmed.chars().count();
        if let Some(min) = self.min_chars {
            if length < min {
                return Err(violation(
                    "length",
                    format!("{} must be at least {min} characters.", self.label),
                ));
            }
        }
        if length > self.max_chars {
            return Err(violation(
                "length",
                format!("{} must be {} characters or less.", self.label, self.max_chars),
            ));
        }

        if let Some(format) = self.format {
            format.check(trimmed)?;
        }

        Ok(Some(trimmed.to_owned()))
    }
}

impl TextFormat {
    fn check(self, value: &str) -> Result<(), ValidationError> {
        match self {
            TextFormat::IsoDate => {
                if !matches_digit_pattern(value, "dddd-dd-dd") {
                    return Err(violation("date_format", "Use YYYY-MM-DD format.".into()));
                }
                Date::parse(value, format_description!("[year]-[month]-[day]"))
                    .map(|_| ())
                    .map_err(|_| {
                        violation("date_range", "Date must be a real calendar date.".into())
                    })
            }
            TextFormat::Clock24 => {
                let valid = matches_digit_pattern(value, "dd:dd")
                    && value[..2].parse::<u8>().is_ok_and(|hours| hours < 24)
                    && value[3..].parse::<u8>().is_ok_and(|minutes| minutes < 60);
                if valid {
                    Ok(())
                } else {
                    Err(violation("time_format", "Use 24-hour HH:mm format.".into()))
                }
            }
            TextFormat::ImageLocation => {
                let lower = value.to_ascii_lowercase();
                if lower.starts_with("http://") || lower.starts_with("https://") || value.starts_with('/')
                {
                    Ok(())
                } else {
                    Err(violation(
                        "image_location",
                        "Image should start with http(s):// or /".into(),
                    ))
                }
            }
        }
    }
}

/// `d` in the pattern stands for an ASCII digit; every other byte must match literally.
fn matches_digit_pattern(value: &str, pattern: &str) -> bool {
    value.len() == pattern.len()
        && value
            .bytes()
            .zip(pattern.bytes())
            .all(|(byte, expected)| match expected {
                b'd' => byte.is_ascii_digit(),
                literal => byte == literal,
            })
}

impl PriceRule {
    /// Coerce a JSON number or numeric string into a price.
    pub fn check(&self, value: Option<&Value>) -> Result<u32, ValidationError> {
        let required = || violation("required", "Price estimate is required.".into());

        let number = match value {
            None | Some(Value::Null) => return Err(required()),
            Some(Value::Number(number)) => number.as_f64(),
            Some(Value::String(text)) => {
                let text = text.trim();
                if text.is_empty() {
                    return Err(required());
                }
                text.parse::<f64>().ok()
            }
            Some(_) => None,
        };

        let Some(number) = number.filter(|number| number.is_finite()) else {
            return Err(violation("price_type", "Price must be a number.".into()));
        };
        if self.whole_number && number.fract() != 0.0 {
            return Err(violation(
                "price_whole",
                "Price must be a whole number.".into(),
            ));
        }
        if number < f64::from(self.min) {
            return Err(violation("price_range", "Price cannot be negative.".into()));
        }
        if number > f64::from(self.max) {
            return Err(violation(
                "price_range",
                format!("Price must be ${} or less.", self.max),
            ));
        }

        Ok(number as u32)
    }
}

/// Run every rule against the payload.
///
/// All failing fields are reported together; each field reports its first
/// failing rule only.
pub fn validate_game(payload: &GamePayload) -> Result<GameDraft, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    let mut draft = GameDraft::default();

    for rule in &TEXT_RULES {
        if payload.is_non_text(rule.field) {
            errors.add(
                rule.field.wire_name(),
                violation("text_type", format!("{} must be text.", rule.label)),
            );
            continue;
        }
        match rule.check(payload.text(rule.field)) {
            Ok(value) => draft.set_text(rule.field, value),
            Err(err) => errors.add(rule.field.wire_name(), err),
        }
    }

    match PRICE_RULE.check(payload.price.as_ref()) {
        Ok(price) => draft.price = price,
        Err(err) => errors.add(GameField::Price.wire_name(), err),
    }

    if errors.is_empty() {
        Ok(draft)
    } else {
        Err(errors)
    }
}

/// Flatten validator errors into wire violations, known fields first in display order.
pub fn field_violations(errors: &ValidationErrors) -> Vec<FieldViolation> {
    let mut by_field = errors
        .field_errors()
        .into_iter()
        .filter_map(|(field, field_errors)| {
            let first = field_errors.first()?;
            let message = first
                .message
                .as_ref()
                .map(|message| message.to_string())
                .unwrap_or_else(|| first.code.to_string());
            Some((field.to_string(), message))
        })
        .collect::<Vec<_>>();

    by_field.sort_by_key(|(field, _)| {
        let position = GameField::from_wire(field)
            .and_then(|known| GameField::ALL.iter().position(|candidate| *candidate == known))
            .unwrap_or(GameField::ALL.len());
        (position, field.clone())
    });

    by_field
        .into_iter()
        .map(|(field, message)| FieldViolation { field, message })
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn lakers() -> Value {
        json!({
            "title": "Lakers vs Celtics",
            "league": "NBA",
            "date": "2024-12-15",
            "time": "20:00",
            "venue": "Crypto.com Arena",
            "city": "Los Angeles, CA",
            "price": 150,
            "summary": "A classic rivalry matchup between two historic franchises."
        })
    }

    fn payload(value: Value) -> GamePayload {
        serde_json::from_value(value).unwrap()
    }

    fn violated_fields(value: Value) -> Vec<String> {
        let errors = validate_game(&payload(value)).unwrap_err();
        field_violations(&errors)
            .into_iter()
            .map(|violation| violation.field)
            .collect()
    }

    #[test]
    fn accepts_the_reference_matchup() {
        let draft = validate_game(&payload(lakers())).unwrap();
        assert_eq!(draft.title, "Lakers vs Celtics");
        assert_eq!(draft.price, 150);
        assert_eq!(draft.image_url, None);
    }

    #[test]
    fn trims_text_and_coerces_numeric_strings() {
        let mut value = lakers();
        value["title"] = json!("  Lakers vs Celtics  ");
        value["price"] = json!(" 75 ");
        let draft = validate_game(&payload(value)).unwrap();
        assert_eq!(draft.title, "Lakers vs Celtics");
        assert_eq!(draft.price, 75);
    }

    #[test]
    fn reports_single_violation_by_field() {
        let mut value = lakers();
        value["price"] = json!(-5);
        let errors = validate_game(&payload(value)).unwrap_err();
        assert_eq!(
            field_violations(&errors),
            vec![FieldViolation {
                field: "price".into(),
                message: "Price cannot be negative.".into(),
            }]
        );
    }

    #[test]
    fn collects_every_violated_field() {
        let mut value = lakers();
        value["title"] = json!("");
        value["price"] = json!(12.5);
        value["time"] = json!("8pm");
        assert_eq!(violated_fields(value), vec!["title", "time", "price"]);
    }

    #[test]
    fn non_text_values_are_violations_alongside_others() {
        let mut value = lakers();
        value["title"] = json!(123);
        value["venue"] = json!(["Crypto.com Arena"]);
        value["price"] = json!(-5);
        let errors = validate_game(&payload(value)).unwrap_err();
        assert_eq!(
            field_violations(&errors),
            vec![
                FieldViolation {
                    field: "title".into(),
                    message: "Title must be text.".into(),
                },
                FieldViolation {
                    field: "venue".into(),
                    message: "Venue must be text.".into(),
                },
                FieldViolation {
                    field: "price".into(),
                    message: "Price cannot be negative.".into(),
                },
            ]
        );
    }

    #[test]
    fn missing_payload_reports_all_required_fields() {
        let fields = violated_fields(json!({}));
        assert_eq!(
            fields,
            vec!["title", "league", "date", "time", "venue", "city", "price", "summary"]
        );
    }

    #[test]
    fn enforces_length_bounds() {
        let mut value = lakers();
        value["league"] = json!("N");
        value["summary"] = json!("x".repeat(281));
        let errors = validate_game(&payload(value)).unwrap_err();
        let violations = field_violations(&errors);
        assert_eq!(violations[0].message, "League must be at least 2 characters.");
        assert_eq!(violations[1].message, "Summary must be 280 characters or less.");
    }

    #[test]
    fn date_must_be_strict_and_real() {
        assert!(TEXT_RULES[2].check(Some("2024-02-29")).is_ok());
        assert!(TEXT_RULES[2].check(Some("2023-02-29")).is_err());
        assert!(TEXT_RULES[2].check(Some("12/15/2024")).is_err());
        assert!(TEXT_RULES[2].check(Some("2024-1-05")).is_err());
    }

    #[test]
    fn time_must_be_24_hour_clock() {
        let rule = TEXT_RULES[3];
        assert!(rule.check(Some("00:00")).is_ok());
        assert!(rule.check(Some("23:59")).is_ok());
        assert!(rule.check(Some("24:00")).is_err());
        assert!(rule.check(Some("12:60")).is_err());
        assert!(rule.check(Some("7:30")).is_err());
    }

    #[test]
    fn image_is_optional_but_checked_when_present() {
        let rule = TEXT_RULES[6];
        assert_eq!(rule.check(None).unwrap(), None);
        assert_eq!(rule.check(Some("   ")).unwrap(), None);
        assert!(rule.check(Some("/images/lakers.png")).is_ok());
        assert!(rule.check(Some("HTTPS://cdn.example.com/a.png")).is_ok());
        assert!(rule.check(Some("images/lakers.png")).is_err());
    }

    #[test]
    fn price_rejects_non_numbers_and_out_of_range() {
        assert!(PRICE_RULE.check(Some(&json!("abc"))).is_err());
        assert!(PRICE_RULE.check(Some(&json!(true))).is_err());
        assert!(PRICE_RULE.check(Some(&json!(5001))).is_err());
        assert_eq!(PRICE_RULE.check(Some(&json!(5000))).unwrap(), 5000);
        assert_eq!(PRICE_RULE.check(Some(&json!(0))).unwrap(), 0);
    }

    #[test]
    fn legacy_image_names_resolve_to_image_url() {
        assert_eq!(GameField::from_wire("img"), Some(GameField::ImageUrl));
        assert_eq!(GameField::from_wire("image"), Some(GameField::ImageUrl));
        assert_eq!(GameField::from_wire("imageUrl"), Some(GameField::ImageUrl));
        assert_eq!(GameField::from_wire("stadium"), None);
    }
}
