//! Ingredient domain model and form validation.
//!
//! An [`Ingredient`] is owned by the server: its id and timestamps are assigned
//! remotely and never touched by the client. What the client does own is the
//! [`IngredientForm`] it submits, which is validated locally before any request
//! goes out.

use crate::domain::error::{ChefdeskError, Result};
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Maximum number of characters accepted for `name` and `unit`.
pub const MAX_FIELD_CHARS: usize = 255;

/// Server-assigned identifier of an ingredient.
pub type IngredientId = i64;

/// An ingredient record as returned by the REST backend.
///
/// Field names follow the wire format (`createdAt`, `updatedAt`). Timestamps
/// without an offset are read as UTC.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ingredient {
    pub id: IngredientId,
    pub name: String,
    pub unit: String,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub updated_at: DateTime<Utc>,
}

impl Ingredient {
    /// Label used by selection dropdowns: `"name (unit)"`.
    ///
    /// ```
    /// # use chefdesk::domain::Ingredient;
    /// # use chrono::Utc;
    /// let now = Utc::now();
    /// let salt = Ingredient {
    ///     id: 1,
    ///     name: "Salt".into(),
    ///     unit: "g".into(),
    ///     created_at: now,
    ///     updated_at: now,
    /// };
    /// assert_eq!(salt.label(), "Salt (g)");
    /// ```
    #[must_use]
    pub fn label(&self) -> String {
        format!("{} ({})", self.name, self.unit)
    }

    /// Whether the record respects `updatedAt >= createdAt`.
    #[must_use]
    pub fn has_monotonic_timestamps(&self) -> bool {
        self.updated_at >= self.created_at
    }
}

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parses an ISO-8601 timestamp, with or without a UTC offset.
///
/// ```
/// # use chefdesk::domain::parse_timestamp;
/// let with_offset = parse_timestamp("2024-03-01T09:00:00+01:00").unwrap();
/// let naive = parse_timestamp("2024-03-01T08:00:00").unwrap();
/// assert_eq!(with_offset, naive);
/// ```
#[must_use]
pub fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Some(parsed.with_timezone(&Utc));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .map(|naive| Utc.from_utc_datetime(&naive))
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> std::result::Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let text = String::deserialize(deserializer)?;
    parse_timestamp(&text)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp `{text}`")))
}

/// Payload for create and update requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientForm {
    pub name: String,
    pub unit: String,
}

impl IngredientForm {
    pub fn new(name: impl Into<String>, unit: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            unit: unit.into(),
        }
    }

    /// Checks both fields are non-blank and at most [`MAX_FIELD_CHARS`] characters.
    ///
    /// Length is counted in characters, not bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ChefdeskError::Validation`] naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        validate_field("name", &self.name)?;
        validate_field("unit", &self.unit)
    }
}

fn validate_field(field: &'static str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ChefdeskError::validation(field, "is required"));
    }
    let chars = value.chars().count();
    if chars > MAX_FIELD_CHARS {
        return Err(ChefdeskError::validation(
            field,
            format!("must be at most {MAX_FIELD_CHARS} characters (got {chars})"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_regular_form() {
        assert!(IngredientForm::new("Sea Salt", "g").validate().is_ok());
    }

    #[test]
    fn rejects_blank_fields() {
        let err = IngredientForm::new("   ", "g").validate().unwrap_err();
        assert!(matches!(err, ChefdeskError::Validation { field: "name", .. }));

        let err = IngredientForm::new("Salt", "").validate().unwrap_err();
        assert!(matches!(err, ChefdeskError::Validation { field: "unit", .. }));
    }

    #[test]
    fn length_limit_counts_characters() {
        let at_limit = "盐".repeat(MAX_FIELD_CHARS);
        assert!(IngredientForm::new(at_limit, "g").validate().is_ok());

        let over = "a".repeat(MAX_FIELD_CHARS + 1);
        let err = IngredientForm::new("Salt", over).validate().unwrap_err();
        assert!(matches!(err, ChefdeskError::Validation { field: "unit", .. }));
    }

    #[test]
    fn decodes_wire_shape() {
        let json = r#"{
            "id": 7,
            "name": "Flour",
            "unit": "kg",
            "createdAt": "2024-03-01T08:00:00.000Z",
            "updatedAt": "2024-03-02T09:30:00.000Z"
        }"#;
        let ingredient: Ingredient = serde_json::from_str(json).unwrap();
        assert_eq!(ingredient.id, 7);
        assert_eq!(ingredient.label(), "Flour (kg)");
        assert!(ingredient.has_monotonic_timestamps());
    }

    #[test]
    fn decodes_timestamps_without_offset_as_utc() {
        let json = r#"{
            "id": 8,
            "name": "Salt",
            "unit": "g",
            "createdAt": "2024-03-01T08:00:00",
            "updatedAt": "2024-03-01 08:00:00.250"
        }"#;
        let ingredient: Ingredient = serde_json::from_str(json).unwrap();
        assert_eq!(ingredient.created_at.to_rfc3339(), "2024-03-01T08:00:00+00:00");
        assert_eq!(ingredient.updated_at.timestamp_subsec_millis(), 250);
        assert!(ingredient.has_monotonic_timestamps());
    }

    #[test]
    fn rejects_unparseable_timestamp() {
        let json = r#"{"id":1,"name":"Salt","unit":"g","createdAt":"yesterday","updatedAt":"2024-03-01T08:00:00Z"}"#;
        let err = serde_json::from_str::<Ingredient>(json).unwrap_err();
        assert!(err.to_string().contains("invalid timestamp `yesterday`"));
    }
}
