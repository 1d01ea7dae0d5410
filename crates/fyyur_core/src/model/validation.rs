//! Field-level validation shared by venue, artist and show drafts.

use crate::model::EntityKind;
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?\(?[0-9][0-9 ().\-]{5,18}[0-9]$").expect("valid phone regex"));

/// Input rejected before it reaches the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Required text field is absent or blank.
    MissingField(&'static str),
    /// Phone value does not look like a phone number.
    InvalidPhone(String),
    /// Boolean form value outside the accepted vocabulary.
    InvalidBoolean { field: &'static str, value: String },
    /// Start time in a format we do not accept.
    InvalidStartTime(String),
    /// Reference field is not a well-formed id.
    InvalidReference { field: &'static str, value: String },
    /// Reference is well-formed but no such record exists.
    MissingReference { kind: EntityKind, id: Uuid },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField(field) => write!(f, "`{field}` is required"),
            Self::InvalidPhone(value) => write!(f, "invalid phone number `{value}`"),
            Self::InvalidBoolean { field, value } => {
                write!(f, "invalid boolean `{value}` for `{field}`")
            }
            Self::InvalidStartTime(value) => write!(
                f,
                "invalid start_time `{value}`; expected RFC 3339 or `YYYY-MM-DD HH:MM[:SS]`"
            ),
            Self::InvalidReference { field, value } => {
                write!(f, "`{field}` is not a valid id: `{value}`")
            }
            Self::MissingReference { kind, id } => write!(f, "{kind} does not exist: {id}"),
        }
    }
}

impl Error for ValidationError {}

impl ValidationError {
    /// Stable code for logs; never carries the rejected value.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MissingField(_) => "missing_field",
            Self::InvalidPhone(_) => "invalid_phone",
            Self::InvalidBoolean { .. } => "invalid_boolean",
            Self::InvalidStartTime(_) => "invalid_start_time",
            Self::InvalidReference { .. } => "invalid_reference",
            Self::MissingReference { .. } => "missing_reference",
        }
    }
}

/// Fails when `value` is empty after trimming.
pub fn require_text(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::MissingField(field));
    }
    Ok(())
}

/// Accepts `None`, otherwise checks the loose phone shape.
pub fn validate_phone(phone: Option<&str>) -> Result<(), ValidationError> {
    match phone {
        Some(value) if !PHONE_RE.is_match(value.trim()) => {
            Err(ValidationError::InvalidPhone(value.to_string()))
        }
        _ => Ok(()),
    }
}

/// Trims an optional text value, mapping blank input to `None`.
pub fn normalize_optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|trimmed| !trimmed.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::{normalize_optional, require_text, validate_phone, ValidationError};

    #[test]
    fn require_text_rejects_whitespace() {
        assert_eq!(
            require_text("name", "   "),
            Err(ValidationError::MissingField("name"))
        );
        assert!(require_text("name", "The Musical Hop").is_ok());
    }

    #[test]
    fn phone_accepts_common_shapes() {
        for phone in [
            "123-123-1234",
            "+1 (415) 000-1234",
            "(415) 555-1234",
            "326.123.5000",
            "5551234",
        ] {
            assert!(validate_phone(Some(phone)).is_ok(), "{phone}");
        }
        assert!(validate_phone(None).is_ok());
    }

    #[test]
    fn phone_rejects_letters_and_short_values() {
        assert!(validate_phone(Some("call me")).is_err());
        assert!(validate_phone(Some("12")).is_err());
        assert!(validate_phone(Some("((415) 555-1234")).is_err());
    }

    #[test]
    fn error_code_omits_submitted_value() {
        let err = ValidationError::InvalidPhone("555 PRIVATE".to_string());
        assert_eq!(err.error_code(), "invalid_phone");
        assert!(err.to_string().contains("555 PRIVATE"));
    }

    #[test]
    fn normalize_optional_maps_blank_to_none() {
        assert_eq!(normalize_optional(Some("  ")), None);
        assert_eq!(normalize_optional(None), None);
        assert_eq!(
            normalize_optional(Some(" https://x.example ")).as_deref(),
            Some("https://x.example")
        );
    }
}
