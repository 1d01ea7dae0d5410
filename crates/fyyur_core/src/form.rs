//! Submitted form decoding.
//!
//! # Responsibility
//! - Hold a submitted field map (ordered, multi-valued, all strings).
//! - Turn it into typed venue/artist profiles and show drafts.
//!
//! # Invariants
//! - Optional text fields are trimmed; blank becomes `None`.
//! - `genres` keeps every submitted value in order, blanks dropped.
//! - Boolean flags accept `y|yes|on|true|1` as true and absent, empty,
//!   `n|no|off|false|0` as false (case-insensitive). Anything else fails.

use crate::model::artist::ArtistProfile;
use crate::model::show::ShowDraft;
use crate::model::validation::{normalize_optional, ValidationError};
use crate::model::venue::VenueProfile;
use chrono::{DateTime, NaiveDateTime, Utc};
use uuid::Uuid;

const NAIVE_START_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

/// Ordered multi-map of submitted form fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
    fields: Vec<(String, String)>,
}

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one value; repeated keys accumulate.
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.fields.push((key.into(), value.into()));
    }

    /// Builder-style [`FormData::push`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(key, value);
        self
    }

    /// First value submitted for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }

    /// Every value submitted for `key`, in submission order.
    pub fn get_all(&self, key: &str) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
            .collect()
    }

    fn required(&self, key: &'static str) -> Result<String, ValidationError> {
        normalize_optional(self.get(key)).ok_or(ValidationError::MissingField(key))
    }

    fn optional(&self, key: &str) -> Option<String> {
        normalize_optional(self.get(key))
    }

    fn genres(&self) -> Vec<String> {
        self.get_all("genres")
            .into_iter()
            .filter_map(|genre| normalize_optional(Some(genre)))
            .collect()
    }
}

impl<K, V> FromIterator<(K, V)> for FormData
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

/// Decodes a venue create/edit submission.
pub fn decode_venue(form: &FormData) -> Result<VenueProfile, ValidationError> {
    let profile = VenueProfile {
        name: form.required("name")?,
        city: form.required("city")?,
        state: form.required("state")?,
        address: form.optional("address"),
        phone: form.optional("phone"),
        image_link: form.optional("image_link"),
        facebook_link: form.optional("facebook_link"),
        website: form.optional("website"),
        genres: form.genres(),
        seeking_talent: parse_flag("seeking_talent", form.get("seeking_talent"))?,
        seeking_description: form.optional("seeking_description"),
    };
    profile.validate()?;
    Ok(profile)
}

/// Decodes an artist create/edit submission.
pub fn decode_artist(form: &FormData) -> Result<ArtistProfile, ValidationError> {
    let profile = ArtistProfile {
        name: form.required("name")?,
        city: form.required("city")?,
        state: form.required("state")?,
        phone: form.optional("phone"),
        genres: form.genres(),
        image_link: form.optional("image_link"),
        facebook_link: form.optional("facebook_link"),
        website: form.optional("website"),
        seeking_venue: parse_flag("seeking_venue", form.get("seeking_venue"))?,
        seeking_description: form.optional("seeking_description"),
    };
    profile.validate()?;
    Ok(profile)
}

/// Decodes a show create submission.
///
/// Endpoint existence is checked later, inside the create transaction.
pub fn decode_show(form: &FormData) -> Result<ShowDraft, ValidationError> {
    Ok(ShowDraft {
        venue_id: parse_reference("venue_id", &form.required("venue_id")?)?,
        artist_id: parse_reference("artist_id", &form.required("artist_id")?)?,
        start_time: parse_start_time(&form.required("start_time")?)?,
    })
}

/// Applies the boolean coercion rule to one optional form value.
pub fn parse_flag(field: &'static str, value: Option<&str>) -> Result<bool, ValidationError> {
    let normalized = value.map(|raw| raw.trim().to_ascii_lowercase()).unwrap_or_default();
    match normalized.as_str() {
        "y" | "yes" | "on" | "true" | "1" => Ok(true),
        "" | "n" | "no" | "off" | "false" | "0" => Ok(false),
        _ => Err(ValidationError::InvalidBoolean {
            field,
            value: value.unwrap_or_default().to_string(),
        }),
    }
}

/// Parses a show start time.
///
/// Accepts RFC 3339 (any offset, converted to UTC) or a naive
/// `YYYY-MM-DD HH:MM[:SS]` (space or `T` separated) read as UTC.
pub fn parse_start_time(value: &str) -> Result<DateTime<Utc>, ValidationError> {
    let trimmed = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(parsed.with_timezone(&Utc));
    }

    NAIVE_START_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
        .map(|naive| naive.and_utc())
        .ok_or_else(|| ValidationError::InvalidStartTime(value.to_string()))
}

fn parse_reference(field: &'static str, value: &str) -> Result<Uuid, ValidationError> {
    Uuid::parse_str(value).map_err(|_| ValidationError::InvalidReference {
        field,
        value: value.to_string(),
    })
}
