//! Venue records.
//!
//! # Invariants
//! - `name`, `city` and `state` are non-blank.
//! - `genres` keep submission order and may contain duplicates.

use crate::model::validation::{require_text, validate_phone, ValidationError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable venue identifier.
pub type VenueId = Uuid;

/// Every editable venue field. Used as the create/update payload and
/// embedded in the stored record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VenueProfile {
    pub name: String,
    pub city: String,
    pub state: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub website: Option<String>,
    pub genres: Vec<String>,
    pub seeking_talent: bool,
    pub seeking_description: Option<String>,
}

impl VenueProfile {
    /// Creates a profile with the required fields and everything else empty.
    pub fn new(
        name: impl Into<String>,
        city: impl Into<String>,
        state: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            city: city.into(),
            state: state.into(),
            ..Self::default()
        }
    }

    /// Checks required fields and phone shape.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("name", &self.name)?;
        require_text("city", &self.city)?;
        require_text("state", &self.state)?;
        validate_phone(self.phone.as_deref())
    }
}

/// Stored venue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Venue {
    pub id: VenueId,
    #[serde(flatten)]
    pub profile: VenueProfile,
}

impl Venue {
    pub fn name(&self) -> &str {
        &self.profile.name
    }

    /// Area key used by the venues-by-area listing.
    pub fn area(&self) -> (&str, &str) {
        (&self.profile.city, &self.profile.state)
    }
}
