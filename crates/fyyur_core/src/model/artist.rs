//! Artist records.

use crate::model::validation::{require_text, validate_phone, ValidationError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable artist identifier.
pub type ArtistId = Uuid;

/// Every editable artist field.
///
/// Same shape as a venue profile minus `address`, with `seeking_venue` in
/// place of `seeking_talent`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtistProfile {
    pub name: String,
    pub city: String,
    pub state: String,
    pub phone: Option<String>,
    pub genres: Vec<String>,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub website: Option<String>,
    pub seeking_venue: bool,
    pub seeking_description: Option<String>,
}

impl ArtistProfile {
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

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("name", &self.name)?;
        require_text("city", &self.city)?;
        require_text("state", &self.state)?;
        validate_phone(self.phone.as_deref())
    }
}

/// Stored artist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artist {
    pub id: ArtistId,
    #[serde(flatten)]
    pub profile: ArtistProfile,
}

impl Artist {
    pub fn name(&self) -> &str {
        &self.profile.name
    }
}
