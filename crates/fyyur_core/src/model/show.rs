//! Show records and the joined read models built around them.
//!
//! # Invariants
//! - A show references exactly one venue and one artist.
//! - `start_time` is persisted as UTC epoch milliseconds.

use crate::model::artist::ArtistId;
use crate::model::venue::VenueId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable show identifier.
pub type ShowId = Uuid;

/// Create payload for a show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowDraft {
    pub venue_id: VenueId,
    pub artist_id: ArtistId,
    pub start_time: DateTime<Utc>,
}

/// Stored show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Show {
    pub id: ShowId,
    pub venue_id: VenueId,
    pub artist_id: ArtistId,
    pub start_time: DateTime<Utc>,
}

/// Row of the all-shows listing: the show joined with both endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowListing {
    pub show_id: ShowId,
    pub start_time: DateTime<Utc>,
    pub venue_id: VenueId,
    pub venue_name: String,
    pub artist_id: ArtistId,
    pub artist_name: String,
    pub artist_image_link: Option<String>,
}

/// A venue's show joined with the performing artist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VenueShow {
    pub show_id: ShowId,
    pub start_time: DateTime<Utc>,
    pub artist_id: ArtistId,
    pub artist_name: String,
    pub artist_image_link: Option<String>,
}

/// An artist's show joined with the hosting venue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtistShow {
    pub show_id: ShowId,
    pub start_time: DateTime<Utc>,
    pub venue_id: VenueId,
    pub venue_name: String,
    pub venue_image_link: Option<String>,
}

/// Past/upcoming cardinalities for one venue or artist at a fixed instant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowCounts {
    pub num_past_shows: usize,
    pub num_upcoming_shows: usize,
}

impl ShowCounts {
    pub fn total(&self) -> usize {
        self.num_past_shows + self.num_upcoming_shows
    }
}

/// Anything placed on the timeline by a show start time.
pub trait Scheduled {
    fn show_id(&self) -> ShowId;
    fn start_time(&self) -> DateTime<Utc>;
}

impl Scheduled for Show {
    fn show_id(&self) -> ShowId {
        self.id
    }

    fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }
}

impl Scheduled for VenueShow {
    fn show_id(&self) -> ShowId {
        self.show_id
    }

    fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }
}

impl Scheduled for ArtistShow {
    fn show_id(&self) -> ShowId {
        self.show_id
    }

    fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }
}

/// Converts a timestamp to the persisted representation.
pub fn to_epoch_ms(value: DateTime<Utc>) -> i64 {
    value.timestamp_millis()
}

/// Converts a persisted value back; `None` when out of chrono's range.
pub fn from_epoch_ms(value: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_millis(value)
}
