//! Past/upcoming show partitioning.
//!
//! # Responsibility
//! - Split an entity's joined show rows around a reference instant.
//! - Keep the boundary rule in one place: `start_time <= now` is past,
//!   `start_time > now` is upcoming.
//!
//! # Invariants
//! - Every input show lands in exactly one side.
//! - Both sides are ordered by `start_time ASC`, ties by show id.

use crate::model::artist::ArtistId;
use crate::model::show::{ArtistShow, Scheduled, ShowCounts, VenueShow};
use crate::model::venue::VenueId;
use crate::repo::show_repo::ShowRepository;
use crate::repo::RepoResult;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Shows of one entity split at a fixed instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShowPartition<T> {
    pub past_shows: Vec<T>,
    pub upcoming_shows: Vec<T>,
}

impl<T> ShowPartition<T> {
    pub fn past(&self) -> impl Iterator<Item = &T> {
        self.past_shows.iter()
    }

    pub fn upcoming(&self) -> impl Iterator<Item = &T> {
        self.upcoming_shows.iter()
    }

    pub fn counts(&self) -> ShowCounts {
        ShowCounts {
            num_past_shows: self.past_shows.len(),
            num_upcoming_shows: self.upcoming_shows.len(),
        }
    }
}

impl<T> Default for ShowPartition<T> {
    fn default() -> Self {
        Self {
            past_shows: Vec::new(),
            upcoming_shows: Vec::new(),
        }
    }
}

/// Returns whether a show starting at `start_time` is still ahead of `now`.
pub fn is_upcoming(start_time: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    start_time > now
}

/// Splits `shows` into past and upcoming relative to `now`.
pub fn partition_shows<T, I>(shows: I, now: DateTime<Utc>) -> ShowPartition<T>
where
    T: Scheduled,
    I: IntoIterator<Item = T>,
{
    let mut ordered: Vec<T> = shows.into_iter().collect();
    ordered.sort_by_key(|show| (show.start_time(), show.show_id()));

    let split_at = ordered.partition_point(|show| !is_upcoming(show.start_time(), now));
    let upcoming_shows = ordered.split_off(split_at);
    ShowPartition {
        past_shows: ordered,
        upcoming_shows,
    }
}

/// Loads and partitions the shows hosted by `venue_id`.
///
/// Does not check that the venue exists; an unknown id yields an empty
/// partition.
pub fn partition_venue_shows<S: ShowRepository>(
    shows: &S,
    venue_id: VenueId,
    now: DateTime<Utc>,
) -> RepoResult<ShowPartition<VenueShow>> {
    Ok(partition_shows(shows.list_venue_shows(venue_id)?, now))
}

/// Loads and partitions the shows played by `artist_id`.
pub fn partition_artist_shows<S: ShowRepository>(
    shows: &S,
    artist_id: ArtistId,
    now: DateTime<Utc>,
) -> RepoResult<ShowPartition<ArtistShow>> {
    Ok(partition_shows(shows.list_artist_shows(artist_id)?, now))
}
