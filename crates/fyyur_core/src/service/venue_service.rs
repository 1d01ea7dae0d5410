//! Venue use-case service.
//!
//! # Invariants
//! - Detail views partition shows at one instant, so
//!   `num_past_shows + num_upcoming_shows` equals the venue's show count.
//! - The area listing reads counts for all venues with one grouped query.

use crate::area::{group_by_area, AreaGroup};
use crate::model::show::VenueShow;
use crate::model::venue::{Venue, VenueId, VenueProfile};
use crate::partition::partition_venue_shows;
use crate::repo::show_repo::{ShowRepository, SqliteShowRepository};
use crate::repo::venue_repo::{SqliteVenueRepository, VenueRepository};
use crate::repo::RepoResult;
use crate::search::name_search::{search_venues, SearchMatches};
use chrono::{DateTime, Utc};
use rusqlite::Connection;
use serde::Serialize;

/// Venue detail page model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VenueDetail {
    #[serde(flatten)]
    pub venue: Venue,
    pub past_shows: Vec<VenueShow>,
    pub upcoming_shows: Vec<VenueShow>,
    pub num_past_shows: usize,
    pub num_upcoming_shows: usize,
}

/// Venue service facade over venue and show repositories.
pub struct VenueService<V: VenueRepository, S: ShowRepository> {
    venues: V,
    shows: S,
}

impl<'conn> VenueService<SqliteVenueRepository<'conn>, SqliteShowRepository<'conn>> {
    /// Builds the service over SQLite repositories sharing `conn`.
    pub fn sqlite(conn: &'conn Connection) -> Self {
        Self::new(
            SqliteVenueRepository::new(conn),
            SqliteShowRepository::new(conn),
        )
    }
}

impl<V: VenueRepository, S: ShowRepository> VenueService<V, S> {
    pub fn new(venues: V, shows: S) -> Self {
        Self { venues, shows }
    }

    pub fn list_venues(&self) -> RepoResult<Vec<Venue>> {
        self.venues.list_venues()
    }

    /// Groups every venue by exact `(city, state)` as of now.
    pub fn group_by_area(&self) -> RepoResult<Vec<AreaGroup>> {
        self.group_by_area_at(Utc::now())
    }

    /// Groups every venue by exact `(city, state)`, counting upcoming shows
    /// relative to `now`.
    pub fn group_by_area_at(&self, now: DateTime<Utc>) -> RepoResult<Vec<AreaGroup>> {
        let venues = self.venues.list_venues()?;
        let counts = self.shows.show_counts_by_venue(now)?;
        Ok(group_by_area(&venues, &counts))
    }

    /// Loads one venue with its shows split around the current time.
    pub fn get_detail(&self, id: VenueId) -> RepoResult<VenueDetail> {
        self.get_detail_at(id, Utc::now())
    }

    /// Loads one venue with its shows split around `now`.
    pub fn get_detail_at(&self, id: VenueId, now: DateTime<Utc>) -> RepoResult<VenueDetail> {
        let venue = self.venues.get_venue(id)?;
        let partition = partition_venue_shows(&self.shows, id, now)?;
        let counts = partition.counts();
        Ok(VenueDetail {
            venue,
            past_shows: partition.past_shows,
            upcoming_shows: partition.upcoming_shows,
            num_past_shows: counts.num_past_shows,
            num_upcoming_shows: counts.num_upcoming_shows,
        })
    }

    pub fn create_venue(&self, profile: &VenueProfile) -> RepoResult<VenueId> {
        self.venues.create_venue(profile)
    }

    /// Full-field update. Last commit wins; there is no version check.
    pub fn update_venue(&self, id: VenueId, profile: &VenueProfile) -> RepoResult<()> {
        self.venues.update_venue(id, profile)
    }

    /// Deletes a venue that hosts no shows.
    pub fn delete_venue(&self, id: VenueId) -> RepoResult<()> {
        self.venues.delete_venue(id)
    }

    pub fn search(&self, term: &str) -> RepoResult<SearchMatches<Venue>> {
        self.search_at(term, Utc::now())
    }

    pub fn search_at(&self, term: &str, now: DateTime<Utc>) -> RepoResult<SearchMatches<Venue>> {
        search_venues(&self.venues, &self.shows, term, now)
    }
}
