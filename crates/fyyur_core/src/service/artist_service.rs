//! Artist use-case service.

use crate::model::artist::{Artist, ArtistId, ArtistProfile};
use crate::model::show::ArtistShow;
use crate::partition::partition_artist_shows;
use crate::repo::artist_repo::{ArtistRepository, SqliteArtistRepository};
use crate::repo::show_repo::{ShowRepository, SqliteShowRepository};
use crate::repo::RepoResult;
use crate::search::name_search::{search_artists, SearchMatches};
use chrono::{DateTime, Utc};
use rusqlite::Connection;
use serde::Serialize;

/// Artist detail page model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtistDetail {
    #[serde(flatten)]
    pub artist: Artist,
    pub past_shows: Vec<ArtistShow>,
    pub upcoming_shows: Vec<ArtistShow>,
    pub num_past_shows: usize,
    pub num_upcoming_shows: usize,
}

/// Artist service facade over artist and show repositories.
pub struct ArtistService<A: ArtistRepository, S: ShowRepository> {
    artists: A,
    shows: S,
}

impl<'conn> ArtistService<SqliteArtistRepository<'conn>, SqliteShowRepository<'conn>> {
    pub fn sqlite(conn: &'conn Connection) -> Self {
        Self::new(
            SqliteArtistRepository::new(conn),
            SqliteShowRepository::new(conn),
        )
    }
}

impl<A: ArtistRepository, S: ShowRepository> ArtistService<A, S> {
    pub fn new(artists: A, shows: S) -> Self {
        Self { artists, shows }
    }

    pub fn list_artists(&self) -> RepoResult<Vec<Artist>> {
        self.artists.list_artists()
    }

    pub fn get_detail(&self, id: ArtistId) -> RepoResult<ArtistDetail> {
        self.get_detail_at(id, Utc::now())
    }

    /// Loads one artist with venue-joined shows split around `now`.
    pub fn get_detail_at(&self, id: ArtistId, now: DateTime<Utc>) -> RepoResult<ArtistDetail> {
        let artist = self.artists.get_artist(id)?;
        let partition = partition_artist_shows(&self.shows, id, now)?;
        let counts = partition.counts();
        Ok(ArtistDetail {
            artist,
            past_shows: partition.past_shows,
            upcoming_shows: partition.upcoming_shows,
            num_past_shows: counts.num_past_shows,
            num_upcoming_shows: counts.num_upcoming_shows,
        })
    }

    pub fn create_artist(&self, profile: &ArtistProfile) -> RepoResult<ArtistId> {
        self.artists.create_artist(profile)
    }

    pub fn update_artist(&self, id: ArtistId, profile: &ArtistProfile) -> RepoResult<()> {
        self.artists.update_artist(id, profile)
    }

    pub fn search(&self, term: &str) -> RepoResult<SearchMatches<Artist>> {
        self.search_at(term, Utc::now())
    }

    pub fn search_at(&self, term: &str, now: DateTime<Utc>) -> RepoResult<SearchMatches<Artist>> {
        search_artists(&self.artists, &self.shows, term, now)
    }
}
