//! Case-insensitive substring search over record names.
//!
//! # Invariants
//! - Only `name` is matched; city, state and genres are ignored.
//! - An empty term matches every record.
//! - `count == results.len()`; both come from the same listing.
//! - Results keep the repository listing order.

use crate::model::artist::Artist;
use crate::model::show::ShowCounts;
use crate::model::venue::Venue;
use crate::repo::artist_repo::{ArtistRepository, SqliteArtistRepository};
use crate::repo::show_repo::{ShowRepository, SqliteShowRepository};
use crate::repo::venue_repo::{SqliteVenueRepository, VenueRepository};
use crate::repo::RepoResult;
use chrono::{DateTime, Utc};
use log::debug;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Searchable record kinds. Shows have no name and are not searchable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchKind {
    Venue,
    Artist,
}

/// One search query: what to search and the raw user term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub kind: SearchKind,
    pub term: String,
}

impl SearchQuery {
    pub fn new(kind: SearchKind, term: impl Into<String>) -> Self {
        Self {
            kind,
            term: term.into(),
        }
    }
}

/// Matched record plus its upcoming show count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchHit<T> {
    #[serde(flatten)]
    pub record: T,
    pub num_upcoming_shows: usize,
}

/// Search response envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchMatches<T> {
    pub count: usize,
    pub results: Vec<SearchHit<T>>,
}

impl<T> SearchMatches<T> {
    fn from_results(results: Vec<SearchHit<T>>) -> Self {
        Self {
            count: results.len(),
            results,
        }
    }
}

/// Search response for a query whose kind is only known at runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DirectoryMatches {
    Venue(SearchMatches<Venue>),
    Artist(SearchMatches<Artist>),
}

impl DirectoryMatches {
    pub fn count(&self) -> usize {
        match self {
            Self::Venue(matches) => matches.count,
            Self::Artist(matches) => matches.count,
        }
    }
}

/// Returns whether `name` contains `term`, ignoring case.
///
/// Uses Unicode lowercasing, so non-ASCII names match too.
pub fn name_matches(name: &str, term: &str) -> bool {
    name.to_lowercase().contains(&term.to_lowercase())
}

/// Searches venues by name.
pub fn search_venues<V, S>(
    venues: &V,
    shows: &S,
    term: &str,
    now: DateTime<Utc>,
) -> RepoResult<SearchMatches<Venue>>
where
    V: VenueRepository,
    S: ShowRepository,
{
    let counts = shows.show_counts_by_venue(now)?;
    let results = filter_by_name(venues.list_venues()?, term, &counts, |venue| {
        (venue.id, venue.name())
    });
    debug!(
        "event=search module=search kind=venue term_len={} count={}",
        term.chars().count(),
        results.len()
    );
    Ok(SearchMatches::from_results(results))
}

/// Searches artists by name.
pub fn search_artists<A, S>(
    artists: &A,
    shows: &S,
    term: &str,
    now: DateTime<Utc>,
) -> RepoResult<SearchMatches<Artist>>
where
    A: ArtistRepository,
    S: ShowRepository,
{
    let counts = shows.show_counts_by_artist(now)?;
    let results = filter_by_name(artists.list_artists()?, term, &counts, |artist| {
        (artist.id, artist.name())
    });
    debug!(
        "event=search module=search kind=artist term_len={} count={}",
        term.chars().count(),
        results.len()
    );
    Ok(SearchMatches::from_results(results))
}

/// Runs `query` against the store behind `conn`.
pub fn search_directory(
    conn: &Connection,
    query: &SearchQuery,
    now: DateTime<Utc>,
) -> RepoResult<DirectoryMatches> {
    let shows = SqliteShowRepository::new(conn);
    match query.kind {
        SearchKind::Venue => {
            let venues = SqliteVenueRepository::new(conn);
            search_venues(&venues, &shows, &query.term, now).map(DirectoryMatches::Venue)
        }
        SearchKind::Artist => {
            let artists = SqliteArtistRepository::new(conn);
            search_artists(&artists, &shows, &query.term, now).map(DirectoryMatches::Artist)
        }
    }
}

fn filter_by_name<T>(
    records: Vec<T>,
    term: &str,
    counts: &HashMap<Uuid, ShowCounts>,
    key: impl Fn(&T) -> (Uuid, &str),
) -> Vec<SearchHit<T>> {
    records
        .into_iter()
        .filter_map(|record| {
            let (id, name) = key(&record);
            if !name_matches(name, term) {
                return None;
            }
            let num_upcoming_shows = counts
                .get(&id)
                .map_or(0, |counts| counts.num_upcoming_shows);
            Some(SearchHit {
                record,
                num_upcoming_shows,
            })
        })
        .collect()
}
