//! Show use-case service.

use crate::model::show::{Show, ShowDraft, ShowId, ShowListing};
use crate::repo::show_repo::{ShowRepository, SqliteShowRepository};
use crate::repo::RepoResult;
use rusqlite::Connection;

/// Show service facade.
pub struct ShowService<S: ShowRepository> {
    shows: S,
}

impl<'conn> ShowService<SqliteShowRepository<'conn>> {
    pub fn sqlite(conn: &'conn Connection) -> Self {
        Self::new(SqliteShowRepository::new(conn))
    }
}

impl<S: ShowRepository> ShowService<S> {
    pub fn new(shows: S) -> Self {
        Self { shows }
    }

    /// Every show joined with its venue and artist, earliest first.
    pub fn list_shows(&self) -> RepoResult<Vec<ShowListing>> {
        self.shows.list_shows()
    }

    pub fn get_show(&self, id: ShowId) -> RepoResult<Show> {
        self.shows.get_show(id)
    }

    /// Creates a show; both endpoints must already exist.
    pub fn create_show(&self, draft: &ShowDraft) -> RepoResult<ShowId> {
        self.shows.create_show(draft)
    }
}
