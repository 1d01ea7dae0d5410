//! Repository contracts and SQLite implementations.
//!
//! # Responsibility
//! - Typed CRUD over `venues`, `artists` and `shows`.
//! - Keep SQL, genre-list storage and transaction handling behind the
//!   repository boundary.
//!
//! # Invariants
//! - Write paths validate their payload before any SQL runs.
//! - Multi-statement writes (record row + genre rows) commit in one
//!   transaction or not at all.
//! - Lookups by id report [`RepoError::NotFound`], never a store error.

use crate::db::DbError;
use crate::model::validation::ValidationError;
use crate::model::EntityKind;
use rusqlite::{params, Connection};
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub mod artist_repo;
pub mod show_repo;
pub mod venue_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for directory persistence and queries.
#[derive(Debug)]
pub enum RepoError {
    /// Payload rejected before persistence.
    Validation(ValidationError),
    /// Connection/transaction failure.
    Db(DbError),
    /// Id does not resolve to a record.
    NotFound { kind: EntityKind, id: Uuid },
    /// Record is still referenced by shows and cannot be deleted.
    Conflict {
        kind: EntityKind,
        id: Uuid,
        show_count: usize,
    },
    /// Persisted row cannot be decoded into a record.
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound { kind, id } => write!(f, "{kind} not found: {id}"),
            Self::Conflict {
                kind,
                id,
                show_count,
            } => write!(f, "{kind} {id} is still referenced by {show_count} show(s)"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound { .. } => None,
            Self::Conflict { .. } => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl RepoError {
    /// Stable code for `error_code=` log fields.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(err) => err.error_code(),
            Self::Db(err) => err.error_code(),
            Self::NotFound { .. } => "not_found",
            Self::Conflict { .. } => "conflict",
            Self::InvalidData(_) => "invalid_data",
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Ordered genre list storage for one owner table.
#[derive(Debug, Clone, Copy)]
pub(crate) struct GenreTable {
    table: &'static str,
    owner_column: &'static str,
}

pub(crate) const VENUE_GENRES: GenreTable = GenreTable {
    table: "venue_genres",
    owner_column: "venue_uuid",
};

pub(crate) const ARTIST_GENRES: GenreTable = GenreTable {
    table: "artist_genres",
    owner_column: "artist_uuid",
};

impl GenreTable {
    /// Rewrites the whole list for `owner`. Call inside the owner's write
    /// transaction.
    pub(crate) fn replace(
        &self,
        conn: &Connection,
        owner: &str,
        genres: &[String],
    ) -> RepoResult<()> {
        conn.execute(
            &format!("DELETE FROM {} WHERE {} = ?1;", self.table, self.owner_column),
            [owner],
        )?;

        let mut stmt = conn.prepare(&format!(
            "INSERT INTO {} ({}, position, genre) VALUES (?1, ?2, ?3);",
            self.table, self.owner_column
        ))?;
        for (position, genre) in genres.iter().enumerate() {
            stmt.execute(params![owner, position as i64, genre.as_str()])?;
        }
        Ok(())
    }

    pub(crate) fn load(&self, conn: &Connection, owner: &str) -> RepoResult<Vec<String>> {
        let mut stmt = conn.prepare(&format!(
            "SELECT genre FROM {} WHERE {} = ?1 ORDER BY position ASC;",
            self.table, self.owner_column
        ))?;
        let mut rows = stmt.query([owner])?;
        let mut genres = Vec::new();
        while let Some(row) = rows.next()? {
            genres.push(row.get(0)?);
        }
        Ok(genres)
    }

    /// Loads every owner's list in one query, keyed by owner uuid text.
    pub(crate) fn load_all(
        &self,
        conn: &Connection,
    ) -> RepoResult<HashMap<String, Vec<String>>> {
        let mut stmt = conn.prepare(&format!(
            "SELECT {owner} AS owner, genre FROM {table} ORDER BY {owner} ASC, position ASC;",
            owner = self.owner_column,
            table = self.table
        ))?;
        let mut rows = stmt.query([])?;
        let mut genres: HashMap<String, Vec<String>> = HashMap::new();
        while let Some(row) = rows.next()? {
            let owner: String = row.get("owner")?;
            genres.entry(owner).or_default().push(row.get("genre")?);
        }
        Ok(genres)
    }
}

pub(crate) fn parse_uuid(value: &str, column: &str) -> RepoResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid value `{value}` in {column}")))
}

pub(crate) fn parse_flag(value: i64, column: &str) -> RepoResult<bool> {
    match value {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(RepoError::InvalidData(format!(
            "invalid boolean value `{other}` in {column}"
        ))),
    }
}

pub(crate) fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}

pub(crate) fn record_exists(conn: &Connection, table: &str, id: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        &format!("SELECT EXISTS(SELECT 1 FROM {table} WHERE uuid = ?1);"),
        [id],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}
