//! Show repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Create shows after checking both endpoints exist.
//! - Produce joined read models (show + venue/artist columns) ordered by
//!   start time.
//! - Produce past/upcoming counts for every venue or artist in one grouped
//!   query, so aggregated pages never issue a query per entity.
//!
//! # Invariants
//! - Joined listings are ordered by `start_time ASC, uuid ASC`.
//! - `start_time <= now` counts as past, `start_time > now` as upcoming.

use crate::model::artist::ArtistId;
use crate::model::show::{
    from_epoch_ms, to_epoch_ms, ArtistShow, Show, ShowCounts, ShowDraft, ShowId, ShowListing,
    VenueShow,
};
use crate::model::validation::ValidationError;
use crate::model::venue::VenueId;
use crate::model::EntityKind;
use crate::repo::{parse_uuid, record_exists, RepoError, RepoResult};
use chrono::{DateTime, Utc};
use log::info;
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};
use std::collections::HashMap;
use uuid::Uuid;

/// Repository interface for shows and show-derived read models.
pub trait ShowRepository {
    fn create_show(&self, draft: &ShowDraft) -> RepoResult<ShowId>;
    fn get_show(&self, id: ShowId) -> RepoResult<Show>;
    /// All shows joined with venue and artist columns.
    fn list_shows(&self) -> RepoResult<Vec<ShowListing>>;
    /// Shows hosted by one venue, joined with the performing artist.
    fn list_venue_shows(&self, venue_id: VenueId) -> RepoResult<Vec<VenueShow>>;
    /// Shows played by one artist, joined with the hosting venue.
    fn list_artist_shows(&self, artist_id: ArtistId) -> RepoResult<Vec<ArtistShow>>;
    /// Past/upcoming counts per venue that has at least one show.
    fn show_counts_by_venue(&self, now: DateTime<Utc>) -> RepoResult<HashMap<VenueId, ShowCounts>>;
    /// Past/upcoming counts per artist that has at least one show.
    fn show_counts_by_artist(
        &self,
        now: DateTime<Utc>,
    ) -> RepoResult<HashMap<ArtistId, ShowCounts>>;
}

/// SQLite-backed show repository.
pub struct SqliteShowRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteShowRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl ShowRepository for SqliteShowRepository<'_> {
    fn create_show(&self, draft: &ShowDraft) -> RepoResult<ShowId> {
        let id = Uuid::new_v4();
        let venue_text = draft.venue_id.to_string();
        let artist_text = draft.artist_id.to_string();

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        if !record_exists(&tx, "venues", &venue_text)? {
            return Err(ValidationError::MissingReference {
                kind: EntityKind::Venue,
                id: draft.venue_id,
            }
            .into());
        }
        if !record_exists(&tx, "artists", &artist_text)? {
            return Err(ValidationError::MissingReference {
                kind: EntityKind::Artist,
                id: draft.artist_id,
            }
            .into());
        }

        tx.execute(
            "INSERT INTO shows (uuid, venue_uuid, artist_uuid, start_time)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                id.to_string(),
                venue_text,
                artist_text,
                to_epoch_ms(draft.start_time),
            ],
        )?;
        tx.commit()?;

        info!("event=show_create module=repo status=ok");
        Ok(id)
    }

    fn get_show(&self, id: ShowId) -> RepoResult<Show> {
        self.conn
            .query_row(
                "SELECT uuid, venue_uuid, artist_uuid, start_time FROM shows WHERE uuid = ?1;",
                [id.to_string()],
                |row| Ok(parse_show_row(row)),
            )
            .optional()?
            .ok_or(RepoError::NotFound {
                kind: EntityKind::Show,
                id,
            })?
    }

    fn list_shows(&self) -> RepoResult<Vec<ShowListing>> {
        let mut stmt = self.conn.prepare(
            "SELECT
                s.uuid AS show_uuid,
                s.start_time AS start_time,
                v.uuid AS venue_uuid,
                v.name AS venue_name,
                a.uuid AS artist_uuid,
                a.name AS artist_name,
                a.image_link AS artist_image_link
             FROM shows s
             INNER JOIN venues v ON v.uuid = s.venue_uuid
             INNER JOIN artists a ON a.uuid = s.artist_uuid
             ORDER BY s.start_time ASC, s.uuid ASC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut listings = Vec::new();
        while let Some(row) = rows.next()? {
            listings.push(ShowListing {
                show_id: parse_uuid(&row.get::<_, String>("show_uuid")?, "shows.uuid")?,
                start_time: parse_start_time(row.get("start_time")?)?,
                venue_id: parse_uuid(&row.get::<_, String>("venue_uuid")?, "venues.uuid")?,
                venue_name: row.get("venue_name")?,
                artist_id: parse_uuid(&row.get::<_, String>("artist_uuid")?, "artists.uuid")?,
                artist_name: row.get("artist_name")?,
                artist_image_link: row.get("artist_image_link")?,
            });
        }
        Ok(listings)
    }

    fn list_venue_shows(&self, venue_id: VenueId) -> RepoResult<Vec<VenueShow>> {
        let mut stmt = self.conn.prepare(
            "SELECT
                s.uuid AS show_uuid,
                s.start_time AS start_time,
                a.uuid AS artist_uuid,
                a.name AS artist_name,
                a.image_link AS artist_image_link
             FROM shows s
             INNER JOIN artists a ON a.uuid = s.artist_uuid
             WHERE s.venue_uuid = ?1
             ORDER BY s.start_time ASC, s.uuid ASC;",
        )?;
        let mut rows = stmt.query([venue_id.to_string()])?;
        let mut shows = Vec::new();
        while let Some(row) = rows.next()? {
            shows.push(VenueShow {
                show_id: parse_uuid(&row.get::<_, String>("show_uuid")?, "shows.uuid")?,
                start_time: parse_start_time(row.get("start_time")?)?,
                artist_id: parse_uuid(&row.get::<_, String>("artist_uuid")?, "artists.uuid")?,
                artist_name: row.get("artist_name")?,
                artist_image_link: row.get("artist_image_link")?,
            });
        }
        Ok(shows)
    }

    fn list_artist_shows(&self, artist_id: ArtistId) -> RepoResult<Vec<ArtistShow>> {
        let mut stmt = self.conn.prepare(
            "SELECT
                s.uuid AS show_uuid,
                s.start_time AS start_time,
                v.uuid AS venue_uuid,
                v.name AS venue_name,
                v.image_link AS venue_image_link
             FROM shows s
             INNER JOIN venues v ON v.uuid = s.venue_uuid
             WHERE s.artist_uuid = ?1
             ORDER BY s.start_time ASC, s.uuid ASC;",
        )?;
        let mut rows = stmt.query([artist_id.to_string()])?;
        let mut shows = Vec::new();
        while let Some(row) = rows.next()? {
            shows.push(ArtistShow {
                show_id: parse_uuid(&row.get::<_, String>("show_uuid")?, "shows.uuid")?,
                start_time: parse_start_time(row.get("start_time")?)?,
                venue_id: parse_uuid(&row.get::<_, String>("venue_uuid")?, "venues.uuid")?,
                venue_name: row.get("venue_name")?,
                venue_image_link: row.get("venue_image_link")?,
            });
        }
        Ok(shows)
    }

    fn show_counts_by_venue(&self, now: DateTime<Utc>) -> RepoResult<HashMap<VenueId, ShowCounts>> {
        grouped_counts(self.conn, "venue_uuid", now)
    }

    fn show_counts_by_artist(
        &self,
        now: DateTime<Utc>,
    ) -> RepoResult<HashMap<ArtistId, ShowCounts>> {
        grouped_counts(self.conn, "artist_uuid", now)
    }
}

fn grouped_counts(
    conn: &Connection,
    owner_column: &'static str,
    now: DateTime<Utc>,
) -> RepoResult<HashMap<Uuid, ShowCounts>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT
            {owner_column} AS owner,
            SUM(CASE WHEN start_time <= ?1 THEN 1 ELSE 0 END) AS num_past,
            SUM(CASE WHEN start_time > ?1 THEN 1 ELSE 0 END) AS num_upcoming
         FROM shows
         GROUP BY {owner_column};"
    ))?;
    let mut rows = stmt.query([to_epoch_ms(now)])?;
    let mut counts = HashMap::new();
    while let Some(row) = rows.next()? {
        let owner: String = row.get("owner")?;
        let num_past: i64 = row.get("num_past")?;
        let num_upcoming: i64 = row.get("num_upcoming")?;
        counts.insert(
            parse_uuid(&owner, &format!("shows.{owner_column}"))?,
            ShowCounts {
                num_past_shows: num_past as usize,
                num_upcoming_shows: num_upcoming as usize,
            },
        );
    }
    Ok(counts)
}

fn parse_show_row(row: &Row<'_>) -> RepoResult<Show> {
    Ok(Show {
        id: parse_uuid(&row.get::<_, String>("uuid")?, "shows.uuid")?,
        venue_id: parse_uuid(&row.get::<_, String>("venue_uuid")?, "shows.venue_uuid")?,
        artist_id: parse_uuid(&row.get::<_, String>("artist_uuid")?, "shows.artist_uuid")?,
        start_time: parse_start_time(row.get("start_time")?)?,
    })
}

fn parse_start_time(value: i64) -> RepoResult<DateTime<Utc>> {
    from_epoch_ms(value).ok_or_else(|| {
        RepoError::InvalidData(format!("start_time `{value}` out of range in shows.start_time"))
    })
}
