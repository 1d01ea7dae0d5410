//! Venue repository contract and SQLite implementation.
//!
//! # Invariants
//! - Listing order is `name COLLATE NOCASE ASC, uuid ASC`.
//! - Deleting a venue that still hosts shows is rejected with
//!   [`RepoError::Conflict`]; shows are never cascaded away.

use crate::model::venue::{Venue, VenueId, VenueProfile};
use crate::model::EntityKind;
use crate::repo::{
    bool_to_int, parse_flag, parse_uuid, record_exists, RepoError, RepoResult, VENUE_GENRES,
};
use log::info;
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};
use uuid::Uuid;

const VENUE_SELECT_SQL: &str = "SELECT
    uuid,
    name,
    city,
    state,
    address,
    phone,
    image_link,
    facebook_link,
    website,
    seeking_talent,
    seeking_description
FROM venues";

/// Repository interface for venue CRUD.
pub trait VenueRepository {
    fn create_venue(&self, profile: &VenueProfile) -> RepoResult<VenueId>;
    fn get_venue(&self, id: VenueId) -> RepoResult<Venue>;
    fn list_venues(&self) -> RepoResult<Vec<Venue>>;
    /// Overwrites every editable field, genres included.
    fn update_venue(&self, id: VenueId, profile: &VenueProfile) -> RepoResult<()>;
    fn delete_venue(&self, id: VenueId) -> RepoResult<()>;
}

/// SQLite-backed venue repository.
pub struct SqliteVenueRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteVenueRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl VenueRepository for SqliteVenueRepository<'_> {
    fn create_venue(&self, profile: &VenueProfile) -> RepoResult<VenueId> {
        profile.validate()?;

        let id = Uuid::new_v4();
        let id_text = id.to_string();
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        tx.execute(
            "INSERT INTO venues (
                uuid,
                name,
                city,
                state,
                address,
                phone,
                image_link,
                facebook_link,
                website,
                seeking_talent,
                seeking_description
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11);",
            params![
                id_text.as_str(),
                profile.name.as_str(),
                profile.city.as_str(),
                profile.state.as_str(),
                profile.address.as_deref(),
                profile.phone.as_deref(),
                profile.image_link.as_deref(),
                profile.facebook_link.as_deref(),
                profile.website.as_deref(),
                bool_to_int(profile.seeking_talent),
                profile.seeking_description.as_deref(),
            ],
        )?;
        VENUE_GENRES.replace(&tx, &id_text, &profile.genres)?;
        tx.commit()?;

        info!(
            "event=venue_create module=repo status=ok genres={}",
            profile.genres.len()
        );
        Ok(id)
    }

    fn get_venue(&self, id: VenueId) -> RepoResult<Venue> {
        let id_text = id.to_string();
        let mut venue = self
            .conn
            .query_row(
                &format!("{VENUE_SELECT_SQL} WHERE uuid = ?1;"),
                [id_text.as_str()],
                |row| Ok(parse_venue_row(row)),
            )
            .optional()?
            .ok_or(RepoError::NotFound {
                kind: EntityKind::Venue,
                id,
            })??;

        venue.profile.genres = VENUE_GENRES.load(self.conn, &id_text)?;
        Ok(venue)
    }

    fn list_venues(&self) -> RepoResult<Vec<Venue>> {
        let mut genres_by_owner = VENUE_GENRES.load_all(self.conn)?;
        let mut stmt = self.conn.prepare(&format!(
            "{VENUE_SELECT_SQL} ORDER BY name COLLATE NOCASE ASC, uuid ASC;"
        ))?;
        let mut rows = stmt.query([])?;
        let mut venues = Vec::new();
        while let Some(row) = rows.next()? {
            let mut venue = parse_venue_row(row)?;
            venue.profile.genres = genres_by_owner
                .remove(&venue.id.to_string())
                .unwrap_or_default();
            venues.push(venue);
        }
        Ok(venues)
    }

    fn update_venue(&self, id: VenueId, profile: &VenueProfile) -> RepoResult<()> {
        profile.validate()?;

        let id_text = id.to_string();
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let changed = tx.execute(
            "UPDATE venues
             SET
                name = ?2,
                city = ?3,
                state = ?4,
                address = ?5,
                phone = ?6,
                image_link = ?7,
                facebook_link = ?8,
                website = ?9,
                seeking_talent = ?10,
                seeking_description = ?11,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?1;",
            params![
                id_text.as_str(),
                profile.name.as_str(),
                profile.city.as_str(),
                profile.state.as_str(),
                profile.address.as_deref(),
                profile.phone.as_deref(),
                profile.image_link.as_deref(),
                profile.facebook_link.as_deref(),
                profile.website.as_deref(),
                bool_to_int(profile.seeking_talent),
                profile.seeking_description.as_deref(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                kind: EntityKind::Venue,
                id,
            });
        }

        VENUE_GENRES.replace(&tx, &id_text, &profile.genres)?;
        tx.commit()?;

        info!("event=venue_update module=repo status=ok");
        Ok(())
    }

    fn delete_venue(&self, id: VenueId) -> RepoResult<()> {
        let id_text = id.to_string();
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        if !record_exists(&tx, "venues", &id_text)? {
            return Err(RepoError::NotFound {
                kind: EntityKind::Venue,
                id,
            });
        }

        let show_count: i64 = tx.query_row(
            "SELECT COUNT(*) FROM shows WHERE venue_uuid = ?1;",
            [id_text.as_str()],
            |row| row.get(0),
        )?;
        if show_count > 0 {
            info!("event=venue_delete module=repo status=rejected shows={show_count}");
            return Err(RepoError::Conflict {
                kind: EntityKind::Venue,
                id,
                show_count: show_count as usize,
            });
        }

        tx.execute("DELETE FROM venues WHERE uuid = ?1;", [id_text.as_str()])?;
        tx.commit()?;

        info!("event=venue_delete module=repo status=ok");
        Ok(())
    }
}

fn parse_venue_row(row: &Row<'_>) -> RepoResult<Venue> {
    let uuid_text: String = row.get("uuid")?;
    Ok(Venue {
        id: parse_uuid(&uuid_text, "venues.uuid")?,
        profile: VenueProfile {
            name: row.get("name")?,
            city: row.get("city")?,
            state: row.get("state")?,
            address: row.get("address")?,
            phone: row.get("phone")?,
            image_link: row.get("image_link")?,
            facebook_link: row.get("facebook_link")?,
            website: row.get("website")?,
            genres: Vec::new(),
            seeking_talent: parse_flag(row.get("seeking_talent")?, "venues.seeking_talent")?,
            seeking_description: row.get("seeking_description")?,
        },
    })
}
