//! Artist repository contract and SQLite implementation.
//!
//! Artists cannot be deleted through this layer.

use crate::model::artist::{Artist, ArtistId, ArtistProfile};
use crate::model::EntityKind;
use crate::repo::{bool_to_int, parse_flag, parse_uuid, RepoError, RepoResult, ARTIST_GENRES};
use log::info;
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};
use uuid::Uuid;

const ARTIST_SELECT_SQL: &str = "SELECT
    uuid,
    name,
    city,
    state,
    phone,
    image_link,
    facebook_link,
    website,
    seeking_venue,
    seeking_description
FROM artists";

/// Repository interface for artist CRUD.
pub trait ArtistRepository {
    fn create_artist(&self, profile: &ArtistProfile) -> RepoResult<ArtistId>;
    fn get_artist(&self, id: ArtistId) -> RepoResult<Artist>;
    fn list_artists(&self) -> RepoResult<Vec<Artist>>;
    fn update_artist(&self, id: ArtistId, profile: &ArtistProfile) -> RepoResult<()>;
}

/// SQLite-backed artist repository.
pub struct SqliteArtistRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteArtistRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl ArtistRepository for SqliteArtistRepository<'_> {
    fn create_artist(&self, profile: &ArtistProfile) -> RepoResult<ArtistId> {
        profile.validate()?;

        let id = Uuid::new_v4();
        let id_text = id.to_string();
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        tx.execute(
            "INSERT INTO artists (
                uuid,
                name,
                city,
                state,
                phone,
                image_link,
                facebook_link,
                website,
                seeking_venue,
                seeking_description
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10);",
            params![
                id_text.as_str(),
                profile.name.as_str(),
                profile.city.as_str(),
                profile.state.as_str(),
                profile.phone.as_deref(),
                profile.image_link.as_deref(),
                profile.facebook_link.as_deref(),
                profile.website.as_deref(),
                bool_to_int(profile.seeking_venue),
                profile.seeking_description.as_deref(),
            ],
        )?;
        ARTIST_GENRES.replace(&tx, &id_text, &profile.genres)?;
        tx.commit()?;

        info!(
            "event=artist_create module=repo status=ok genres={}",
            profile.genres.len()
        );
        Ok(id)
    }

    fn get_artist(&self, id: ArtistId) -> RepoResult<Artist> {
        let id_text = id.to_string();
        let mut artist = self
            .conn
            .query_row(
                &format!("{ARTIST_SELECT_SQL} WHERE uuid = ?1;"),
                [id_text.as_str()],
                |row| Ok(parse_artist_row(row)),
            )
            .optional()?
            .ok_or(RepoError::NotFound {
                kind: EntityKind::Artist,
                id,
            })??;

        artist.profile.genres = ARTIST_GENRES.load(self.conn, &id_text)?;
        Ok(artist)
    }

    fn list_artists(&self) -> RepoResult<Vec<Artist>> {
        let mut genres_by_owner = ARTIST_GENRES.load_all(self.conn)?;
        let mut stmt = self.conn.prepare(&format!(
            "{ARTIST_SELECT_SQL} ORDER BY name COLLATE NOCASE ASC, uuid ASC;"
        ))?;
        let mut rows = stmt.query([])?;
        let mut artists = Vec::new();
        while let Some(row) = rows.next()? {
            let mut artist = parse_artist_row(row)?;
            artist.profile.genres = genres_by_owner
                .remove(&artist.id.to_string())
                .unwrap_or_default();
            artists.push(artist);
        }
        Ok(artists)
    }

    fn update_artist(&self, id: ArtistId, profile: &ArtistProfile) -> RepoResult<()> {
        profile.validate()?;

        let id_text = id.to_string();
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let changed = tx.execute(
            "UPDATE artists
             SET
                name = ?2,
                city = ?3,
                state = ?4,
                phone = ?5,
                image_link = ?6,
                facebook_link = ?7,
                website = ?8,
                seeking_venue = ?9,
                seeking_description = ?10,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?1;",
            params![
                id_text.as_str(),
                profile.name.as_str(),
                profile.city.as_str(),
                profile.state.as_str(),
                profile.phone.as_deref(),
                profile.image_link.as_deref(),
                profile.facebook_link.as_deref(),
                profile.website.as_deref(),
                bool_to_int(profile.seeking_venue),
                profile.seeking_description.as_deref(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                kind: EntityKind::Artist,
                id,
            });
        }

        ARTIST_GENRES.replace(&tx, &id_text, &profile.genres)?;
        tx.commit()?;

        info!("event=artist_update module=repo status=ok");
        Ok(())
    }
}

fn parse_artist_row(row: &Row<'_>) -> RepoResult<Artist> {
    let uuid_text: String = row.get("uuid")?;
    Ok(Artist {
        id: parse_uuid(&uuid_text, "artists.uuid")?,
        profile: ArtistProfile {
            name: row.get("name")?,
            city: row.get("city")?,
            state: row.get("state")?,
            phone: row.get("phone")?,
            genres: Vec::new(),
            image_link: row.get("image_link")?,
            facebook_link: row.get("facebook_link")?,
            website: row.get("website")?,
            seeking_venue: parse_flag(row.get("seeking_venue")?, "artists.seeking_venue")?,
            seeking_description: row.get("seeking_description")?,
        },
    })
}
