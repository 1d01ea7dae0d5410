use fyyur_core::db::open_db_in_memory;
use fyyur_core::form::decode_artist;
use fyyur_core::{
    ArtistProfile, ArtistRepository, ArtistService, EntityKind, FormData, RepoError,
    SqliteArtistRepository, ValidationError,
};
use uuid::Uuid;

fn guns_n_petals() -> ArtistProfile {
    ArtistProfile {
        phone: Some("326-123-5000".to_string()),
        genres: vec!["Rock n Roll".to_string()],
        image_link: Some("https://images.example/petals.jpg".to_string()),
        facebook_link: Some("https://www.facebook.com/GunsNPetals".to_string()),
        website: Some("https://www.gunsnpetalsband.com".to_string()),
        seeking_venue: true,
        seeking_description: Some("Looking for shows to perform at in the Bay Area!".to_string()),
        ..ArtistProfile::new("Guns N Petals", "San Francisco", "CA")
    }
}

#[test]
fn create_and_get_roundtrip_preserves_every_field() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteArtistRepository::new(&conn);

    let profile = guns_n_petals();
    let id = repo.create_artist(&profile).unwrap();

    let loaded = repo.get_artist(id).unwrap();
    assert_eq!(loaded.id, id);
    assert_eq!(loaded.profile, profile);
}

#[test]
fn submitted_form_round_trips_through_service() {
    let conn = open_db_in_memory().unwrap();
    let service = ArtistService::sqlite(&conn);

    let form = FormData::new()
        .with("name", "The Wild Sax Band")
        .with("city", "San Francisco")
        .with("state", "CA")
        .with("phone", "432-325-5432")
        .with("genres", "Jazz")
        .with("genres", "Classical")
        .with("seeking_venue", "on");
    let profile = decode_artist(&form).unwrap();
    let id = service.create_artist(&profile).unwrap();

    let detail = service.get_detail(id).unwrap();
    assert_eq!(detail.artist.profile.genres, vec!["Jazz", "Classical"]);
    assert!(detail.artist.profile.seeking_venue);
    assert_eq!(detail.num_past_shows + detail.num_upcoming_shows, 0);
}

#[test]
fn invalid_phone_is_rejected_before_persistence() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteArtistRepository::new(&conn);

    let mut profile = guns_n_petals();
    profile.phone = Some("call me".to_string());
    let err = repo.create_artist(&profile).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::InvalidPhone(_))
    ));
    assert!(repo.list_artists().unwrap().is_empty());
}

#[test]
fn update_replaces_profile() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteArtistRepository::new(&conn);
    let id = repo.create_artist(&guns_n_petals()).unwrap();

    let mut edited = guns_n_petals();
    edited.city = "Los Angeles".to_string();
    edited.genres = vec!["Punk".to_string(), "Rock n Roll".to_string()];
    edited.seeking_venue = false;
    edited.seeking_description = None;
    repo.update_artist(id, &edited).unwrap();

    assert_eq!(repo.get_artist(id).unwrap().profile, edited);
}

#[test]
fn update_missing_artist_returns_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteArtistRepository::new(&conn);

    let missing = Uuid::new_v4();
    let err = repo.update_artist(missing, &guns_n_petals()).unwrap_err();
    assert!(matches!(
        err,
        RepoError::NotFound { kind: EntityKind::Artist, id } if id == missing
    ));
}

#[test]
fn artist_detail_serializes_flat_with_counts() {
    let conn = open_db_in_memory().unwrap();
    let service = ArtistService::sqlite(&conn);
    let id = service.create_artist(&guns_n_petals()).unwrap();

    let value = serde_json::to_value(service.get_detail(id).unwrap()).unwrap();
    assert_eq!(value["id"], id.to_string());
    assert_eq!(value["name"], "Guns N Petals");
    assert_eq!(value["seeking_venue"], true);
    assert_eq!(value["num_upcoming_shows"], 0);
    assert_eq!(value["past_shows"], serde_json::json!([]));
}

fn reject_genre_inserts(conn: &rusqlite::Connection) {
    conn.execute_batch(
        "CREATE TRIGGER reject_artist_genre BEFORE INSERT ON artist_genres
         BEGIN
             SELECT RAISE(ABORT, 'genre rejected');
         END;",
    )
    .unwrap();
}

fn count_rows(conn: &rusqlite::Connection, table: &str) -> i64 {
    conn.query_row(&format!("SELECT COUNT(*) FROM {table};"), [], |row| row.get(0))
        .unwrap()
}

#[test]
fn create_rolls_back_when_genre_insert_fails() {
    let conn = open_db_in_memory().unwrap();
    reject_genre_inserts(&conn);
    let repo = SqliteArtistRepository::new(&conn);

    let err = repo.create_artist(&guns_n_petals()).unwrap_err();
    assert!(matches!(err, RepoError::Db(_)));
    assert_eq!(err.error_code(), "store_constraint");
    assert_eq!(count_rows(&conn, "artists"), 0);
    assert_eq!(count_rows(&conn, "artist_genres"), 0);

    conn.execute_batch("DROP TRIGGER reject_artist_genre;").unwrap();
    let id = repo.create_artist(&guns_n_petals()).unwrap();
    assert_eq!(repo.get_artist(id).unwrap().profile, guns_n_petals());
}

#[test]
fn update_rolls_back_when_genre_insert_fails() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteArtistRepository::new(&conn);
    let id = repo.create_artist(&guns_n_petals()).unwrap();
    reject_genre_inserts(&conn);

    let mut edited = guns_n_petals();
    edited.city = "Los Angeles".to_string();
    edited.genres = vec!["Punk".to_string()];
    let err = repo.update_artist(id, &edited).unwrap_err();
    assert!(matches!(err, RepoError::Db(_)));

    assert_eq!(repo.get_artist(id).unwrap().profile, guns_n_petals());
    assert_eq!(count_rows(&conn, "artist_genres"), 1);
}

#[test]
fn parenthesized_area_code_phone_is_accepted() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteArtistRepository::new(&conn);

    let mut profile = guns_n_petals();
    profile.phone = Some("(415) 555-1234".to_string());
    let id = repo.create_artist(&profile).unwrap();
    assert_eq!(
        repo.get_artist(id).unwrap().profile.phone.as_deref(),
        Some("(415) 555-1234")
    );
}
