use chrono::{DateTime, Duration, TimeZone, Utc};
use fyyur_core::db::open_db_in_memory;
use fyyur_core::partition::{partition_artist_shows, partition_venue_shows};
use fyyur_core::{
    ArtistId, ArtistProfile, ArtistService, EntityKind, RepoError, ShowDraft, ShowRepository,
    ShowService, SqliteShowRepository, ValidationError, VenueId, VenueProfile, VenueService,
};
use rusqlite::Connection;
use std::collections::HashSet;
use uuid::Uuid;

fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2030, 6, 1, 20, 0, 0).unwrap()
}

struct Fixture {
    hop: VenueId,
    pianos: VenueId,
    petals: ArtistId,
    sax: ArtistId,
}

fn seed(conn: &Connection) -> Fixture {
    let venues = VenueService::sqlite(conn);
    let artists = ArtistService::sqlite(conn);
    Fixture {
        hop: venues
            .create_venue(&VenueProfile::new("The Musical Hop", "San Francisco", "CA"))
            .unwrap(),
        pianos: venues
            .create_venue(&VenueProfile::new("The Dueling Pianos Bar", "New York", "NY"))
            .unwrap(),
        petals: artists
            .create_artist(&ArtistProfile::new("Guns N Petals", "San Francisco", "CA"))
            .unwrap(),
        sax: artists
            .create_artist(&ArtistProfile::new("The Wild Sax Band", "San Francisco", "CA"))
            .unwrap(),
    }
}

fn book(conn: &Connection, venue_id: VenueId, artist_id: ArtistId, start_time: DateTime<Utc>) {
    ShowService::sqlite(conn)
        .create_show(&ShowDraft {
            venue_id,
            artist_id,
            start_time,
        })
        .unwrap();
}

#[test]
fn show_starting_exactly_now_is_past() {
    let conn = open_db_in_memory().unwrap();
    let fixture = seed(&conn);
    let now = fixed_now();
    book(&conn, fixture.hop, fixture.petals, now);

    let detail = VenueService::sqlite(&conn)
        .get_detail_at(fixture.hop, now)
        .unwrap();
    assert_eq!(detail.num_past_shows, 1);
    assert_eq!(detail.num_upcoming_shows, 0);

    let just_before = now - Duration::milliseconds(1);
    let detail = VenueService::sqlite(&conn)
        .get_detail_at(fixture.hop, just_before)
        .unwrap();
    assert_eq!(detail.num_upcoming_shows, 1);
}

#[test]
fn partitions_are_disjoint_exhaustive_and_ordered() {
    let conn = open_db_in_memory().unwrap();
    let fixture = seed(&conn);
    let now = fixed_now();
    for offset_days in [-40, 10, -3, 0, 25, -1] {
        book(
            &conn,
            fixture.hop,
            fixture.petals,
            now + Duration::days(offset_days),
        );
    }
    book(&conn, fixture.pianos, fixture.petals, now + Duration::days(2));

    let shows = SqliteShowRepository::new(&conn);
    let venue_side = partition_venue_shows(&shows, fixture.hop, now).unwrap();
    assert_eq!(venue_side.past_shows.len() + venue_side.upcoming_shows.len(), 6);
    assert_eq!(venue_side.counts().num_past_shows, 4);
    assert_eq!(venue_side.counts().num_upcoming_shows, 2);
    assert!(venue_side.past().all(|show| show.start_time <= now));
    assert!(venue_side.upcoming().all(|show| show.start_time > now));

    let past_ids: HashSet<Uuid> = venue_side.past().map(|show| show.show_id).collect();
    assert!(venue_side
        .upcoming()
        .all(|show| !past_ids.contains(&show.show_id)));

    let times: Vec<_> = venue_side
        .past()
        .chain(venue_side.upcoming())
        .map(|show| show.start_time)
        .collect();
    let mut sorted = times.clone();
    sorted.sort();
    assert_eq!(times, sorted);

    let artist_side = partition_artist_shows(&shows, fixture.petals, now).unwrap();
    assert_eq!(artist_side.counts().total(), 7);
    assert_eq!(artist_side.counts().num_upcoming_shows, 3);
}

#[test]
fn joined_rows_carry_counterpart_fields() {
    let conn = open_db_in_memory().unwrap();
    let fixture = seed(&conn);
    let now = fixed_now();
    book(&conn, fixture.hop, fixture.sax, now + Duration::days(1));

    let venue_detail = VenueService::sqlite(&conn)
        .get_detail_at(fixture.hop, now)
        .unwrap();
    let upcoming = &venue_detail.upcoming_shows[0];
    assert_eq!(upcoming.artist_id, fixture.sax);
    assert_eq!(upcoming.artist_name, "The Wild Sax Band");

    let artist_detail = ArtistService::sqlite(&conn)
        .get_detail_at(fixture.sax, now)
        .unwrap();
    let upcoming = &artist_detail.upcoming_shows[0];
    assert_eq!(upcoming.venue_id, fixture.hop);
    assert_eq!(upcoming.venue_name, "The Musical Hop");

    let listing = ShowService::sqlite(&conn).list_shows().unwrap();
    assert_eq!(listing.len(), 1);
    assert_eq!(listing[0].venue_name, "The Musical Hop");
    assert_eq!(listing[0].artist_name, "The Wild Sax Band");
}

#[test]
fn batched_counts_match_per_entity_partitions() {
    let conn = open_db_in_memory().unwrap();
    let fixture = seed(&conn);
    let now = fixed_now();
    book(&conn, fixture.hop, fixture.petals, now - Duration::days(5));
    book(&conn, fixture.hop, fixture.sax, now + Duration::days(5));
    book(&conn, fixture.pianos, fixture.sax, now + Duration::hours(1));
    book(&conn, fixture.pianos, fixture.sax, now);

    let shows = SqliteShowRepository::new(&conn);
    let by_venue = shows.show_counts_by_venue(now).unwrap();
    for venue_id in [fixture.hop, fixture.pianos] {
        let partition = partition_venue_shows(&shows, venue_id, now).unwrap();
        assert_eq!(by_venue.get(&venue_id).copied().unwrap_or_default(), partition.counts());
    }

    let by_artist = shows.show_counts_by_artist(now).unwrap();
    for artist_id in [fixture.petals, fixture.sax] {
        let partition = partition_artist_shows(&shows, artist_id, now).unwrap();
        assert_eq!(by_artist.get(&artist_id).copied().unwrap_or_default(), partition.counts());
    }
}

#[test]
fn show_with_missing_venue_is_rejected_and_leaves_no_row() {
    let conn = open_db_in_memory().unwrap();
    let fixture = seed(&conn);
    let shows = ShowService::sqlite(&conn);

    let missing = Uuid::new_v4();
    let err = shows
        .create_show(&ShowDraft {
            venue_id: missing,
            artist_id: fixture.petals,
            start_time: fixed_now(),
        })
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::MissingReference {
            kind: EntityKind::Venue,
            id,
        }) if id == missing
    ));

    let err = shows
        .create_show(&ShowDraft {
            venue_id: fixture.hop,
            artist_id: missing,
            start_time: fixed_now(),
        })
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::MissingReference {
            kind: EntityKind::Artist,
            ..
        })
    ));

    let rows: i64 = conn
        .query_row("SELECT COUNT(*) FROM shows;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, 0);
}

#[test]
fn get_show_round_trips_start_time() {
    let conn = open_db_in_memory().unwrap();
    let fixture = seed(&conn);
    let shows = ShowService::sqlite(&conn);
    let start_time = Utc.with_ymd_and_hms(2035, 4, 1, 20, 0, 0).unwrap();

    let id = shows
        .create_show(&ShowDraft {
            venue_id: fixture.pianos,
            artist_id: fixture.sax,
            start_time,
        })
        .unwrap();

    let show = shows.get_show(id).unwrap();
    assert_eq!(show.start_time, start_time);
    assert_eq!(show.venue_id, fixture.pianos);
    assert!(matches!(
        shows.get_show(Uuid::new_v4()),
        Err(RepoError::NotFound {
            kind: EntityKind::Show,
            ..
        })
    ));
}
