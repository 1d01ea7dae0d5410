use chrono::{Duration, TimeZone, Utc};
use fyyur_core::db::open_db_in_memory;
use fyyur_core::{
    ArtistProfile, ArtistService, ShowDraft, ShowService, VenueProfile, VenueService,
};
use std::collections::HashSet;

#[test]
fn every_venue_appears_in_exactly_one_area() {
    let conn = open_db_in_memory().unwrap();
    let venues = VenueService::sqlite(&conn);
    let mut created = HashSet::new();
    for (name, city, state) in [
        ("The Musical Hop", "San Francisco", "CA"),
        ("The Dueling Pianos Bar", "New York", "NY"),
        ("Park Square Live Music & Coffee", "San Francisco", "CA"),
        ("Blue Door", "Portland", "OR"),
        ("Port City Music Hall", "Portland", "ME"),
    ] {
        created.insert(
            venues
                .create_venue(&VenueProfile::new(name, city, state))
                .unwrap(),
        );
    }

    let groups = venues.group_by_area().unwrap();
    assert_eq!(groups.len(), 4);

    let mut seen = HashSet::new();
    for group in &groups {
        for venue in &group.venues {
            assert!(seen.insert(venue.id), "venue listed twice");
            let stored = venues.get_detail(venue.id).unwrap();
            assert_eq!(stored.venue.profile.city, group.city);
            assert_eq!(stored.venue.profile.state, group.state);
        }
    }
    assert_eq!(seen, created);

    let san_francisco = groups
        .iter()
        .find(|group| group.city == "San Francisco" && group.state == "CA")
        .unwrap();
    assert_eq!(san_francisco.venues.len(), 2);
}

#[test]
fn area_entries_count_only_upcoming_shows() {
    let conn = open_db_in_memory().unwrap();
    let now = Utc.with_ymd_and_hms(2030, 6, 1, 20, 0, 0).unwrap();
    let venues = VenueService::sqlite(&conn);
    let hop = venues
        .create_venue(&VenueProfile::new("The Musical Hop", "San Francisco", "CA"))
        .unwrap();
    let artist = ArtistService::sqlite(&conn)
        .create_artist(&ArtistProfile::new("Matt Quevado", "New York", "NY"))
        .unwrap();
    let shows = ShowService::sqlite(&conn);
    for offset_days in [-10, -1, 4] {
        shows
            .create_show(&ShowDraft {
                venue_id: hop,
                artist_id: artist,
                start_time: now + Duration::days(offset_days),
            })
            .unwrap();
    }

    let groups = venues.group_by_area_at(now).unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].venues[0].name, "The Musical Hop");
    assert_eq!(groups[0].venues[0].num_upcoming_shows, 1);
}

#[test]
fn empty_directory_has_no_areas() {
    let conn = open_db_in_memory().unwrap();
    assert!(VenueService::sqlite(&conn).group_by_area().unwrap().is_empty());
}
