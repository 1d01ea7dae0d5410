//! Venues-by-area aggregation.
//!
//! An area is an exact `(city, state)` pair. Matching is case-sensitive
//! string equality on both parts, unlike name search.
//!
//! Grouping collects the distinct pairs first and then filters the venue
//! list once per pair, so cost is `groups × venues`. That is fine for a
//! directory; switch to a single keyed pass if area counts grow large.

use crate::model::show::ShowCounts;
use crate::model::venue::{Venue, VenueId};
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};

/// Venue entry inside an area group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AreaVenue {
    pub id: VenueId,
    pub name: String,
    pub num_upcoming_shows: usize,
}

/// All venues sharing one `(city, state)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AreaGroup {
    pub city: String,
    pub state: String,
    pub venues: Vec<AreaVenue>,
}

/// Groups `venues` by exact area.
///
/// Groups are ordered by `(state, city)`; venues inside a group keep the
/// order of the input slice. Venues missing from `counts` have no shows.
pub fn group_by_area(venues: &[Venue], counts: &HashMap<VenueId, ShowCounts>) -> Vec<AreaGroup> {
    let areas: BTreeSet<(&str, &str)> = venues
        .iter()
        .map(|venue| {
            let (city, state) = venue.area();
            (state, city)
        })
        .collect();

    areas
        .into_iter()
        .map(|(state, city)| AreaGroup {
            city: city.to_string(),
            state: state.to_string(),
            venues: venues
                .iter()
                .filter(|venue| venue.area() == (city, state))
                .map(|venue| AreaVenue {
                    id: venue.id,
                    name: venue.profile.name.clone(),
                    num_upcoming_shows: counts
                        .get(&venue.id)
                        .map_or(0, |counts| counts.num_upcoming_shows),
                })
                .collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::group_by_area;
    use crate::model::show::ShowCounts;
    use crate::model::venue::{Venue, VenueProfile};
    use std::collections::HashMap;
    use uuid::Uuid;

    fn venue(name: &str, city: &str, state: &str) -> Venue {
        Venue {
            id: Uuid::new_v4(),
            profile: VenueProfile::new(name, city, state),
        }
    }

    #[test]
    fn every_venue_lands_in_exactly_one_group() {
        let venues = vec![
            venue("The Musical Hop", "San Francisco", "CA"),
            venue("The Dueling Pianos Bar", "New York", "NY"),
            venue("Park Square Live Music & Coffee", "San Francisco", "CA"),
        ];

        let groups = group_by_area(&venues, &HashMap::new());
        assert_eq!(groups.len(), 2);
        assert_eq!((groups[0].city.as_str(), groups[0].state.as_str()), ("San Francisco", "CA"));
        assert_eq!(groups[0].venues.len(), 2);
        assert_eq!(groups[1].state, "NY");

        let total: usize = groups.iter().map(|group| group.venues.len()).sum();
        assert_eq!(total, venues.len());
    }

    #[test]
    fn same_city_in_different_states_is_two_areas() {
        let venues = vec![
            venue("Blue Door", "Portland", "OR"),
            venue("Port City Music Hall", "Portland", "ME"),
        ];

        let groups = group_by_area(&venues, &HashMap::new());
        assert_eq!(groups.len(), 2);
        assert!(groups.iter().all(|group| group.venues.len() == 1));
    }

    #[test]
    fn area_matching_is_case_sensitive() {
        let venues = vec![
            venue("One", "San Francisco", "CA"),
            venue("Two", "san francisco", "CA"),
        ];

        let groups = group_by_area(&venues, &HashMap::new());
        assert_eq!(groups.len(), 2);
    }

    #[test]
    fn upcoming_counts_are_attached() {
        let hop = venue("The Musical Hop", "San Francisco", "CA");
        let mut counts = HashMap::new();
        counts.insert(
            hop.id,
            ShowCounts {
                num_past_shows: 4,
                num_upcoming_shows: 2,
            },
        );

        let groups = group_by_area(&[hop], &counts);
        assert_eq!(groups[0].venues[0].num_upcoming_shows, 2);
    }
}
