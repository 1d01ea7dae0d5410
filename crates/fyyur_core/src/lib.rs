//! Core domain logic for the Fyyur booking directory.
//! This crate is the single source of truth for business invariants.

pub mod area;
pub mod config;
pub mod db;
pub mod form;
pub mod logging;
pub mod model;
pub mod partition;
pub mod repo;
pub mod search;
pub mod service;

pub use area::{AreaGroup, AreaVenue};
pub use config::AppConfig;
pub use db::{open_db, open_db_in_memory, with_connection, DbError, DbResult};
pub use form::{decode_artist, decode_show, decode_venue, FormData};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::artist::{Artist, ArtistId, ArtistProfile};
pub use model::show::{
    ArtistShow, Show, ShowCounts, ShowDraft, ShowId, ShowListing, VenueShow,
};
pub use model::validation::ValidationError;
pub use model::venue::{Venue, VenueId, VenueProfile};
pub use model::EntityKind;
pub use partition::{is_upcoming, partition_shows, ShowPartition};
pub use repo::artist_repo::{ArtistRepository, SqliteArtistRepository};
pub use repo::show_repo::{ShowRepository, SqliteShowRepository};
pub use repo::venue_repo::{SqliteVenueRepository, VenueRepository};
pub use repo::{RepoError, RepoResult};
pub use search::name_search::{
    search_directory, DirectoryMatches, SearchHit, SearchKind, SearchMatches, SearchQuery,
};
pub use service::artist_service::{ArtistDetail, ArtistService};
pub use service::show_service::ShowService;
pub use service::venue_service::{VenueDetail, VenueService};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
