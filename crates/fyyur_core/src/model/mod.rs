//! Directory domain model: venues, artists and the shows linking them.
//!
//! # Invariants
//! - Every record is identified by a generated UUID that is never reused.
//! - Upcoming/past classification of shows is derived at query time and is
//!   never part of a stored record.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

pub mod artist;
pub mod show;
pub mod validation;
pub mod venue;

/// One of the three record kinds kept by the directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Venue,
    Artist,
    Show,
}

impl EntityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Venue => "venue",
            Self::Artist => "artist",
            Self::Show => "show",
        }
    }
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
