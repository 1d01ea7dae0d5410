//! Name search entry points.
//!
//! # Responsibility
//! - Case-insensitive substring search over venue and artist names.
//! - Return a `{count, results}` envelope computed from one result set.

pub mod name_search;
