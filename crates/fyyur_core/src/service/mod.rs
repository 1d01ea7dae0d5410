//! Use-case services consumed by the presentation layer.
//!
//! # Responsibility
//! - Compose repositories, partitioning, search and area aggregation into
//!   the list/detail/create/edit/delete/search use-cases.
//! - Keep callers decoupled from SQL and connection details.

pub mod artist_service;
pub mod show_service;
pub mod venue_service;
