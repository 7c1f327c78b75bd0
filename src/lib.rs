//! Terminal front end for a news portal content API.
//!
//! [`api`] talks HTTP, [`news`] turns records into pages (slugs, listings,
//! pagination, view counts), [`render`] lays those pages out as text.

pub mod api;
pub mod config;
pub mod news;
pub mod render;
pub mod util;
