//! Client for the remote news content API.
//!
//! The API is consumed, never implemented here. Response bodies are decoded
//! into strict serde schemas; a body without the expected `success`/`data`
//! markers is an [`ApiError::Schema`], not an empty result.
//!
//! - [`client`] - `reqwest`-based client with timeouts and a body size cap
//! - [`types`] - wire records, envelopes, paging scheme and error type

mod client;
mod types;

pub use client::{ApiClient, RecordPage};
pub use types::{ApiError, ArticleRecord, Paging, PublishedQuery, TotalHint};
