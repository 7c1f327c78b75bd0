//! Utility functions shared by the fetch and render layers.
//!
//! - **Text**: HTML tag stripping, character/column-aware truncation and
//!   terminal sanitizing of untrusted API text
//! - **HTML**: article bodies converted to Markdown for the reader view
//! - **URLs**: base URL validation, endpoint path joining and image URL
//!   resolution
//!
//! # Examples
//!
//! ```
//! use newsdesk::util::{strip_tags, truncate_to_width, validate_base_url};
//!
//! let api = validate_base_url("https://news.example.com").unwrap();
//! let text = strip_tags("<p>Hello</p>");
//! let title = truncate_to_width("A very long headline", 12);
//! ```

mod html;
mod text;
mod urls;

pub use self::text::{
    collapse_whitespace, display_width, strip_control_chars, strip_tags, truncate_chars,
    truncate_to_width, ELLIPSIS,
};
pub use self::html::html_to_markdown;
pub use self::urls::{join_segments, resolve_image_url, validate_base_url, UrlError};
