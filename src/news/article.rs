use chrono::{DateTime, NaiveDate, Utc};
use std::cmp::Ordering;

use super::slug::encode;
use crate::api::ArticleRecord;
use crate::config::Config;
use crate::util::{collapse_whitespace, resolve_image_url, strip_tags, truncate_chars, ELLIPSIS};

/// Shown when an article has no body text to excerpt.
pub const NO_EXCERPT: &str = "No excerpt available.";

/// A display-ready projection of an [`ArticleRecord`].
///
/// Built fresh on every fetch and never persisted. `slug` is always
/// `encode(title)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayArticle {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub category: String,
    /// Absolute image URL
    pub image: String,
    pub excerpt: String,
    /// "Month D, YYYY", empty when the timestamp is unreadable
    pub date: String,
    /// Timestamp exactly as the API sent it
    pub raw_date: String,
    pub published: Option<DateTime<Utc>>,
    pub author: String,
    pub views: u64,
    /// Raw HTML body, kept for the article page
    pub body: String,
}

/// Knobs for turning records into display articles.
#[derive(Debug, Clone)]
pub struct NormalizeOptions {
    pub excerpt_chars: usize,
    pub site_base_url: String,
    pub default_image: String,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for NormalizeOptions {
    fn from(config: &Config) -> Self {
        Self {
            excerpt_chars: config.excerpt_chars,
            site_base_url: config.site_base_url.clone(),
            default_image: config.default_image.clone(),
        }
    }
}

impl DisplayArticle {
    pub fn from_record(record: ArticleRecord, options: &NormalizeOptions) -> Self {
        let published = parse_timestamp(&record.created_at);
        Self {
            slug: encode(&record.title),
            image: resolve_image_url(
                &options.site_base_url,
                record.image.as_deref(),
                &options.default_image,
            ),
            excerpt: excerpt(&record.body, options.excerpt_chars),
            date: published.map(format_date).unwrap_or_default(),
            published,
            id: record.id,
            title: record.title,
            category: record.category,
            raw_date: record.created_at,
            author: record.author,
            views: record.views,
            body: record.body,
        }
    }
}

/// Builds the plain-text teaser for an HTML body.
///
/// Tags are replaced by spaces, whitespace is collapsed, the text is cut to
/// `max_chars` characters and `"..."` is always appended.
pub fn excerpt(body: &str, max_chars: usize) -> String {
    let text = collapse_whitespace(&strip_tags(body));
    if text.is_empty() {
        return NO_EXCERPT.to_string();
    }
    let cut = truncate_chars(&text, max_chars).trim_end();
    format!("{cut}{ELLIPSIS}")
}

/// Parses an ISO-8601 timestamp; a bare `YYYY-MM-DD` is read as midnight UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Long US-style date, e.g. "March 1, 2024".
pub fn format_date(dt: DateTime<Utc>) -> String {
    dt.format("%B %-d, %Y").to_string()
}

/// Sorts newest first.
///
/// The sort is stable, so equal timestamps keep API order. Articles whose
/// timestamp cannot be read go last, also in API order.
pub fn sort_newest_first(articles: &mut [DisplayArticle]) {
    articles.sort_by(|a, b| match (a.published, b.published) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}
