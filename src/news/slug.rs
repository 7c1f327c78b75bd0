//! Title → URL slug mapping and slug → record resolution.
//!
//! Slugs are never stored: an article is found again by re-encoding each
//! candidate's title and comparing. Candidate lists are small, so a linear
//! scan is enough.
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SlugError {
    #[error("No article matches slug '{0}'")]
    NotFound(String),
    /// More than one title encodes to the same slug.
    #[error("Slug '{slug}' matches {matches} articles")]
    Ambiguous { slug: String, matches: usize },
}

/// Anything that carries a title a slug can be derived from.
pub trait Titled {
    fn title(&self) -> &str;
}

impl Titled for crate::api::ArticleRecord {
    fn title(&self) -> &str {
        &self.title
    }
}

impl Titled for super::DisplayArticle {
    fn title(&self) -> &str {
        &self.title
    }
}

/// Derives a URL slug from a title.
///
/// The title is lower-cased, every maximal run of characters outside
/// `[a-z0-9]` becomes a single `-`, and one leading and one trailing `-` are
/// dropped. Titles in non-Latin scripts have no `[a-z0-9]` characters and
/// encode to an empty string.
///
/// ```
/// use newsdesk::news::encode;
///
/// assert_eq!(encode("Hello, World!"), "hello-world");
/// assert_eq!(encode("  --Already-Slugged--  "), "already-slugged");
/// assert_eq!(encode(""), "");
/// ```
pub fn encode(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut in_gap = false;

    for c in title.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            slug.push(c);
            in_gap = false;
        } else if !in_gap {
            slug.push('-');
            in_gap = true;
        }
    }

    let slug = slug.strip_prefix('-').unwrap_or(&slug);
    let slug = slug.strip_suffix('-').unwrap_or(slug);
    slug.to_string()
}

/// Returns the first candidate whose title encodes to `slug`.
///
/// Colliding titles are not disambiguated: list order decides.
pub fn resolve<'a, T: Titled>(slug: &str, candidates: &'a [T]) -> Result<&'a T, SlugError> {
    candidates
        .iter()
        .find(|c| encode(c.title()) == slug)
        .ok_or_else(|| SlugError::NotFound(slug.to_string()))
}

/// Like [`resolve`], but fails with [`SlugError::Ambiguous`] when more than
/// one candidate matches.
pub fn resolve_unique<'a, T: Titled>(slug: &str, candidates: &'a [T]) -> Result<&'a T, SlugError> {
    let mut matches = candidates.iter().filter(|c| encode(c.title()) == slug);
    let first = matches
        .next()
        .ok_or_else(|| SlugError::NotFound(slug.to_string()))?;
    let extra = matches.count();
    if extra > 0 {
        return Err(SlugError::Ambiguous {
            slug: slug.to_string(),
            matches: extra + 1,
        });
    }
    Ok(first)
}

/// Number of candidates whose title encodes to `slug`.
pub fn count_matches<T: Titled>(slug: &str, candidates: &[T]) -> usize {
    candidates
        .iter()
        .filter(|c| encode(c.title()) == slug)
        .count()
}
