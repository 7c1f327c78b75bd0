use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Errors returned by the content API client.
///
/// Transport, status and schema problems are kept apart so callers can tell
/// "the API said nothing" from "the API said something we cannot read".
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network-level error (DNS, connection, TLS, etc.)
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// Request exceeded the configured timeout
    #[error("Request timed out")]
    Timeout,
    /// HTTP response with non-2xx status code
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    /// Response body exceeded the size limit
    #[error("Response too large (exceeds {0} bytes)")]
    ResponseTooLarge(usize),
    /// Body was not JSON or lacked the `success`/`data` markers
    #[error("Unexpected response shape: {0}")]
    Schema(String),
    /// The API answered `success: false`
    #[error("API reported failure")]
    Unsuccessful,
}

// ============================================================================
// Wire Records
// ============================================================================

/// A published article as served by the content API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleRecord {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "newsTitle")]
    pub title: String,
    /// HTML body
    #[serde(rename = "newsBody", default, deserialize_with = "null_as_default")]
    pub body: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub category: String,
    /// Absolute URL or site-relative path
    #[serde(rename = "newsImage", default)]
    pub image: Option<String>,
    /// ISO-8601 creation time
    #[serde(rename = "createdAt", default, deserialize_with = "null_as_default")]
    pub created_at: String,
    #[serde(rename = "createdBy", default, deserialize_with = "null_as_default")]
    pub author: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub views: u64,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// `GET /news-app/published` and `GET /news-app/headlines` body.
#[derive(Debug, Deserialize)]
pub(crate) struct ListEnvelope {
    pub success: Option<bool>,
    pub data: Option<Vec<ArticleRecord>>,
    pub total: Option<u64>,
    #[serde(rename = "totalPages")]
    pub total_pages: Option<u64>,
}

/// `GET /news-app/{id}` body.
#[derive(Debug, Deserialize)]
pub(crate) struct ItemEnvelope {
    pub success: Option<bool>,
    pub data: Option<ArticleRecord>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CategoryRecord {
    #[serde(rename = "categoryName")]
    pub name: String,
}

/// `GET /news-app-category` body.
#[derive(Debug, Deserialize)]
pub(crate) struct CategoryEnvelope {
    pub success: Option<bool>,
    pub data: Option<Vec<CategoryRecord>>,
}

/// `POST /news-app/news-view/{id}` body.
#[derive(Debug, Deserialize)]
pub(crate) struct ViewEnvelope {
    pub success: Option<bool>,
    pub views: Option<u64>,
}

/// Checks the `success` marker and unwraps the payload.
pub(crate) fn unwrap_envelope<T>(success: Option<bool>, data: Option<T>) -> Result<T, ApiError> {
    match (success, data) {
        (None, _) => Err(ApiError::Schema("missing `success` field".to_string())),
        (Some(false), _) => Err(ApiError::Unsuccessful),
        (Some(true), None) => Err(ApiError::Schema("missing `data` field".to_string())),
        (Some(true), Some(data)) => Ok(data),
    }
}

// ============================================================================
// Query Scheme
// ============================================================================

/// How a listing request is paged on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Paging {
    /// No paging parameters: the API returns every match.
    All,
    /// `page=<n>&limit=<n>`, pages are 1-based.
    Page { page: usize, limit: usize },
    /// `skip=<n>&limit=<n>`
    Skip { skip: usize, limit: usize },
}

impl Paging {
    pub fn limit(&self) -> Option<usize> {
        match self {
            Paging::All => None,
            Paging::Page { limit, .. } | Paging::Skip { limit, .. } => Some(*limit),
        }
    }

    /// 1-based page this request addresses, when it addresses one.
    pub fn page_number(&self) -> Option<usize> {
        match self {
            Paging::All => None,
            Paging::Page { page, .. } => Some(*page),
            Paging::Skip { skip, limit } if *limit > 0 => Some(skip / limit + 1),
            Paging::Skip { .. } => None,
        }
    }

    pub(crate) fn params(&self) -> Vec<(&'static str, String)> {
        match self {
            Paging::All => Vec::new(),
            Paging::Page { page, limit } => {
                vec![("page", page.to_string()), ("limit", limit.to_string())]
            }
            Paging::Skip { skip, limit } => {
                vec![("skip", skip.to_string()), ("limit", limit.to_string())]
            }
        }
    }
}

/// Parameters for `GET /news-app/published`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedQuery {
    pub category: Option<String>,
    pub paging: Paging,
}

impl PublishedQuery {
    pub fn all() -> Self {
        Self {
            category: None,
            paging: Paging::All,
        }
    }
}

// ============================================================================
// Result Size
// ============================================================================

/// How the API reported the size of a listing.
///
/// Responses carry `total` (items), `totalPages`, or neither, depending on
/// the endpoint; this keeps the three cases explicit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TotalHint {
    /// `total`: number of matching items.
    Items(u64),
    /// `totalPages`: number of pages at the requested limit.
    Pages(u64),
    /// Neither field was present.
    Unknown { page_full: bool },
}

impl TotalHint {
    pub(crate) fn from_envelope(
        total: Option<u64>,
        total_pages: Option<u64>,
        returned: usize,
        limit: Option<usize>,
    ) -> Self {
        match (total, total_pages) {
            (Some(items), _) => TotalHint::Items(items),
            (None, Some(pages)) => TotalHint::Pages(pages),
            (None, None) => TotalHint::Unknown {
                page_full: limit.is_some_and(|l| l > 0 && returned >= l),
            },
        }
    }

    /// Resolves the hint to a page count for `page_size`.
    ///
    /// Without a reported total, a full page means at least one more page
    /// may exist after `current_page`.
    pub fn total_pages(&self, page_size: usize, current_page: usize) -> usize {
        let page_size = page_size.max(1) as u64;
        let pages = match *self {
            TotalHint::Items(items) => items.div_ceil(page_size),
            TotalHint::Pages(pages) => pages,
            TotalHint::Unknown { page_full: true } => (current_page as u64).saturating_add(1),
            TotalHint::Unknown { page_full: false } => current_page as u64,
        };
        usize::try_from(pages.max(1)).unwrap_or(usize::MAX)
    }
}
