use futures::StreamExt;
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

use super::types::{
    unwrap_envelope, ApiError, ArticleRecord, CategoryEnvelope, ItemEnvelope, ListEnvelope,
    PublishedQuery, TotalHint, ViewEnvelope,
};
use crate::util::join_segments;

const MAX_RESPONSE_SIZE: usize = 10 * 1024 * 1024; // 10MB
const USER_AGENT: &str = concat!("newsdesk/", env!("CARGO_PKG_VERSION"));

/// One page of raw records plus the size information the API reported.
#[derive(Debug, Clone)]
pub struct RecordPage {
    pub records: Vec<ArticleRecord>,
    pub total: TotalHint,
}

/// Typed client for the news content API.
///
/// Every method issues exactly one request; nothing is retried. Cloning is
/// cheap (the underlying `reqwest::Client` is reference counted).
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
    timeout: Duration,
}

impl ApiClient {
    /// Build a client rooted at `base` with a per-request `timeout`.
    pub fn new(base: Url, timeout: Duration) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(ApiError::Network)?;
        Ok(Self::with_client(http, base, timeout))
    }

    /// Build a client around an existing `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base: Url, timeout: Duration) -> Self {
        Self {
            http,
            base,
            timeout,
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// `GET /news-app/published`, optionally filtered and paged.
    pub async fn published(&self, query: &PublishedQuery) -> Result<RecordPage, ApiError> {
        let mut params = Vec::new();
        if let Some(category) = &query.category {
            params.push(("category", category.clone()));
        }
        params.extend(query.paging.params());

        let url = self.endpoint(&["news-app", "published"], &params);
        self.fetch_list(url, query.paging.limit()).await
    }

    /// `GET /news-app/headlines?limit=<n>`
    pub async fn headlines(&self, limit: usize) -> Result<RecordPage, ApiError> {
        let url = self.endpoint(&["news-app", "headlines"], &[("limit", limit.to_string())]);
        self.fetch_list(url, Some(limit)).await
    }

    /// `GET /news-app-category`, returning names in API order.
    pub async fn categories(&self) -> Result<Vec<String>, ApiError> {
        let url = self.endpoint(&["news-app-category"], &[]);
        let envelope: CategoryEnvelope = self.get_json(url).await?;
        let data = unwrap_envelope(envelope.success, envelope.data)?;
        Ok(data.into_iter().map(|c| c.name).collect())
    }

    /// `GET /news-app/{id}`
    pub async fn article(&self, id: &str) -> Result<ArticleRecord, ApiError> {
        let url = self.endpoint(&["news-app", id], &[]);
        let envelope: ItemEnvelope = self.get_json(url).await?;
        unwrap_envelope(envelope.success, envelope.data)
    }

    /// `POST /news-app/news-view/{id}`, returning the authoritative count.
    pub async fn record_view(&self, id: &str) -> Result<u64, ApiError> {
        let url = self.endpoint(&["news-app", "news-view", id], &[]);
        tracing::debug!(url = %url, "POST view increment");
        let envelope: ViewEnvelope = self.send_json(self.http.post(url)).await?;
        unwrap_envelope(envelope.success, envelope.views)
    }

    fn endpoint(&self, segments: &[&str], params: &[(&str, String)]) -> Url {
        let mut url = join_segments(&self.base, segments);
        if !params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in params {
                pairs.append_pair(key, value);
            }
        }
        url
    }

    async fn fetch_list(&self, url: Url, limit: Option<usize>) -> Result<RecordPage, ApiError> {
        let envelope: ListEnvelope = self.get_json(url).await?;
        let total_field = envelope.total;
        let pages_field = envelope.total_pages;
        let records = unwrap_envelope(envelope.success, envelope.data)?;
        let total = TotalHint::from_envelope(total_field, pages_field, records.len(), limit);
        Ok(RecordPage { records, total })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        tracing::debug!(url = %url, "GET");
        self.send_json(self.http.get(url)).await
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = tokio::time::timeout(self.timeout, request.send())
            .await
            .map_err(|_| ApiError::Timeout)?
            .map_err(ApiError::Network)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::HttpStatus(status.as_u16()));
        }

        let bytes = tokio::time::timeout(
            self.timeout,
            read_limited_bytes(response, MAX_RESPONSE_SIZE),
        )
        .await
        .map_err(|_| ApiError::Timeout)??;

        serde_json::from_slice(&bytes).map_err(|e| ApiError::Schema(e.to_string()))
    }
}

async fn read_limited_bytes(response: reqwest::Response, limit: usize) -> Result<Vec<u8>, ApiError> {
    // Fast path: check Content-Length header
    if let Some(len) = response.content_length() {
        if len > limit as u64 {
            return Err(ApiError::ResponseTooLarge(limit));
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(ApiError::Network)?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(ApiError::ResponseTooLarge(limit));
        }
        bytes.extend_from_slice(&chunk);
    }

    Ok(bytes)
}
