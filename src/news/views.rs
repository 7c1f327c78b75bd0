use super::fetcher::{ArticleDetail, ArticleListFetcher, LookupError};
use super::store::{NewsStore, Shelf, ViewIncrement};
use crate::api::ApiClient;

/// Records article views against the API.
///
/// Counts are never bumped locally: only the number the server returns is
/// written, so concurrent readers elsewhere cannot make the local copy
/// drift.
#[derive(Debug, Clone)]
pub struct ViewCounter {
    client: ApiClient,
}

impl ViewCounter {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Sends one increment for `article_id`.
    ///
    /// Failures are logged and swallowed; the caller proceeds either way.
    pub async fn increment(&self, article_id: &str) -> Option<ViewIncrement> {
        match self.client.record_view(article_id).await {
            Ok(views) => {
                tracing::debug!(article_id = %article_id, views, "View recorded");
                Some(ViewIncrement {
                    article_id: article_id.to_string(),
                    views,
                })
            }
            Err(e) => {
                tracing::warn!(article_id = %article_id, error = %e, "Failed to record view");
                None
            }
        }
    }

    /// Sends one increment and merges the returned count into `store`.
    pub async fn record(&self, store: &mut NewsStore, article_id: &str) -> Option<ViewIncrement> {
        let increment = self.increment(article_id).await?;
        if !store.apply_view(&increment) {
            tracing::debug!(article_id = %article_id, "Viewed article not held in store");
        }
        Some(increment)
    }
}

/// How a reader asked for an article.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArticleKey {
    /// URL slug; with `strict`, colliding slugs are an error
    Slug { slug: String, strict: bool },
    Id(String),
}

/// Looks an article up, then records one view for it.
///
/// No view is sent for an article that could not be loaded. The article
/// and its related articles land on the primary and related shelves, and
/// the returned detail carries the server's new count when the view went
/// through.
pub async fn open_article(
    fetcher: &ArticleListFetcher,
    counter: &ViewCounter,
    store: &mut NewsStore,
    key: &ArticleKey,
    related_limit: usize,
) -> Result<ArticleDetail, LookupError> {
    let detail = match key {
        ArticleKey::Slug { slug, strict } => {
            fetcher
                .fetch_article_by_slug(slug, related_limit, *strict)
                .await?
        }
        ArticleKey::Id(id) => fetcher.fetch_article_by_id(id, related_limit).await?,
    };

    let article_id = detail.article.id.clone();
    store.insert_shelf(Shelf::Related, detail.related);
    store.insert_shelf(Shelf::Primary, vec![detail.article]);
    counter.record(store, &article_id).await;

    let article = store
        .get(&article_id)
        .cloned()
        .ok_or_else(|| LookupError::NotFound(article_id.clone()))?;
    let related = store
        .shelf(&Shelf::Related)
        .into_iter()
        .cloned()
        .collect();
    Ok(ArticleDetail { article, related })
}
