use futures::future::join_all;
use thiserror::Error;

use super::article::{sort_newest_first, DisplayArticle, NormalizeOptions};
use super::paginator::Paginator;
use super::slug::{count_matches, encode, resolve, resolve_unique, SlugError};
use super::store::{NewsStore, Shelf};
use crate::api::{ApiClient, ApiError, ArticleRecord, Paging, PublishedQuery, TotalHint};

/// Errors from looking up a single article.
///
/// "Not found" is its own outcome and never stands in for a transport or
/// schema failure.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("Article not found: {0}")]
    NotFound(String),
    #[error("Slug '{slug}' matches {matches} articles")]
    Ambiguous { slug: String, matches: usize },
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl From<SlugError> for LookupError {
    fn from(err: SlugError) -> Self {
        match err {
            SlugError::NotFound(slug) => LookupError::NotFound(slug),
            SlugError::Ambiguous { slug, matches } => LookupError::Ambiguous { slug, matches },
        }
    }
}

/// Which articles of a listing belong to a category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryFilter {
    /// Case-sensitive equality with the record's category. Also sent to the
    /// API as `category=<name>`.
    Exact(String),
    /// `encode(record.category) == slug`, applied locally only.
    Slug(String),
}

impl CategoryFilter {
    pub fn matches(&self, category: &str) -> bool {
        match self {
            CategoryFilter::Exact(name) => category == name,
            CategoryFilter::Slug(slug) => encode(category) == *slug,
        }
    }

    fn api_param(&self) -> Option<String> {
        match self {
            CategoryFilter::Exact(name) => Some(name.clone()),
            CategoryFilter::Slug(_) => None,
        }
    }
}

/// A listing request: optional category filter plus a paging scheme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRequest {
    pub category: Option<CategoryFilter>,
    pub paging: Paging,
}

impl ListRequest {
    /// Every published article, unfiltered.
    pub fn all() -> Self {
        Self {
            category: None,
            paging: Paging::All,
        }
    }

    pub fn with_category(mut self, filter: CategoryFilter) -> Self {
        self.category = Some(filter);
        self
    }

    pub fn with_paging(mut self, paging: Paging) -> Self {
        self.paging = paging;
        self
    }
}

/// Result of a listing fetch.
///
/// A failed fetch is an empty list with `error` set, never a panic or an
/// early return, so every page can still render.
#[derive(Debug)]
pub struct ArticleList {
    pub articles: Vec<DisplayArticle>,
    pub total: TotalHint,
    pub error: Option<ApiError>,
    paging: Paging,
}

impl ArticleList {
    fn failed(error: ApiError, paging: Paging) -> Self {
        Self {
            articles: Vec::new(),
            total: TotalHint::Unknown { page_full: false },
            error: Some(error),
            paging,
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Pagination for this listing.
    ///
    /// An unpaged fetch is paged locally over the returned articles; a
    /// server-paged fetch uses the size the API reported.
    pub fn paginator(&self, page_size: usize, current_page: usize) -> Paginator {
        match self.paging {
            Paging::All => Paginator::new(self.articles.len(), page_size).at_page(current_page),
            paging => {
                let page_size = paging.limit().unwrap_or(page_size);
                let current = paging.page_number().unwrap_or(current_page);
                Paginator::with_page_count(self.total.total_pages(page_size, current), page_size)
                    .at_page(current)
            }
        }
    }
}

/// Category names from the API.
#[derive(Debug, Default)]
pub struct CategoryList {
    pub names: Vec<String>,
    pub error: Option<ApiError>,
}

/// An article plus the articles shown alongside it.
#[derive(Debug, Clone)]
pub struct ArticleDetail {
    pub article: DisplayArticle,
    pub related: Vec<DisplayArticle>,
}

/// A home-page section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LandingCategory {
    /// Heading as configured
    pub label: String,
    /// Category name exactly as the API spells it; used for the request,
    /// the client-side filter and the shelf key
    pub name: String,
}

/// What the home page loaded.
#[derive(Debug, Default)]
pub struct HomeReport {
    /// Landing categories that were fetched, in display order
    pub landing: Vec<LandingCategory>,
    /// Every category name the API knows
    pub categories: Vec<String>,
    /// Number of requests that failed
    pub failures: usize,
}

/// Fetches and normalizes articles from the content API.
#[derive(Debug, Clone)]
pub struct ArticleListFetcher {
    client: ApiClient,
    options: NormalizeOptions,
}

impl ArticleListFetcher {
    pub fn new(client: ApiClient, options: NormalizeOptions) -> Self {
        Self { client, options }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Fetches one listing: a single request, newest first.
    pub async fn fetch(&self, request: &ListRequest) -> ArticleList {
        let query = PublishedQuery {
            category: request.category.as_ref().and_then(CategoryFilter::api_param),
            paging: request.paging,
        };

        match self.client.published(&query).await {
            Ok(page) => ArticleList {
                articles: self.normalize(page.records, request.category.as_ref()),
                total: page.total,
                error: None,
                paging: request.paging,
            },
            Err(e) => {
                tracing::warn!(
                    category = ?request.category,
                    paging = ?request.paging,
                    error = %e,
                    "Failed to fetch articles"
                );
                ArticleList::failed(e, request.paging)
            }
        }
    }

    /// `limit` curated headlines, newest first.
    pub async fn fetch_headlines(&self, limit: usize) -> ArticleList {
        let paging = Paging::Page { page: 1, limit };
        match self.client.headlines(limit).await {
            Ok(page) => ArticleList {
                articles: self.normalize(page.records, None),
                total: page.total,
                error: None,
                paging,
            },
            Err(e) => {
                tracing::warn!(limit, error = %e, "Failed to fetch headlines");
                ArticleList::failed(e, paging)
            }
        }
    }

    pub async fn fetch_categories(&self) -> CategoryList {
        match self.client.categories().await {
            Ok(names) => CategoryList { names, error: None },
            Err(e) => {
                tracing::warn!(error = %e, "Failed to fetch categories");
                CategoryList {
                    names: Vec::new(),
                    error: Some(e),
                }
            }
        }
    }

    /// Finds an article by slug among all published articles.
    ///
    /// Colliding slugs resolve to the first article in API order; with
    /// `strict` they fail with [`LookupError::Ambiguous`] instead.
    pub async fn fetch_article_by_slug(
        &self,
        slug: &str,
        related_limit: usize,
        strict: bool,
    ) -> Result<ArticleDetail, LookupError> {
        let page = self.client.published(&PublishedQuery::all()).await?;

        let record = if strict {
            resolve_unique(slug, &page.records)?
        } else {
            let matches = count_matches(slug, &page.records);
            if matches > 1 {
                tracing::warn!(slug = %slug, matches, "Ambiguous slug, using first match");
            }
            resolve(slug, &page.records)?
        };

        let article = DisplayArticle::from_record(record.clone(), &self.options);
        let related = self.fetch_related(&article, related_limit).await;
        Ok(ArticleDetail { article, related })
    }

    /// `GET /news-app/{id}` plus related articles. A 404 is `NotFound`.
    pub async fn fetch_article_by_id(
        &self,
        id: &str,
        related_limit: usize,
    ) -> Result<ArticleDetail, LookupError> {
        let record = match self.client.article(id).await {
            Ok(record) => record,
            Err(ApiError::HttpStatus(404)) => return Err(LookupError::NotFound(id.to_string())),
            Err(e) => return Err(e.into()),
        };

        let article = DisplayArticle::from_record(record, &self.options);
        let related = self.fetch_related(&article, related_limit).await;
        Ok(ArticleDetail { article, related })
    }

    /// Up to `limit` other articles from the same category.
    pub async fn fetch_related(&self, article: &DisplayArticle, limit: usize) -> Vec<DisplayArticle> {
        if limit == 0 || article.category.is_empty() {
            return Vec::new();
        }

        // One extra in case the article itself comes back
        let request = ListRequest::all()
            .with_category(CategoryFilter::Exact(article.category.clone()))
            .with_paging(Paging::Page {
                page: 1,
                limit: limit + 1,
            });

        let mut related: Vec<_> = self
            .fetch(&request)
            .await
            .articles
            .into_iter()
            .filter(|a| a.id != article.id)
            .collect();
        related.truncate(limit);
        related
    }

    /// Loads the home page into `store`.
    ///
    /// Headlines and the category list are requested together; then every
    /// landing category is requested concurrently. Each result fills its own
    /// shelf.
    pub async fn load_home(
        &self,
        store: &mut NewsStore,
        headline_limit: usize,
        category_limit: usize,
        wanted: &[String],
    ) -> HomeReport {
        let (headlines, categories) =
            tokio::join!(self.fetch_headlines(headline_limit), self.fetch_categories());

        let mut failures = usize::from(headlines.is_error()) + usize::from(categories.error.is_some());
        store.insert_shelf(Shelf::Headlines, headlines.articles);

        let landing = landing_categories(&categories.names, wanted);
        let requests = landing.iter().map(|section| {
            let name = section.name.clone();
            let request = ListRequest::all()
                .with_category(CategoryFilter::Exact(name.clone()))
                .with_paging(Paging::Page {
                    page: 1,
                    limit: category_limit,
                });
            async move { (name, self.fetch(&request).await) }
        });

        for (name, list) in join_all(requests).await {
            if list.is_error() {
                failures += 1;
            }
            store.insert_shelf(Shelf::Category(name), list.articles);
        }

        tracing::info!(
            landing = landing.len(),
            articles = store.len(),
            failures,
            "Home page loaded"
        );

        HomeReport {
            landing,
            categories: categories.names,
            failures,
        }
    }

    fn normalize(
        &self,
        records: Vec<ArticleRecord>,
        filter: Option<&CategoryFilter>,
    ) -> Vec<DisplayArticle> {
        let received = records.len();
        let mut articles: Vec<DisplayArticle> = records
            .into_iter()
            .filter(|r| filter.map_or(true, |f| f.matches(&r.category)))
            .map(|r| DisplayArticle::from_record(r, &self.options))
            .collect();

        if articles.len() < received {
            tracing::debug!(
                received,
                kept = articles.len(),
                "Dropped articles outside the requested category"
            );
        }

        sort_newest_first(&mut articles);
        articles
    }
}

/// The configured landing categories the API actually offers.
///
/// Matching is case-insensitive. Sections keep the configured order and
/// label but carry the API's spelling, since records are filtered by exact
/// category name.
pub fn landing_categories(available: &[String], wanted: &[String]) -> Vec<LandingCategory> {
    wanted
        .iter()
        .filter_map(|w| {
            available
                .iter()
                .find(|a| a.eq_ignore_ascii_case(w))
                .map(|a| LandingCategory {
                    label: w.clone(),
                    name: a.clone(),
                })
        })
        .collect()
}
