//! Listing, lookup and pagination logic behind every page.
//!
//! - [`slug`] - title → slug encoding and slug → article resolution
//! - [`article`] - normalization of API records into [`DisplayArticle`]s
//! - [`fetcher`] - listing, headline, category and article-detail fetches
//! - [`paginator`] - page windowing and the page-number bar
//! - [`store`] - articles keyed by id, with per-page shelves
//! - [`views`] - server-authoritative view counting and opening an article
//!
//! # Example
//!
//! ```ignore
//! use newsdesk::news::{ArticleListFetcher, CategoryFilter, ListRequest};
//!
//! let request = ListRequest::all().with_category(CategoryFilter::Exact("Politics".into()));
//! let list = fetcher.fetch(&request).await;
//! let page = list.paginator(15, 1);
//! let visible = page.slice(&list.articles);
//! ```

pub mod article;
pub mod fetcher;
pub mod paginator;
pub mod slug;
pub mod store;
pub mod views;

pub use article::{DisplayArticle, NormalizeOptions};
pub use fetcher::{
    landing_categories, ArticleDetail, ArticleList, ArticleListFetcher, CategoryFilter,
    CategoryList, HomeReport, LandingCategory, ListRequest, LookupError,
};
pub use paginator::{PageButton, PageChange, Paginator};
pub use slug::{encode, resolve, resolve_unique, SlugError};
pub use store::{NewsStore, Shelf, ViewIncrement};
pub use views::{open_article, ArticleKey, ViewCounter};
