//! End-to-end tests for listing, pagination, article lookup and view
//! counting against a mock content API.

use std::time::Duration;

use newsdesk::api::{ApiClient, Paging};
use newsdesk::news::{
    encode, open_article, ArticleKey, ArticleListFetcher, CategoryFilter, ListRequest,
    LookupError, NewsStore, NormalizeOptions, Shelf, ViewCounter,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use url::Url;
use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> ApiClient {
    ApiClient::new(Url::parse(&server.uri()).unwrap(), Duration::from_secs(5)).unwrap()
}

fn fetcher_for(server: &MockServer) -> ArticleListFetcher {
    ArticleListFetcher::new(client_for(server), NormalizeOptions::default())
}

/// Record `id` published on March `day`, 2024.
fn record(id: &str, title: &str, category: &str, day: u32) -> serde_json::Value {
    json!({
        "_id": id,
        "newsTitle": title,
        "newsBody": format!("<p>{title} body.</p>"),
        "category": category,
        "createdAt": format!("2024-03-{day:02}T08:00:00Z"),
        "createdBy": "Desk",
        "views": 1
    })
}

/// Twenty Politics stories in shuffled date order plus one stray Sport story.
fn politics_records() -> Vec<serde_json::Value> {
    let mut records: Vec<_> = (1..=20)
        .map(|i| {
            let day = (i * 7) % 20 + 1;
            record(&format!("p{i}"), &format!("Politics Story {i}"), "Politics", day)
        })
        .collect();
    records.push(record("s1", "Stray Sport Story", "Sport", 28));
    records
}

fn ok_list(data: Vec<serde_json::Value>) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "success": true, "data": data }))
}

// ============================================================================
// Category listing
// ============================================================================

#[tokio::test]
async fn test_category_listing_pages_locally() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/news-app/published"))
        .and(query_param("category", "Politics"))
        .and(query_param_is_missing("page"))
        .respond_with(ok_list(politics_records()))
        .expect(1)
        .mount(&server)
        .await;

    let list = fetcher_for(&server)
        .fetch(&ListRequest::all().with_category(CategoryFilter::Exact("Politics".into())))
        .await;
    assert!(!list.is_error());
    assert_eq!(list.articles.len(), 20, "stray category is dropped");

    // Newest first
    for pair in list.articles.windows(2) {
        assert!(pair[0].published >= pair[1].published);
    }
    assert!(list.articles.iter().all(|a| !a.slug.is_empty()));
    assert!(list.articles.iter().all(|a| a.category == "Politics"));

    let first = list.paginator(15, 1);
    assert_eq!(first.total_pages(), 2);
    assert_eq!(first.slice(&list.articles).len(), 15);

    let second = list.paginator(15, 2);
    assert_eq!(second.slice(&list.articles).len(), 5);
    assert_eq!(
        second.range_summary().as_deref(),
        Some("Showing 16-20 of 20 articles")
    );
}

#[tokio::test]
async fn test_category_listing_server_paged() {
    let server = MockServer::start().await;
    let records = politics_records();
    Mock::given(method("GET"))
        .and(path("/news-app/published"))
        .and(query_param("category", "Politics"))
        .and(query_param("page", "1"))
        .and(query_param("limit", "15"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": records[..15],
            "total": 20
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/news-app/published"))
        .and(query_param("category", "Politics"))
        .and(query_param("page", "2"))
        .and(query_param("limit", "15"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": records[15..20],
            "total": 20
        })))
        .mount(&server)
        .await;

    let fetcher = fetcher_for(&server);
    let request = ListRequest::all().with_category(CategoryFilter::Exact("Politics".into()));

    let page1 = fetcher
        .fetch(&request.clone().with_paging(Paging::Page { page: 1, limit: 15 }))
        .await;
    assert_eq!(page1.articles.len(), 15);
    let paginator = page1.paginator(15, 1);
    assert_eq!(paginator.total_pages(), 2);
    assert!(paginator.has_next());

    let page2 = fetcher
        .fetch(&request.with_paging(Paging::Page { page: 2, limit: 15 }))
        .await;
    assert_eq!(page2.articles.len(), 5);
    assert!(!page2.paginator(15, 2).has_next());
}

#[tokio::test]
async fn test_category_by_slug_filters_locally() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/news-app/published"))
        .and(query_param_is_missing("category"))
        .respond_with(ok_list(vec![
            record("a1", "Gallery Opens", "Arts & Culture", 3),
            record("a2", "Derby Result", "Sport", 4),
        ]))
        .mount(&server)
        .await;

    let list = fetcher_for(&server)
        .fetch(&ListRequest::all().with_category(CategoryFilter::Slug("arts-culture".into())))
        .await;
    assert_eq!(list.articles.len(), 1);
    assert_eq!(list.articles[0].category, "Arts & Culture");
}

#[tokio::test]
async fn test_failed_listing_is_empty_with_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/news-app/published"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let list = fetcher_for(&server).fetch(&ListRequest::all()).await;
    assert!(list.is_error());
    assert!(list.articles.is_empty());
    assert_eq!(list.paginator(15, 1).total_pages(), 1);
}

// ============================================================================
// View counting
// ============================================================================

#[tokio::test]
async fn test_view_count_reaches_every_shelf() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/news-app/headlines"))
        .respond_with(ok_list(vec![record("a1", "Lead", "Politics", 5)]))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/news-app/published"))
        .and(query_param("category", "Politics"))
        .respond_with(ok_list(vec![
            record("a1", "Lead", "Politics", 5),
            record("a2", "Second", "Politics", 4),
        ]))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/news-app/news-view/a1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "success": true, "views": 42 })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = fetcher_for(&server);
    let mut store = NewsStore::new();
    store.insert_shelf(Shelf::Headlines, fetcher.fetch_headlines(7).await.articles);
    let politics = fetcher
        .fetch(&ListRequest::all().with_category(CategoryFilter::Exact("Politics".into())))
        .await;
    store.insert_shelf(Shelf::Category("Politics".into()), politics.articles);

    let counter = ViewCounter::new(client_for(&server));
    let increment = counter.record(&mut store, "a1").await.unwrap();
    assert_eq!(increment.views, 42);

    assert_eq!(store.shelf(&Shelf::Headlines)[0].views, 42);
    let section = store.shelf(&Shelf::Category("Politics".into()));
    assert_eq!(section[0].id, "a1");
    assert_eq!(section[0].views, 42);
    assert_eq!(section[1].views, 1);
}

#[tokio::test]
async fn test_failed_view_leaves_store_unchanged() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/news-app/news-view/a1"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/news-app/headlines"))
        .respond_with(ok_list(vec![record("a1", "Lead", "Politics", 5)]))
        .mount(&server)
        .await;

    let mut store = NewsStore::new();
    store.insert_shelf(
        Shelf::Headlines,
        fetcher_for(&server).fetch_headlines(7).await.articles,
    );

    let counter = ViewCounter::new(client_for(&server));
    assert!(counter.record(&mut store, "a1").await.is_none());
    assert_eq!(store.get("a1").map(|a| a.views), Some(1));
}

#[tokio::test]
async fn test_unsuccessful_view_is_not_applied() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/news-app/news-view/a1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "success": false, "views": 99 })),
        )
        .mount(&server)
        .await;

    let counter = ViewCounter::new(client_for(&server));
    assert!(counter.increment("a1").await.is_none());
}

// ============================================================================
// Article lookup
// ============================================================================

async fn mount_article_fixtures(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/news-app/published"))
        .and(query_param_is_missing("category"))
        .respond_with(ok_list(vec![
            record("a1", "Senate Passes Budget", "Politics", 10),
            record("a2", "Derby Result", "Sport", 9),
            record("a3", "Senate passes budget!", "Politics", 8),
        ]))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/news-app/published"))
        .and(query_param("category", "Politics"))
        .and(query_param("page", "1"))
        .and(query_param("limit", "4"))
        .respond_with(ok_list(vec![
            record("a1", "Senate Passes Budget", "Politics", 10),
            record("a4", "Governor Resigns", "Politics", 7),
            record("a5", "Assembly Recess", "Politics", 6),
            record("a6", "Poll Results", "Politics", 5),
        ]))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_article_by_slug_with_related() {
    let server = MockServer::start().await;
    mount_article_fixtures(&server).await;

    let detail = fetcher_for(&server)
        .fetch_article_by_slug("senate-passes-budget", 3, false)
        .await
        .unwrap();

    // First match in API order wins
    assert_eq!(detail.article.id, "a1");
    assert_eq!(detail.article.slug, encode("Senate Passes Budget"));

    let related: Vec<_> = detail.related.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(related, vec!["a4", "a5", "a6"]);
}

#[tokio::test]
async fn test_article_by_slug_strict_rejects_collisions() {
    let server = MockServer::start().await;
    mount_article_fixtures(&server).await;

    let err = fetcher_for(&server)
        .fetch_article_by_slug("senate-passes-budget", 3, true)
        .await
        .unwrap_err();
    assert!(
        matches!(err, LookupError::Ambiguous { matches: 2, .. }),
        "got {err:?}"
    );
}

#[tokio::test]
async fn test_unknown_slug_is_not_found() {
    let server = MockServer::start().await;
    mount_article_fixtures(&server).await;

    let err = fetcher_for(&server)
        .fetch_article_by_slug("no-such-story", 3, false)
        .await
        .unwrap_err();
    assert!(matches!(err, LookupError::NotFound(_)), "got {err:?}");
}

#[tokio::test]
async fn test_lookup_transport_failure_is_not_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/news-app/published"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = fetcher_for(&server)
        .fetch_article_by_slug("senate-passes-budget", 3, false)
        .await
        .unwrap_err();
    assert!(matches!(err, LookupError::Api(_)), "got {err:?}");
}

#[tokio::test]
async fn test_article_by_id_404_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/news-app/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = fetcher_for(&server)
        .fetch_article_by_id("missing", 3)
        .await
        .unwrap_err();
    assert!(matches!(err, LookupError::NotFound(_)), "got {err:?}");
}

#[tokio::test]
async fn test_open_article_by_id_records_one_view() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/news-app/a1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": record("a1", "Senate Passes Budget", "Politics", 10)
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/news-app/published"))
        .and(query_param("category", "Politics"))
        .respond_with(ok_list(vec![
            record("a1", "Senate Passes Budget", "Politics", 10),
            record("a4", "Governor Resigns", "Politics", 7),
        ]))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/news-app/news-view/a1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "success": true, "views": 42 })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut store = NewsStore::new();
    let detail = open_article(
        &fetcher_for(&server),
        &ViewCounter::new(client_for(&server)),
        &mut store,
        &ArticleKey::Id("a1".into()),
        3,
    )
    .await
    .unwrap();

    assert_eq!(detail.article.views, 42);
    assert_eq!(store.shelf(&Shelf::Primary)[0].views, 42);
    let related: Vec<_> = detail.related.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(related, vec!["a4"]);
}

#[tokio::test]
async fn test_open_missing_article_records_no_view() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/news-app/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/news-app/news-view/missing"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "success": true, "views": 1 })),
        )
        .expect(0)
        .mount(&server)
        .await;

    let mut store = NewsStore::new();
    let err = open_article(
        &fetcher_for(&server),
        &ViewCounter::new(client_for(&server)),
        &mut store,
        &ArticleKey::Id("missing".into()),
        3,
    )
    .await
    .unwrap_err();

    assert!(matches!(err, LookupError::NotFound(_)), "got {err:?}");
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_open_article_transport_failure_records_no_view() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/news-app/published"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "success": true, "views": 1 })),
        )
        .expect(0)
        .mount(&server)
        .await;

    let mut store = NewsStore::new();
    let err = open_article(
        &fetcher_for(&server),
        &ViewCounter::new(client_for(&server)),
        &mut store,
        &ArticleKey::Slug {
            slug: "senate-passes-budget".into(),
            strict: false,
        },
        3,
    )
    .await
    .unwrap_err();

    assert!(matches!(err, LookupError::Api(_)), "got {err:?}");
}

// ============================================================================
// Home page
// ============================================================================

#[tokio::test]
async fn test_load_home_fills_shelves_and_counts_failures() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/news-app/headlines"))
        .and(query_param("limit", "7"))
        .respond_with(ok_list(vec![
            record("h1", "Older Headline", "News", 1),
            record("h2", "Newer Headline", "News", 2),
        ]))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/news-app-category"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [
                { "categoryName": "Sport" },
                { "categoryName": "politics" },
                { "categoryName": "Tech" }
            ]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/news-app/published"))
        .and(query_param("category", "politics"))
        .and(query_param("limit", "7"))
        .respond_with(ok_list(vec![
            record("p1", "Politics One", "politics", 3),
            record("p2", "Politics Two", "politics", 2),
        ]))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/news-app/published"))
        .and(query_param("category", "Sport"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let wanted: Vec<String> = ["News", "Politics", "Sport"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let mut store = NewsStore::new();
    let report = fetcher_for(&server)
        .load_home(&mut store, 7, 7, &wanted)
        .await;

    let labels: Vec<_> = report.landing.iter().map(|l| l.label.as_str()).collect();
    let names: Vec<_> = report.landing.iter().map(|l| l.name.as_str()).collect();
    assert_eq!(labels, vec!["Politics", "Sport"]);
    assert_eq!(names, vec!["politics", "Sport"]);
    assert_eq!(report.categories.len(), 3);
    assert_eq!(report.failures, 1);

    let headlines: Vec<_> = store
        .shelf(&Shelf::Headlines)
        .iter()
        .map(|a| a.id.as_str())
        .collect();
    assert_eq!(headlines, vec!["h2", "h1"]);
    // Records spelled the API's way survive the exact-name filter
    assert_eq!(store.shelf(&Shelf::Category("politics".into())).len(), 2);
    assert!(store.shelf(&Shelf::Category("Sport".into())).is_empty());
}

#[tokio::test]
async fn test_load_home_lowercase_api_category_keeps_articles() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/news-app/headlines"))
        .respond_with(ok_list(Vec::new()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/news-app-category"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [{ "categoryName": "sport" }]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/news-app/published"))
        .and(query_param("category", "sport"))
        .respond_with(ok_list(vec![
            record("s1", "Derby Result", "sport", 4),
            record("s2", "Transfer News", "sport", 3),
        ]))
        .expect(1)
        .mount(&server)
        .await;

    let mut store = NewsStore::new();
    let report = fetcher_for(&server)
        .load_home(&mut store, 7, 7, &["Sport".to_string()])
        .await;

    assert_eq!(report.failures, 0);
    assert_eq!(report.landing[0].label, "Sport");
    let ids: Vec<_> = store
        .shelf(&Shelf::Category(report.landing[0].name.clone()))
        .iter()
        .map(|a| a.id.as_str())
        .collect();
    assert_eq!(ids, vec!["s1", "s2"]);
}
