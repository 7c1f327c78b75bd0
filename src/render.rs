//! Plain-text rendering of listing, category and article pages.
//!
//! Every function returns a `String` so pages can be asserted on in tests;
//! `main` only prints them. All API-provided text passes through
//! [`strip_control_chars`] before it reaches the terminal.
use std::fmt::Write;

use crate::api::ApiError;
use crate::news::{
    ArticleDetail, DisplayArticle, HomeReport, LookupError, NewsStore, PageButton, Paginator,
    Shelf,
};
use crate::util::{html_to_markdown, strip_control_chars, truncate_to_width};

/// Terminal width the layout is designed for.
pub const LINE_WIDTH: usize = 80;

/// Headlines listed under the lead story on the home page.
const HEADLINE_ROWS: usize = 7;

fn clean(s: &str) -> String {
    strip_control_chars(s).into_owned()
}

fn rule(out: &mut String, ch: char) {
    out.push_str(&ch.to_string().repeat(LINE_WIDTH));
    out.push('\n');
}

fn views_label(views: u64) -> String {
    if views == 1 {
        "1 view".to_string()
    } else {
        format!("{views} views")
    }
}

/// Two-line entry: title, then date/views/link, then the excerpt.
pub fn article_entry(article: &DisplayArticle) -> String {
    let title = clean(&article.title);
    let mut meta = Vec::new();
    if !article.category.is_empty() {
        meta.push(clean(&article.category));
    }
    if !article.date.is_empty() {
        meta.push(article.date.clone());
    }
    meta.push(views_label(article.views));
    meta.push(format!("/news/{}", article.slug));

    format!(
        "{}\n  {}\n  {}\n",
        truncate_to_width(&title, LINE_WIDTH),
        meta.join(" · "),
        truncate_to_width(&clean(&article.excerpt), LINE_WIDTH - 2),
    )
}

/// Previous/next controls around the page-number bar. Empty for a single
/// page.
pub fn pagination_bar(paginator: &Paginator) -> String {
    if paginator.total_pages() <= 1 {
        return String::new();
    }

    let mut parts = Vec::new();
    parts.push(if paginator.has_previous() {
        "< Previous".to_string()
    } else {
        "  --------".to_string()
    });
    for button in paginator.page_buttons() {
        parts.push(match button {
            PageButton::Page(n) if n == paginator.current_page() => format!("[{n}]"),
            PageButton::Page(n) => n.to_string(),
            PageButton::Ellipsis => "...".to_string(),
        });
    }
    parts.push(if paginator.has_next() {
        "Next >".to_string()
    } else {
        "------".to_string()
    });
    parts.join("  ")
}

/// A listing page: heading, the current slice, the pagination bar and the
/// item range.
///
/// A fetch error shows as a message above an empty list; it never replaces
/// the page.
pub fn listing_page(
    heading: &str,
    articles: &[DisplayArticle],
    paginator: &Paginator,
    error: Option<&ApiError>,
    empty_message: &str,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", clean(heading));
    rule(&mut out, '=');

    if let Some(e) = error {
        let _ = writeln!(out, "Could not load articles: {e}\n");
    }

    if articles.is_empty() {
        let _ = writeln!(out, "{empty_message}");
        return out;
    }

    for article in articles {
        out.push_str(&article_entry(article));
        out.push('\n');
    }

    let bar = pagination_bar(paginator);
    if !bar.is_empty() {
        let _ = writeln!(out, "{bar}");
    }
    if let Some(summary) = paginator.range_summary() {
        let _ = writeln!(out, "{summary}");
    }
    out
}

/// The home page: lead headline, the next headlines, then one section per
/// landing category.
pub fn home_page(store: &NewsStore, report: &HomeReport) -> String {
    let mut out = String::new();
    let headlines = store.shelf(&Shelf::Headlines);

    if let Some(lead) = headlines.first() {
        rule(&mut out, '=');
        let _ = writeln!(out, "{}", truncate_to_width(&clean(&lead.title), LINE_WIDTH));
        let _ = writeln!(out, "{} · /news/{}", lead.date, lead.slug);
        rule(&mut out, '=');
        out.push('\n');
    }

    let _ = writeln!(out, "Headlines");
    rule(&mut out, '-');
    let rest: Vec<_> = headlines.iter().skip(1).take(HEADLINE_ROWS).collect();
    if rest.is_empty() {
        let _ = writeln!(out, "No headlines available.");
    }
    for article in rest {
        out.push_str(&article_entry(article));
    }

    for section in &report.landing {
        let _ = writeln!(out, "\n{}", clean(&section.label));
        rule(&mut out, '-');
        let articles = store.shelf(&Shelf::Category(section.name.clone()));
        if articles.is_empty() {
            let _ = writeln!(out, "No articles in this category yet.");
        }
        for article in articles {
            out.push_str(&article_entry(article));
        }
    }

    if report.failures > 0 {
        let _ = writeln!(
            out,
            "\n({} section(s) could not be loaded)",
            report.failures
        );
    }
    out
}

/// A single article with its related articles.
pub fn article_page(detail: &ArticleDetail) -> String {
    let article = &detail.article;
    let mut out = String::new();

    if !article.category.is_empty() {
        let _ = writeln!(out, "[{}]", clean(&article.category));
    }
    let _ = writeln!(out, "{}", clean(&article.title));

    let mut byline = Vec::new();
    if !article.author.is_empty() {
        byline.push(format!("By {}", clean(&article.author)));
    }
    if !article.date.is_empty() {
        byline.push(article.date.clone());
    }
    byline.push(views_label(article.views));
    let _ = writeln!(out, "{}", byline.join(" • "));
    let _ = writeln!(out, "Image: {}", article.image);
    rule(&mut out, '-');

    let body = html_to_markdown(&article.body);
    if body.is_empty() {
        let _ = writeln!(out, "(This article has no text.)");
    } else {
        let _ = writeln!(out, "{}", clean(&body));
    }

    out.push('\n');
    let _ = writeln!(out, "Related Articles");
    rule(&mut out, '-');
    if detail.related.is_empty() {
        let _ = writeln!(out, "No related articles found.");
    }
    for related in &detail.related {
        let _ = writeln!(
            out,
            "{}\n  {} • {} · /news/{}",
            truncate_to_width(&clean(&related.title), LINE_WIDTH),
            clean(&related.category),
            related.date,
            related.slug
        );
    }
    out
}

pub fn not_found_page(what: &str) -> String {
    format!("Article not found: {}\n", clean(what))
}

/// Shown when an article exists but could not be loaded: a transport,
/// status or schema failure.
pub fn article_error_page(what: &str, error: &LookupError) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", clean(what));
    rule(&mut out, '-');
    let _ = writeln!(out, "Could not load this article: {error}");
    let _ = writeln!(out, "Please try again later.");
    out.push('\n');
    let _ = writeln!(out, "Related Articles");
    rule(&mut out, '-');
    let _ = writeln!(out, "No related articles found.");
    out
}

/// Category names with their URL slugs.
pub fn category_index(names: &[String], error: Option<&ApiError>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Categories");
    rule(&mut out, '=');
    if let Some(e) = error {
        let _ = writeln!(out, "Could not load categories: {e}");
    }
    for name in names {
        let _ = writeln!(
            out,
            "{:<30} /category/{}",
            clean(name),
            crate::news::encode(name)
        );
    }
    out
}
