use htmd::HtmlToMarkdown;

use super::text::{collapse_whitespace, strip_tags};

/// Elements whose content never belongs in the reader view.
const SKIPPED_TAGS: &[&str] = &[
    "script", "style", "noscript", "iframe", "svg", "nav", "footer", "aside", "form",
];

/// Converts an article's HTML body into Markdown for the reader view.
///
/// Entities are decoded and script/style content is dropped. If the body
/// cannot be converted, the tag-stripped text is returned instead.
pub fn html_to_markdown(html: &str) -> String {
    let converter = HtmlToMarkdown::builder()
        .skip_tags(SKIPPED_TAGS.to_vec())
        .build();

    match converter.convert(html) {
        Ok(markdown) => markdown.trim().to_string(),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to convert article body, showing plain text");
            collapse_whitespace(&strip_tags(html))
        }
    }
}
