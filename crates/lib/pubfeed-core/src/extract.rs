//! Article body extraction from publication pages.
//!
//! Two policies live here and serve different operations:
//! - [`extract_article_text`] walks a prioritized selector list and returns
//!   the first substantial block, falling back to paragraph text.
//! - [`extract_document_text`] strips all markup, collapses whitespace, and
//!   caps the length, keeping the feed excerpt when the page is too thin.
//!
//! Neither policy ever fails; origin problems degrade to placeholders.

use std::sync::Arc;

use pubfeed_store::schema::truncate_chars;
use scraper::{ElementRef, Html, Selector};
use tracing::warn;

use crate::origin::Origin;

pub const FETCH_FAILED_PLACEHOLDER: &str =
    "Unable to fetch article content. Please visit the URL directly.";
pub const EMPTY_CONTENT_PLACEHOLDER: &str = "Content could not be extracted from this article.";

/// A selector match must exceed this many characters to be accepted.
pub const MIN_SUBSTANTIAL_CHARS: usize = 100;
/// Stripped page text must exceed this many characters to replace the excerpt.
pub const DOCUMENT_MIN_CHARS: usize = 500;
pub const DOCUMENT_MAX_CHARS: usize = 2000;

/// Content selectors, narrowest first.
pub const CONTENT_SELECTORS: &[&str] = &[
    ".markup",
    ".post-content",
    "article",
    ".available-content",
    "main",
];

const PARAGRAPH_SELECTOR: &str = "p";
const NON_CONTENT_ELEMENTS: &[&str] = &["script", "style", "noscript"];

/// Extracts the readable body of an article page.
///
/// Returns [`EMPTY_CONTENT_PLACEHOLDER`] when nothing usable is found.
#[must_use]
pub fn extract_article_text(html: &str) -> String {
    let document = Html::parse_document(html);

    let selected = CONTENT_SELECTORS
        .iter()
        .filter_map(|selector| Selector::parse(selector).ok())
        .map(|selector| joined_text(document.select(&selector)))
        .find(|text| text.chars().count() > MIN_SUBSTANTIAL_CHARS);
    if let Some(text) = selected {
        return text;
    }

    let paragraphs = Selector::parse(PARAGRAPH_SELECTOR)
        .map(|selector| joined_text(document.select(&selector)))
        .unwrap_or_default();
    if paragraphs.is_empty() {
        EMPTY_CONTENT_PLACEHOLDER.to_string()
    } else {
        paragraphs
    }
}

/// Produces a bounded plain-text rendition of a page for document fetches.
///
/// Falls back to `excerpt` when the stripped text is not longer than
/// [`DOCUMENT_MIN_CHARS`].
#[must_use]
pub fn extract_document_text(html: &str, excerpt: &str) -> String {
    let stripped = strip_markup(html);
    if stripped.chars().count() > DOCUMENT_MIN_CHARS {
        truncate_chars(&stripped, DOCUMENT_MAX_CHARS)
    } else {
        excerpt.to_string()
    }
}

/// Returns all text outside script and style blocks with whitespace collapsed.
fn strip_markup(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut raw = String::new();
    for node in document.root_element().descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|element| NON_CONTENT_ELEMENTS.contains(&element.name()))
        });
        if !hidden {
            raw.push_str(text);
            raw.push(' ');
        }
    }
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn joined_text<'a>(elements: impl Iterator<Item = ElementRef<'a>>) -> String {
    elements
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Fetches article pages through an [`Origin`] and applies an extraction policy.
#[derive(Clone)]
pub struct ContentExtractor {
    origin: Arc<dyn Origin>,
}

impl ContentExtractor {
    #[must_use]
    pub fn new(origin: Arc<dyn Origin>) -> Self {
        Self { origin }
    }

    /// Full-page body for `read_article`.
    pub async fn article_text(&self, url: &str) -> String {
        match self.origin.fetch_page(url).await {
            Ok(html) => extract_article_text(&html),
            Err(err) => {
                warn!(url, error = %err, "article page unavailable");
                FETCH_FAILED_PLACEHOLDER.to_string()
            }
        }
    }

    /// Bounded body for `fetch`; keeps `excerpt` when the page is unavailable.
    pub async fn document_text(&self, url: &str, excerpt: &str) -> String {
        match self.origin.fetch_page(url).await {
            Ok(html) => extract_document_text(&html, excerpt),
            Err(err) => {
                warn!(url, error = %err, "document page unavailable");
                excerpt.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pubfeed_store::schema::ELLIPSIS;

    fn long_text(word: &str) -> String {
        std::iter::repeat_n(word, 40).collect::<Vec<_>>().join(" ")
    }

    #[test]
    fn narrowest_substantial_selector_wins() {
        let markup = long_text("markup");
        let article = long_text("article");
        let html = format!(
            "<html><body><article><div class=\"markup\">{markup}</div><p>{article}</p></article></body></html>"
        );
        assert_eq!(extract_article_text(&html), markup);
    }

    #[test]
    fn short_candidates_are_skipped() {
        let body = long_text("main");
        let html = format!(
            "<html><body><div class=\"markup\">too short</div><main>{body}</main></body></html>"
        );
        assert_eq!(extract_article_text(&html), body);
    }

    #[test]
    fn paragraphs_are_the_last_resort() {
        let html = "<html><body><div><p>First</p><p> </p><p>Second</p></div></body></html>";
        assert_eq!(extract_article_text(html), "First\n\nSecond");
    }

    #[test]
    fn empty_pages_yield_placeholder() {
        assert_eq!(
            extract_article_text("<html><body></body></html>"),
            EMPTY_CONTENT_PLACEHOLDER
        );
    }

    #[test]
    fn document_text_drops_scripts_and_collapses_whitespace() {
        let body = "word ".repeat(150);
        let html = format!(
            "<html><head><style>.x {{ color: red; }}</style><script>var hidden = 1;</script></head>\
             <body><h1>Title</h1>\n\n<p>{body}</p></body></html>"
        );
        let text = extract_document_text(&html, "excerpt");
        assert!(text.starts_with("Title word word"));
        assert!(!text.contains("hidden"));
        assert!(!text.contains("color"));
        assert!(!text.contains("  "));
    }

    #[test]
    fn document_text_is_capped() {
        let body = "x ".repeat(3000);
        let html = format!("<html><body><p>{body}</p></body></html>");
        let text = extract_document_text(&html, "excerpt");
        assert!(text.ends_with(ELLIPSIS));
        assert_eq!(text.chars().count(), DOCUMENT_MAX_CHARS + ELLIPSIS.len());
    }

    #[test]
    fn thin_documents_keep_the_excerpt() {
        let html = "<html><body><p>Only a little text.</p></body></html>";
        assert_eq!(extract_document_text(html, "feed excerpt"), "feed excerpt");
    }
}
