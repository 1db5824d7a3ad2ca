pub const UNKNOWN_AUTHOR: &str = "Unknown Author";
pub const GENERAL_TOPIC: &str = "General";

pub const EXCERPT_MAX_CHARS: usize = 200;
pub const ELLIPSIS: &str = "...";

pub const TOOL_LIST_ARTICLES: &str = "list_articles";
pub const TOOL_LIST_AUTHORS: &str = "list_authors";
pub const TOOL_LIST_TOPICS: &str = "list_topics";
pub const TOOL_READ_ARTICLE: &str = "read_article";
pub const TOOL_SEARCH: &str = "search";
pub const TOOL_FETCH: &str = "fetch";
pub const TOOL_HEALTH: &str = "health";

pub const DEFAULT_LIST_LIMIT: usize = 10;
pub const SEARCH_RESULT_LIMIT: usize = 10;

#[must_use]
pub fn positional_id(position: usize) -> String {
    format!("article-{position}")
}

/// Derives a slug from the last non-empty path segment of `url`.
///
/// Query strings and fragments are ignored. Returns `None` when the URL has
/// no path or the segment has no alphanumeric content.
#[must_use]
pub fn article_slug(url: &str) -> Option<String> {
    let without_query = url.split(['?', '#']).next().unwrap_or(url);
    let without_scheme = without_query
        .split_once("://")
        .map_or(without_query, |(_, rest)| rest);

    let (_host, path) = without_scheme.split_once('/')?;
    let segment = path.split('/').rfind(|segment| !segment.is_empty())?;

    let slug: String = segment
        .chars()
        .filter(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_'))
        .collect::<String>()
        .to_ascii_lowercase();

    if slug.chars().any(|ch| ch.is_ascii_alphanumeric()) {
        Some(slug)
    } else {
        None
    }
}

/// Truncates `text` to [`EXCERPT_MAX_CHARS`] characters, appending
/// [`ELLIPSIS`] only when something was cut.
#[must_use]
pub fn make_excerpt(text: &str) -> String {
    truncate_chars(text, EXCERPT_MAX_CHARS)
}

#[must_use]
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => format!("{}{ELLIPSIS}", &text[..byte_index]),
        None => text.to_string(),
    }
}
