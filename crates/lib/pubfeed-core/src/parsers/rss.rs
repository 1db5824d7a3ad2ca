use std::collections::HashSet;
use std::{error::Error, fmt};

use pubfeed_store::models::Article;
use pubfeed_store::schema::{UNKNOWN_AUTHOR, article_slug, make_excerpt, positional_id};
use roxmltree::{Document, Node};

use super::topics::classify_topics;

/// Entities XML defines itself; everything else named is an HTML leak.
const XML_ENTITIES: &[&str] = &["amp", "lt", "gt", "quot", "apos"];

const CDATA_OPEN: &str = "<![CDATA[";
const CDATA_CLOSE: &str = "]]>";

/// Error type for feed parse failures.
#[derive(Debug)]
pub struct FeedParseError {
    message: String,
}

impl FeedParseError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for FeedParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "feed parse error: {}", self.message)
    }
}

impl Error for FeedParseError {}

impl From<roxmltree::Error> for FeedParseError {
    fn from(err: roxmltree::Error) -> Self {
        Self::new(err.to_string())
    }
}

/// Parser for RSS 2.0 feeds.
pub struct RssFeedParser;

impl RssFeedParser {
    /// Parses an RSS document into catalog articles in document order.
    ///
    /// Items without a title or link are skipped. A feed without items yields
    /// an empty list.
    ///
    /// # Errors
    /// Returns `FeedParseError` if the document is not well-formed XML.
    pub fn parse(xml: &str) -> Result<Vec<Article>, FeedParseError> {
        let cleaned = scrub_html_entities(xml);
        let doc = Document::parse(&cleaned)?;

        let mut seen_ids = HashSet::new();
        let mut articles = Vec::new();
        for (index, item) in doc
            .descendants()
            .filter(|node| node.has_tag_name("item"))
            .enumerate()
        {
            if let Some(article) = parse_item(item, index + 1, &mut seen_ids) {
                articles.push(article);
            }
        }
        Ok(articles)
    }
}

fn parse_item(item: Node<'_, '_>, position: usize, seen_ids: &mut HashSet<String>) -> Option<Article> {
    let title = child_text(item, "title")?;
    let url = child_text(item, "link")?;
    let published_date = child_text(item, "pubDate").unwrap_or_default();
    let description = child_text(item, "description").unwrap_or_default();
    let author = child_text(item, "creator")
        .or_else(|| child_text(item, "author"))
        .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string());

    let categories: Vec<String> = item
        .children()
        .filter(|child| child.is_element() && child.has_tag_name("category"))
        .map(node_text)
        .filter(|category| !category.is_empty())
        .collect();
    let topics = if categories.is_empty() {
        classify_topics(&format!("{title} {description}"))
    } else {
        categories
    };

    let id = assign_id(&url, position, seen_ids);
    Some(Article {
        id,
        title,
        author,
        published_date,
        excerpt: make_excerpt(&description),
        url,
        topics,
    })
}

/// Prefers the URL slug; repeats and slug-less URLs fall back to position.
fn assign_id(url: &str, position: usize, seen_ids: &mut HashSet<String>) -> String {
    let mut id = match article_slug(url) {
        Some(slug) if !seen_ids.contains(&slug) => slug,
        Some(slug) => format!("{slug}-{position}"),
        None => positional_id(position),
    };
    if seen_ids.contains(&id) {
        id = format!("{}-{position}", positional_id(position));
    }
    seen_ids.insert(id.clone());
    id
}

/// Returns the trimmed text of the first non-empty child element named `name`.
fn child_text(node: Node<'_, '_>, name: &str) -> Option<String> {
    node.children()
        .filter(|child| child.is_element() && child.has_tag_name(name))
        .map(node_text)
        .find(|text| !text.is_empty())
}

fn node_text(node: Node<'_, '_>) -> String {
    node.descendants()
        .filter(Node::is_text)
        .filter_map(|text| text.text())
        .collect::<String>()
        .trim()
        .to_string()
}

/// Rewrites HTML named entities outside CDATA sections so the document is
/// well-formed XML. Known entities become their characters (re-escaped when
/// they are markup); unknown ones are dropped.
fn scrub_html_entities(xml: &str) -> String {
    let mut out = String::with_capacity(xml.len());
    let mut rest = xml;
    while let Some(start) = rest.find(CDATA_OPEN) {
        let (outside, section) = rest.split_at(start);
        rewrite_entities(outside, &mut out);
        let Some(end) = section.find(CDATA_CLOSE) else {
            out.push_str(section);
            return out;
        };
        let (cdata, after) = section.split_at(end + CDATA_CLOSE.len());
        out.push_str(cdata);
        rest = after;
    }
    rewrite_entities(rest, &mut out);
    out
}

fn rewrite_entities(text: &str, out: &mut String) {
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let candidate = &rest[amp + 1..];
        let name_len = candidate
            .find(|ch: char| !ch.is_ascii_alphanumeric())
            .unwrap_or(candidate.len());
        let name = &candidate[..name_len];
        let terminated = candidate[name_len..].starts_with(';');

        if !terminated || name.is_empty() || XML_ENTITIES.contains(&name) {
            out.push('&');
            rest = candidate;
            continue;
        }

        let entity = format!("&{name};");
        let decoded = html_escape::decode_html_entities(&entity);
        if decoded != entity.as_str() {
            out.push_str(&html_escape::encode_text(&decoded));
        }
        rest = &candidate[name_len + 1..];
    }
    out.push_str(rest);
}
