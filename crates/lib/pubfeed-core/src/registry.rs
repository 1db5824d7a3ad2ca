//! Tool registry and operation table.
//!
//! Every transport decodes its wire format into a [`ToolCall`], hands it to a
//! [`ToolDispatcher`], and encodes the resulting [`ToolOutput`] or
//! [`ToolError`] back into its own vocabulary. The operation set depends on
//! the [`ToolProfile`] a deployment runs with; the two profiles never mix.

use std::{error::Error, fmt, str::FromStr};

use chrono::Utc;
use pubfeed_store::models::{
    ArticleListing,
    ArticleReading,
    AuthorListing,
    FetchedDocument,
    HealthStatus,
    SearchResults,
    TopicListing,
};
use pubfeed_store::schema::{
    TOOL_FETCH,
    TOOL_HEALTH,
    TOOL_LIST_ARTICLES,
    TOOL_LIST_AUTHORS,
    TOOL_LIST_TOPICS,
    TOOL_READ_ARTICLE,
    TOOL_SEARCH,
};
use schemars::{JsonSchema, schema_for};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};
use tracing::debug;

use crate::control::{ArticleFilter, ArticleSelector, CatalogControlPlane, ControlError};

pub const LIST_ARTICLES_DESCRIPTION: &str =
    "List articles from the publication feed, optionally filtered by author or topic.";
pub const LIST_AUTHORS_DESCRIPTION: &str = "List all authors who have written articles.";
pub const LIST_TOPICS_DESCRIPTION: &str = "List all topics covered in the articles.";
pub const READ_ARTICLE_DESCRIPTION: &str =
    "Read the full content of an article by its id, URL, or title.";
pub const SEARCH_DESCRIPTION: &str =
    "Search articles by keywords in their title, excerpt, or author.";
pub const FETCH_DESCRIPTION: &str =
    "Fetch the text of a single article by the id returned from search.";
pub const HEALTH_DESCRIPTION: &str = "Report server liveness and the current time.";

const CATALOG_TOOLS: &[&str] = &[
    TOOL_LIST_ARTICLES,
    TOOL_LIST_AUTHORS,
    TOOL_LIST_TOPICS,
    TOOL_READ_ARTICLE,
    TOOL_HEALTH,
];
const SEARCH_TOOLS: &[&str] = &[TOOL_SEARCH, TOOL_FETCH, TOOL_HEALTH];

/// Operation set served by one deployment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ToolProfile {
    /// Listing, aggregation, and full-text reads.
    #[default]
    Catalog,
    /// Keyword search plus document fetch.
    Search,
}

impl ToolProfile {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Catalog => "catalog",
            Self::Search => "search",
        }
    }

    #[must_use]
    pub const fn tool_names(self) -> &'static [&'static str] {
        match self {
            Self::Catalog => CATALOG_TOOLS,
            Self::Search => SEARCH_TOOLS,
        }
    }

    #[must_use]
    pub fn includes(self, name: &str) -> bool {
        self.tool_names().contains(&name)
    }
}

impl fmt::Display for ToolProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseProfileError(String);

impl fmt::Display for ParseProfileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown tool profile '{}' (expected catalog or search)", self.0)
    }
}

impl Error for ParseProfileError {}

impl FromStr for ToolProfile {
    type Err = ParseProfileError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "catalog" => Ok(Self::Catalog),
            "search" => Ok(Self::Search),
            _ => Err(ParseProfileError(value.to_string())),
        }
    }
}

/// Parameters for `list_articles`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ListArticlesParams {
    /// Maximum number of articles to return (default: 10).
    pub limit: Option<usize>,
    /// Filter articles by author name.
    pub author: Option<String>,
    /// Filter articles by topic.
    pub topic: Option<String>,
}

/// Parameters for `read_article`. Supply one of the three selectors.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ReadArticleParams {
    /// The id of the article to read.
    #[serde(rename = "articleId", alias = "article_id")]
    pub article_id: Option<String>,
    /// The URL of the article to read.
    pub url: Option<String>,
    /// The title (or part of it) of the article to read.
    pub title: Option<String>,
}

/// Parameters for `search`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SearchParams {
    /// Whitespace-separated keywords; an article matches if any keyword does.
    pub query: String,
}

/// Parameters for `fetch`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct FetchParams {
    /// Article id as returned by `search`.
    pub id: String,
}

/// Parameters for tools that take no arguments.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct NoParams {}

impl From<ListArticlesParams> for ArticleFilter {
    fn from(params: ListArticlesParams) -> Self {
        Self {
            limit: params.limit,
            author: params.author,
            topic: params.topic,
        }
    }
}

impl From<ReadArticleParams> for ArticleSelector {
    fn from(params: ReadArticleParams) -> Self {
        Self {
            article_id: params.article_id,
            url: params.url,
            title: params.title,
        }
    }
}

/// Registry entry as advertised to clients.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub input_schema: Value,
}

impl ToolDefinition {
    /// Looks up the definition for a known tool name.
    #[must_use]
    pub fn for_tool(name: &str) -> Option<Self> {
        let (name, description, input_schema) = match name {
            TOOL_LIST_ARTICLES => (
                TOOL_LIST_ARTICLES,
                LIST_ARTICLES_DESCRIPTION,
                input_schema::<ListArticlesParams>(),
            ),
            TOOL_LIST_AUTHORS => (
                TOOL_LIST_AUTHORS,
                LIST_AUTHORS_DESCRIPTION,
                input_schema::<NoParams>(),
            ),
            TOOL_LIST_TOPICS => (
                TOOL_LIST_TOPICS,
                LIST_TOPICS_DESCRIPTION,
                input_schema::<NoParams>(),
            ),
            TOOL_READ_ARTICLE => (
                TOOL_READ_ARTICLE,
                READ_ARTICLE_DESCRIPTION,
                input_schema::<ReadArticleParams>(),
            ),
            TOOL_SEARCH => (
                TOOL_SEARCH,
                SEARCH_DESCRIPTION,
                input_schema::<SearchParams>(),
            ),
            TOOL_FETCH => (TOOL_FETCH, FETCH_DESCRIPTION, input_schema::<FetchParams>()),
            TOOL_HEALTH => (TOOL_HEALTH, HEALTH_DESCRIPTION, input_schema::<NoParams>()),
            _ => return None,
        };
        Some(Self {
            name,
            description,
            input_schema,
        })
    }
}

fn input_schema<T: JsonSchema>() -> Value {
    schema_for!(T).to_value()
}

/// Definitions for every tool in `profile`, in registry order.
#[must_use]
pub fn tool_definitions(profile: ToolProfile) -> Vec<ToolDefinition> {
    profile
        .tool_names()
        .iter()
        .filter_map(|name| ToolDefinition::for_tool(name))
        .collect()
}

/// A decoded, validated operation request.
#[derive(Debug, Clone)]
pub enum ToolCall {
    ListArticles(ListArticlesParams),
    ListAuthors,
    ListTopics,
    ReadArticle(ReadArticleParams),
    Search(SearchParams),
    Fetch(FetchParams),
    Health,
}

impl ToolCall {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::ListArticles(_) => TOOL_LIST_ARTICLES,
            Self::ListAuthors => TOOL_LIST_AUTHORS,
            Self::ListTopics => TOOL_LIST_TOPICS,
            Self::ReadArticle(_) => TOOL_READ_ARTICLE,
            Self::Search(_) => TOOL_SEARCH,
            Self::Fetch(_) => TOOL_FETCH,
            Self::Health => TOOL_HEALTH,
        }
    }

    /// Decodes a tool name plus JSON arguments for the given profile.
    ///
    /// Missing or `null` arguments are treated as an empty object; unknown
    /// keys are ignored.
    ///
    /// # Errors
    /// Returns `ToolError::UnknownTool` for names outside the profile and
    /// `ToolError::InvalidArguments` for non-object or mistyped arguments.
    pub fn decode(profile: ToolProfile, name: &str, arguments: Value) -> Result<Self, ToolError> {
        if !profile.includes(name) {
            return Err(ToolError::UnknownTool(name.to_string()));
        }
        let arguments = match arguments {
            Value::Null => Value::Object(Map::new()),
            Value::Object(map) => Value::Object(map),
            _ => {
                return Err(ToolError::InvalidArguments(format!(
                    "arguments for {name} must be a JSON object"
                )));
            }
        };

        match name {
            TOOL_LIST_ARTICLES => arguments_as(name, arguments).map(Self::ListArticles),
            TOOL_LIST_AUTHORS => Ok(Self::ListAuthors),
            TOOL_LIST_TOPICS => Ok(Self::ListTopics),
            TOOL_READ_ARTICLE => arguments_as(name, arguments).map(Self::ReadArticle),
            TOOL_SEARCH => arguments_as(name, arguments).map(Self::Search),
            TOOL_FETCH => arguments_as(name, arguments).map(Self::Fetch),
            TOOL_HEALTH => Ok(Self::Health),
            _ => Err(ToolError::UnknownTool(name.to_string())),
        }
    }
}

fn arguments_as<T: DeserializeOwned>(name: &str, arguments: Value) -> Result<T, ToolError> {
    serde_json::from_value(arguments)
        .map_err(|err| ToolError::InvalidArguments(format!("invalid arguments for {name}: {err}")))
}

/// Result of one operation; serializes as the bare result object.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ToolOutput {
    Articles(ArticleListing),
    Authors(AuthorListing),
    Topics(TopicListing),
    Reading(ArticleReading),
    Search(SearchResults),
    Document(FetchedDocument),
    Health(HealthStatus),
}

impl ToolOutput {
    /// # Errors
    /// Returns `ToolError::Internal` if the result cannot be serialized.
    pub fn to_value(&self) -> Result<Value, ToolError> {
        serde_json::to_value(self).map_err(|err| ToolError::Internal(err.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolError {
    UnknownTool(String),
    InvalidArguments(String),
    NotFound(String),
    Internal(String),
}

impl fmt::Display for ToolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownTool(name) => write!(f, "Unknown tool: {name}"),
            Self::InvalidArguments(message) | Self::NotFound(message) => write!(f, "{message}"),
            Self::Internal(message) => write!(f, "internal error: {message}"),
        }
    }
}

impl Error for ToolError {}

impl From<ControlError> for ToolError {
    fn from(err: ControlError) -> Self {
        match err {
            ControlError::NotFound(message) => Self::NotFound(message),
            ControlError::InvalidArgument(message) => Self::InvalidArguments(message),
        }
    }
}

/// Liveness payload shared by the `health` tool and the REST probe.
#[must_use]
pub fn health_status() -> HealthStatus {
    HealthStatus {
        status: "ok".to_string(),
        timestamp: Utc::now().to_rfc3339(),
    }
}

/// Executes tool calls against the query engine for one profile.
#[derive(Clone)]
pub struct ToolDispatcher {
    profile: ToolProfile,
    control: CatalogControlPlane,
}

impl ToolDispatcher {
    #[must_use]
    pub const fn new(profile: ToolProfile, control: CatalogControlPlane) -> Self {
        Self { profile, control }
    }

    #[must_use]
    pub const fn profile(&self) -> ToolProfile {
        self.profile
    }

    #[must_use]
    pub const fn control(&self) -> &CatalogControlPlane {
        &self.control
    }

    #[must_use]
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        tool_definitions(self.profile)
    }

    /// Decodes and executes a call by name.
    ///
    /// # Errors
    /// See [`ToolCall::decode`] and [`ToolDispatcher::execute`].
    pub async fn call(&self, name: &str, arguments: Value) -> Result<ToolOutput, ToolError> {
        let call = ToolCall::decode(self.profile, name, arguments)?;
        self.execute(call).await
    }

    /// Runs a decoded call.
    ///
    /// # Errors
    /// Returns `ToolError::UnknownTool` if the call is outside this profile,
    /// and `NotFound`/`InvalidArguments` as reported by the query engine.
    pub async fn execute(&self, call: ToolCall) -> Result<ToolOutput, ToolError> {
        let name = call.name();
        if !self.profile.includes(name) {
            return Err(ToolError::UnknownTool(name.to_string()));
        }
        debug!(tool = name, profile = %self.profile, "executing tool");

        let output = match call {
            ToolCall::ListArticles(params) => {
                ToolOutput::Articles(self.control.list_articles(&params.into()).await)
            }
            ToolCall::ListAuthors => ToolOutput::Authors(self.control.list_authors().await),
            ToolCall::ListTopics => ToolOutput::Topics(self.control.list_topics().await),
            ToolCall::ReadArticle(params) => {
                ToolOutput::Reading(self.control.read_article(&params.into()).await?)
            }
            ToolCall::Search(params) => ToolOutput::Search(self.control.search(&params.query).await),
            ToolCall::Fetch(params) => ToolOutput::Document(self.control.fetch(&params.id).await?),
            ToolCall::Health => ToolOutput::Health(health_status()),
        };
        Ok(output)
    }
}
