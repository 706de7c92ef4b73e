//! DuckDuckGo web search tool
//!
//! Backed by the DuckDuckGo Instant Answer API
//! (`https://api.duckduckgo.com/?q=...&format=json`), which needs no key.

use crate::Tool;
use async_trait::async_trait;
use crew_core::{Error, Result};
use crew_llm::tools::schema;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Value, json};
use std::time::Duration;
use tracing::{debug, instrument, warn};
use url::Url;

const DEFAULT_ENDPOINT: &str = "https://api.duckduckgo.com/";
const DEFAULT_MAX_RESULTS: usize = 5;
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const USER_AGENT: &str = concat!("stock-crew/", env!("CARGO_PKG_VERSION"));

/// Name the search tool is advertised under
pub const SEARCH_TOOL_NAME: &str = "duckduckgo_search";

/// Text returned when the search produced nothing usable
pub const NO_RESULT_TEXT: &str = "No good DuckDuckGo Search Result was found";

/// Web search through the DuckDuckGo Instant Answer API
#[derive(Debug, Clone)]
pub struct DuckDuckGoSearch {
    client: Client,
    endpoint: String,
}

#[derive(Debug, Deserialize)]
struct SearchParams {
    query: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct InstantAnswer {
    #[serde(default)]
    heading: String,
    #[serde(default)]
    abstract_text: String,
    #[serde(default, rename = "AbstractURL")]
    abstract_url: String,
    #[serde(default)]
    answer: Value,
    #[serde(default)]
    definition: String,
    #[serde(default)]
    related_topics: Vec<RelatedTopic>,
}

/// Either a leaf result or a named group of results
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RelatedTopic {
    Leaf {
        #[serde(rename = "Text")]
        text: String,
        #[serde(rename = "FirstURL", default)]
        first_url: String,
    },
    Group {
        #[serde(rename = "Topics", default)]
        topics: Vec<RelatedTopic>,
    },
}

impl DuckDuckGoSearch {
    /// Create a search tool against the public endpoint
    pub fn new() -> Result<Self> {
        Self::with_endpoint(DEFAULT_ENDPOINT)
    }

    /// Create a search tool against a custom endpoint
    pub fn with_endpoint(endpoint: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| Error::configuration(format!("Failed to build search client: {e}")))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    fn query_url(&self, query: &str) -> Result<Url> {
        Url::parse_with_params(
            &self.endpoint,
            &[
                ("q", query),
                ("format", "json"),
                ("no_html", "1"),
                ("skip_disambig", "1"),
            ],
        )
        .map_err(|e| Error::configuration(format!("Invalid search endpoint '{}': {e}", self.endpoint)))
    }

    /// Run a search and return the result as plain text
    #[instrument(skip(self))]
    pub async fn search(&self, query: &str) -> Result<String> {
        let query = query.trim();
        if query.is_empty() {
            return Err(Error::capability("Search query cannot be empty"));
        }

        let url = self.query_url(query)?;
        debug!(%url, "Querying DuckDuckGo");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::capability(format!("DuckDuckGo request failed: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::capability(format!("DuckDuckGo response unreadable: {e}")))?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "DuckDuckGo search failed");
            return Err(Error::capability(format!(
                "DuckDuckGo API error {status}: {body}"
            )));
        }

        let text = render_answer(&body, DEFAULT_MAX_RESULTS)?;
        debug!(result_length = text.len(), "DuckDuckGo search completed");
        Ok(text)
    }
}

/// Turn an Instant Answer payload into the text handed to the model
fn render_answer(body: &str, max_results: usize) -> Result<String> {
    // The API answers an empty body for some queries
    if body.trim().is_empty() {
        return Ok(NO_RESULT_TEXT.to_string());
    }

    let answer: InstantAnswer = serde_json::from_str(body)
        .map_err(|e| Error::capability(format!("Failed to parse DuckDuckGo response: {e}")))?;

    let mut lines = Vec::new();

    if let Some(text) = answer.answer.as_str().filter(|s| !s.is_empty()) {
        lines.push(text.to_string());
    }

    if !answer.abstract_text.is_empty() {
        let mut line = if answer.heading.is_empty() {
            answer.abstract_text.clone()
        } else {
            format!("{}: {}", answer.heading, answer.abstract_text)
        };
        if !answer.abstract_url.is_empty() {
            line.push_str(&format!(" ({})", answer.abstract_url));
        }
        lines.push(line);
    } else if !answer.definition.is_empty() {
        lines.push(answer.definition.clone());
    }

    let mut related = Vec::new();
    flatten_topics(&answer.related_topics, &mut related);
    lines.extend(
        related
            .into_iter()
            .take(max_results)
            .map(|(text, url)| {
                if url.is_empty() {
                    text.to_string()
                } else {
                    format!("{text} ({url})")
                }
            }),
    );

    if lines.is_empty() {
        Ok(NO_RESULT_TEXT.to_string())
    } else {
        Ok(lines.join("\n"))
    }
}

fn flatten_topics<'a>(topics: &'a [RelatedTopic], out: &mut Vec<(&'a str, &'a str)>) {
    for topic in topics {
        match topic {
            RelatedTopic::Leaf { text, first_url } if !text.is_empty() => {
                out.push((text.as_str(), first_url.as_str()));
            }
            RelatedTopic::Leaf { .. } => {}
            RelatedTopic::Group { topics } => flatten_topics(topics, out),
        }
    }
}

#[async_trait]
impl Tool for DuckDuckGoSearch {
    async fn execute(&self, params: Value) -> Result<Value> {
        let params: SearchParams = serde_json::from_value(params)
            .map_err(|e| Error::capability(format!("Invalid search parameters: {e}")))?;

        self.search(&params.query).await.map(Value::String)
    }

    fn name(&self) -> &str {
        SEARCH_TOOL_NAME
    }

    fn description(&self) -> &str {
        "Search the web with DuckDuckGo. Useful for current events, company \
         news and market information. Input should be a search query."
    }

    fn input_schema(&self) -> Value {
        schema::object(
            json!({ "query": schema::string("Search query") }),
            &["query"],
        )
    }
}
