//! Web search tool: DuckDuckGo instant-answer API.
//!
//! Used as a fallback when the university database has no answer. Results
//! are `{title, href, snippet}` objects; failures come back as `{error}`.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Value, json};
use switchyard_config::SearchConfig;
use switchyard_core::error::ToolError;
use switchyard_core::tool::{ParamSpec, Tool, ToolOutput};
use tracing::{debug, warn};

pub struct WebSearchTool {
    client: reqwest::Client,
    api_url: String,
    default_max_results: u32,
}

impl WebSearchTool {
    pub fn new(config: &SearchConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: config.api_url.trim_end_matches('/').to_string(),
            default_max_results: config.default_max_results,
        }
    }

    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchResult>, reqwest::Error> {
        let body: Value = self
            .client
            .get(format!("{}/", self.api_url))
            .query(&[
                ("q", query),
                ("format", "json"),
                ("no_html", "1"),
                ("skip_disambig", "1"),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(collect_results(&body, max_results))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
struct SearchResult {
    title: String,
    href: String,
    snippet: String,
}

/// Abstract first, then related topics (nested topic groups flattened).
fn collect_results(body: &Value, max_results: usize) -> Vec<SearchResult> {
    let mut results = Vec::new();

    if let (Some(text), Some(url)) = (body["AbstractText"].as_str(), body["AbstractURL"].as_str()) {
        if !text.is_empty() {
            results.push(SearchResult {
                title: body["Heading"].as_str().unwrap_or(text).to_string(),
                href: url.to_string(),
                snippet: text.to_string(),
            });
        }
    }

    let mut topics: Vec<&Value> = Vec::new();
    for topic in body["RelatedTopics"].as_array().into_iter().flatten() {
        match topic["Topics"].as_array() {
            Some(group) => topics.extend(group),
            None => topics.push(topic),
        }
    }

    for topic in topics {
        let (Some(text), Some(url)) = (topic["Text"].as_str(), topic["FirstURL"].as_str()) else {
            continue;
        };
        let title = text.split(" - ").next().unwrap_or(text);
        results.push(SearchResult {
            title: title.to_string(),
            href: url.to_string(),
            snippet: text.to_string(),
        });
    }

    results.truncate(max_results);
    results
}

/// Models send counts as `5`, `5.0` or `"5"`; anything else is rejected.
fn max_results(value: &Value, default: u32) -> Result<usize, ToolError> {
    let count = match value {
        Value::Null => Some(u64::from(default)),
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0 && *f >= 0.0).map(|f| f as u64)),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    count.map(|c| c as usize).ok_or_else(|| {
        ToolError::InvalidArguments(format!(
            "'max_results' must be a non-negative whole number, got {value}"
        ))
    })
}

#[async_trait]
impl Tool for WebSearchTool {
    fn name(&self) -> &str {
        "web_search"
    }

    fn description(&self) -> &str {
        "Search the web when the university database lacks the information. \
         Returns up to max_results results, each with a title, link and snippet."
    }

    fn parameters(&self) -> Vec<ParamSpec> {
        vec![
            ParamSpec::required("query", "str"),
            ParamSpec::optional("max_results", "int", json!(self.default_max_results)),
        ]
    }

    async fn execute(&self, arguments: Value) -> Result<ToolOutput, ToolError> {
        let query = arguments["query"]
            .as_str()
            .ok_or_else(|| ToolError::InvalidArguments("Missing 'query' argument".into()))?;

        let max_results = max_results(&arguments["max_results"], self.default_max_results)?;

        debug!(query, max_results, "Searching the web");
        match self.search(query, max_results).await {
            Ok(results) => Ok(ToolOutput::Data(json!(results))),
            Err(e) => {
                warn!(error = %e, "Web search failed");
                Ok(ToolOutput::Data(json!({ "error": e.to_string() })))
            }
        }
    }
}
