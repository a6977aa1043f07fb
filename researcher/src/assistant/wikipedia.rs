use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use url::Url;

use super::error::{ResearchError, Result};
use super::state::NO_SUMMARY_AVAILABLE;

const USER_AGENT: &str = concat!("topic-researcher/", env!("CARGO_PKG_VERSION"));
const MAX_QUERY_CHARS: usize = 300;
const TOP_K_RESULTS: usize = 3;
const MAX_CONTENT_CHARS: usize = 4000;

/// Free-text lookup against an encyclopedia-style knowledge base.
#[async_trait]
pub trait KnowledgeBase: Send + Sync {
    async fn query(&self, topic: &str) -> Result<String>;
}

#[derive(Debug, Deserialize)]
struct WikiResponse {
    #[serde(default)]
    query: Option<WikiQuery>,
}

#[derive(Debug, Deserialize)]
struct WikiQuery {
    #[serde(default)]
    pages: Vec<WikiPage>,
}

#[derive(Debug, Deserialize)]
struct WikiPage {
    title: String,
    #[serde(default)]
    index: u32,
    #[serde(default)]
    extract: Option<String>,
}

pub struct WikipediaClient {
    api_url: Url,
    client: Client,
}

impl WikipediaClient {
    pub fn new(api_url: &str) -> Result<Self> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            api_url: Url::parse(api_url)?,
            client,
        })
    }
}

fn render_pages(mut pages: Vec<WikiPage>) -> String {
    pages.sort_by_key(|page| page.index);
    let text = pages
        .into_iter()
        .take(TOP_K_RESULTS)
        .filter_map(|page| {
            let extract = page.extract.filter(|e| !e.trim().is_empty())?;
            Some(format!("Page: {}\nSummary: {}", page.title, extract.trim()))
        })
        .collect::<Vec<_>>()
        .join("\n\n");
    text.chars().take(MAX_CONTENT_CHARS).collect()
}

#[async_trait]
impl KnowledgeBase for WikipediaClient {
    async fn query(&self, topic: &str) -> Result<String> {
        let search: String = topic.chars().take(MAX_QUERY_CHARS).collect();
        let limit = TOP_K_RESULTS.to_string();
        let response = self
            .client
            .get(self.api_url.clone())
            .query(&[
                ("action", "query"),
                ("format", "json"),
                ("formatversion", "2"),
                ("generator", "search"),
                ("gsrsearch", search.as_str()),
                ("gsrlimit", limit.as_str()),
                ("prop", "extracts"),
                ("exintro", "1"),
                ("explaintext", "1"),
                ("exlimit", limit.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ResearchError::UpstreamStatus {
                service: "Wikipedia",
                status: response.status().as_u16(),
            });
        }

        let data: WikiResponse = response.json().await?;
        Ok(render_pages(data.query.map(|q| q.pages).unwrap_or_default()))
    }
}

/// Produces the background paragraph for a topic.
#[async_trait]
pub trait BackgroundSource: Send + Sync {
    async fn fetch_summary(&self, topic: &str) -> Result<String>;
}

pub struct WikipediaFetcher {
    knowledge_base: Arc<dyn KnowledgeBase>,
}

impl WikipediaFetcher {
    pub fn new(knowledge_base: Arc<dyn KnowledgeBase>) -> Self {
        Self { knowledge_base }
    }
}

#[async_trait]
impl BackgroundSource for WikipediaFetcher {
    /// Never fails: lookup errors are folded into the returned text.
    #[instrument(skip(self))]
    async fn fetch_summary(&self, topic: &str) -> Result<String> {
        info!("Fetching Wikipedia summary for {}", topic);
        match self.knowledge_base.query(topic).await {
            Ok(text) if text.trim().is_empty() => {
                warn!("No Wikipedia summary found for {}", topic);
                Ok(NO_SUMMARY_AVAILABLE.to_string())
            }
            Ok(text) => Ok(text),
            Err(e) => {
                error!("Error fetching Wikipedia summary: {}", e);
                Ok(format!("Error fetching Wikipedia summary: {}", e))
            }
        }
    }
}
