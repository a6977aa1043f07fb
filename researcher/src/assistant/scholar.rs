use async_trait::async_trait;
use chrono::{Datelike, Local};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use url::Url;

use super::error::{ResearchError, Result};
use super::state::Paper;

pub const DEFAULT_MAX_PAPERS: usize = 5;
const UNKNOWN_TITLE: &str = "Unknown Title";
const UNKNOWN_AUTHOR: &str = "Unknown Author";
const NO_ABSTRACT: &str = "No abstract available";
const NOT_AVAILABLE: &str = "N/A";
const DOI_MARKER: &str = "doi.org/";

/// One `organic_results` entry of a Google Scholar search, as loose as the
/// upstream data is.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScholarRecord {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub publication_info: Option<PublicationInfo>,
    #[serde(default)]
    pub snippet: Option<String>,
    #[serde(default)]
    pub resources: Option<Vec<Resource>>,
    #[serde(default)]
    pub link: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PublicationInfo {
    #[serde(default)]
    pub authors: Option<Vec<AuthorRef>>,
    /// Arrives as either a number or a string.
    #[serde(default)]
    pub year: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthorRef {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Resource {
    #[serde(default)]
    pub file_url: Option<String>,
}

/// Text after the last `doi.org/` in a resource URL, or "N/A".
pub fn extract_identifier(file_url: &str) -> String {
    file_url
        .rsplit_once(DOI_MARKER)
        .map(|(_, doi)| doi.to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

fn parse_year(value: &Value) -> Option<i32> {
    match value {
        Value::Number(n) => n.as_i64().and_then(|y| i32::try_from(y).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

impl ScholarRecord {
    pub fn into_paper(self, current_year: i32) -> Paper {
        let info = self.publication_info.unwrap_or_default();
        let authors = info
            .authors
            .unwrap_or_default()
            .into_iter()
            .map(|a| a.name.unwrap_or_else(|| UNKNOWN_AUTHOR.to_string()))
            .collect();
        let year = info.year.as_ref().and_then(parse_year).unwrap_or(current_year);
        // Only the first resource is consulted.
        let identifier = self
            .resources
            .as_deref()
            .and_then(<[Resource]>::first)
            .and_then(|r| r.file_url.as_deref())
            .map(extract_identifier)
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());

        Paper {
            title: self.title.unwrap_or_else(|| UNKNOWN_TITLE.to_string()),
            authors,
            year,
            abstract_text: self.snippet.unwrap_or_else(|| NO_ABSTRACT.to_string()),
            identifier,
            link: self.link.unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        }
    }
}

/// Search over a scholarly index, newest publications first.
#[async_trait]
pub trait ScholarSearch: Send + Sync {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<ScholarRecord>>;
}

#[derive(Debug, Deserialize)]
struct ScholarResponse {
    #[serde(default)]
    organic_results: Vec<ScholarRecord>,
}

pub struct SerpApiClient {
    base_url: Url,
    api_key: Option<String>,
    client: Client,
}

impl SerpApiClient {
    pub fn new(base_url: &str, api_key: Option<String>) -> Result<Self> {
        if api_key.is_none() {
            warn!("SerpAPI client created without an API key");
        }
        Ok(Self {
            base_url: Url::parse(base_url)?,
            api_key,
            client: Client::new(),
        })
    }
}

#[async_trait]
impl ScholarSearch for SerpApiClient {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<ScholarRecord>> {
        let num = limit.to_string();
        let mut params = vec![
            ("engine", "google_scholar"),
            ("q", query),
            ("sort", "pubdate"),
            ("num", num.as_str()),
        ];
        if let Some(key) = &self.api_key {
            params.push(("api_key", key.as_str()));
        }

        let response = self
            .client
            .get(self.base_url.clone())
            .query(&params)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ResearchError::UpstreamStatus {
                service: "SerpAPI",
                status: response.status().as_u16(),
            });
        }

        let data: ScholarResponse = response.json().await?;
        Ok(data.organic_results)
    }
}

/// Produces the list of recent papers for a topic.
#[async_trait]
pub trait PaperSource: Send + Sync {
    async fn fetch_papers(&self, topic: &str, max_papers: usize) -> Result<Vec<Paper>>;
}

pub struct ScholarFetcher {
    search: Arc<dyn ScholarSearch>,
}

impl ScholarFetcher {
    pub fn new(search: Arc<dyn ScholarSearch>) -> Self {
        Self { search }
    }
}

#[async_trait]
impl PaperSource for ScholarFetcher {
    /// Never fails: any search error yields an empty list.
    #[instrument(skip(self))]
    async fn fetch_papers(&self, topic: &str, max_papers: usize) -> Result<Vec<Paper>> {
        info!("Fetching Google Scholar papers for {}", topic);
        let records = match self.search.search(topic, max_papers).await {
            Ok(records) => records,
            Err(e) => {
                error!("Error fetching Google Scholar papers: {}", e);
                return Ok(Vec::new());
            }
        };

        let current_year = Local::now().year();
        let papers: Vec<Paper> = records
            .into_iter()
            .take(max_papers)
            .map(|record| record.into_paper(current_year))
            .collect();
        info!("Fetched {} papers for {}", papers.len(), topic);
        Ok(papers)
    }
}
