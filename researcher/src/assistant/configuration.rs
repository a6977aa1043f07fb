use std::env;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use tracing::{info, warn};

use super::error::{ResearchError, Result};
use super::scholar::DEFAULT_MAX_PAPERS;

#[derive(Debug, Clone)]
pub struct Configuration {
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub serpapi_key: Option<String>,
    pub serpapi_base_url: String,
    pub wikipedia_api_url: String,
    pub max_papers: usize,
    pub host: IpAddr,
    pub port: u16,
    pub allowed_origins: Vec<String>,
    pub log_dir: PathBuf,
}

fn default_gemini_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_gemini_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_serpapi_base_url() -> String {
    "https://serpapi.com/search".to_string()
}

fn default_wikipedia_api_url() -> String {
    "https://en.wikipedia.org/w/api.php".to_string()
}

fn default_max_papers() -> usize {
    DEFAULT_MAX_PAPERS
}

fn default_host() -> IpAddr {
    IpAddr::from([0, 0, 0, 0])
}

fn default_port() -> u16 {
    8000
}

fn default_allowed_origins() -> Vec<String> {
    vec![
        "http://localhost:7860".to_string(),
        "https://anvik-ai.onrender.com".to_string(),
    ]
}

fn default_log_dir() -> PathBuf {
    PathBuf::from("logs")
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            gemini_api_key: None,
            gemini_model: default_gemini_model(),
            gemini_base_url: default_gemini_base_url(),
            serpapi_key: None,
            serpapi_base_url: default_serpapi_base_url(),
            wikipedia_api_url: default_wikipedia_api_url(),
            max_papers: default_max_papers(),
            host: default_host(),
            port: default_port(),
            allowed_origins: default_allowed_origins(),
            log_dir: default_log_dir(),
        }
    }
}

fn parse_setting<T: FromStr>(name: &'static str, value: Option<String>, default: T) -> Result<T> {
    match value {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ResearchError::InvalidSetting { name, value: raw }),
        None => Ok(default),
    }
}

impl Configuration {
    /// Reads the configuration from the process environment. Call `crate::init`
    /// first so values from `.env` are visible.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup. Empty values
    /// count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let allowed_origins = match var("ALLOWED_ORIGINS") {
            Some(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(str::to_string)
                .collect(),
            None => default_allowed_origins(),
        };

        Ok(Configuration {
            gemini_api_key: var("GEMINI_API_KEY"),
            gemini_model: var("GEMINI_MODEL").unwrap_or_else(default_gemini_model),
            gemini_base_url: var("GEMINI_BASE_URL").unwrap_or_else(default_gemini_base_url),
            serpapi_key: var("SERPAPI_KEY"),
            serpapi_base_url: var("SERPAPI_BASE_URL").unwrap_or_else(default_serpapi_base_url),
            wikipedia_api_url: var("WIKIPEDIA_API_URL").unwrap_or_else(default_wikipedia_api_url),
            max_papers: parse_setting("MAX_PAPERS", var("MAX_PAPERS"), default_max_papers())?,
            host: parse_setting("HOST", var("HOST"), default_host())?,
            port: parse_setting("PORT", var("PORT"), default_port())?,
            allowed_origins,
            log_dir: var("LOG_DIR").map(PathBuf::from).unwrap_or_else(default_log_dir),
        })
    }

    /// Logs the effective settings with secrets masked.
    pub fn log_summary(&self) {
        let mask = |secret: &Option<String>| if secret.is_some() { "***" } else { "<unset>" };
        info!(
            gemini_api_key = mask(&self.gemini_api_key),
            serpapi_key = mask(&self.serpapi_key),
            gemini_model = %self.gemini_model,
            max_papers = self.max_papers,
            addr = %self.socket_addr(),
            log_dir = %self.log_dir.display(),
            "Loaded configuration"
        );
        if self.serpapi_key.is_none() {
            warn!("SERPAPI_KEY not found; paper searches will likely be rejected");
        }
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
