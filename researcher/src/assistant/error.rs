use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResearchError {
    #[error("{0} is required but not set")]
    MissingCredential(&'static str),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{service} request failed with status {status}")]
    UpstreamStatus { service: &'static str, status: u16 },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Language model returned no content")]
    EmptyCompletion,

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Invalid value for {name}: {value}")]
    InvalidSetting { name: &'static str, value: String },
}

pub type Result<T> = std::result::Result<T, ResearchError>;
