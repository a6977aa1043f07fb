use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use url::Url;

use super::error::{ResearchError, Result};

/// A text-in, text-out generative model.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String>;
}

pub struct GeminiClient {
    api_key: String,
    endpoint: Url,
    client: Client,
}

impl GeminiClient {
    pub fn new(api_key: String, base_url: &str, model: &str) -> Result<Self> {
        let mut base = Url::parse(base_url)?;
        // `join` replaces the last path segment unless the base ends in a slash.
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let endpoint = base.join(&format!("v1beta/models/{}:generateContent", model))?;
        Ok(Self {
            api_key,
            endpoint,
            client: Client::new(),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

/// Concatenates the text parts of the first candidate.
fn candidate_text(data: &Value) -> Option<String> {
    let text: String = data["candidates"][0]["content"]["parts"]
        .as_array()?
        .iter()
        .filter_map(|part| part["text"].as_str())
        .collect();
    (!text.trim().is_empty()).then_some(text)
}

#[async_trait]
impl LanguageModel for GeminiClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .header("x-goog-api-key", &self.api_key)
            .json(&json!({
                "contents": [
                    {
                        "role": "user",
                        "parts": [{"text": prompt}]
                    }
                ]
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ResearchError::UpstreamStatus {
                service: "Gemini",
                status: response.status().as_u16(),
            });
        }

        let data = response.json::<Value>().await?;
        candidate_text(&data).ok_or(ResearchError::EmptyCompletion)
    }
}
