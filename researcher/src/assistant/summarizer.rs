use async_trait::async_trait;
use std::sync::Arc;
use tracing::{error, info, instrument};

use super::configuration::Configuration;
use super::error::{ResearchError, Result};
use super::gemini::{GeminiClient, LanguageModel};
use super::prompts::format_summarize_instructions;
use super::state::{Paper, PaperSummary};

/// Turns fetched papers into summarized papers.
#[async_trait]
pub trait PaperSummarizer: Send + Sync {
    async fn summarize_papers(&self, papers: Vec<Paper>) -> Result<Vec<PaperSummary>>;
}

pub struct Summarizer {
    llm: Arc<dyn LanguageModel>,
}

impl Summarizer {
    /// Fails when `GEMINI_API_KEY` is not configured.
    pub fn new(config: &Configuration) -> Result<Self> {
        let api_key = config.gemini_api_key.clone().ok_or_else(|| {
            error!("GEMINI_API_KEY not found in environment variables");
            ResearchError::MissingCredential("GEMINI_API_KEY")
        })?;
        info!("Initializing Gemini client with model {}", config.gemini_model);
        let client = GeminiClient::new(api_key, &config.gemini_base_url, &config.gemini_model)?;
        Ok(Self::with_model(Arc::new(client)))
    }

    pub fn with_model(llm: Arc<dyn LanguageModel>) -> Self {
        Self { llm }
    }

    // One call at a time, in input order; the first failure aborts the batch.
    async fn summarize_all(&self, papers: Vec<Paper>) -> Result<Vec<PaperSummary>> {
        let mut summaries = Vec::with_capacity(papers.len());
        for paper in papers {
            let prompt = format_summarize_instructions(&paper.title, &paper.abstract_text);
            let summary = self.llm.complete(&prompt).await?;
            summaries.push(PaperSummary::from_paper(paper, summary));
        }
        Ok(summaries)
    }
}

#[async_trait]
impl PaperSummarizer for Summarizer {
    /// Never fails: a model error discards every summary produced so far.
    #[instrument(skip_all, fields(papers = papers.len()))]
    async fn summarize_papers(&self, papers: Vec<Paper>) -> Result<Vec<PaperSummary>> {
        info!("Summarizing {} papers", papers.len());
        match self.summarize_all(papers).await {
            Ok(summaries) => {
                info!("Paper summaries completed");
                Ok(summaries)
            }
            Err(e) => {
                error!("Error summarizing papers: {}", e);
                Ok(Vec::new())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Answers with a numbered summary and fails on call `fail_on` (1-based).
    struct ScriptedModel {
        fail_on: Option<usize>,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedModel {
        fn new(fail_on: Option<usize>) -> Arc<Self> {
            Arc::new(Self {
                fail_on,
                prompts: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl LanguageModel for ScriptedModel {
        async fn complete(&self, prompt: &str) -> Result<String> {
            let call = {
                let mut prompts = self.prompts.lock().unwrap();
                prompts.push(prompt.to_string());
                prompts.len()
            };
            if Some(call) == self.fail_on {
                return Err(ResearchError::EmptyCompletion);
            }
            Ok(format!("summary {}", call))
        }
    }

    fn paper(title: &str) -> Paper {
        Paper {
            title: title.to_string(),
            authors: vec!["A. Smith".to_string()],
            year: 2023,
            abstract_text: format!("About {}", title),
            identifier: "N/A".to_string(),
            link: "N/A".to_string(),
        }
    }

    #[tokio::test]
    async fn summarizes_in_input_order() {
        let model = ScriptedModel::new(None);
        let summarizer = Summarizer::with_model(model.clone());

        let summaries = summarizer
            .summarize_papers(vec![paper("A"), paper("B"), paper("C")])
            .await
            .unwrap();

        let got: Vec<(&str, &str)> = summaries
            .iter()
            .map(|s| (s.title.as_str(), s.summary.as_str()))
            .collect();
        assert_eq!(got, [("A", "summary 1"), ("B", "summary 2"), ("C", "summary 3")]);
        assert_eq!(summaries[1].abstract_text, "About B");

        let prompts = model.prompts.lock().unwrap();
        assert!(prompts[0].ends_with("Title: A\nAbstract: About A"));
    }

    #[tokio::test]
    async fn failure_mid_batch_discards_partial_results() {
        let model = ScriptedModel::new(Some(3));
        let summarizer = Summarizer::with_model(model.clone());

        let summaries = summarizer
            .summarize_papers(vec![paper("A"), paper("B"), paper("C")])
            .await
            .unwrap();

        assert!(summaries.is_empty());
        assert_eq!(model.prompts.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn failure_stops_remaining_calls() {
        let model = ScriptedModel::new(Some(1));
        let summarizer = Summarizer::with_model(model.clone());

        let summaries = summarizer
            .summarize_papers(vec![paper("A"), paper("B")])
            .await
            .unwrap();

        assert!(summaries.is_empty());
        assert_eq!(model.prompts.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn empty_input_makes_no_calls() {
        let model = ScriptedModel::new(None);
        let summaries = Summarizer::with_model(model.clone())
            .summarize_papers(Vec::new())
            .await
            .unwrap();
        assert!(summaries.is_empty());
        assert!(model.prompts.lock().unwrap().is_empty());
    }

    #[test]
    fn construction_requires_credential() {
        let err = Summarizer::new(&Configuration::default()).err().unwrap();
        assert!(matches!(err, ResearchError::MissingCredential("GEMINI_API_KEY")));
    }

    #[test]
    fn construction_succeeds_with_credential() {
        let config = Configuration {
            gemini_api_key: Some("key".to_string()),
            ..Configuration::default()
        };
        assert!(Summarizer::new(&config).is_ok());
    }
}
