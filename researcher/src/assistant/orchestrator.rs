use std::sync::Arc;
use tracing::{error, info, instrument};

use super::compiler::ReportCompiler;
use super::configuration::Configuration;
use super::error::Result;
use super::prompts::{format_progress, format_proposal};
use super::scholar::{PaperSource, ScholarFetcher, SerpApiClient, DEFAULT_MAX_PAPERS};
use super::state::{PipelineStage, ResearchReport};
use super::summarizer::{PaperSummarizer, Summarizer};
use super::wikipedia::{BackgroundSource, WikipediaClient, WikipediaFetcher};

/// Runs the research pipeline for one topic at a time. Holds no per-run
/// state, so one instance can be shared across concurrent requests.
pub struct Orchestrator {
    background: Arc<dyn BackgroundSource>,
    papers: Arc<dyn PaperSource>,
    summarizer: Arc<dyn PaperSummarizer>,
    compiler: ReportCompiler,
    max_papers: usize,
}

impl Orchestrator {
    pub fn new(
        background: Arc<dyn BackgroundSource>,
        papers: Arc<dyn PaperSource>,
        summarizer: Arc<dyn PaperSummarizer>,
    ) -> Self {
        Self {
            background,
            papers,
            summarizer,
            compiler: ReportCompiler::new(),
            max_papers: DEFAULT_MAX_PAPERS,
        }
    }

    /// Wires the Wikipedia, SerpAPI and Gemini clients. Fails when the
    /// Gemini credential is missing.
    pub fn from_config(config: &Configuration) -> Result<Self> {
        let summarizer = Summarizer::new(config)?;
        let wikipedia = WikipediaClient::new(&config.wikipedia_api_url)?;
        let serpapi = SerpApiClient::new(&config.serpapi_base_url, config.serpapi_key.clone())?;

        Ok(Self::new(
            Arc::new(WikipediaFetcher::new(Arc::new(wikipedia))),
            Arc::new(ScholarFetcher::new(Arc::new(serpapi))),
            Arc::new(summarizer),
        )
        .with_max_papers(config.max_papers))
    }

    pub fn with_max_papers(mut self, max_papers: usize) -> Self {
        self.max_papers = max_papers;
        self
    }

    pub fn max_papers(&self) -> usize {
        self.max_papers
    }

    /// Always returns a report. A failure that escapes a stage yields the
    /// pipeline-failure report, recognizable by its empty `generated_at`.
    #[instrument(skip(self))]
    pub async fn research_topic(&self, topic: &str) -> ResearchReport {
        info!("Starting research pipeline for {}", topic);
        match self.run_pipeline(topic).await {
            Ok(report) => report,
            Err(e) => {
                error!("Error in research pipeline: {}", e);
                ResearchReport::pipeline_failure(topic)
            }
        }
    }

    async fn run_pipeline(&self, topic: &str) -> Result<ResearchReport> {
        info!(stage = %PipelineStage::FetchBackground);
        let background_summary = self.background.fetch_summary(topic).await?;

        info!(stage = %PipelineStage::FetchPapers);
        let papers = self.papers.fetch_papers(topic, self.max_papers).await?;

        info!(stage = %PipelineStage::Summarize, papers = papers.len());
        let paper_summaries = self.summarizer.summarize_papers(papers).await?;

        info!(stage = %PipelineStage::Compile, summaries = paper_summaries.len());
        let report = self
            .compiler
            .compile_report(topic, background_summary, paper_summaries);

        info!(stage = %PipelineStage::Done, generated_at = %report.generated_at);
        Ok(report)
    }

    /// Fixed status text; does not look at whether research actually ran.
    pub fn track_research_progress(&self, topic: &str) -> String {
        info!("Tracking progress for {}", topic);
        format_progress(topic)
    }

    pub fn generate_research_proposal(&self, topic: &str) -> String {
        info!("Generating research proposal for {}", topic);
        format_proposal(topic)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assistant::error::ResearchError;
    use crate::assistant::scholar::{ScholarRecord, ScholarSearch};
    use crate::assistant::state::{Paper, PaperSummary, PIPELINE_ERROR_SUMMARY};
    use async_trait::async_trait;

    struct StaticBackground;

    #[async_trait]
    impl BackgroundSource for StaticBackground {
        async fn fetch_summary(&self, topic: &str) -> Result<String> {
            Ok(format!("About {}", topic))
        }
    }

    struct StaticPapers(usize);

    #[async_trait]
    impl PaperSource for StaticPapers {
        async fn fetch_papers(&self, _topic: &str, max_papers: usize) -> Result<Vec<Paper>> {
            Ok((0..self.0.min(max_papers))
                .map(|i| Paper {
                    title: format!("Paper {}", i),
                    authors: vec!["A. Smith".to_string(), "B. Lee".to_string()],
                    year: 2020 + i as i32,
                    abstract_text: "abs".to_string(),
                    identifier: format!("10.1/{}", i),
                    link: "N/A".to_string(),
                })
                .collect())
        }
    }

    struct BrokenPapers;

    #[async_trait]
    impl PaperSource for BrokenPapers {
        async fn fetch_papers(&self, _topic: &str, _max_papers: usize) -> Result<Vec<Paper>> {
            Err(ResearchError::UpstreamStatus {
                service: "SerpAPI",
                status: 500,
            })
        }
    }

    struct DownSearch;

    #[async_trait]
    impl ScholarSearch for DownSearch {
        async fn search(&self, _query: &str, _limit: usize) -> Result<Vec<ScholarRecord>> {
            Err(ResearchError::UpstreamStatus {
                service: "SerpAPI",
                status: 503,
            })
        }
    }

    struct EchoSummarizer;

    #[async_trait]
    impl PaperSummarizer for EchoSummarizer {
        async fn summarize_papers(&self, papers: Vec<Paper>) -> Result<Vec<PaperSummary>> {
            Ok(papers
                .into_iter()
                .map(|p| {
                    let summary = format!("Summary of {}", p.title);
                    PaperSummary::from_paper(p, summary)
                })
                .collect())
        }
    }

    fn orchestrator(papers: Arc<dyn PaperSource>) -> Orchestrator {
        Orchestrator::new(Arc::new(StaticBackground), papers, Arc::new(EchoSummarizer))
    }

    #[tokio::test]
    async fn lists_stay_parallel_for_any_paper_count() {
        for count in [0, 1, 3, 5, 8] {
            let report = orchestrator(Arc::new(StaticPapers(count)))
                .research_topic("graphs")
                .await;
            let expected = count.min(DEFAULT_MAX_PAPERS);
            assert_eq!(report.paper_summaries.len(), expected);
            assert_eq!(report.citations_apa.len(), expected);
            assert_eq!(report.citations_mla.len(), expected);
        }
    }

    #[tokio::test]
    async fn full_run_fills_every_field() {
        let report = orchestrator(Arc::new(StaticPapers(2)))
            .research_topic("graphs")
            .await;
        assert_eq!(report.topic, "graphs");
        assert_eq!(report.background_summary, "About graphs");
        assert_eq!(report.paper_summaries[1].summary, "Summary of Paper 1");
        assert_eq!(
            report.citations_apa[0],
            "A. Smith, B. Lee. (2020). Paper 0. *Journal Name*. https://doi.org/10.1/0"
        );
        assert!(!report.generated_at.is_empty());
    }

    #[tokio::test]
    async fn max_papers_is_forwarded() {
        let report = orchestrator(Arc::new(StaticPapers(8)))
            .with_max_papers(2)
            .research_topic("graphs")
            .await;
        assert_eq!(report.paper_summaries.len(), 2);
    }

    #[tokio::test]
    async fn escaping_error_yields_pipeline_failure() {
        let report = orchestrator(Arc::new(BrokenPapers)).research_topic("graphs").await;
        assert_eq!(report.topic, "graphs");
        assert_eq!(report.background_summary, PIPELINE_ERROR_SUMMARY);
        assert!(report.paper_summaries.is_empty());
        assert!(report.citations_apa.is_empty());
        assert!(report.citations_mla.is_empty());
        assert_eq!(report.generated_at, "");
    }

    #[tokio::test]
    async fn absorbed_stage_failure_still_stamps_time() {
        let papers = Arc::new(ScholarFetcher::new(Arc::new(DownSearch)));
        let report = orchestrator(papers).research_topic("graphs").await;
        assert!(report.paper_summaries.is_empty());
        assert!(report.citations_apa.is_empty());
        assert_eq!(report.background_summary, "About graphs");
        assert!(!report.generated_at.is_empty());
    }

    #[test]
    fn auxiliary_texts_do_not_need_a_run() {
        let orchestrator = orchestrator(Arc::new(BrokenPapers));
        let progress = orchestrator.track_research_progress("X");
        let proposal = orchestrator.generate_research_proposal("X");
        assert_eq!(
            progress,
            "Progress on 'X': Research completed with Wikipedia summary and paper summaries."
        );
        assert!(proposal.starts_with("Research Proposal: X"));
    }

    #[test]
    fn from_config_requires_gemini_key() {
        assert!(Orchestrator::from_config(&Configuration::default()).is_err());

        let config = Configuration {
            gemini_api_key: Some("key".to_string()),
            max_papers: 3,
            ..Configuration::default()
        };
        let orchestrator = Orchestrator::from_config(&config).unwrap();
        assert_eq!(orchestrator.max_papers(), 3);
    }
}
