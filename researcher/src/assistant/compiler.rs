use chrono::Local;
use tracing::{info, instrument};

use super::citation::generate_citations;
use super::state::{PaperSummary, ResearchReport};

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Default, Clone, Copy)]
pub struct ReportCompiler;

impl ReportCompiler {
    pub fn new() -> Self {
        Self
    }

    #[instrument(
        skip(self, background_summary, paper_summaries),
        fields(papers = paper_summaries.len())
    )]
    pub fn compile_report(
        &self,
        topic: &str,
        background_summary: String,
        paper_summaries: Vec<PaperSummary>,
    ) -> ResearchReport {
        info!("Compiling report for {}", topic);
        let (citations_apa, citations_mla): (Vec<String>, Vec<String>) =
            paper_summaries.iter().map(generate_citations).unzip();

        let report = ResearchReport {
            topic: topic.to_string(),
            background_summary,
            paper_summaries,
            citations_apa,
            citations_mla,
            generated_at: Local::now().format(TIMESTAMP_FORMAT).to_string(),
        };
        info!("Report compilation completed");
        report
    }
}
