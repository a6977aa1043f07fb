use serde::{Deserialize, Serialize};
use std::fmt;

pub const NO_SUMMARY_AVAILABLE: &str = "No summary available.";
pub const PIPELINE_ERROR_SUMMARY: &str = "Error in research pipeline";

/// A paper as returned by the scholarly search, with defaults already applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paper {
    pub title: String,
    pub authors: Vec<String>,
    pub year: i32,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    /// DOI when one could be recovered, otherwise "N/A".
    #[serde(rename = "doi")]
    pub identifier: String,
    #[serde(rename = "url")]
    pub link: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaperSummary {
    pub title: String,
    pub authors: Vec<String>,
    pub year: i32,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub summary: String,
    #[serde(rename = "doi")]
    pub identifier: String,
    #[serde(rename = "url")]
    pub link: String,
}

impl PaperSummary {
    pub fn from_paper(paper: Paper, summary: String) -> Self {
        Self {
            title: paper.title,
            authors: paper.authors,
            year: paper.year,
            abstract_text: paper.abstract_text,
            summary,
            identifier: paper.identifier,
            link: paper.link,
        }
    }
}

/// Output of one pipeline run. `citations_apa` and `citations_mla` are index-parallel
/// to `paper_summaries`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResearchReport {
    pub topic: String,
    #[serde(rename = "wikipedia_summary")]
    pub background_summary: String,
    pub paper_summaries: Vec<PaperSummary>,
    pub citations_apa: Vec<String>,
    pub citations_mla: Vec<String>,
    /// `YYYY-MM-DD HH:MM:SS`, empty when the whole pipeline failed.
    pub generated_at: String,
}

impl ResearchReport {
    pub fn pipeline_failure(topic: &str) -> Self {
        Self {
            topic: topic.to_string(),
            background_summary: PIPELINE_ERROR_SUMMARY.to_string(),
            paper_summaries: Vec::new(),
            citations_apa: Vec::new(),
            citations_mla: Vec::new(),
            generated_at: String::new(),
        }
    }

    pub fn is_pipeline_failure(&self) -> bool {
        self.generated_at.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    FetchBackground,
    FetchPapers,
    Summarize,
    Compile,
    Done,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineStage::FetchBackground => "fetch_background",
            PipelineStage::FetchPapers => "fetch_papers",
            PipelineStage::Summarize => "summarize",
            PipelineStage::Compile => "compile",
            PipelineStage::Done => "done",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_serializes_with_front_end_field_names() {
        let report = ResearchReport {
            topic: "t".to_string(),
            background_summary: "bg".to_string(),
            paper_summaries: vec![PaperSummary {
                title: "X".to_string(),
                authors: vec!["A".to_string()],
                year: 2020,
                abstract_text: "abs".to_string(),
                summary: "sum".to_string(),
                identifier: "10.1/x".to_string(),
                link: "https://x".to_string(),
            }],
            citations_apa: vec!["apa".to_string()],
            citations_mla: vec!["mla".to_string()],
            generated_at: "2024-01-01 00:00:00".to_string(),
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["wikipedia_summary"], "bg");
        assert_eq!(json["paper_summaries"][0]["abstract"], "abs");
        assert_eq!(json["paper_summaries"][0]["doi"], "10.1/x");
        assert_eq!(json["paper_summaries"][0]["url"], "https://x");
    }

    #[test]
    fn pipeline_failure_has_no_timestamp() {
        let report = ResearchReport::pipeline_failure("t");
        assert!(report.is_pipeline_failure());
        assert_eq!(report.background_summary, PIPELINE_ERROR_SUMMARY);
        assert!(report.paper_summaries.is_empty());
    }

    #[test]
    fn stage_display_matches_serde_name() {
        for stage in [
            PipelineStage::FetchBackground,
            PipelineStage::FetchPapers,
            PipelineStage::Summarize,
            PipelineStage::Compile,
            PipelineStage::Done,
        ] {
            let json = serde_json::to_value(stage).unwrap();
            assert_eq!(json, stage.to_string());
        }
    }
}
