pub const SUMMARIZE_INSTRUCTIONS: &str = "Summarize the following abstract in 3-5 sentences, focusing on key findings and methodology. Title: {title}\nAbstract: {abstract}";

pub const PROGRESS_TEMPLATE: &str =
    "Progress on '{topic}': Research completed with Wikipedia summary and paper summaries.";

pub const PROPOSAL_TEMPLATE: &str = r#"Research Proposal: {topic}

Objective: Investigate {topic} through literature review and analysis.

Methodology:
1. Conduct background research using Wikipedia.
2. Identify recent papers via Google Scholar.
3. Summarize findings and compile report.

Expected Outcomes: Comprehensive report with summaries and citations."#;

pub fn format_summarize_instructions(title: &str, abstract_text: &str) -> String {
    // `{title}` precedes `{abstract}`, so a single replacement never reaches inserted text.
    SUMMARIZE_INSTRUCTIONS
        .replace("{abstract}", abstract_text)
        .replacen("{title}", title, 1)
}

pub fn format_progress(topic: &str) -> String {
    PROGRESS_TEMPLATE.replace("{topic}", topic)
}

pub fn format_proposal(topic: &str) -> String {
    PROPOSAL_TEMPLATE.replace("{topic}", topic)
}
