use tracing::debug;

use super::state::PaperSummary;

/// Venue placeholder; search results carry no journal name.
const JOURNAL_PLACEHOLDER: &str = "*Journal Name*";

pub fn format_apa(paper: &PaperSummary) -> String {
    format!(
        "{}. ({}). {}. {}. https://doi.org/{}",
        paper.authors.join(", "),
        paper.year,
        paper.title,
        JOURNAL_PLACEHOLDER,
        paper.identifier
    )
}

pub fn format_mla(paper: &PaperSummary) -> String {
    format!(
        "{}. \"{}.\" {}, {}, doi:{}.",
        paper.authors.join(", "),
        paper.title,
        JOURNAL_PLACEHOLDER,
        paper.year,
        paper.identifier
    )
}

/// Returns `(apa, mla)`.
pub fn generate_citations(paper: &PaperSummary) -> (String, String) {
    debug!("Generating citations for {}", paper.title);
    (format_apa(paper), format_mla(paper))
}
