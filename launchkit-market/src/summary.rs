use std::sync::OnceLock;

use regex::Regex;

/// Reply of the summary endpoint when the summary call fails.
pub const SUMMARY_UNAVAILABLE: &str =
    "Unable to generate summary. Please refer to the full analysis.";

/// Summary used inside an analysis when the summary call fails and the
/// narrative has no paragraph to borrow.
pub const NO_SUMMARY_AVAILABLE: &str = "<p>No summary available.</p>";

pub fn summary_prompt(analysis_content: &str) -> String {
    format!(
        "Below is a detailed market analysis. Please create a concise 1-2 paragraph summary that captures the most important insights.
Focus on market size, growth potential, key competitors, and unique opportunities.
Make the summary informative yet brief, highlighting only the most critical information.

MARKET ANALYSIS:
{analysis_content}
"
    )
}

/// Drops markdown headings and emphasis markers, then trims.
pub fn clean_summary(summary: &str) -> String {
    static HEADINGS: OnceLock<Regex> = OnceLock::new();
    let headings = HEADINGS.get_or_init(|| Regex::new(r"(?m)^#+ ").expect("valid heading regex"));

    headings
        .replace_all(summary, "")
        .replace("**", "")
        .replace('*', "")
        .trim()
        .to_string()
}

/// First `<p>…</p>` element of `html`, tags included.
pub fn extract_first_paragraph(html: &str) -> String {
    static PARAGRAPH: OnceLock<Regex> = OnceLock::new();
    PARAGRAPH
        .get_or_init(|| Regex::new(r"<p>(.*?)</p>").expect("valid paragraph regex"))
        .find(html)
        .map(|found| found.as_str().to_string())
        .unwrap_or_else(|| NO_SUMMARY_AVAILABLE.to_string())
}
