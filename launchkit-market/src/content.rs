//! Post-processing for generated narrative content.
//!
//! Every step is a best-effort textual filter over known model phrasings and
//! tag shapes, not a parser. Rules run in a fixed order and each one sees the
//! output of the previous one.

use std::sync::OnceLock;

use launchkit_llm::{GroundingChunk, GroundingMetadata, WebSource};
use regex::Regex;

fn regex(pattern: &str) -> Regex {
    Regex::new(pattern).expect("valid content regex")
}

/// Removes ``` fences and their language tags.
pub fn strip_code_fences(content: &str) -> String {
    static OPEN: OnceLock<Regex> = OnceLock::new();
    static CLOSE: OnceLock<Regex> = OnceLock::new();
    let open = OPEN.get_or_init(|| regex(r"```(\w+)?\n"));
    let close = CLOSE.get_or_init(|| regex(r"```\n?"));

    let content = open.replace_all(content, "");
    close.replace_all(&content, "").trim().to_string()
}

enum MetaRule {
    /// Trigger phrase through end of input.
    ToEnd(&'static str),
    /// Trigger phrase through the next blank line, or end of input.
    Paragraph(&'static str),
    /// Every match of the pattern.
    Pattern(Regex),
    /// Each `head` match through the next `until` match, or end of input.
    Until { head: Regex, until: Regex },
}

impl MetaRule {
    fn apply(&self, content: &str) -> String {
        match self {
            MetaRule::ToEnd(trigger) => match content.find(trigger) {
                Some(start) => content[..start].to_string(),
                None => content.to_string(),
            },
            MetaRule::Paragraph(trigger) => {
                let mut out = String::with_capacity(content.len());
                let mut rest = content;
                while let Some(start) = rest.find(trigger) {
                    out.push_str(&rest[..start]);
                    let after = &rest[start + trigger.len()..];
                    rest = match after.find("\n\n") {
                        Some(end) => &after[end..],
                        None => "",
                    };
                }
                out.push_str(rest);
                out
            }
            MetaRule::Pattern(pattern) => pattern.replace_all(content, "").into_owned(),
            MetaRule::Until { head, until } => {
                let mut out = String::with_capacity(content.len());
                let mut pos = 0;
                while let Some(found) = head.find_at(content, pos) {
                    out.push_str(&content[pos..found.start()]);
                    pos = until
                        .find_at(content, found.end())
                        .map_or(content.len(), |next| next.start());
                }
                out.push_str(&content[pos..]);
                out
            }
        }
    }
}

fn meta_rules() -> &'static [MetaRule] {
    static RULES: OnceLock<Vec<MetaRule>> = OnceLock::new();
    RULES.get_or_init(|| {
        vec![
            MetaRule::ToEnd("Key improvements and explanations:"),
            MetaRule::Until {
                head: regex(r"\*\s*\*\*[\w\s]+:\*\*"),
                until: regex(r"\*\s*\*\*"),
            },
            MetaRule::Pattern(regex(r"(?i)\*[^*]*placeholder[^*]*\*")),
            MetaRule::Paragraph("Remember to replace"),
            MetaRule::Paragraph("You would need to"),
            MetaRule::Paragraph("A simple way to"),
            MetaRule::Paragraph("Simply opening the HTML"),
            MetaRule::Paragraph("This improved response provides"),
            MetaRule::Paragraph("I've structured the"),
            MetaRule::Paragraph("I've designed this"),
            MetaRule::Paragraph("I've added"),
            MetaRule::Paragraph("I've included"),
            MetaRule::Paragraph("I've implemented"),
            MetaRule::Paragraph("The Tailwind CSS classes"),
            MetaRule::Paragraph("Using Tailwind CSS"),
            MetaRule::ToEnd("Note:"),
            MetaRule::ToEnd("Additional notes:"),
        ]
    })
}

fn strip_meta_once(content: &str) -> String {
    static BLANK_RUNS: OnceLock<Regex> = OnceLock::new();
    let stripped = meta_rules()
        .iter()
        .fold(content.to_string(), |acc, rule| rule.apply(&acc));
    BLANK_RUNS
        .get_or_init(|| regex(r"\n{3,}"))
        .replace_all(&stripped, "\n\n")
        .trim()
        .to_string()
}

/// Strips the model's commentary about its own output ("I've added…",
/// "Note:…" trailers and similar), then collapses blank-line runs and trims.
///
/// A deletion can splice text into a new trigger, so the rules are reapplied
/// until nothing changes. Every rule only removes text, so this terminates.
pub fn remove_meta_explanations(content: &str) -> String {
    let mut current = content.to_string();
    loop {
        let next = strip_meta_once(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn looks_like_html(content: &str) -> bool {
    ["<html", "<body", "<div", "<h1", "<p"]
        .iter()
        .any(|marker| content.contains(marker))
}

fn html_rules() -> &'static [Regex] {
    static RULES: OnceLock<Vec<Regex>> = OnceLock::new();
    RULES.get_or_init(|| {
        vec![
            regex(r"(?s)<!--.*?-->"),
            regex(r"(?is)<script.*?</script>"),
            regex(r"(?is)<style.*?</style>"),
            regex(r"(?is)<p[^>]*>(?:Note:|Additional notes:|Remember to).*?</p>\s*\z"),
            regex(r#"(?is)<div[^>]*class="[^"]*explanation[^"]*"[^>]*>.*?</div>"#),
            regex(r#"(?is)<div[^>]*class="[^"]*note[^"]*"[^>]*>.*?</div>"#),
            regex(r#"(?is)<[^>]*id="[^"]*explanation[^"]*"[^>]*>.*?</[^>]*>"#),
            regex(r#"(?is)<[^>]*id="[^"]*note[^"]*"[^>]*>.*?</[^>]*>"#),
        ]
    })
}

/// HTML-aware cleanup: comments, `<script>`/`<style>` blocks, trailing note
/// paragraphs and explanation/note-tagged elements. Non-HTML input is
/// returned unchanged.
pub fn clean_html_meta_explanations(content: &str) -> String {
    if !looks_like_html(content) {
        return content.to_string();
    }
    html_rules().iter().fold(content.to_string(), |acc, rule| {
        rule.replace_all(&acc, "").into_owned()
    })
}

/// Meta-commentary removal followed by the HTML-aware pass.
pub fn process_market_analysis_content(content: &str) -> String {
    clean_html_meta_explanations(&remove_meta_explanations(content))
}

fn markdown_rules() -> &'static [(Regex, &'static str)] {
    static RULES: OnceLock<Vec<(Regex, &'static str)>> = OnceLock::new();
    RULES.get_or_init(|| {
        vec![
            (regex(r"(?i)<h1[^>]*>(.*?)</h1>"), "# ${1}\n\n"),
            (regex(r"(?i)<h2[^>]*>(.*?)</h2>"), "## ${1}\n\n"),
            (regex(r"(?i)<h3[^>]*>(.*?)</h3>"), "### ${1}\n\n"),
            (regex(r"(?i)<p[^>]*>(.*?)</p>"), "${1}\n\n"),
            (regex(r"(?i)<ul[^>]*>(.*?)</ul>"), "${1}\n"),
            (regex(r"(?i)<li[^>]*>(.*?)</li>"), "- ${1}\n"),
            (regex(r"(?i)<sup>(.*?)</sup>"), "^${1}"),
            (regex(r#"(?i)<a[^>]*href="([^"]*)"[^>]*>(.*?)</a>"#), "[${2}](${1})"),
            (regex(r"<[^>]*>"), ""),
        ]
    })
}

fn has_block_markup(content: &str) -> bool {
    ["<h1", "<h2", "<p"].iter().any(|tag| content.contains(tag))
}

/// Lossy HTML to markdown conversion. Content without `<h1`, `<h2` or `<p`
/// is returned as is.
pub fn html_to_markdown(content: &str) -> String {
    if !has_block_markup(content) {
        return content.to_string();
    }
    markdown_rules()
        .iter()
        .fold(content.to_string(), |acc, (pattern, replacement)| {
            pattern.replace_all(&acc, *replacement).into_owned()
        })
}

fn web_sources(chunks: &[GroundingChunk]) -> impl Iterator<Item = (usize, &WebSource)> {
    chunks
        .iter()
        .enumerate()
        .filter_map(|(index, chunk)| chunk.web.as_ref().map(|web| (index, web)))
}

/// `## Sources` list numbered by chunk position; empty when no chunk
/// carries a web source.
pub fn markdown_sources(chunks: &[GroundingChunk]) -> String {
    if chunks.is_empty() {
        return String::new();
    }
    let mut section = String::from("\n\n## Sources\n");
    for (index, web) in web_sources(chunks) {
        section.push_str(&format!("{}. {}\n", index + 1, web.title));
    }
    section
}

/// Markdown mirror of the narrative. The sources list is only added when
/// the content was actually converted from HTML.
pub fn narrative_markdown(content: &str, chunks: Option<&[GroundingChunk]>) -> String {
    if !has_block_markup(content) {
        return content.to_string();
    }
    let markdown = html_to_markdown(content);
    match chunks {
        Some(chunks) => markdown + &markdown_sources(chunks),
        None => markdown,
    }
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// True if the content already has a heading that starts with "Sources".
pub fn has_sources_heading(content: &str) -> bool {
    static HEADING: OnceLock<Regex> = OnceLock::new();
    HEADING
        .get_or_init(|| regex(r"(?i)<h[1-6][^>]*>\s*Sources"))
        .is_match(content)
}

/// Appends a numbered source list built from the grounding chunks, unless
/// there is nothing to cite or the content already lists its sources.
pub fn append_html_sources(content: &str, grounding: Option<&GroundingMetadata>) -> String {
    let chunks = grounding
        .and_then(|metadata| metadata.grounding_chunks.as_deref())
        .unwrap_or_default();
    if web_sources(chunks).next().is_none() || has_sources_heading(content) {
        return content.to_string();
    }

    let mut html = String::from(content);
    html.push_str("\n<h2 class=\"text-xl font-semibold mt-8 mb-4 text-primary\">Sources</h2>\n");
    html.push_str("<ol class=\"list-decimal pl-5 space-y-2\">\n");
    for (_, web) in web_sources(chunks) {
        html.push_str(&format!(
            "<li class=\"text-sm text-gray-700 dark:text-gray-300\"><a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\" class=\"text-primary hover:underline\">{}</a></li>\n",
            escape_html(&web.uri),
            escape_html(&web.title),
        ));
    }
    html.push_str("</ol>\n");
    html
}
