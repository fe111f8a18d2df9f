use launchkit_llm::{GroundingChunk, GroundingMetadata, WebSource};
use launchkit_market::content::{
    append_html_sources, markdown_sources, narrative_markdown, process_market_analysis_content,
};
use launchkit_market::{clean_html_meta_explanations, html_to_markdown, remove_meta_explanations};

const REPORT: &str = r#"<div class="container mx-auto p-8">
  <h1 class="text-3xl font-bold mb-6 text-primary">Market Analysis: Junk Removal in Salt Lake City</h1>
  <h2 class="text-2xl font-semibold mb-4 text-primary">Key Competitors</h2>
  <ul class="list-disc pl-5 space-y-2 my-4">
    <li class="text-gray-800">1-800-GOT-JUNK</li>
  </ul>
</div>"#;

fn chunk(uri: &str, title: &str) -> GroundingChunk {
    GroundingChunk {
        web: Some(WebSource {
            uri: uri.to_string(),
            title: title.to_string(),
        }),
    }
}

fn grounding(chunks: Vec<GroundingChunk>) -> GroundingMetadata {
    GroundingMetadata {
        web_search_queries: vec!["junk removal salt lake".to_string()],
        grounding_chunks: Some(chunks),
        ..GroundingMetadata::default()
    }
}

#[test]
fn key_improvements_trailer_is_removed() {
    let input = format!(
        "{REPORT}\n\nKey improvements and explanations:\n* **HTML Structure:** Uses Tailwind.\n* **Clear Sections:** Split up.\n"
    );
    assert_eq!(remove_meta_explanations(&input), REPORT);
}

#[test]
fn bold_bullet_explanations_are_removed() {
    let input = "<p>Body</p>\n\n* **Detailed Analysis:** deeper.\n* **Market Trends:** expanded.";
    assert_eq!(remove_meta_explanations(input), "<p>Body</p>");
}

#[test]
fn placeholder_reminders_are_removed() {
    let input = "<p>Size: $4B</p> *Replace the Placeholder figures* <p>More</p>";
    assert_eq!(
        remove_meta_explanations(input),
        "<p>Size: $4B</p>  <p>More</p>"
    );
}

#[test]
fn self_narration_paragraphs_are_removed_up_to_blank_line() {
    let input = "<p>Intro</p>\n\nI've added a competitor table.\nIt is sortable.\n\n<p>Trends</p>\n\nI've included links.";
    assert_eq!(
        remove_meta_explanations(input),
        "<p>Intro</p>\n\n<p>Trends</p>"
    );
}

#[test]
fn note_trailer_truncates_to_end() {
    let input = "<p>Market is growing.</p>\n\nNote: figures are estimates.\n\n<p>Tail</p>";
    assert_eq!(remove_meta_explanations(input), "<p>Market is growing.</p>");
}

#[test]
fn deletions_that_form_new_triggers_are_stripped_too() {
    assert_eq!(
        remove_meta_explanations(
            "Intro\n\nKey improvements *a placeholder*and explanations: tail"
        ),
        "Intro"
    );
    assert_eq!(
        remove_meta_explanations("Intro\n\n* I've added z\n\n**Label:** text"),
        "Intro"
    );
}

#[test]
fn empty_input_stays_empty() {
    assert_eq!(remove_meta_explanations(""), "");
    assert_eq!(clean_html_meta_explanations(""), "");
}

#[test]
fn meta_removal_is_idempotent_over_corpus() {
    let corpus = [
        REPORT.to_string(),
        format!("{REPORT}\n\nKey improvements and explanations:\n* **A:** b"),
        "Intro\n\n\n\nRemember to replace the numbers.\n\nOutro\n\n\n".to_string(),
        "* **Label:** x\n* **Other:** y\n\nUsing Tailwind CSS for layout.".to_string(),
        "<p>A simple way to view this is a browser.</p>\n\nAdditional notes: none".to_string(),
        "   plain text with no commentary   ".to_string(),
        "Intro\n\nKey improvements *a placeholder*and explanations: tail".to_string(),
        "Intro\n\n* I've added z\n\n**Label:** text".to_string(),
    ];
    for input in corpus {
        let once = remove_meta_explanations(&input);
        assert_eq!(remove_meta_explanations(&once), once, "{input:?}");
    }
}

#[test]
fn html_cleanup_strips_comments_scripts_and_explanation_blocks() {
    let input = r#"<div>
<!-- generated by model -->
<h1>Report</h1>
<script>console.log("x")</script>
<style>.a { color: red }</style>
<div class="explanation">
  <p>This uses Tailwind.</p>
</div>
<section id="design-note">Design notes</section>
<p>Keep me</p>
</div>"#;
    let cleaned = clean_html_meta_explanations(input);
    assert!(!cleaned.contains("generated by model"));
    assert!(!cleaned.contains("console.log"));
    assert!(!cleaned.contains("color: red"));
    assert!(!cleaned.contains("This uses Tailwind"));
    assert!(!cleaned.contains("Design notes"));
    assert!(cleaned.contains("<h1>Report</h1>"));
    assert!(cleaned.contains("<p>Keep me</p>"));
}

#[test]
fn html_cleanup_removes_trailing_note_paragraph() {
    let input = "<h1>Report</h1>\n<p>Body</p>\n<p class=\"small\">Remember to verify these numbers.</p>\n";
    assert_eq!(
        clean_html_meta_explanations(input),
        "<h1>Report</h1>\n<p>Body</p>\n"
    );
}

#[test]
fn html_cleanup_ignores_non_html() {
    let input = "<!-- looks like a comment --> but no block tags";
    assert_eq!(clean_html_meta_explanations(input), input);
}

#[test]
fn combined_processing_handles_html_explanations() {
    let input = r#"<div class="container">
<h1>Report</h1>
<div class="note-box">
<span>See below</span>
</div>
<p>Body</p>
</div>"#;
    let processed = process_market_analysis_content(input);
    assert!(!processed.contains("See below"));
    assert!(processed.contains("<p>Body</p>"));
}

#[test]
fn markdown_conversion_follows_tag_rules() {
    let html = r#"<h1 class="t">Title</h1><h2>Section</h2><h3>Sub</h3><p class="x">Growth is 12%<sup>1</sup>, see <a class="l" href="https://ex.com">Ex</a>.</p><ul class="list"><li>One</li><li>Two</li></ul><span>tail</span>"#;
    assert_eq!(
        html_to_markdown(html),
        "# Title\n\n## Section\n\n### Sub\n\nGrowth is 12%^1, see [Ex](https://ex.com).\n\n- One\n- Two\n\ntail"
    );
}

#[test]
fn markdown_conversion_passes_through_non_html() {
    let text = "Just a <b>bold</b> claim.";
    assert_eq!(html_to_markdown(text), text);
}

#[test]
fn markdown_sources_are_numbered_by_chunk_position() {
    let chunks = vec![
        chunk("https://a.com", "a.com"),
        GroundingChunk { web: None },
        chunk("https://c.com", "c.com"),
    ];
    assert_eq!(
        markdown_sources(&chunks),
        "\n\n## Sources\n1. a.com\n3. c.com\n"
    );
    assert_eq!(markdown_sources(&[]), "");
}

#[test]
fn narrative_markdown_only_lists_sources_for_converted_html() {
    let chunks = vec![chunk("https://a.com", "a.com")];
    assert_eq!(
        narrative_markdown("<p>Body</p>", Some(&chunks)),
        "Body\n\n\n\n## Sources\n1. a.com\n"
    );
    assert_eq!(narrative_markdown("plain", Some(&chunks)), "plain");
}

#[test]
fn html_sources_are_appended_from_grounding() {
    let metadata = grounding(vec![chunk("https://a.com/?q=1&r=2", "A <Co>")]);
    let html = append_html_sources("<h1>Report</h1>", Some(&metadata));
    assert!(html.starts_with("<h1>Report</h1>\n<h2"));
    assert!(html.contains(">Sources</h2>"));
    assert!(html.contains(r#"<a href="https://a.com/?q=1&amp;r=2""#));
    assert!(html.contains(">A &lt;Co&gt;</a>"));
    assert!(html.trim_end().ends_with("</ol>"));
}

#[test]
fn html_sources_are_not_duplicated_or_invented() {
    let metadata = grounding(vec![chunk("https://a.com", "a.com")]);
    let with_heading = "<h2 class=\"x\">Sources</h2><ol><li>a.com</li></ol>";
    assert_eq!(append_html_sources(with_heading, Some(&metadata)), with_heading);

    assert_eq!(append_html_sources("<p>x</p>", None), "<p>x</p>");
    let no_web = grounding(vec![GroundingChunk { web: None }]);
    assert_eq!(append_html_sources("<p>x</p>", Some(&no_web)), "<p>x</p>");
}
