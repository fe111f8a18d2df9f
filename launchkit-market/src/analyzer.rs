//! Market-analysis workflow over a [`GeminiClient`].

use launchkit_core::LaunchkitError;
use launchkit_llm::GeminiClient;
use tracing::Instrument;

use crate::chart::parse_chart_response;
use crate::content::{
    append_html_sources, narrative_markdown, process_market_analysis_content, strip_code_fences,
};
use crate::schema::{chart_data_schema, ChartSchemaOptions};
use crate::stage::{AnalysisRun, AnalysisStage};
use crate::summary::{clean_summary, extract_first_paragraph, summary_prompt};
use crate::types::{ChartData, MarketAnalysisResult};

#[derive(Clone, Debug, PartialEq)]
pub struct AnalyzerConfig {
    pub narrative_temperature: f32,
    pub chart_temperature: f32,
    pub summary_temperature: f32,
    /// Runs the optional summary call at the end of [`MarketAnalyzer::analyze`].
    pub include_summary: bool,
    pub chart_schema: ChartSchemaOptions,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            narrative_temperature: 0.7,
            chart_temperature: 0.7,
            summary_temperature: 0.5,
            include_summary: true,
            chart_schema: ChartSchemaOptions::default(),
        }
    }
}

impl AnalyzerConfig {
    pub fn with_summary(mut self, include_summary: bool) -> Self {
        self.include_summary = include_summary;
        self
    }

    pub fn with_chart_schema(mut self, chart_schema: ChartSchemaOptions) -> Self {
        self.chart_schema = chart_schema;
        self
    }
}

pub fn narrative_prompt(project_description: &str) -> String {
    format!(
        "Analyze the following project idea and provide a detailed market analysis:

Structure your response with the following sections:
1. A brief summary of the project
2. Key Competitors
3. Market Trends
4. Market Opportunities
5. Market Size Estimate
6. Recommendations

Format your response as HTML with Tailwind CSS classes. Use the following guidelines:
- Use <h1>, <h2>, <h3> tags for headings with appropriate Tailwind classes
- Use <p> tags for paragraphs with appropriate Tailwind classes
- Use <ul> and <li> tags for lists with appropriate Tailwind classes
- Include relevant statistics and data when available
- Cite your sources using superscript notation (e.g., <sup>1</sup>) and provide a sources section at the end
- Use Tailwind classes for styling: text-lg for normal text, text-xl for important points, font-semibold for emphasis
- For headings use: text-2xl font-bold text-primary for main headings, text-xl font-semibold for subheadings
- For lists use: list-disc pl-5 space-y-2 my-4
- For paragraphs use: my-4 text-gray-800 dark:text-gray-200

Project: {project_description}
"
    )
}

pub fn chart_prompt(project_description: &str) -> String {
    format!(
        "Based on the following project description and the latest market data from 2024, generate realistic chart data for market analysis visualization.
Use these guidelines for data accuracy:

1. Market Share Distribution (pieChart):
   - Use actual market share percentages of major companies in the relevant sector
   - Include \"Others\" category to account for smaller players
   - Values should sum to 100%
   - Label format: \"Company Name\" or \"Segment Name\"

2. Market Growth Trends (areaChart):
   - Show market size in billions USD from 2019 to 2024
   - Use actual historical data where available
   - Label format: \"YYYY\" for years

3. Key Metrics Comparison (barChart):
   - Compare actual metrics like revenue, user base, or market penetration
   - Use the latest available data from 2024
   - Include proper units (e.g., \"$\", \"M users\", \"%\")
   - Do not include hypothetical values for the project
   - Label format: \"Metric - Company/Segment\"

Project Description: {project_description}

Focus on providing accurate, real-world data from reliable sources. Do not include speculative values for the project itself.
"
    )
}

/// Orchestrates the narrative, chart and summary calls for one request.
///
/// Calls run one after another. Only the narrative call can fail the
/// request; chart and summary failures degrade to fixed fallbacks.
#[derive(Clone, Debug)]
pub struct MarketAnalyzer {
    client: GeminiClient,
    config: AnalyzerConfig,
}

impl MarketAnalyzer {
    pub fn new(client: GeminiClient) -> Self {
        Self {
            client,
            config: AnalyzerConfig::default(),
        }
    }

    pub fn with_config(mut self, config: AnalyzerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    pub async fn analyze(
        &self,
        project_description: &str,
    ) -> Result<MarketAnalysisResult, LaunchkitError> {
        let mut run = AnalysisRun::new();
        let span = tracing::info_span!(
            "market_analysis",
            run_id = %run.id(),
            model = %self.client.model()
        );
        async move {
            run.advance(AnalysisStage::NarrativeGenerating);
            let narrative = match self
                .client
                .generate_with_search(
                    &narrative_prompt(project_description),
                    self.config.narrative_temperature,
                )
                .await
            {
                Ok(narrative) => narrative,
                Err(err) => {
                    run.advance(AnalysisStage::Failed);
                    return Err(err);
                }
            };

            let content = process_market_analysis_content(&strip_code_fences(&narrative.text));
            let grounding = narrative.grounding_metadata.as_ref();
            let grounding_chunks = grounding.and_then(|metadata| metadata.grounding_chunks.clone());
            let html_content = append_html_sources(&content, grounding);
            let markdown = narrative_markdown(&content, grounding_chunks.as_deref());

            run.advance(AnalysisStage::ChartGenerating);
            let chart_data = self.generate_chart_data(project_description).await;

            let summary = if self.config.include_summary {
                run.advance(AnalysisStage::SummaryGenerating);
                Some(self.summarize_or_fallback(&html_content).await)
            } else {
                None
            };

            run.advance(AnalysisStage::Complete);

            Ok(MarketAnalysisResult {
                content: markdown,
                is_grounded: grounding.is_some(),
                search_suggestions: grounding
                    .map(|metadata| metadata.web_search_queries.clone())
                    .unwrap_or_default(),
                rendered_content: narrative.search_suggestions_html().map(str::to_string),
                grounding_chunks,
                chart_data: Some(chart_data),
                summary,
                html_content,
            })
        }
        .instrument(span)
        .await
    }

    /// Structured chart request. Never fails: any provider or parse error
    /// yields the fallback dataset.
    pub async fn generate_chart_data(&self, project_description: &str) -> ChartData {
        let schema = chart_data_schema(&self.config.chart_schema);
        match self
            .client
            .generate_structured(
                &chart_prompt(project_description),
                &schema,
                self.config.chart_temperature,
            )
            .await
        {
            Ok(response) => parse_chart_response(&response.text),
            Err(err) => {
                tracing::warn!(error = %err, "chart data generation failed, using fallback");
                crate::chart::fallback_chart_data()
            }
        }
    }

    /// One- or two-paragraph summary of `analysis_content`, without search.
    pub async fn generate_summary(&self, analysis_content: &str) -> Result<String, LaunchkitError> {
        let response = self
            .client
            .generate_without_tools(
                &summary_prompt(analysis_content),
                self.config.summary_temperature,
            )
            .await?;
        Ok(clean_summary(&response.text))
    }

    /// Like [`generate_summary`](Self::generate_summary), but falls back to
    /// the first paragraph of `html_content` on failure.
    pub async fn summarize_or_fallback(&self, html_content: &str) -> String {
        match self.generate_summary(html_content).await {
            Ok(summary) => summary,
            Err(err) => {
                tracing::warn!(error = %err, "summary generation failed, using first paragraph");
                extract_first_paragraph(html_content)
            }
        }
    }
}
