//! Market-analysis workflow for launchkit.
//!
//! A [`MarketAnalyzer`] asks Gemini for a search-grounded HTML narrative and
//! for schema-shaped chart data, cleans both up, and merges them into a
//! [`MarketAnalysisResult`].
//!
//! ```no_run
//! use launchkit_llm::GeminiClient;
//! use launchkit_market::MarketAnalyzer;
//!
//! # async fn run() -> Result<(), launchkit_core::LaunchkitError> {
//! let client = GeminiClient::from_env().expect("GEMINI_API_KEY is set");
//! let analysis = MarketAnalyzer::new(client)
//!     .analyze("A mobile app for personalized workout plans")
//!     .await?;
//! println!("{}", analysis.content);
//! # Ok(())
//! # }
//! ```

mod analyzer;
pub mod chart;
pub mod content;
pub mod schema;
mod stage;
pub mod summary;
mod types;

pub use analyzer::{chart_prompt, narrative_prompt, AnalyzerConfig, MarketAnalyzer};
pub use chart::{fallback_chart_data, sanitize_chart_data};
pub use content::{clean_html_meta_explanations, html_to_markdown, remove_meta_explanations};
pub use schema::{chart_data_schema, ChartSchemaOptions};
pub use stage::{AnalysisRun, AnalysisStage};
pub use summary::{extract_first_paragraph, SUMMARY_UNAVAILABLE};
pub use types::{BarPoint, ChartData, ChartPoint, MarketAnalysisResult};
