use launchkit_llm::GroundingChunk;
use serde::{Deserialize, Serialize};

/// One slice of the pie chart or one point of the area series.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct ChartPoint {
    pub name: String,
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

impl ChartPoint {
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value,
            unit: None,
        }
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }
}

/// One row of the bar comparison, optionally with a second series.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BarPoint {
    pub name: String,
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_unit: Option<String>,
}

/// The three chart shapes. An absent chart is `None`, never an empty vector.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChartData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pie_chart: Option<Vec<ChartPoint>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area_chart: Option<Vec<ChartPoint>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bar_chart: Option<Vec<BarPoint>>,
}

impl ChartData {
    pub fn is_empty(&self) -> bool {
        self.pie_chart.is_none() && self.area_chart.is_none() && self.bar_chart.is_none()
    }
}

/// Everything one market-analysis request returns to the caller.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MarketAnalysisResult {
    /// Markdown mirror of `html_content`.
    pub content: String,
    pub html_content: String,
    pub is_grounded: bool,
    pub search_suggestions: Vec<String>,
    /// Always serialized, `null` when the provider sent no suggestion chips.
    pub rendered_content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grounding_chunks: Option<Vec<GroundingChunk>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chart_data: Option<ChartData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}
