use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Progress of a single market-analysis request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnalysisStage {
    Pending,
    NarrativeGenerating,
    ChartGenerating,
    SummaryGenerating,
    Complete,
    Failed,
}

impl AnalysisStage {
    pub fn is_terminal(&self) -> bool {
        matches!(self, AnalysisStage::Complete | AnalysisStage::Failed)
    }

    /// Only narrative failure is fatal; the summary stage may be skipped.
    pub fn can_transition_to(&self, next: AnalysisStage) -> bool {
        use AnalysisStage::*;
        matches!(
            (self, next),
            (Pending, NarrativeGenerating)
                | (NarrativeGenerating, ChartGenerating)
                | (NarrativeGenerating, Failed)
                | (ChartGenerating, SummaryGenerating)
                | (ChartGenerating, Complete)
                | (SummaryGenerating, Complete)
        )
    }
}

/// Walks one request through [`AnalysisStage`]s, logging every move.
#[derive(Debug)]
pub struct AnalysisRun {
    id: Uuid,
    started_at: DateTime<Utc>,
    stage: AnalysisStage,
    history: Vec<AnalysisStage>,
}

impl Default for AnalysisRun {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalysisRun {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            stage: AnalysisStage::Pending,
            history: vec![AnalysisStage::Pending],
        }
    }

    /// Correlates the log lines of one request.
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn stage(&self) -> AnalysisStage {
        self.stage
    }

    /// Stages visited so far, starting with `Pending`.
    pub fn history(&self) -> &[AnalysisStage] {
        &self.history
    }

    /// Moves to `next`. Illegal moves are ignored and reported as `false`.
    pub fn advance(&mut self, next: AnalysisStage) -> bool {
        if !self.stage.can_transition_to(next) {
            tracing::warn!(
                from = ?self.stage,
                to = ?next,
                "ignored illegal analysis stage transition"
            );
            return false;
        }
        tracing::debug!(from = ?self.stage, stage = ?next, "analysis stage");
        self.stage = next;
        self.history.push(next);
        if next.is_terminal() {
            let elapsed = Utc::now() - self.started_at;
            tracing::info!(
                stage = ?next,
                elapsed_ms = elapsed.num_milliseconds(),
                "analysis finished"
            );
        }
        true
    }
}
