//! Scoring request and response types.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::analysis::MergedAnalysis;

/// One scored dimension with the evaluator's reasoning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DimensionScore {
    /// Score in `0.0..=100.0`.
    pub score: f64,
    #[serde(default)]
    pub rationale: String,
}

impl DimensionScore {
    pub fn new(score: f64, rationale: impl Into<String>) -> Self {
        Self {
            score,
            rationale: rationale.into(),
        }
    }
}

/// The four scored dimensions of a pitch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScoreBreakdown {
    pub idea: DimensionScore,
    pub technical: DimensionScore,
    pub tool_use: DimensionScore,
    pub presentation: DimensionScore,
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Compute and store the official scoring record of a session.
///
/// `breakdown` is the output of the LLM scoring provider; the analyses are
/// read from the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreSessionRequest {
    pub breakdown: ScoreBreakdown,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitJudgeScoreRequest {
    pub judge_id: String,
    pub breakdown: ScoreBreakdown,
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringRecordResponse {
    pub session_id: String,
    pub event_id: String,
    pub team_name: String,
    pub pitch_title: String,
    pub breakdown: ScoreBreakdown,
    pub total: f64,
    /// Absent on the official record.
    pub judge_id: Option<String>,
    /// Absent on judge records.
    pub analysis: Option<MergedAnalysis>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}
