//! Audio-intelligence payloads produced by the transcription pipeline.
//!
//! Two analyses exist per session: a *baseline* analysis that arrives with
//! the transcript (broad feature set, lower confidence) and an optional
//! *enhanced* analysis from a secondary pass (narrow feature set, higher
//! confidence, may fail).

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SentimentSummary {
    pub overall: Sentiment,
    /// Polarity in `-1.0..=1.0`.
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EmotionScore {
    pub emotion: String,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NamedEntity {
    pub text: String,
    pub entity_type: String,
    #[serde(default)]
    pub mentions: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Chapter {
    pub start_ms: u64,
    pub end_ms: u64,
    pub headline: String,
    #[serde(default)]
    pub summary: String,
}

/// Delivery metrics specific to pitching, only computed by the enhanced pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PitchMetrics {
    pub clarity: f64,
    pub persuasiveness: f64,
    pub energy: f64,
    pub pace_wpm: f64,
    pub filler_word_ratio: f64,
}

/// Which analysis a scoring record treated as authoritative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimaryAnalysis {
    Baseline,
    Enhanced,
}

/// Informational record of how a scoring record's analysis was chosen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnalysisProvenance {
    pub primary_analysis: PrimaryAnalysis,
    pub primary_analysis_confidence: f64,
    /// `enhanced / baseline` confidence, only when both analyses were usable.
    pub confidence_improvement: Option<f64>,
}

/// Result of reconciling the baseline and enhanced analyses of one session.
///
/// Baseline-only features (emotions, entities, chapters, summary) and
/// enhanced-only features (pitch metrics) are both carried, so no feature is
/// lost when the enhanced pass becomes primary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MergedAnalysis {
    pub provenance: AnalysisProvenance,
    pub sentiment: Option<SentimentSummary>,
    pub emotions: Vec<EmotionScore>,
    pub entities: Vec<NamedEntity>,
    pub chapters: Vec<Chapter>,
    pub summary: Option<String>,
    pub pitch_metrics: Option<PitchMetrics>,
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreBaselineAnalysisRequest {
    pub confidence: f64,
    pub sentiment: SentimentSummary,
    #[serde(default)]
    pub emotions: Vec<EmotionScore>,
    #[serde(default)]
    pub entities: Vec<NamedEntity>,
    #[serde(default)]
    pub chapters: Vec<Chapter>,
    #[serde(default)]
    pub summary: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreEnhancedAnalysisRequest {
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub sentiment: Option<SentimentSummary>,
    #[serde(default)]
    pub pitch_metrics: Option<PitchMetrics>,
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaselineAnalysisResponse {
    pub session_id: String,
    pub confidence: f64,
    pub sentiment: SentimentSummary,
    pub emotions: Vec<EmotionScore>,
    pub entities: Vec<NamedEntity>,
    pub chapters: Vec<Chapter>,
    pub summary: String,
    #[serde(with = "time::serde::rfc3339")]
    pub computed_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnhancedAnalysisResponse {
    pub session_id: String,
    pub success: bool,
    pub error: Option<String>,
    pub confidence: f64,
    pub sentiment: Option<SentimentSummary>,
    pub pitch_metrics: Option<PitchMetrics>,
    #[serde(with = "time::serde::rfc3339")]
    pub computed_at: OffsetDateTime,
}

/// Both stored analyses of a session; either may be absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionAnalysesResponse {
    pub event_id: String,
    pub session_id: String,
    pub baseline: Option<BaselineAnalysisResponse>,
    pub enhanced: Option<EnhancedAnalysisResponse>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enhanced_failure_payload() {
        let req: StoreEnhancedAnalysisRequest =
            serde_json::from_str(r#"{"success":false,"error":"rate limited"}"#).unwrap();
        assert!(!req.success);
        assert_eq!(req.error.as_deref(), Some("rate limited"));
        assert!(req.sentiment.is_none());
        assert_eq!(req.confidence, 0.0);
    }

    #[test]
    fn test_primary_analysis_wire_names() {
        let json = serde_json::to_string(&PrimaryAnalysis::Enhanced).unwrap();
        assert_eq!(json, "\"enhanced\"");
    }

    #[test]
    fn test_nested_unknown_field_rejected() {
        let json = r#"{"overall":"positive","score":0.5,"mood":"great"}"#;
        assert!(serde_json::from_str::<SentimentSummary>(json).is_err());
        let json = r#"{"start_ms":0,"end_ms":10,"headline":"Intro","speaker":"A"}"#;
        assert!(serde_json::from_str::<Chapter>(json).is_err());
    }
}
