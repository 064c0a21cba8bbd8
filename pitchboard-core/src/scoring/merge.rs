//! Reconciliation of the baseline and enhanced analyses of one session.

use crate::entities::{BaselineAnalysis, EnhancedAnalysis};
use crate::error::{Error, Result};
use pitchboard_sdk::objects::{AnalysisProvenance, MergedAnalysis, PrimaryAnalysis};

/// Merge the two analyses of a session.
///
/// A successful enhanced analysis is primary and supplies sentiment and pitch
/// metrics; whatever the baseline carries is kept next to it. Without a usable
/// enhanced analysis the baseline alone is primary. Only the absence of both
/// is an error.
pub fn merge(
    baseline: Option<&BaselineAnalysis>,
    enhanced: Option<&EnhancedAnalysis>,
) -> Result<MergedAnalysis> {
    let enhanced = enhanced.filter(|e| e.is_usable());
    match (baseline, enhanced) {
        (None, None) => Err(Error::IncompleteInput(
            "no usable audio analysis for session".to_string(),
        )),
        (Some(b), None) => Ok(MergedAnalysis {
            provenance: AnalysisProvenance {
                primary_analysis: PrimaryAnalysis::Baseline,
                primary_analysis_confidence: b.confidence,
                confidence_improvement: None,
            },
            sentiment: Some(b.sentiment.clone()),
            emotions: b.emotions.clone(),
            entities: b.entities.clone(),
            chapters: b.chapters.clone(),
            summary: non_empty(&b.summary),
            pitch_metrics: None,
        }),
        (b, Some(e)) => Ok(MergedAnalysis {
            provenance: AnalysisProvenance {
                primary_analysis: PrimaryAnalysis::Enhanced,
                primary_analysis_confidence: e.confidence,
                confidence_improvement: b
                    .filter(|b| b.confidence > 0.0)
                    .map(|b| e.confidence / b.confidence)
                    .filter(|ratio| ratio.is_finite()),
            },
            sentiment: e
                .sentiment
                .clone()
                .or_else(|| b.map(|b| b.sentiment.clone())),
            emotions: b.map(|b| b.emotions.clone()).unwrap_or_default(),
            entities: b.map(|b| b.entities.clone()).unwrap_or_default(),
            chapters: b.map(|b| b.chapters.clone()).unwrap_or_default(),
            summary: b.and_then(|b| non_empty(&b.summary)),
            pitch_metrics: e.pitch_metrics.clone(),
        }),
    }
}

fn non_empty(s: &str) -> Option<String> {
    (!s.trim().is_empty()).then(|| s.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pitchboard_sdk::objects::{
        Chapter, EmotionScore, NamedEntity, PitchMetrics, Sentiment, SentimentSummary,
    };
    use time::OffsetDateTime;

    fn baseline(confidence: f64) -> BaselineAnalysis {
        BaselineAnalysis {
            session_id: "s3".into(),
            event_id: "e".into(),
            confidence,
            sentiment: SentimentSummary {
                overall: Sentiment::Neutral,
                score: 0.1,
            },
            emotions: vec![EmotionScore {
                emotion: "confidence".into(),
                score: 0.6,
            }],
            entities: vec![NamedEntity {
                text: "Rust".into(),
                entity_type: "technology".into(),
                mentions: 3,
            }],
            chapters: vec![Chapter {
                start_ms: 0,
                end_ms: 30_000,
                headline: "Problem".into(),
                summary: String::new(),
            }],
            summary: "A tool for judges".into(),
            computed_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    fn enhanced(success: bool, confidence: f64) -> EnhancedAnalysis {
        EnhancedAnalysis {
            session_id: "s3".into(),
            event_id: "e".into(),
            success,
            error: (!success).then(|| "provider timeout".into()),
            confidence,
            sentiment: success.then_some(SentimentSummary {
                overall: Sentiment::Positive,
                score: 0.8,
            }),
            pitch_metrics: success.then_some(PitchMetrics {
                clarity: 82.0,
                persuasiveness: 75.0,
                energy: 64.0,
                pace_wpm: 148.0,
                filler_word_ratio: 0.03,
            }),
            computed_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn test_baseline_only_keeps_its_confidence() {
        let merged = merge(Some(&baseline(0.3)), None).unwrap();
        assert_eq!(
            merged.provenance.primary_analysis,
            PrimaryAnalysis::Baseline
        );
        assert_eq!(merged.provenance.primary_analysis_confidence, 0.3);
        assert_eq!(merged.provenance.confidence_improvement, None);
        assert!(merged.pitch_metrics.is_none());
        assert_eq!(merged.entities.len(), 1);
    }

    #[test]
    fn test_failed_enhanced_falls_back_to_baseline() {
        let merged = merge(Some(&baseline(0.4)), Some(&enhanced(false, 0.9))).unwrap();
        assert_eq!(
            merged.provenance.primary_analysis,
            PrimaryAnalysis::Baseline
        );
        assert_eq!(merged.provenance.primary_analysis_confidence, 0.4);
        assert_eq!(
            merged.sentiment.unwrap().overall,
            Sentiment::Neutral
        );
    }

    #[test]
    fn test_both_present_is_a_union() {
        let b = baseline(0.4);
        let merged = merge(Some(&b), Some(&enhanced(true, 0.9))).unwrap();
        assert_eq!(
            merged.provenance.primary_analysis,
            PrimaryAnalysis::Enhanced
        );
        assert_eq!(merged.provenance.primary_analysis_confidence, 0.9);
        let ratio = merged.provenance.confidence_improvement.unwrap();
        assert!((ratio - 2.25).abs() < 1e-9);
        assert_eq!(merged.sentiment.unwrap().overall, Sentiment::Positive);
        assert!(merged.pitch_metrics.is_some());
        assert_eq!(merged.entities, b.entities);
        assert_eq!(merged.chapters, b.chapters);
        assert_eq!(merged.emotions, b.emotions);
        assert_eq!(merged.summary.as_deref(), Some("A tool for judges"));
    }

    #[test]
    fn test_zero_baseline_confidence_has_no_ratio() {
        let merged = merge(Some(&baseline(0.0)), Some(&enhanced(true, 0.9))).unwrap();
        assert_eq!(merged.provenance.confidence_improvement, None);
    }

    #[test]
    fn test_overflowing_ratio_is_dropped() {
        let merged = merge(
            Some(&baseline(f64::MIN_POSITIVE / 1e3)),
            Some(&enhanced(true, 0.9)),
        )
        .unwrap();
        assert_eq!(merged.provenance.confidence_improvement, None);
        assert_eq!(merged.provenance.primary_analysis_confidence, 0.9);
    }

    #[test]
    fn test_enhanced_without_baseline() {
        let merged = merge(None, Some(&enhanced(true, 0.85))).unwrap();
        assert_eq!(
            merged.provenance.primary_analysis,
            PrimaryAnalysis::Enhanced
        );
        assert!(merged.entities.is_empty());
        assert!(merged.summary.is_none());
    }

    #[test]
    fn test_nothing_usable() {
        assert!(matches!(merge(None, None), Err(Error::IncompleteInput(_))));
        assert!(matches!(
            merge(None, Some(&enhanced(false, 0.0))),
            Err(Error::IncompleteInput(_))
        ));
    }
}
