#![allow(dead_code, clippy::unwrap_used)]

use kanau::processor::Processor;
use pitchboard_core::entities::analysis::{StoreBaselineAnalysis, StoreEnhancedAnalysis};
use pitchboard_core::entities::event::CreateEvent;
use pitchboard_core::entities::session::{AdvanceSession, AttachTranscript, CreateSession};
use pitchboard_core::entities::{Event, Session};
use pitchboard_core::store::MemoryStore;
use pitchboard_core::{Keyspace, TtlPolicy};
use pitchboard_sdk::objects::{
    DimensionScore, EventType, PitchMetrics, ScoreBreakdown, Sentiment, SentimentSummary,
    SessionStatus, StoreBaselineAnalysisRequest, StoreEnhancedAnalysisRequest,
    TranscriptSegment,
};
use std::sync::Arc;

pub fn keyspace() -> (Keyspace, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    (Keyspace::new(store.clone(), TtlPolicy::default()), store)
}

pub async fn active_event(ks: &Keyspace, event_id: &str) -> Event {
    ks.process(CreateEvent {
        event_id: Some(event_id.to_string()),
        name: format!("{event_id} finals"),
        event_type: EventType::DemoDay,
        criteria: None,
        activate: true,
    })
    .await
    .unwrap()
}

pub async fn session(ks: &Keyspace, event_id: &str, session_id: &str, team: &str) -> Session {
    ks.process(CreateSession {
        event_id: event_id.to_string(),
        session_id: Some(session_id.to_string()),
        team_name: team.to_string(),
        pitch_title: format!("{team} pitch"),
    })
    .await
    .unwrap()
}

pub fn transcript() -> Vec<TranscriptSegment> {
    vec![
        TranscriptSegment {
            start_ms: 0,
            end_ms: 4_000,
            text: "We help judges score pitches live.".to_string(),
            confidence: 0.93,
        },
        TranscriptSegment {
            start_ms: 4_000,
            end_ms: 9_500,
            text: "Our demo runs on a single laptop.".to_string(),
            confidence: 0.88,
        },
    ]
}

/// A session that is processing and has a transcript.
pub async fn recorded_session(
    ks: &Keyspace,
    event_id: &str,
    session_id: &str,
    team: &str,
) -> Session {
    session(ks, event_id, session_id, team).await;
    for status in [
        SessionStatus::ReadyToRecord,
        SessionStatus::Recording,
        SessionStatus::Processing,
    ] {
        ks.process(AdvanceSession {
            event_id: event_id.to_string(),
            session_id: session_id.to_string(),
            status,
        })
        .await
        .unwrap();
    }
    ks.process(AttachTranscript {
        event_id: event_id.to_string(),
        session_id: session_id.to_string(),
        segments: transcript(),
    })
    .await
    .unwrap()
}

pub async fn store_baseline(ks: &Keyspace, event_id: &str, session_id: &str, confidence: f64) {
    ks.process(StoreBaselineAnalysis {
        event_id: event_id.to_string(),
        session_id: session_id.to_string(),
        analysis: StoreBaselineAnalysisRequest {
            confidence,
            sentiment: SentimentSummary {
                overall: Sentiment::Positive,
                score: 0.4,
            },
            emotions: Vec::new(),
            entities: Vec::new(),
            chapters: Vec::new(),
            summary: "Live scoring for pitch events".to_string(),
        },
    })
    .await
    .unwrap();
}

pub async fn store_enhanced(
    ks: &Keyspace,
    event_id: &str,
    session_id: &str,
    success: bool,
    confidence: f64,
) {
    ks.process(StoreEnhancedAnalysis {
        event_id: event_id.to_string(),
        session_id: session_id.to_string(),
        analysis: StoreEnhancedAnalysisRequest {
            success,
            error: (!success).then(|| "upstream timeout".to_string()),
            confidence,
            sentiment: success.then_some(SentimentSummary {
                overall: Sentiment::Positive,
                score: 0.7,
            }),
            pitch_metrics: success.then_some(PitchMetrics {
                clarity: 80.0,
                persuasiveness: 72.0,
                energy: 66.0,
                pace_wpm: 150.0,
                filler_word_ratio: 0.02,
            }),
        },
    })
    .await
    .unwrap();
}

/// Every dimension scored `score`, so the total equals `score` under any weights.
pub fn flat_breakdown(score: f64) -> ScoreBreakdown {
    let d = DimensionScore::new(score, "consistent across dimensions");
    ScoreBreakdown {
        idea: d.clone(),
        technical: d.clone(),
        tool_use: d.clone(),
        presentation: d,
    }
}
