#![allow(clippy::unwrap_used)]

mod common;

use common::{active_event, keyspace, recorded_session, session, transcript};
use kanau::processor::Processor;
use pitchboard_core::store::KeyValueStore;
use pitchboard_core::entities::event::CreateEvent;
use pitchboard_core::entities::session::{
    AdvanceSession, AttachAudio, AttachTranscript, CompleteSession, CreateSession, FailSession,
};
use pitchboard_core::entities::{BaselineAnalysis, Session};
use pitchboard_core::keyspace::EntityKind;
use pitchboard_core::{Error, Keyspace};
use pitchboard_sdk::objects::{AudioReference, EventType, SessionStatus};
use std::time::Duration;

fn advance(event_id: &str, session_id: &str, status: SessionStatus) -> AdvanceSession {
    AdvanceSession {
        event_id: event_id.to_string(),
        session_id: session_id.to_string(),
        status,
    }
}

fn complete(event_id: &str, session_id: &str) -> CompleteSession {
    CompleteSession {
        event_id: event_id.to_string(),
        session_id: session_id.to_string(),
        duration_secs: 182.4,
    }
}

async fn audio(ks: &Keyspace, session_id: &str) -> Result<Session, Error> {
    ks.process(AttachAudio {
        event_id: "E".to_string(),
        session_id: session_id.to_string(),
        audio: AudioReference {
            object_key: format!("recordings/E/{session_id}.webm"),
            content_type: Some("audio/webm".to_string()),
            size_bytes: Some(1_048_576),
        },
    })
    .await
}

#[tokio::test]
async fn test_session_requires_active_event() {
    let (ks, _) = keyspace();
    let err = ks
        .process(CreateSession {
            event_id: "missing".to_string(),
            session_id: None,
            team_name: "Alpha".to_string(),
            pitch_title: "Pitch".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound { kind: EntityKind::Event, .. }));

    ks.process(CreateEvent {
        event_id: Some("draft".to_string()),
        name: "Draft event".to_string(),
        event_type: EventType::Hackathon,
        criteria: None,
        activate: false,
    })
    .await
    .unwrap();
    let err = ks
        .process(CreateSession {
            event_id: "draft".to_string(),
            session_id: None,
            team_name: "Alpha".to_string(),
            pitch_title: "Pitch".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidTransition(_)));
}

#[tokio::test]
async fn test_full_lifecycle() {
    let (ks, _) = keyspace();
    active_event(&ks, "E").await;
    let created = session(&ks, "E", "S1", "Alpha").await;
    assert_eq!(created.status, SessionStatus::Initializing);

    recorded_session(&ks, "E", "S2", "Beta").await;
    let done = ks.process(complete("E", "S2")).await.unwrap();
    assert_eq!(done.status, SessionStatus::Completed);
    assert_eq!(done.duration_secs, Some(182.4));
    assert!(done.completed_at.is_some());

    // Completed sessions still accept an audio link, nothing else.
    let linked = audio(&ks, "S2").await.unwrap();
    assert!(linked.audio.is_some());
    let err = ks
        .process(AttachTranscript {
            event_id: "E".to_string(),
            session_id: "S2".to_string(),
            segments: transcript(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidTransition(_)));
    let err = ks
        .process(advance("E", "S2", SessionStatus::Error))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidTransition(_)));
}

#[tokio::test]
async fn test_completion_requires_processing() {
    let (ks, _) = keyspace();
    active_event(&ks, "E").await;
    session(&ks, "E", "S1", "Alpha").await;
    let err = ks.process(complete("E", "S1")).await.unwrap_err();
    assert!(matches!(err, Error::InvalidTransition(_)));

    ks.process(advance("E", "S1", SessionStatus::Recording))
        .await
        .unwrap();
    let err = ks
        .process(advance("E", "S1", SessionStatus::ReadyToRecord))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidTransition(_)));
}

#[tokio::test]
async fn test_failure_is_terminal() {
    let (ks, _) = keyspace();
    active_event(&ks, "E").await;
    session(&ks, "E", "S1", "Alpha").await;
    let failed = ks
        .process(FailSession {
            event_id: "E".to_string(),
            session_id: "S1".to_string(),
            reason: "microphone disconnected".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(failed.status, SessionStatus::Error);
    assert_eq!(failed.error_reason.as_deref(), Some("microphone disconnected"));

    let err = ks
        .process(advance("E", "S1", SessionStatus::Recording))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidTransition(_)));
    assert!(matches!(audio(&ks, "S1").await, Err(Error::InvalidTransition(_))));
}

#[tokio::test(start_paused = true)]
async fn test_completed_session_outlives_the_short_ttl() {
    let (ks, _) = keyspace();
    active_event(&ks, "E").await;
    recorded_session(&ks, "E", "S1", "Alpha").await;
    ks.process(complete("E", "S1")).await.unwrap();

    tokio::time::advance(Duration::from_secs(3 * 60 * 60)).await;
    assert!(ks.get::<Session>("E", "S1").await.is_ok());

    tokio::time::advance(Duration::from_secs(7 * 24 * 60 * 60)).await;
    assert!(matches!(
        ks.get::<Session>("E", "S1").await,
        Err(Error::NotFound { .. })
    ));
}

#[tokio::test]
async fn test_delete_session_drops_its_analyses() {
    let (ks, store) = keyspace();
    active_event(&ks, "E").await;
    recorded_session(&ks, "E", "S1", "Alpha").await;
    common::store_baseline(&ks, "E", "S1", 0.5).await;
    common::store_enhanced(&ks, "E", "S1", true, 0.9).await;

    assert!(ks.delete::<Session>("E", "S1").await.unwrap());
    assert!(ks.find::<BaselineAnalysis>("E", "S1").await.unwrap().is_none());
    assert!(store.scan_keys("event:E:analysis:").await.unwrap().is_empty());
    assert!(!ks.delete::<Session>("E", "S1").await.unwrap());
}
