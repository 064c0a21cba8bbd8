//! Recording sessions.
//!
//! The recording pipeline drives a session through its lifecycle with the
//! commands below. Once a session is `completed` only its audio reference can
//! still change; scoring is stored separately.

use crate::entities::event::Event;
use crate::error::{Error, Result};
use crate::keyspace::{Entity, EntityKind, Keyspace, Predicate, TtlClass};
use kanau::processor::Processor;
use pitchboard_sdk::objects::{
    AudioReference, EventStatus, SessionResponse, SessionStatus, TranscriptSegment,
};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Session {
    pub session_id: String,
    pub event_id: String,
    pub team_name: String,
    pub pitch_title: String,
    pub status: SessionStatus,
    pub transcript: Vec<TranscriptSegment>,
    pub audio: Option<AudioReference>,
    pub duration_secs: Option<f64>,
    pub error_reason: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    pub completed_at: Option<OffsetDateTime>,
}

impl Session {
    /// Whether the transcript carries any spoken text.
    pub fn has_transcript(&self) -> bool {
        self.transcript
            .iter()
            .any(|segment| !segment.text.trim().is_empty())
    }
}

impl Entity for Session {
    const KIND: EntityKind = EntityKind::Session;
    const OWNED: &'static [EntityKind] =
        &[EntityKind::BaselineAnalysis, EntityKind::EnhancedAnalysis];

    fn event_id(&self) -> &str {
        &self.event_id
    }

    fn ttl_class(&self) -> TtlClass {
        match self.status {
            SessionStatus::Completed => TtlClass::CompletedSession,
            _ => TtlClass::ActiveSession,
        }
    }
}

impl From<&Session> for SessionResponse {
    fn from(s: &Session) -> Self {
        SessionResponse {
            session_id: s.session_id.clone(),
            event_id: s.event_id.clone(),
            team_name: s.team_name.clone(),
            pitch_title: s.pitch_title.clone(),
            status: s.status,
            transcript: s.transcript.clone(),
            audio: s.audio.clone(),
            duration_secs: s.duration_secs,
            error_reason: s.error_reason.clone(),
            created_at: s.created_at,
            completed_at: s.completed_at,
        }
    }
}

fn lifecycle_position(status: SessionStatus) -> Option<u8> {
    match status {
        SessionStatus::Initializing => Some(0),
        SessionStatus::ReadyToRecord => Some(1),
        SessionStatus::Recording => Some(2),
        SessionStatus::Processing => Some(3),
        SessionStatus::Completed => Some(4),
        SessionStatus::Error => None,
    }
}

/// Validate a session status change.
///
/// Moves are forward only. `completed` can only be reached from
/// `processing`, and `error` from any non-terminal state.
pub fn check_session_transition(from: SessionStatus, to: SessionStatus) -> Result<()> {
    let allowed = match (lifecycle_position(from), lifecycle_position(to)) {
        _ if from.is_terminal() => false,
        (Some(_), None) => true,
        (Some(_), Some(_)) if to == SessionStatus::Completed => from == SessionStatus::Processing,
        (Some(a), Some(b)) => b > a,
        (None, _) => false,
    };
    if allowed {
        Ok(())
    } else {
        Err(Error::InvalidTransition(format!(
            "session cannot move from {from} to {to}"
        )))
    }
}

impl Keyspace {
    async fn transition_session(
        &self,
        event_id: &str,
        session_id: &str,
        to: SessionStatus,
        apply: impl FnOnce(&mut Session),
    ) -> Result<Session> {
        let mut session: Session = self.get(event_id, session_id).await?;
        check_session_transition(session.status, to)?;
        let from = session.status;
        session.status = to;
        apply(&mut session);
        self.put(event_id, session_id, &session).await?;
        info!(%event_id, %session_id, %from, %to, "Session status changed");
        Ok(session)
    }
}

#[derive(Debug, Clone)]
/// Open a recording session. The event must exist and be active.
pub struct CreateSession {
    pub event_id: String,
    pub session_id: Option<String>,
    pub team_name: String,
    pub pitch_title: String,
}

impl Processor<CreateSession> for Keyspace {
    type Output = Session;
    type Error = Error;
    #[tracing::instrument(skip_all, err, name = "Keyspace:CreateSession")]
    async fn process(&self, cmd: CreateSession) -> Result<Session> {
        let event: Event = self.get(&cmd.event_id, &cmd.event_id).await?;
        if event.status != EventStatus::Active {
            return Err(Error::InvalidTransition(format!(
                "event {} is {}, sessions need an active event",
                event.event_id, event.status
            )));
        }
        let session_id = cmd.session_id.unwrap_or_else(super::new_id);
        if self.find::<Session>(&event.event_id, &session_id).await?.is_some() {
            return Err(Error::InvalidTransition(format!(
                "session {session_id} already exists"
            )));
        }
        let session = Session {
            session_id,
            event_id: event.event_id,
            team_name: cmd.team_name,
            pitch_title: cmd.pitch_title,
            status: SessionStatus::Initializing,
            transcript: Vec::new(),
            audio: None,
            duration_secs: None,
            error_reason: None,
            created_at: OffsetDateTime::now_utc(),
            completed_at: None,
        };
        self.put(&session.event_id, &session.session_id, &session)
            .await?;
        info!(
            event_id = %session.event_id,
            session_id = %session.session_id,
            team_name = %session.team_name,
            "Created session"
        );
        Ok(session)
    }
}

#[derive(Debug, Clone)]
pub struct GetSession {
    pub event_id: String,
    pub session_id: String,
}

impl Processor<GetSession> for Keyspace {
    type Output = Session;
    type Error = Error;
    async fn process(&self, query: GetSession) -> Result<Session> {
        self.get(&query.event_id, &query.session_id).await
    }
}

#[derive(Debug, Clone)]
/// List sessions of an event, optionally only those of one team.
pub struct ListSessions {
    pub event_id: String,
    pub team_name: Option<String>,
}

impl Processor<ListSessions> for Keyspace {
    type Output = Vec<Session>;
    type Error = Error;
    async fn process(&self, query: ListSessions) -> Result<Vec<Session>> {
        let predicate = query.team_name.map(|team| -> Predicate<Session> {
            Box::new(move |session: &Session| session.team_name == team)
        });
        let mut sessions = self.scan_all(&query.event_id, predicate).await?;
        sessions.sort_by(|a: &Session, b: &Session| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.session_id.cmp(&b.session_id))
        });
        Ok(sessions)
    }
}

#[derive(Debug, Clone)]
/// Move a session to the next lifecycle state.
pub struct AdvanceSession {
    pub event_id: String,
    pub session_id: String,
    pub status: SessionStatus,
}

impl Processor<AdvanceSession> for Keyspace {
    type Output = Session;
    type Error = Error;
    #[tracing::instrument(skip_all, err, name = "Keyspace:AdvanceSession")]
    async fn process(&self, cmd: AdvanceSession) -> Result<Session> {
        self.transition_session(&cmd.event_id, &cmd.session_id, cmd.status, |session| {
            if session.status == SessionStatus::Completed {
                session.completed_at = Some(OffsetDateTime::now_utc());
            }
        })
        .await
    }
}

#[derive(Debug, Clone)]
/// Replace the transcript of a session that has not finished yet.
pub struct AttachTranscript {
    pub event_id: String,
    pub session_id: String,
    pub segments: Vec<TranscriptSegment>,
}

impl Processor<AttachTranscript> for Keyspace {
    type Output = Session;
    type Error = Error;
    #[tracing::instrument(skip_all, err, name = "Keyspace:AttachTranscript")]
    async fn process(&self, cmd: AttachTranscript) -> Result<Session> {
        let mut session: Session = self.get(&cmd.event_id, &cmd.session_id).await?;
        if session.status.is_terminal() {
            return Err(Error::InvalidTransition(format!(
                "session {} is {}, its transcript is frozen",
                session.session_id, session.status
            )));
        }
        session.transcript = cmd.segments;
        self.put(&cmd.event_id, &cmd.session_id, &session).await?;
        info!(
            event_id = %cmd.event_id,
            session_id = %cmd.session_id,
            segments = session.transcript.len(),
            "Attached transcript"
        );
        Ok(session)
    }
}

#[derive(Debug, Clone)]
/// Link recorded audio to a session. Allowed after completion.
pub struct AttachAudio {
    pub event_id: String,
    pub session_id: String,
    pub audio: AudioReference,
}

impl Processor<AttachAudio> for Keyspace {
    type Output = Session;
    type Error = Error;
    #[tracing::instrument(skip_all, err, name = "Keyspace:AttachAudio")]
    async fn process(&self, cmd: AttachAudio) -> Result<Session> {
        let mut session: Session = self.get(&cmd.event_id, &cmd.session_id).await?;
        if session.status == SessionStatus::Error {
            return Err(Error::InvalidTransition(format!(
                "session {} failed, audio can no longer be attached",
                session.session_id
            )));
        }
        session.audio = Some(cmd.audio);
        self.put(&cmd.event_id, &cmd.session_id, &session).await?;
        info!(event_id = %cmd.event_id, session_id = %cmd.session_id, "Attached audio reference");
        Ok(session)
    }
}

#[derive(Debug, Clone)]
/// Finish a session that is processing. Switches it to the long retention.
pub struct CompleteSession {
    pub event_id: String,
    pub session_id: String,
    pub duration_secs: f64,
}

impl Processor<CompleteSession> for Keyspace {
    type Output = Session;
    type Error = Error;
    #[tracing::instrument(skip_all, err, name = "Keyspace:CompleteSession")]
    async fn process(&self, cmd: CompleteSession) -> Result<Session> {
        let duration = cmd.duration_secs.is_finite().then_some(cmd.duration_secs.max(0.0));
        self.transition_session(
            &cmd.event_id,
            &cmd.session_id,
            SessionStatus::Completed,
            |session| {
                session.duration_secs = duration;
                session.completed_at = Some(OffsetDateTime::now_utc());
            },
        )
        .await
    }
}

#[derive(Debug, Clone)]
/// Put a session into the terminal `error` state.
pub struct FailSession {
    pub event_id: String,
    pub session_id: String,
    pub reason: String,
}

impl Processor<FailSession> for Keyspace {
    type Output = Session;
    type Error = Error;
    #[tracing::instrument(skip_all, err, name = "Keyspace:FailSession")]
    async fn process(&self, cmd: FailSession) -> Result<Session> {
        warn!(
            event_id = %cmd.event_id,
            session_id = %cmd.session_id,
            reason = %cmd.reason,
            "Recording pipeline reported a failure"
        );
        let reason = cmd.reason;
        self.transition_session(&cmd.event_id, &cmd.session_id, SessionStatus::Error, |session| {
            session.error_reason = Some(reason);
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use SessionStatus as S;

    #[test]
    fn test_happy_path_is_allowed() {
        for (from, to) in [
            (S::Initializing, S::ReadyToRecord),
            (S::ReadyToRecord, S::Recording),
            (S::Recording, S::Processing),
            (S::Processing, S::Completed),
            (S::Initializing, S::Recording),
        ] {
            assert!(check_session_transition(from, to).is_ok(), "{from} -> {to}");
        }
    }

    #[test]
    fn test_error_reachable_from_non_terminal_states_only() {
        for from in [S::Initializing, S::ReadyToRecord, S::Recording, S::Processing] {
            assert!(check_session_transition(from, S::Error).is_ok(), "{from} -> error");
        }
        assert!(check_session_transition(S::Completed, S::Error).is_err());
        assert!(check_session_transition(S::Error, S::Error).is_err());
    }

    #[test]
    fn test_backwards_and_shortcuts_are_rejected() {
        for (from, to) in [
            (S::Recording, S::ReadyToRecord),
            (S::Processing, S::Initializing),
            (S::Recording, S::Recording),
            (S::Recording, S::Completed),
            (S::Initializing, S::Completed),
            (S::Completed, S::Processing),
            (S::Error, S::Initializing),
        ] {
            assert!(
                matches!(
                    check_session_transition(from, to),
                    Err(Error::InvalidTransition(_))
                ),
                "{from} -> {to}"
            );
        }
    }

    #[test]
    fn test_ttl_class_follows_status() {
        let mut session = Session {
            session_id: "s1".into(),
            event_id: "e1".into(),
            team_name: "Rustaceans".into(),
            pitch_title: "Pitchboard".into(),
            status: S::Recording,
            transcript: Vec::new(),
            audio: None,
            duration_secs: None,
            error_reason: None,
            created_at: OffsetDateTime::UNIX_EPOCH,
            completed_at: None,
        };
        assert_eq!(session.ttl_class(), TtlClass::ActiveSession);
        assert!(!session.has_transcript());
        session.status = S::Completed;
        assert_eq!(session.ttl_class(), TtlClass::CompletedSession);
    }
}
