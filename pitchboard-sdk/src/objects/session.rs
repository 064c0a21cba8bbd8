//! Recording session request and response types.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Recording session lifecycle.
///
/// The happy path is `initializing -> ready_to_record -> recording ->
/// processing -> completed`. `error` can be entered from any non-terminal
/// state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Initializing,
    ReadyToRecord,
    Recording,
    Processing,
    Completed,
    Error,
}

impl SessionStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, SessionStatus::Completed | SessionStatus::Error)
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SessionStatus::Initializing => "initializing",
            SessionStatus::ReadyToRecord => "ready_to_record",
            SessionStatus::Recording => "recording",
            SessionStatus::Processing => "processing",
            SessionStatus::Completed => "completed",
            SessionStatus::Error => "error",
        };
        f.write_str(s)
    }
}

/// One timestamped piece of transcribed speech.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TranscriptSegment {
    /// Offset from the start of the recording, in milliseconds.
    pub start_ms: u64,
    pub end_ms: u64,
    pub text: String,
    /// Recognizer confidence in `0.0..=1.0`.
    pub confidence: f64,
}

/// Pointer to recorded audio held by the object store.
///
/// Only the reference is kept; audio bytes never pass through this service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AudioReference {
    pub object_key: String,
    #[serde(default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub size_bytes: Option<u64>,
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSessionRequest {
    #[serde(default)]
    pub session_id: Option<String>,
    pub team_name: String,
    pub pitch_title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvanceSessionRequest {
    pub status: SessionStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttachTranscriptRequest {
    pub segments: Vec<TranscriptSegment>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttachAudioRequest {
    pub audio: AudioReference,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompleteSessionRequest {
    pub duration_secs: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailSessionRequest {
    pub reason: String,
}

/// Query parameters for listing sessions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListSessionsQuery {
    #[serde(default)]
    pub team_name: Option<String>,
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionResponse {
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
