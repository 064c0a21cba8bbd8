pub mod analysis;
pub mod event;
pub mod ranking;
pub mod scoring;
pub mod session;

pub use analysis::{
    AnalysisProvenance, BaselineAnalysisResponse, EnhancedAnalysisResponse,
    SessionAnalysesResponse, Chapter, EmotionScore, MergedAnalysis, NamedEntity, PitchMetrics,
    PrimaryAnalysis, Sentiment, SentimentSummary, StoreBaselineAnalysisRequest,
    StoreEnhancedAnalysisRequest,
};
pub use event::{
    CreateEventRequest, DeleteEventResponse, EventResponse, EventStatus, EventType, ParticipantResponse,
    RegisterParticipantRequest, ScoringCriteria, UpdateEventStatusRequest,
};
pub use ranking::{
    EventStatsResponse, LeaderboardEntry, LeaderboardResponse, Neighbor, RankingsQuery,
    TeamRankResponse,
};
pub use scoring::{
    DimensionScore, ScoreBreakdown, ScoreSessionRequest, ScoringRecordResponse,
    SubmitJudgeScoreRequest,
};
pub use session::{
    AdvanceSessionRequest, AttachAudioRequest, AttachTranscriptRequest, AudioReference,
    CompleteSessionRequest, CreateSessionRequest, FailSessionRequest, ListSessionsQuery,
    SessionResponse, SessionStatus, TranscriptSegment,
};

/// Error body returned by the server for every failed operation.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ErrorResponse {
    /// Machine readable failure kind, e.g. `not_found` or `invalid_transition`.
    pub kind: String,
    pub message: String,
}
