//! Session lifecycle and analysis endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use kanau::processor::Processor;
use pitchboard_core::entities::analysis::{
    GetAnalyses, StoreBaselineAnalysis, StoreEnhancedAnalysis,
};
use pitchboard_core::entities::session::{
    AdvanceSession, AttachAudio, AttachTranscript, CompleteSession, CreateSession, FailSession,
    GetSession, ListSessions, Session,
};
use pitchboard_sdk::objects::{
    AdvanceSessionRequest, AttachAudioRequest, AttachTranscriptRequest, CompleteSessionRequest,
    CreateSessionRequest, FailSessionRequest, ListSessionsQuery, SessionAnalysesResponse,
    SessionResponse,
    StoreBaselineAnalysisRequest, StoreEnhancedAnalysisRequest,
};

use super::ApiError;
use crate::api::extractors::ApiKey;
use crate::state::AppState;

const SESSION: &str = "/events/{event_id}/sessions/{session_id}";

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/events/{event_id}/sessions",
            get(list_sessions).post(create_session),
        )
        .route(SESSION, get(get_session))
        .route(&format!("{SESSION}/advance"), post(advance_session))
        .route(&format!("{SESSION}/transcript"), post(attach_transcript))
        .route(&format!("{SESSION}/audio"), post(attach_audio))
        .route(&format!("{SESSION}/complete"), post(complete_session))
        .route(&format!("{SESSION}/fail"), post(fail_session))
        .route(&format!("{SESSION}/analysis"), get(get_analyses))
        .route(&format!("{SESSION}/analysis/baseline"), post(store_baseline))
        .route(&format!("{SESSION}/analysis/enhanced"), post(store_enhanced))
}

fn respond(session: Session) -> Json<SessionResponse> {
    Json(SessionResponse::from(&session))
}

async fn create_session(
    state: State<AppState>,
    _auth: ApiKey,
    Path(event_id): Path<String>,
    Json(req): Json<CreateSessionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let session = state
        .keyspace
        .process(CreateSession {
            event_id,
            session_id: req.session_id,
            team_name: req.team_name,
            pitch_title: req.pitch_title,
        })
        .await?;
    Ok((StatusCode::CREATED, respond(session)))
}

async fn list_sessions(
    state: State<AppState>,
    _auth: ApiKey,
    Path(event_id): Path<String>,
    Query(query): Query<ListSessionsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let sessions = state
        .keyspace
        .process(ListSessions {
            event_id,
            team_name: query.team_name,
        })
        .await?;
    Ok(Json(
        sessions.iter().map(SessionResponse::from).collect::<Vec<_>>(),
    ))
}

async fn get_session(
    state: State<AppState>,
    _auth: ApiKey,
    Path((event_id, session_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    let session = state
        .keyspace
        .process(GetSession {
            event_id,
            session_id,
        })
        .await?;
    Ok(respond(session))
}

async fn advance_session(
    state: State<AppState>,
    _auth: ApiKey,
    Path((event_id, session_id)): Path<(String, String)>,
    Json(req): Json<AdvanceSessionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let session = state
        .keyspace
        .process(AdvanceSession {
            event_id,
            session_id,
            status: req.status,
        })
        .await?;
    Ok(respond(session))
}

async fn attach_transcript(
    state: State<AppState>,
    _auth: ApiKey,
    Path((event_id, session_id)): Path<(String, String)>,
    Json(req): Json<AttachTranscriptRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let session = state
        .keyspace
        .process(AttachTranscript {
            event_id,
            session_id,
            segments: req.segments,
        })
        .await?;
    Ok(respond(session))
}

async fn attach_audio(
    state: State<AppState>,
    _auth: ApiKey,
    Path((event_id, session_id)): Path<(String, String)>,
    Json(req): Json<AttachAudioRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let session = state
        .keyspace
        .process(AttachAudio {
            event_id,
            session_id,
            audio: req.audio,
        })
        .await?;
    Ok(respond(session))
}

async fn complete_session(
    state: State<AppState>,
    _auth: ApiKey,
    Path((event_id, session_id)): Path<(String, String)>,
    Json(req): Json<CompleteSessionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let session = state
        .keyspace
        .process(CompleteSession {
            event_id,
            session_id,
            duration_secs: req.duration_secs,
        })
        .await?;
    Ok(respond(session))
}

async fn fail_session(
    state: State<AppState>,
    _auth: ApiKey,
    Path((event_id, session_id)): Path<(String, String)>,
    Json(req): Json<FailSessionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let session = state
        .keyspace
        .process(FailSession {
            event_id,
            session_id,
            reason: req.reason,
        })
        .await?;
    Ok(respond(session))
}

/// Both analysis writes answer with the full analysis pair so the caller
/// sees whether the other half is already there.
async fn analyses_response(
    state: &AppState,
    event_id: String,
    session_id: String,
) -> Result<Json<SessionAnalysesResponse>, ApiError> {
    let analyses = state
        .keyspace
        .process(GetAnalyses {
            event_id: event_id.clone(),
            session_id: session_id.clone(),
        })
        .await?;
    Ok(Json(analyses.to_response(&event_id, &session_id)))
}

async fn store_baseline(
    state: State<AppState>,
    _auth: ApiKey,
    Path((event_id, session_id)): Path<(String, String)>,
    Json(req): Json<StoreBaselineAnalysisRequest>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .keyspace
        .process(StoreBaselineAnalysis {
            event_id: event_id.clone(),
            session_id: session_id.clone(),
            analysis: req,
        })
        .await?;
    analyses_response(&state, event_id, session_id).await
}

async fn store_enhanced(
    state: State<AppState>,
    _auth: ApiKey,
    Path((event_id, session_id)): Path<(String, String)>,
    Json(req): Json<StoreEnhancedAnalysisRequest>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .keyspace
        .process(StoreEnhancedAnalysis {
            event_id: event_id.clone(),
            session_id: session_id.clone(),
            analysis: req,
        })
        .await?;
    analyses_response(&state, event_id, session_id).await
}

async fn get_analyses(
    state: State<AppState>,
    _auth: ApiKey,
    Path((event_id, session_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    analyses_response(&state, event_id, session_id).await
}
