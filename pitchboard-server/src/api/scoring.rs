//! Official scoring and per-judge evaluation endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    response::IntoResponse,
    routing::post,
};
use kanau::processor::Processor;
use pitchboard_core::entities::scoring_record::{GetScoringRecord, ListJudgeScores};
use pitchboard_core::scoring::{ScoreSession, SubmitJudgeScore};
use pitchboard_sdk::objects::{ScoreSessionRequest, ScoringRecordResponse, SubmitJudgeScoreRequest};

use super::ApiError;
use crate::api::extractors::ApiKey;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/events/{event_id}/sessions/{session_id}/score",
            post(score_session).get(get_scoring_record),
        )
        .route(
            "/events/{event_id}/sessions/{session_id}/judge-scores",
            post(submit_judge_score).get(list_judge_scores),
        )
}

/// `POST .../score` replaces the official record. Rescoring is allowed.
async fn score_session(
    state: State<AppState>,
    _auth: ApiKey,
    Path((event_id, session_id)): Path<(String, String)>,
    Json(req): Json<ScoreSessionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let record = state
        .keyspace
        .process(ScoreSession {
            event_id,
            session_id,
            breakdown: req.breakdown,
        })
        .await?;
    Ok(Json(ScoringRecordResponse::from(&record)))
}

async fn get_scoring_record(
    state: State<AppState>,
    _auth: ApiKey,
    Path((event_id, session_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    let record = state
        .keyspace
        .process(GetScoringRecord {
            event_id,
            session_id,
        })
        .await?;
    Ok(Json(ScoringRecordResponse::from(&record)))
}

async fn submit_judge_score(
    state: State<AppState>,
    _auth: ApiKey,
    Path((event_id, session_id)): Path<(String, String)>,
    Json(req): Json<SubmitJudgeScoreRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let record = state
        .keyspace
        .process(SubmitJudgeScore {
            event_id,
            session_id,
            judge_id: req.judge_id,
            breakdown: req.breakdown,
        })
        .await?;
    Ok(Json(ScoringRecordResponse::from(&record)))
}

async fn list_judge_scores(
    state: State<AppState>,
    _auth: ApiKey,
    Path((event_id, session_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    let records = state
        .keyspace
        .process(ListJudgeScores {
            event_id,
            session_id,
        })
        .await?;
    Ok(Json(
        records
            .iter()
            .map(ScoringRecordResponse::from)
            .collect::<Vec<_>>(),
    ))
}
