//! Leaderboard endpoints. Only official scoring records are ranked.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::get,
};
use kanau::processor::Processor;
use pitchboard_core::ranking::{GetEventStats, GetRankings, GetTeamRank};
use pitchboard_sdk::objects::RankingsQuery;

use super::ApiError;
use crate::api::extractors::ApiKey;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/events/{event_id}/rankings", get(get_rankings))
        .route("/events/{event_id}/rankings/{session_id}", get(get_team_rank))
        .route("/events/{event_id}/stats", get(get_event_stats))
}

async fn get_rankings(
    state: State<AppState>,
    _auth: ApiKey,
    Path(event_id): Path<String>,
    Query(query): Query<RankingsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let leaderboard = state
        .keyspace
        .process(GetRankings {
            event_id,
            limit: query.limit,
        })
        .await?;
    Ok(Json(leaderboard))
}

async fn get_team_rank(
    state: State<AppState>,
    _auth: ApiKey,
    Path((event_id, session_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    let rank = state
        .keyspace
        .process(GetTeamRank {
            event_id,
            session_id,
        })
        .await?;
    Ok(Json(rank))
}

async fn get_event_stats(
    state: State<AppState>,
    _auth: ApiKey,
    Path(event_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let stats = state.keyspace.process(GetEventStats { event_id }).await?;
    Ok(Json(stats))
}
