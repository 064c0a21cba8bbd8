//! HTTP API.
//!
//! Every endpoint lives under `/api/v1/events` and requires the
//! `Pitchboard-Api-Key` header.
//!
//! # Endpoints
//!
//! - `POST   /events`                                   – create an event
//! - `GET    /events`                                   – list events
//! - `GET    /events/{event_id}`                        – get an event
//! - `PUT    /events/{event_id}/status`                 – change event status
//! - `DELETE /events/{event_id}`                        – delete the whole namespace
//! - `POST   /events/{event_id}/participants`           – register a team
//! - `GET    /events/{event_id}/participants`           – list teams
//! - `POST   /events/{event_id}/sessions`               – create a session
//! - `GET    /events/{event_id}/sessions`               – list sessions
//! - `GET    /events/{event_id}/sessions/{session_id}`  – get a session
//! - `POST   /events/{event_id}/sessions/{session_id}/{advance,transcript,audio,complete,fail}`
//! - `POST   /events/{event_id}/sessions/{session_id}/analysis/{baseline,enhanced}`
//! - `GET    /events/{event_id}/sessions/{session_id}/analysis`
//! - `POST   /events/{event_id}/sessions/{session_id}/score`  – official scoring
//! - `GET    /events/{event_id}/sessions/{session_id}/score`
//! - `POST   /events/{event_id}/sessions/{session_id}/judge-scores`
//! - `GET    /events/{event_id}/sessions/{session_id}/judge-scores`
//! - `GET    /events/{event_id}/rankings`               – leaderboard
//! - `GET    /events/{event_id}/rankings/{session_id}`  – one team's position
//! - `GET    /events/{event_id}/stats`                  – score summary

use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use pitchboard_core::Error;
use pitchboard_sdk::objects::ErrorResponse;

use crate::state::AppState;

mod events;
pub mod extractors;
mod ranking;
mod scoring;
mod sessions;

/// Build the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(events::router())
        .merge(sessions::router())
        .merge(scoring::router())
        .merge(ranking::router())
}

// ---------------------------------------------------------------------------
// Shared error type
// ---------------------------------------------------------------------------

/// A failed operation, rendered as an [`ErrorResponse`] body.
#[derive(Debug)]
pub(crate) struct ApiError(Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        ApiError(err)
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match &self.0 {
            Error::ScopeViolation(_) => StatusCode::FORBIDDEN,
            Error::NotFound { .. } => StatusCode::NOT_FOUND,
            Error::IncompleteInput(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Error::InvalidInput(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Error::InvalidTransition(_) => StatusCode::CONFLICT,
            Error::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Error::MalformedRecord { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self.0 {
            Error::StoreUnavailable(_) => {
                tracing::error!(error = %self.0, "Store unavailable");
                "store unavailable".to_string()
            }
            Error::MalformedRecord { .. } => {
                tracing::error!(error = %self.0, "Malformed record in store");
                "internal server error".to_string()
            }
            other => other.to_string(),
        };
        let body = ErrorResponse {
            kind: self.0.kind().to_string(),
            message,
        };
        (status, Json(body)).into_response()
    }
}
