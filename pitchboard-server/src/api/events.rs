//! Event and participant endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
};
use kanau::processor::Processor;
use pitchboard_core::entities::event::{
    CreateEvent, DeleteEvent, GetEvent, ListEvents, UpdateEventStatus,
};
use pitchboard_core::entities::participant::{ListParticipants, RegisterParticipant};
use pitchboard_sdk::objects::{
    CreateEventRequest, DeleteEventResponse, EventResponse, ParticipantResponse,
    RegisterParticipantRequest, UpdateEventStatusRequest,
};

use super::ApiError;
use crate::api::extractors::ApiKey;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/events", get(list_events).post(create_event))
        .route("/events/{event_id}", get(get_event).delete(delete_event))
        .route("/events/{event_id}/status", put(update_event_status))
        .route(
            "/events/{event_id}/participants",
            get(list_participants).post(register_participant),
        )
}

async fn create_event(
    state: State<AppState>,
    _auth: ApiKey,
    Json(req): Json<CreateEventRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let event = state
        .keyspace
        .process(CreateEvent {
            event_id: req.event_id,
            name: req.name,
            event_type: req.event_type,
            criteria: req.criteria,
            activate: req.activate,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(EventResponse::from(&event))))
}

async fn list_events(
    state: State<AppState>,
    _auth: ApiKey,
) -> Result<impl IntoResponse, ApiError> {
    let events = state.keyspace.process(ListEvents).await?;
    Ok(Json(
        events.iter().map(EventResponse::from).collect::<Vec<_>>(),
    ))
}

async fn get_event(
    state: State<AppState>,
    _auth: ApiKey,
    Path(event_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let event = state.keyspace.process(GetEvent { event_id }).await?;
    Ok(Json(EventResponse::from(&event)))
}

async fn update_event_status(
    state: State<AppState>,
    _auth: ApiKey,
    Path(event_id): Path<String>,
    Json(req): Json<UpdateEventStatusRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let event = state
        .keyspace
        .process(UpdateEventStatus {
            event_id,
            status: req.status,
        })
        .await?;
    Ok(Json(EventResponse::from(&event)))
}

/// `DELETE /events/{event_id}` removes the event and everything under it.
async fn delete_event(
    state: State<AppState>,
    _auth: ApiKey,
    Path(event_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let removed_records = state
        .keyspace
        .process(DeleteEvent {
            event_id: event_id.clone(),
        })
        .await?;
    Ok(Json(DeleteEventResponse {
        event_id,
        removed_records,
    }))
}

async fn register_participant(
    state: State<AppState>,
    _auth: ApiKey,
    Path(event_id): Path<String>,
    Json(req): Json<RegisterParticipantRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let participant = state
        .keyspace
        .process(RegisterParticipant {
            event_id,
            participant_id: req.participant_id,
            team_name: req.team_name,
        })
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ParticipantResponse::from(&participant)),
    ))
}

async fn list_participants(
    state: State<AppState>,
    _auth: ApiKey,
    Path(event_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let participants = state
        .keyspace
        .process(ListParticipants { event_id })
        .await?;
    Ok(Json(
        participants
            .iter()
            .map(ParticipantResponse::from)
            .collect::<Vec<_>>(),
    ))
}
