use crate::error::{Error, Result};
use crate::keyspace::{Entity, EntityKind, Keyspace};
use futures_util::TryStreamExt;
use kanau::processor::Processor;
use pitchboard_sdk::objects::{EventResponse, EventStatus, EventType, ScoringCriteria};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::info;

/// Root record of a competition. Everything else lives in its namespace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Event {
    pub event_id: String,
    pub name: String,
    pub event_type: EventType,
    pub status: EventStatus,
    pub criteria: ScoringCriteria,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Entity for Event {
    const KIND: EntityKind = EntityKind::Event;

    fn event_id(&self) -> &str {
        &self.event_id
    }
}

impl From<&Event> for EventResponse {
    fn from(e: &Event) -> Self {
        EventResponse {
            event_id: e.event_id.clone(),
            name: e.name.clone(),
            event_type: e.event_type,
            status: e.status,
            criteria: e.criteria,
            created_at: e.created_at,
        }
    }
}

/// Event status only moves forward. Re-applying the current status is a no-op.
pub fn check_event_transition(from: EventStatus, to: EventStatus) -> Result<()> {
    if to < from {
        return Err(Error::InvalidTransition(format!(
            "event cannot move from {from} back to {to}"
        )));
    }
    Ok(())
}

/// Weights must be finite and non-negative, and their sum must stay finite.
/// All-zero weights are accepted and score every dimension equally.
pub fn validate_criteria(criteria: &ScoringCriteria) -> Result<()> {
    let weights = [
        ("idea", criteria.idea),
        ("technical", criteria.technical),
        ("tool_use", criteria.tool_use),
        ("presentation", criteria.presentation),
    ];
    for (dimension, weight) in weights {
        if !weight.is_finite() || weight < 0.0 {
            return Err(Error::InvalidInput(format!(
                "{dimension} weight must be a finite non-negative number, got {weight}"
            )));
        }
    }
    if !criteria.total_weight().is_finite() {
        return Err(Error::InvalidInput(
            "scoring weights sum to a non-finite value".to_string(),
        ));
    }
    Ok(())
}

#[derive(Debug, Clone)]
/// Create a new event, in `draft` unless `activate` is set.
pub struct CreateEvent {
    pub event_id: Option<String>,
    pub name: String,
    pub event_type: EventType,
    pub criteria: Option<ScoringCriteria>,
    pub activate: bool,
}

impl Processor<CreateEvent> for Keyspace {
    type Output = Event;
    type Error = Error;
    #[tracing::instrument(skip_all, err, name = "Keyspace:CreateEvent")]
    async fn process(&self, cmd: CreateEvent) -> Result<Event> {
        let criteria = cmd
            .criteria
            .unwrap_or_else(|| ScoringCriteria::for_event_type(cmd.event_type));
        validate_criteria(&criteria)?;
        let event_id = cmd.event_id.unwrap_or_else(super::new_id);
        if self.find::<Event>(&event_id, &event_id).await?.is_some() {
            return Err(Error::InvalidTransition(format!(
                "event {event_id} already exists"
            )));
        }
        let event = Event {
            criteria,
            status: if cmd.activate {
                EventStatus::Active
            } else {
                EventStatus::Draft
            },
            event_id,
            name: cmd.name,
            event_type: cmd.event_type,
            created_at: OffsetDateTime::now_utc(),
        };
        self.put(&event.event_id, &event.event_id, &event).await?;
        info!(event_id = %event.event_id, status = %event.status, "Created event");
        Ok(event)
    }
}

#[derive(Debug, Clone)]
pub struct GetEvent {
    pub event_id: String,
}

impl Processor<GetEvent> for Keyspace {
    type Output = Event;
    type Error = Error;
    async fn process(&self, query: GetEvent) -> Result<Event> {
        self.get(&query.event_id, &query.event_id).await
    }
}

#[derive(Debug, Clone)]
/// List every event, oldest first.
pub struct ListEvents;

impl Processor<ListEvents> for Keyspace {
    type Output = Vec<Event>;
    type Error = Error;
    #[tracing::instrument(skip_all, err, name = "Keyspace:ListEvents")]
    async fn process(&self, _query: ListEvents) -> Result<Vec<Event>> {
        let mut events: Vec<Event> = self.scan_roots::<Event>().await?.try_collect().await?;
        events.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.event_id.cmp(&b.event_id))
        });
        Ok(events)
    }
}

#[derive(Debug, Clone)]
pub struct UpdateEventStatus {
    pub event_id: String,
    pub status: EventStatus,
}

impl Processor<UpdateEventStatus> for Keyspace {
    type Output = Event;
    type Error = Error;
    #[tracing::instrument(skip_all, err, name = "Keyspace:UpdateEventStatus")]
    async fn process(&self, cmd: UpdateEventStatus) -> Result<Event> {
        let mut event: Event = self.get(&cmd.event_id, &cmd.event_id).await?;
        check_event_transition(event.status, cmd.status)?;
        if event.status == cmd.status {
            return Ok(event);
        }
        let from = event.status;
        event.status = cmd.status;
        self.put(&event.event_id, &event.event_id, &event).await?;
        info!(event_id = %event.event_id, %from, to = %event.status, "Event status changed");
        Ok(event)
    }
}

#[derive(Debug, Clone)]
/// Delete an event together with its whole namespace.
///
/// Returns the number of records removed.
pub struct DeleteEvent {
    pub event_id: String,
}

impl Processor<DeleteEvent> for Keyspace {
    type Output = u64;
    type Error = Error;
    #[tracing::instrument(skip_all, err, name = "Keyspace:DeleteEvent")]
    async fn process(&self, cmd: DeleteEvent) -> Result<u64> {
        self.get::<Event>(&cmd.event_id, &cmd.event_id).await?;
        let removed = self.delete_namespace(&cmd.event_id).await?;
        info!(event_id = %cmd.event_id, removed, "Deleted event namespace");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_status_moves_forward_only() {
        assert!(check_event_transition(EventStatus::Draft, EventStatus::Active).is_ok());
        assert!(check_event_transition(EventStatus::Active, EventStatus::Completed).is_ok());
        assert!(check_event_transition(EventStatus::Draft, EventStatus::Completed).is_ok());
        assert!(check_event_transition(EventStatus::Active, EventStatus::Active).is_ok());
        assert!(matches!(
            check_event_transition(EventStatus::Completed, EventStatus::Active),
            Err(Error::InvalidTransition(_))
        ));
        assert!(matches!(
            check_event_transition(EventStatus::Active, EventStatus::Draft),
            Err(Error::InvalidTransition(_))
        ));
    }

    #[test]
    fn test_criteria_validation() {
        let with_idea = |idea| ScoringCriteria {
            idea,
            ..ScoringCriteria::EQUAL
        };
        assert!(validate_criteria(&ScoringCriteria::EQUAL).is_ok());
        assert!(validate_criteria(&with_idea(1e308)).is_ok());
        assert!(
            validate_criteria(&ScoringCriteria {
                idea: 0.0,
                technical: 0.0,
                tool_use: 0.0,
                presentation: 0.0,
            })
            .is_ok()
        );
        for idea in [f64::NAN, f64::INFINITY, -0.5] {
            assert!(matches!(
                validate_criteria(&with_idea(idea)),
                Err(Error::InvalidInput(_))
            ));
        }
        let overflowing = ScoringCriteria {
            idea: f64::MAX,
            technical: f64::MAX,
            ..ScoringCriteria::EQUAL
        };
        assert!(matches!(
            validate_criteria(&overflowing),
            Err(Error::InvalidInput(_))
        ));
    }
}
