use crate::entities::event::Event;
use crate::error::{Error, Result};
use crate::keyspace::{Entity, EntityKind, Keyspace};
use kanau::processor::Processor;
use pitchboard_sdk::objects::{EventStatus, ParticipantResponse};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::info;

/// A registered team. `event_id` is a back-reference only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Participant {
    pub participant_id: String,
    pub event_id: String,
    pub team_name: String,
    #[serde(with = "time::serde::rfc3339")]
    pub registered_at: OffsetDateTime,
}

impl Entity for Participant {
    const KIND: EntityKind = EntityKind::Participant;

    fn event_id(&self) -> &str {
        &self.event_id
    }
}

impl From<&Participant> for ParticipantResponse {
    fn from(p: &Participant) -> Self {
        ParticipantResponse {
            participant_id: p.participant_id.clone(),
            event_id: p.event_id.clone(),
            team_name: p.team_name.clone(),
            registered_at: p.registered_at,
        }
    }
}

#[derive(Debug, Clone)]
/// Register a team with an event that has not completed yet.
pub struct RegisterParticipant {
    pub event_id: String,
    pub participant_id: Option<String>,
    pub team_name: String,
}

impl Processor<RegisterParticipant> for Keyspace {
    type Output = Participant;
    type Error = Error;
    #[tracing::instrument(skip_all, err, name = "Keyspace:RegisterParticipant")]
    async fn process(&self, cmd: RegisterParticipant) -> Result<Participant> {
        let event: Event = self.get(&cmd.event_id, &cmd.event_id).await?;
        if event.status == EventStatus::Completed {
            return Err(Error::InvalidTransition(format!(
                "event {} is completed and closed for registration",
                event.event_id
            )));
        }
        let participant = Participant {
            participant_id: cmd.participant_id.unwrap_or_else(super::new_id),
            event_id: event.event_id,
            team_name: cmd.team_name,
            registered_at: OffsetDateTime::now_utc(),
        };
        self.put(
            &participant.event_id,
            &participant.participant_id,
            &participant,
        )
        .await?;
        info!(
            event_id = %participant.event_id,
            participant_id = %participant.participant_id,
            team_name = %participant.team_name,
            "Registered participant"
        );
        Ok(participant)
    }
}

#[derive(Debug, Clone)]
/// List the participants of an event, earliest registration first.
pub struct ListParticipants {
    pub event_id: String,
}

impl Processor<ListParticipants> for Keyspace {
    type Output = Vec<Participant>;
    type Error = Error;
    async fn process(&self, query: ListParticipants) -> Result<Vec<Participant>> {
        self.get::<Event>(&query.event_id, &query.event_id).await?;
        let mut participants: Vec<Participant> = self.scan_all(&query.event_id, None).await?;
        participants.sort_by(|a, b| {
            a.registered_at
                .cmp(&b.registered_at)
                .then_with(|| a.participant_id.cmp(&b.participant_id))
        });
        Ok(participants)
    }
}
