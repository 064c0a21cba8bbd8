//! Event and participant request and response types.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Kind of competition an event runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    Hackathon,
    VcPitch,
    DemoDay,
}

/// Event lifecycle. Only moves forward: `draft -> active -> completed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    Draft,
    Active,
    Completed,
}

impl std::fmt::Display for EventStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            EventStatus::Draft => "draft",
            EventStatus::Active => "active",
            EventStatus::Completed => "completed",
        };
        f.write_str(s)
    }
}

/// Relative weight of each scoring dimension.
///
/// Weights do not need to sum to one; the overall total is normalized by
/// their sum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScoringCriteria {
    pub idea: f64,
    pub technical: f64,
    pub tool_use: f64,
    pub presentation: f64,
}

impl ScoringCriteria {
    pub const EQUAL: ScoringCriteria = ScoringCriteria {
        idea: 0.25,
        technical: 0.25,
        tool_use: 0.25,
        presentation: 0.25,
    };

    /// Default weights for an event type.
    pub fn for_event_type(event_type: EventType) -> Self {
        match event_type {
            EventType::Hackathon => ScoringCriteria {
                idea: 0.25,
                technical: 0.30,
                tool_use: 0.25,
                presentation: 0.20,
            },
            EventType::VcPitch => ScoringCriteria {
                idea: 0.35,
                technical: 0.15,
                tool_use: 0.10,
                presentation: 0.40,
            },
            EventType::DemoDay => Self::EQUAL,
        }
    }

    pub fn total_weight(&self) -> f64 {
        self.idea + self.technical + self.tool_use + self.presentation
    }
}

impl Default for ScoringCriteria {
    fn default() -> Self {
        Self::EQUAL
    }
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEventRequest {
    /// Client chosen id. Generated by the server when absent.
    #[serde(default)]
    pub event_id: Option<String>,
    pub name: String,
    pub event_type: EventType,
    /// Falls back to the event type's default weights.
    #[serde(default)]
    pub criteria: Option<ScoringCriteria>,
    /// Create the event directly in the `active` state.
    #[serde(default)]
    pub activate: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateEventStatusRequest {
    pub status: EventStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterParticipantRequest {
    #[serde(default)]
    pub participant_id: Option<String>,
    pub team_name: String,
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventResponse {
    pub event_id: String,
    pub name: String,
    pub event_type: EventType,
    pub status: EventStatus,
    pub criteria: ScoringCriteria,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantResponse {
    pub participant_id: String,
    pub event_id: String,
    pub team_name: String,
    #[serde(with = "time::serde::rfc3339")]
    pub registered_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteEventResponse {
    pub event_id: String,
    /// Number of records removed from the event namespace, root included.
    pub removed_records: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_type_wire_names() {
        let json = serde_json::to_string(&EventType::VcPitch).unwrap();
        assert_eq!(json, "\"vc_pitch\"");
        let parsed: EventStatus = serde_json::from_str("\"completed\"").unwrap();
        assert_eq!(parsed, EventStatus::Completed);
    }

    #[test]
    fn test_criteria_presets_are_normalized() {
        for event_type in [EventType::Hackathon, EventType::VcPitch, EventType::DemoDay] {
            let total = ScoringCriteria::for_event_type(event_type).total_weight();
            assert!((total - 1.0).abs() < 1e-9, "{event_type:?} sums to {total}");
        }
    }

    #[test]
    fn test_create_event_request_defaults() {
        let req: CreateEventRequest =
            serde_json::from_str(r#"{"name":"Spring Hack","event_type":"hackathon"}"#).unwrap();
        assert!(req.event_id.is_none());
        assert!(req.criteria.is_none());
        assert!(!req.activate);
    }
}
