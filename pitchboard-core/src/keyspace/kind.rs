use serde::{Deserialize, Serialize};

/// Every kind of record that lives under an event namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Event,
    Participant,
    Session,
    ScoringRecord,
    JudgeScore,
    BaselineAnalysis,
    EnhancedAnalysis,
}

impl EntityKind {
    pub const ALL: [EntityKind; 7] = [
        EntityKind::Event,
        EntityKind::Participant,
        EntityKind::Session,
        EntityKind::ScoringRecord,
        EntityKind::JudgeScore,
        EntityKind::BaselineAnalysis,
        EntityKind::EnhancedAnalysis,
    ];

    /// Key segment following `event:{event_id}:`.
    pub fn segment(self) -> &'static str {
        match self {
            EntityKind::Event => "meta",
            EntityKind::Participant => "participant",
            EntityKind::Session => "session",
            EntityKind::ScoringRecord => "score",
            EntityKind::JudgeScore => "judge_score",
            EntityKind::BaselineAnalysis => "analysis:baseline",
            EntityKind::EnhancedAnalysis => "analysis:enhanced",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            EntityKind::Event => "event",
            EntityKind::Participant => "participant",
            EntityKind::Session => "session",
            EntityKind::ScoringRecord => "scoring record",
            EntityKind::JudgeScore => "judge score",
            EntityKind::BaselineAnalysis => "baseline analysis",
            EntityKind::EnhancedAnalysis => "enhanced analysis",
        };
        f.write_str(s)
    }
}
