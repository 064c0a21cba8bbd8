use crate::error::{Error, Result};
use crate::keyspace::{Entity, EntityKind, Keyspace, Predicate};
use kanau::processor::Processor;
use pitchboard_sdk::objects::{MergedAnalysis, ScoreBreakdown, ScoringRecordResponse};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Numeric evaluation of one session.
///
/// `event_id`, `team_name` and `pitch_title` are copied from the session when
/// the record is written and never re-read from it afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScoringRecord {
    pub session_id: String,
    pub event_id: String,
    pub team_name: String,
    pub pitch_title: String,
    pub breakdown: ScoreBreakdown,
    pub total: f64,
    pub judge_id: Option<String>,
    pub analysis: Option<MergedAnalysis>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl ScoringRecord {
    pub fn is_official(&self) -> bool {
        self.judge_id.is_none()
    }
}

/// The official record, stored under the session's id.
impl Entity for ScoringRecord {
    const KIND: EntityKind = EntityKind::ScoringRecord;

    fn event_id(&self) -> &str {
        &self.event_id
    }
}

impl From<&ScoringRecord> for ScoringRecordResponse {
    fn from(r: &ScoringRecord) -> Self {
        ScoringRecordResponse {
            session_id: r.session_id.clone(),
            event_id: r.event_id.clone(),
            team_name: r.team_name.clone(),
            pitch_title: r.pitch_title.clone(),
            breakdown: r.breakdown.clone(),
            total: r.total,
            judge_id: r.judge_id.clone(),
            analysis: r.analysis.clone(),
            created_at: r.created_at,
        }
    }
}

/// A judge's own record for a session, kept apart from the official one so
/// the leaderboard scan never sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JudgeScore(pub ScoringRecord);

impl JudgeScore {
    /// Entity id of a judge record: one per judge and session.
    pub fn entity_id(session_id: &str, judge_id: &str) -> String {
        format!("{session_id}:{judge_id}")
    }
}

impl Entity for JudgeScore {
    const KIND: EntityKind = EntityKind::JudgeScore;

    fn event_id(&self) -> &str {
        &self.0.event_id
    }
}

#[derive(Debug, Clone)]
pub struct GetScoringRecord {
    pub event_id: String,
    pub session_id: String,
}

impl Processor<GetScoringRecord> for Keyspace {
    type Output = ScoringRecord;
    type Error = Error;
    async fn process(&self, query: GetScoringRecord) -> Result<ScoringRecord> {
        self.get(&query.event_id, &query.session_id).await
    }
}

#[derive(Debug, Clone)]
/// Judge records of one session, ordered by judge id.
pub struct ListJudgeScores {
    pub event_id: String,
    pub session_id: String,
}

impl Processor<ListJudgeScores> for Keyspace {
    type Output = Vec<ScoringRecord>;
    type Error = Error;
    async fn process(&self, query: ListJudgeScores) -> Result<Vec<ScoringRecord>> {
        let session_id = query.session_id;
        let predicate: Predicate<JudgeScore> =
            Box::new(move |score: &JudgeScore| score.0.session_id == session_id);
        let mut records: Vec<ScoringRecord> = self
            .scan_all::<JudgeScore>(&query.event_id, Some(predicate))
            .await?
            .into_iter()
            .map(|score| score.0)
            .collect();
        records.sort_by(|a, b| a.judge_id.cmp(&b.judge_id));
        Ok(records)
    }
}
