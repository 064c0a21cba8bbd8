//! Scoring Aggregator.
//!
//! Turns a session, its analyses and the dimension scores of the evaluator
//! into one scoring record. Everything is computed in memory first and stored
//! with a single replacing write, so a failed or cancelled run leaves the
//! previous record untouched.

mod merge;
mod total;

pub use merge::merge;
pub use total::{MAX_SCORE, MIN_SCORE, sanitize_breakdown, weighted_total};

use crate::entities::event::Event;
use crate::entities::scoring_record::{JudgeScore, ScoringRecord};
use crate::entities::session::Session;
use crate::error::{Error, Result};
use crate::keyspace::Keyspace;
use kanau::processor::Processor;
use pitchboard_sdk::objects::{PrimaryAnalysis, ScoreBreakdown, SessionStatus};
use time::OffsetDateTime;
use tracing::{info, warn};

/// Only sessions that finished recording can be scored.
fn ensure_scorable(session: &Session) -> Result<()> {
    match session.status {
        SessionStatus::Processing | SessionStatus::Completed => Ok(()),
        status => Err(Error::InvalidTransition(format!(
            "session {} is {status} and cannot be scored",
            session.session_id
        ))),
    }
}

#[derive(Debug, Clone)]
/// Compute and store the official scoring record of a session.
pub struct ScoreSession {
    pub event_id: String,
    pub session_id: String,
    pub breakdown: ScoreBreakdown,
}

impl Processor<ScoreSession> for Keyspace {
    type Output = ScoringRecord;
    type Error = Error;
    #[tracing::instrument(skip_all, err, name = "Scoring:ScoreSession", fields(event_id = %cmd.event_id, session_id = %cmd.session_id))]
    async fn process(&self, cmd: ScoreSession) -> Result<ScoringRecord> {
        let session: Session = self.get(&cmd.event_id, &cmd.session_id).await?;
        ensure_scorable(&session)?;
        if !session.has_transcript() {
            return Err(Error::IncompleteInput(format!(
                "session {} has no transcript",
                session.session_id
            )));
        }
        let event: Event = self.get(&cmd.event_id, &cmd.event_id).await?;
        let analyses = self
            .load_analyses(&session.event_id, &session.session_id)
            .await?;
        let analysis = merge(analyses.baseline.as_ref(), analyses.enhanced.as_ref())?;
        if analysis.provenance.primary_analysis == PrimaryAnalysis::Baseline {
            let reason = match &analyses.enhanced {
                None => "absent",
                Some(_) => "failed",
            };
            warn!(reason, "Enhanced analysis unusable, scoring from baseline");
        }

        let breakdown = sanitize_breakdown(cmd.breakdown);
        let total = weighted_total(&breakdown, &event.criteria);
        let record = ScoringRecord {
            session_id: session.session_id,
            event_id: session.event_id,
            team_name: session.team_name,
            pitch_title: session.pitch_title,
            breakdown,
            total,
            judge_id: None,
            analysis: Some(analysis),
            created_at: OffsetDateTime::now_utc(),
        };
        self.put(&record.event_id, &record.session_id, &record)
            .await?;
        info!(
            total = record.total,
            primary = ?record.analysis.as_ref().map(|a| a.provenance.primary_analysis),
            "Stored official scoring record"
        );
        Ok(record)
    }
}

#[derive(Debug, Clone)]
/// Store a judge's own evaluation of a session. Replaces that judge's
/// previous record for the session.
pub struct SubmitJudgeScore {
    pub event_id: String,
    pub session_id: String,
    pub judge_id: String,
    pub breakdown: ScoreBreakdown,
}

impl Processor<SubmitJudgeScore> for Keyspace {
    type Output = ScoringRecord;
    type Error = Error;
    #[tracing::instrument(skip_all, err, name = "Scoring:SubmitJudgeScore", fields(event_id = %cmd.event_id, session_id = %cmd.session_id))]
    async fn process(&self, cmd: SubmitJudgeScore) -> Result<ScoringRecord> {
        let judge_id = cmd.judge_id.trim();
        if judge_id.is_empty() {
            return Err(Error::IncompleteInput("judge id is empty".to_string()));
        }
        let session: Session = self.get(&cmd.event_id, &cmd.session_id).await?;
        ensure_scorable(&session)?;
        let event: Event = self.get(&cmd.event_id, &cmd.event_id).await?;

        let breakdown = sanitize_breakdown(cmd.breakdown);
        let total = weighted_total(&breakdown, &event.criteria);
        let entity_id = JudgeScore::entity_id(&session.session_id, judge_id);
        let score = JudgeScore(ScoringRecord {
            session_id: session.session_id,
            event_id: session.event_id,
            team_name: session.team_name,
            pitch_title: session.pitch_title,
            breakdown,
            total,
            judge_id: Some(judge_id.to_string()),
            analysis: None,
            created_at: OffsetDateTime::now_utc(),
        });
        self.put(&score.0.event_id, &entity_id, &score).await?;
        info!(%judge_id, total, "Stored judge score");
        Ok(score.0)
    }
}
