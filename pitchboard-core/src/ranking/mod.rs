//! Ranking Engine.
//!
//! Every call drains exactly one scan of the official scoring records and
//! derives its whole answer from that snapshot. Nothing is cached.

mod stats;

pub use stats::{Stats, median};

use crate::entities::event::Event;
use crate::entities::scoring_record::ScoringRecord;
use crate::error::{Error, Result};
use crate::keyspace::{EntityKind, Keyspace, Predicate};
use kanau::processor::Processor;
use pitchboard_sdk::objects::{
    EventStatsResponse, LeaderboardEntry, LeaderboardResponse, Neighbor, TeamRankResponse,
};
use std::cmp::Ordering;

/// Leaderboard order: higher total first, then earlier `created_at`, then
/// `session_id`.
pub fn leaderboard_order(a: &ScoringRecord, b: &ScoringRecord) -> Ordering {
    b.total
        .total_cmp(&a.total)
        .then_with(|| a.created_at.cmp(&b.created_at))
        .then_with(|| a.session_id.cmp(&b.session_id))
}

/// Sort `records` and assign 1-based ranks. Equal totals still get distinct
/// consecutive ranks, decided by the tie-break.
pub fn rank(mut records: Vec<ScoringRecord>) -> Vec<LeaderboardEntry> {
    records.sort_by(leaderboard_order);
    records
        .into_iter()
        .enumerate()
        .map(|(i, r)| LeaderboardEntry {
            rank: i + 1,
            session_id: r.session_id,
            team_name: r.team_name,
            pitch_title: r.pitch_title,
            total: r.total,
            scored_at: r.created_at,
        })
        .collect()
}

fn neighbor(of: &LeaderboardEntry, other: Option<&LeaderboardEntry>) -> Option<Neighbor> {
    other.map(|n| Neighbor {
        rank: n.rank,
        session_id: n.session_id.clone(),
        team_name: n.team_name.clone(),
        total: n.total,
        gap: ((n.total - of.total).abs() * 100.0).round() / 100.0,
    })
}

impl Keyspace {
    async fn official_scores(&self, event_id: &str) -> Result<Vec<ScoringRecord>> {
        self.get::<Event>(event_id, event_id).await?;
        let official: Predicate<ScoringRecord> = Box::new(ScoringRecord::is_official);
        self.scan_all(event_id, Some(official)).await
    }
}

#[derive(Debug, Clone)]
pub struct GetRankings {
    pub event_id: String,
    pub limit: Option<usize>,
}

impl Processor<GetRankings> for Keyspace {
    type Output = LeaderboardResponse;
    type Error = Error;
    #[tracing::instrument(skip_all, err, name = "Ranking:GetRankings", fields(event_id = %query.event_id))]
    async fn process(&self, query: GetRankings) -> Result<LeaderboardResponse> {
        let mut entries = rank(self.official_scores(&query.event_id).await?);
        let total_entries = entries.len();
        if let Some(limit) = query.limit {
            entries.truncate(limit);
        }
        Ok(LeaderboardResponse {
            event_id: query.event_id,
            total_entries,
            entries,
        })
    }
}

#[derive(Debug, Clone)]
/// Position of one session plus the entries directly above and below it.
pub struct GetTeamRank {
    pub event_id: String,
    pub session_id: String,
}

impl Processor<GetTeamRank> for Keyspace {
    type Output = TeamRankResponse;
    type Error = Error;
    #[tracing::instrument(skip_all, err, name = "Ranking:GetTeamRank", fields(event_id = %query.event_id))]
    async fn process(&self, query: GetTeamRank) -> Result<TeamRankResponse> {
        let entries = rank(self.official_scores(&query.event_id).await?);
        let idx = entries
            .iter()
            .position(|e| e.session_id == query.session_id)
            .ok_or_else(|| Error::not_found(EntityKind::ScoringRecord, &query.session_id))?;
        let entry = &entries[idx];
        let above = neighbor(entry, idx.checked_sub(1).and_then(|i| entries.get(i)));
        let below = neighbor(entry, entries.get(idx + 1));
        Ok(TeamRankResponse {
            event_id: query.event_id,
            entry: entry.clone(),
            total_entries: entries.len(),
            above,
            below,
        })
    }
}

#[derive(Debug, Clone)]
pub struct GetEventStats {
    pub event_id: String,
}

impl Processor<GetEventStats> for Keyspace {
    type Output = EventStatsResponse;
    type Error = Error;
    #[tracing::instrument(skip_all, err, name = "Ranking:GetEventStats", fields(event_id = %query.event_id))]
    async fn process(&self, query: GetEventStats) -> Result<EventStatsResponse> {
        let totals: Vec<f64> = self
            .official_scores(&query.event_id)
            .await?
            .iter()
            .map(|r| r.total)
            .collect();
        let stats = Stats::from_totals(&totals);
        Ok(EventStatsResponse {
            event_id: query.event_id,
            scored_sessions: totals.len(),
            mean: stats.map(|s| s.mean),
            median: stats.map(|s| s.median),
            max: stats.map(|s| s.max),
            min: stats.map(|s| s.min),
        })
    }
}
