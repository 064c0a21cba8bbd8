//! Leaderboard request and response types.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Query parameters for the leaderboard.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RankingsQuery {
    #[serde(default)]
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    /// 1-based position in the leaderboard.
    pub rank: usize,
    pub session_id: String,
    pub team_name: String,
    pub pitch_title: String,
    pub total: f64,
    #[serde(with = "time::serde::rfc3339")]
    pub scored_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardResponse {
    pub event_id: String,
    /// Number of officially scored sessions, before truncation.
    pub total_entries: usize,
    pub entries: Vec<LeaderboardEntry>,
}

/// An adjacent leaderboard entry, used to show how close the next rank is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Neighbor {
    pub rank: usize,
    pub session_id: String,
    pub team_name: String,
    pub total: f64,
    /// Absolute score difference to the requested entry.
    pub gap: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamRankResponse {
    pub event_id: String,
    pub entry: LeaderboardEntry,
    pub total_entries: usize,
    pub above: Option<Neighbor>,
    pub below: Option<Neighbor>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventStatsResponse {
    pub event_id: String,
    pub scored_sessions: usize,
    pub mean: Option<f64>,
    pub median: Option<f64>,
    pub max: Option<f64>,
    pub min: Option<f64>,
}
