use super::{ClientError, PitchboardClient, parse_response};
use crate::objects::{
    EventStatsResponse, LeaderboardResponse, RankingsQuery, ScoreSessionRequest,
    ScoringRecordResponse, SubmitJudgeScoreRequest, TeamRankResponse,
};

impl PitchboardClient {
    /// `POST .../sessions/{session_id}/score` – compute and store the official
    /// scoring record.
    pub async fn score_session(
        &self,
        event_id: &str,
        session_id: &str,
        req: &ScoreSessionRequest,
    ) -> Result<ScoringRecordResponse, ClientError> {
        let url = self.endpoint(&["events", event_id, "sessions", session_id, "score"])?;
        let resp = self.authorized(self.http.post(url)).json(req).send().await?;
        parse_response(resp).await
    }

    /// `GET .../sessions/{session_id}/score`
    pub async fn get_scoring_record(
        &self,
        event_id: &str,
        session_id: &str,
    ) -> Result<ScoringRecordResponse, ClientError> {
        let url = self.endpoint(&["events", event_id, "sessions", session_id, "score"])?;
        let resp = self.authorized(self.http.get(url)).send().await?;
        parse_response(resp).await
    }

    /// `POST .../sessions/{session_id}/judge-scores`
    pub async fn submit_judge_score(
        &self,
        event_id: &str,
        session_id: &str,
        req: &SubmitJudgeScoreRequest,
    ) -> Result<ScoringRecordResponse, ClientError> {
        let url = self.endpoint(&["events", event_id, "sessions", session_id, "judge-scores"])?;
        let resp = self.authorized(self.http.post(url)).json(req).send().await?;
        parse_response(resp).await
    }

    /// `GET .../sessions/{session_id}/judge-scores`
    pub async fn list_judge_scores(
        &self,
        event_id: &str,
        session_id: &str,
    ) -> Result<Vec<ScoringRecordResponse>, ClientError> {
        let url = self.endpoint(&["events", event_id, "sessions", session_id, "judge-scores"])?;
        let resp = self.authorized(self.http.get(url)).send().await?;
        parse_response(resp).await
    }

    /// `GET /api/v1/events/{event_id}/rankings`
    pub async fn get_rankings(
        &self,
        event_id: &str,
        query: &RankingsQuery,
    ) -> Result<LeaderboardResponse, ClientError> {
        let url = self.endpoint(&["events", event_id, "rankings"])?;
        let resp = self
            .authorized(self.http.get(url))
            .query(query)
            .send()
            .await?;
        parse_response(resp).await
    }

    /// `GET /api/v1/events/{event_id}/rankings/{session_id}`
    pub async fn get_team_rank(
        &self,
        event_id: &str,
        session_id: &str,
    ) -> Result<TeamRankResponse, ClientError> {
        let url = self.endpoint(&["events", event_id, "rankings", session_id])?;
        let resp = self.authorized(self.http.get(url)).send().await?;
        parse_response(resp).await
    }

    /// `GET /api/v1/events/{event_id}/stats`
    pub async fn get_event_stats(&self, event_id: &str) -> Result<EventStatsResponse, ClientError> {
        let url = self.endpoint(&["events", event_id, "stats"])?;
        let resp = self.authorized(self.http.get(url)).send().await?;
        parse_response(resp).await
    }
}
