use super::{ClientError, PitchboardClient, parse_response};
use crate::objects::{
    AdvanceSessionRequest, AttachAudioRequest, AttachTranscriptRequest, CompleteSessionRequest,
    CreateSessionRequest, FailSessionRequest, ListSessionsQuery, SessionAnalysesResponse,
    SessionResponse, StoreBaselineAnalysisRequest, StoreEnhancedAnalysisRequest,
};
use serde::Serialize;
use serde::de::DeserializeOwned;

impl PitchboardClient {
    /// `POST /api/v1/events/{event_id}/sessions`
    pub async fn create_session(
        &self,
        event_id: &str,
        req: &CreateSessionRequest,
    ) -> Result<SessionResponse, ClientError> {
        let url = self.endpoint(&["events", event_id, "sessions"])?;
        let resp = self.authorized(self.http.post(url)).json(req).send().await?;
        parse_response(resp).await
    }

    /// `GET /api/v1/events/{event_id}/sessions`
    pub async fn list_sessions(
        &self,
        event_id: &str,
        query: &ListSessionsQuery,
    ) -> Result<Vec<SessionResponse>, ClientError> {
        let url = self.endpoint(&["events", event_id, "sessions"])?;
        let resp = self
            .authorized(self.http.get(url))
            .query(query)
            .send()
            .await?;
        parse_response(resp).await
    }

    /// `GET /api/v1/events/{event_id}/sessions/{session_id}`
    pub async fn get_session(
        &self,
        event_id: &str,
        session_id: &str,
    ) -> Result<SessionResponse, ClientError> {
        let url = self.endpoint(&["events", event_id, "sessions", session_id])?;
        let resp = self.authorized(self.http.get(url)).send().await?;
        parse_response(resp).await
    }

    async fn session_action<B: Serialize, T: DeserializeOwned>(
        &self,
        event_id: &str,
        session_id: &str,
        action: &[&str],
        body: &B,
    ) -> Result<T, ClientError> {
        let mut segments = vec!["events", event_id, "sessions", session_id];
        segments.extend_from_slice(action);
        let url = self.endpoint(&segments)?;
        let resp = self.authorized(self.http.post(url)).json(body).send().await?;
        parse_response(resp).await
    }

    /// `POST .../sessions/{session_id}/advance`
    pub async fn advance_session(
        &self,
        event_id: &str,
        session_id: &str,
        req: &AdvanceSessionRequest,
    ) -> Result<SessionResponse, ClientError> {
        self.session_action(event_id, session_id, &["advance"], req)
            .await
    }

    /// `POST .../sessions/{session_id}/transcript`
    pub async fn attach_transcript(
        &self,
        event_id: &str,
        session_id: &str,
        req: &AttachTranscriptRequest,
    ) -> Result<SessionResponse, ClientError> {
        self.session_action(event_id, session_id, &["transcript"], req)
            .await
    }

    /// `POST .../sessions/{session_id}/audio`
    pub async fn attach_audio(
        &self,
        event_id: &str,
        session_id: &str,
        req: &AttachAudioRequest,
    ) -> Result<SessionResponse, ClientError> {
        self.session_action(event_id, session_id, &["audio"], req)
            .await
    }

    /// `POST .../sessions/{session_id}/complete`
    pub async fn complete_session(
        &self,
        event_id: &str,
        session_id: &str,
        req: &CompleteSessionRequest,
    ) -> Result<SessionResponse, ClientError> {
        self.session_action(event_id, session_id, &["complete"], req)
            .await
    }

    /// `POST .../sessions/{session_id}/fail`
    pub async fn fail_session(
        &self,
        event_id: &str,
        session_id: &str,
        req: &FailSessionRequest,
    ) -> Result<SessionResponse, ClientError> {
        self.session_action(event_id, session_id, &["fail"], req)
            .await
    }

    /// `POST .../sessions/{session_id}/analysis/baseline`
    pub async fn store_baseline_analysis(
        &self,
        event_id: &str,
        session_id: &str,
        req: &StoreBaselineAnalysisRequest,
    ) -> Result<SessionAnalysesResponse, ClientError> {
        self.session_action(event_id, session_id, &["analysis", "baseline"], req)
            .await
    }

    /// `POST .../sessions/{session_id}/analysis/enhanced`
    pub async fn store_enhanced_analysis(
        &self,
        event_id: &str,
        session_id: &str,
        req: &StoreEnhancedAnalysisRequest,
    ) -> Result<SessionAnalysesResponse, ClientError> {
        self.session_action(event_id, session_id, &["analysis", "enhanced"], req)
            .await
    }

    /// `GET .../sessions/{session_id}/analysis`
    pub async fn get_analyses(
        &self,
        event_id: &str,
        session_id: &str,
    ) -> Result<SessionAnalysesResponse, ClientError> {
        let url = self.endpoint(&["events", event_id, "sessions", session_id, "analysis"])?;
        let resp = self.authorized(self.http.get(url)).send().await?;
        parse_response(resp).await
    }
}
