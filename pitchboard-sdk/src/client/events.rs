use super::{ClientError, PitchboardClient, parse_response};
use crate::objects::{
    CreateEventRequest, DeleteEventResponse, EventResponse, ParticipantResponse,
    RegisterParticipantRequest, UpdateEventStatusRequest,
};

impl PitchboardClient {
    /// `POST /api/v1/events`
    pub async fn create_event(
        &self,
        req: &CreateEventRequest,
    ) -> Result<EventResponse, ClientError> {
        let url = self.endpoint(&["events"])?;
        let resp = self.authorized(self.http.post(url)).json(req).send().await?;
        parse_response(resp).await
    }

    /// `GET /api/v1/events`
    pub async fn list_events(&self) -> Result<Vec<EventResponse>, ClientError> {
        let url = self.endpoint(&["events"])?;
        let resp = self.authorized(self.http.get(url)).send().await?;
        parse_response(resp).await
    }

    /// `GET /api/v1/events/{event_id}`
    pub async fn get_event(&self, event_id: &str) -> Result<EventResponse, ClientError> {
        let url = self.endpoint(&["events", event_id])?;
        let resp = self.authorized(self.http.get(url)).send().await?;
        parse_response(resp).await
    }

    /// `PUT /api/v1/events/{event_id}/status`
    pub async fn update_event_status(
        &self,
        event_id: &str,
        req: &UpdateEventStatusRequest,
    ) -> Result<EventResponse, ClientError> {
        let url = self.endpoint(&["events", event_id, "status"])?;
        let resp = self.authorized(self.http.put(url)).json(req).send().await?;
        parse_response(resp).await
    }

    /// `DELETE /api/v1/events/{event_id}` – removes the whole event namespace.
    pub async fn delete_event(&self, event_id: &str) -> Result<DeleteEventResponse, ClientError> {
        let url = self.endpoint(&["events", event_id])?;
        let resp = self.authorized(self.http.delete(url)).send().await?;
        parse_response(resp).await
    }

    /// `POST /api/v1/events/{event_id}/participants`
    pub async fn register_participant(
        &self,
        event_id: &str,
        req: &RegisterParticipantRequest,
    ) -> Result<ParticipantResponse, ClientError> {
        let url = self.endpoint(&["events", event_id, "participants"])?;
        let resp = self.authorized(self.http.post(url)).json(req).send().await?;
        parse_response(resp).await
    }

    /// `GET /api/v1/events/{event_id}/participants`
    pub async fn list_participants(
        &self,
        event_id: &str,
    ) -> Result<Vec<ParticipantResponse>, ClientError> {
        let url = self.endpoint(&["events", event_id, "participants"])?;
        let resp = self.authorized(self.http.get(url)).send().await?;
        parse_response(resp).await
    }
}
