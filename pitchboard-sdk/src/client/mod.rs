//! HTTP client for the Pitchboard API.
//!
//! Gated behind the `client` cargo feature so downstream crates that only
//! need the shared types do not pull in `reqwest`.

mod events;
mod scoring;
mod sessions;

use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use url::Url;

use crate::API_KEY_HEADER;
use crate::objects::ErrorResponse;

/// Errors produced by the SDK HTTP client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Transport-level failure (DNS, TLS, connection reset, ...).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server rejected the request. `error` is present when the body
    /// carried the standard error shape.
    #[error("api error: status {status}, body: {body}")]
    Api {
        status: StatusCode,
        body: String,
        error: Option<ErrorResponse>,
    },

    /// Response body could not be deserialized.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The base URL cannot carry path segments (e.g. `mailto:`).
    #[error("base url {0} cannot be used as an api root")]
    BaseUrl(Url),
}

impl ClientError {
    /// Machine readable failure kind reported by the server, if any.
    pub fn kind(&self) -> Option<&str> {
        match self {
            ClientError::Api {
                error: Some(error), ..
            } => Some(&error.kind),
            _ => None,
        }
    }
}

/// Typed HTTP client for the Pitchboard API.
///
/// Every request carries the plaintext API key in the `Pitchboard-Api-Key`
/// header, verified server-side against an argon2-hashed value.
#[derive(Debug, Clone)]
pub struct PitchboardClient {
    http: Client,
    base_url: Url,
    api_key: String,
}

impl PitchboardClient {
    /// * `base_url` – root URL of the Pitchboard server.
    /// * `api_key` – the plaintext API key.
    pub fn new(base_url: Url, api_key: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url,
            api_key: api_key.into(),
        }
    }

    /// Replace the default `reqwest::Client` with a custom one.
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http = client;
        self
    }

    /// `{base}/api/v1/{segments...}`, each segment percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::BaseUrl(self.base_url.clone()))?
            .pop_if_empty()
            .extend(["api", "v1"])
            .extend(segments);
        Ok(url)
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder.header(API_KEY_HEADER, &self.api_key)
    }
}

async fn parse_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, ClientError> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        let error = serde_json::from_str(&body).ok();
        return Err(ClientError::Api {
            status,
            body,
            error,
        });
    }
    let bytes = resp.bytes().await?;
    serde_json::from_slice(&bytes).map_err(ClientError::Json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_encodes_segments() {
        let client = PitchboardClient::new(Url::parse("http://localhost:8080/").unwrap(), "k");
        let url = client.endpoint(&["events", "spring hack", "stats"]).unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8080/api/v1/events/spring%20hack/stats"
        );
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let client =
            PitchboardClient::new(Url::parse("https://example.com/pitchboard").unwrap(), "k");
        let url = client.endpoint(&["events"]).unwrap();
        assert_eq!(url.as_str(), "https://example.com/pitchboard/api/v1/events");
    }
}
