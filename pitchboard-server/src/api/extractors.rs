//! Request authentication.
//!
//! Every API call carries the plaintext key in the `Pitchboard-Api-Key`
//! header; it is checked against the argon2 hash from the configuration.

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use pitchboard_sdk::API_KEY_HEADER;
use pitchboard_sdk::objects::ErrorResponse;

use crate::state::AppState;

/// Proof that the request carried a valid API key.
pub struct ApiKey;

#[derive(Debug, thiserror::Error)]
pub enum ApiKeyError {
    #[error("missing Pitchboard-Api-Key header")]
    Missing,
    #[error("invalid API key")]
    Invalid,
}

impl IntoResponse for ApiKeyError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            kind: "unauthorized".to_string(),
            message: self.to_string(),
        };
        (StatusCode::UNAUTHORIZED, Json(body)).into_response()
    }
}

impl FromRequestParts<AppState> for ApiKey {
    type Rejection = ApiKeyError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let key = parts
            .headers
            .get(API_KEY_HEADER)
            .ok_or(ApiKeyError::Missing)?
            .to_str()
            .map_err(|_| ApiKeyError::Invalid)?;

        if state.auth.read().await.verify_secret(key) {
            Ok(ApiKey)
        } else {
            tracing::debug!("Rejected request with a wrong API key");
            Err(ApiKeyError::Invalid)
        }
    }
}
