use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use super::JsonBody;
use crate::domain::authentication::models::Identity;
use crate::inbound::http::router::AppState;

pub async fn validate(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<ValidateRequest>,
) -> Result<ApiSuccess<ValidateResponseData>, ApiError> {
    state
        .auth_service
        .validate(&body.access_token)
        .await
        .map_err(ApiError::from)
        .map(|identity| ApiSuccess::new(StatusCode::OK, identity.into()))
}

#[derive(Deserialize)]
pub struct ValidateRequest {
    access_token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidateResponseData {
    pub subject: String,
    pub expires: i64,
    pub issued_at: i64,
    pub issuer: String,
    pub username: String,
    pub email: String,
    pub role: String,
}

impl From<Identity> for ValidateResponseData {
    fn from(identity: Identity) -> Self {
        Self {
            subject: identity.subject,
            expires: identity.expires,
            issued_at: identity.issued_at,
            issuer: identity.issuer,
            username: identity.username,
            email: identity.email,
            role: identity.role,
        }
    }
}
