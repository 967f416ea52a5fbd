use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::StatusCode;

use super::ApiError;
use super::ApiSuccess;
use super::TokenResponseData;
use crate::inbound::http::router::AppState;

pub const REFRESH_TOKEN_HEADER: &str = "x-refresh-token";

/// Exchange the refresh token from `X-Refresh-Token` for a new access token.
///
/// `refresh_token` is part of the response schema but always empty here:
/// refresh tokens are never renewed by this call.
pub async fn refresh(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<ApiSuccess<TokenResponseData>, ApiError> {
    let refresh_token = headers
        .get(REFRESH_TOKEN_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| {
            tracing::warn!("Refresh request without refresh token header");
            ApiError::Unauthorized("Invalid refresh token".to_string())
        })?;

    state
        .auth_service
        .refresh(refresh_token)
        .await
        .map_err(ApiError::from)
        .map(|access_token| {
            ApiSuccess::new(
                StatusCode::OK,
                TokenResponseData {
                    access_token,
                    refresh_token: String::new(),
                },
            )
        })
}
