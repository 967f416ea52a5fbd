use axum::extract::rejection::JsonRejection;
use axum::extract::FromRequest;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde::Serialize;

use crate::domain::authentication::errors::AuthError;
use crate::domain::authentication::models::TokenPair;

pub mod health;
pub mod login;
pub mod refresh;
pub mod register;
pub mod validate;

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<T>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(data))
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    InternalServerError(String),
    UnprocessableEntity(String),
    NotFound(String),
    Conflict(String),
    Unauthorized(String),
}

impl ApiError {
    fn parts(self) -> (StatusCode, &'static str, String) {
        match self {
            ApiError::InternalServerError(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal", msg)
            }
            ApiError::UnprocessableEntity(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "invalid_argument", msg)
            }
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "already_exists", msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "unauthenticated", msg),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();

        (status, Json(ApiErrorBody::new(status, code, message))).into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Internal(msg) => ApiError::InternalServerError(msg),
            AuthError::NotFound(msg) => ApiError::NotFound(msg),
            AuthError::Unauthenticated(msg) => ApiError::Unauthorized(msg),
            AuthError::AlreadyExists(msg) => ApiError::Conflict(msg),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::warn!(
            status = rejection.status().as_u16(),
            error = %rejection.body_text(),
            "Rejected request body"
        );
        ApiError::UnprocessableEntity("Invalid request body".to_string())
    }
}

/// JSON request body whose rejections use the API error format.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorBody {
    status_code: u16,
    error: ApiErrorData,
}

impl ApiErrorBody {
    pub fn new(status_code: StatusCode, code: &str, message: String) -> Self {
        Self {
            status_code: status_code.as_u16(),
            error: ApiErrorData {
                code: code.to_string(),
                message,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorData {
    pub code: String,
    pub message: String,
}

/// Token response shared by register, login and refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenResponseData {
    pub access_token: String,
    pub refresh_token: String,
}

impl From<TokenPair> for TokenResponseData {
    fn from(tokens: TokenPair) -> Self {
        Self {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
        }
    }
}
