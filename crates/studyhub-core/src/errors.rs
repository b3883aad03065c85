//! Application error type.
//!
//! Every handler returns `Result<_, AppError>`. An error carries the HTTP
//! status, a stable [`ErrorKind`] rendered as the `code` field, and the
//! underlying [`anyhow::Error`] whose message becomes the `error` field.
//!
//! Server errors never leak their detail to the client: the detail is logged
//! and the body carries a generic message.

use anyhow::Error;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;
use validator::ValidationErrors;

/// Stable, machine-checkable error kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    ValidationError,
    DuplicateEmail,
    AlreadyEnrolled,
    IncorrectPassword,
    ProfileIncomplete,
    InvalidOrExpiredToken,
    Unauthenticated,
    InvalidCredentials,
    EmailNotVerified,
    Forbidden,
    NotFound,
    RateLimited,
    ServerError,
}

impl ErrorKind {
    pub fn status(self) -> StatusCode {
        match self {
            Self::ValidationError
            | Self::DuplicateEmail
            | Self::AlreadyEnrolled
            | Self::IncorrectPassword
            | Self::ProfileIncomplete
            | Self::InvalidOrExpiredToken => StatusCode::BAD_REQUEST,
            Self::Unauthenticated | Self::InvalidCredentials | Self::EmailNotVerified => {
                StatusCode::UNAUTHORIZED
            }
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            Self::ServerError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::ValidationError => "VALIDATION_ERROR",
            Self::DuplicateEmail => "DUPLICATE_EMAIL",
            Self::AlreadyEnrolled => "ALREADY_ENROLLED",
            Self::IncorrectPassword => "INCORRECT_PASSWORD",
            Self::ProfileIncomplete => "PROFILE_INCOMPLETE",
            Self::InvalidOrExpiredToken => "INVALID_OR_EXPIRED_TOKEN",
            Self::Unauthenticated => "UNAUTHENTICATED",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::EmailNotVerified => "EMAIL_NOT_VERIFIED",
            Self::Forbidden => "FORBIDDEN",
            Self::NotFound => "NOT_FOUND",
            Self::RateLimited => "RATE_LIMITED",
            Self::ServerError => "SERVER_ERROR",
        }
    }
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub kind: ErrorKind,
    pub error: Error,
}

impl AppError {
    pub fn new<E>(kind: ErrorKind, err: E) -> Self
    where
        E: Into<Error>,
    {
        Self {
            status: kind.status(),
            kind,
            error: err.into(),
        }
    }

    pub fn internal<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(ErrorKind::ServerError, err)
    }

    pub fn internal_error(message: String) -> Self {
        Self::new(ErrorKind::ServerError, anyhow::anyhow!(message))
    }

    pub fn not_found<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(ErrorKind::NotFound, err)
    }

    pub fn bad_request<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(ErrorKind::ValidationError, err)
    }

    pub fn unauthorized(message: String) -> Self {
        Self::new(ErrorKind::Unauthenticated, anyhow::anyhow!(message))
    }

    pub fn forbidden(message: String) -> Self {
        Self::new(ErrorKind::Forbidden, anyhow::anyhow!(message))
    }

    pub fn duplicate_email() -> Self {
        Self::new(
            ErrorKind::DuplicateEmail,
            anyhow::anyhow!("Email already in use"),
        )
    }

    pub fn already_enrolled() -> Self {
        Self::new(
            ErrorKind::AlreadyEnrolled,
            anyhow::anyhow!("You are already enrolled in this course"),
        )
    }

    pub fn incorrect_password() -> Self {
        Self::new(
            ErrorKind::IncorrectPassword,
            anyhow::anyhow!("Incorrect password"),
        )
    }

    pub fn profile_incomplete() -> Self {
        Self::new(
            ErrorKind::ProfileIncomplete,
            anyhow::anyhow!("Please set your section, batch and semester in your profile first"),
        )
    }

    pub fn invalid_token(what: &str) -> Self {
        Self::new(
            ErrorKind::InvalidOrExpiredToken,
            anyhow::anyhow!("Invalid or expired {} token", what),
        )
    }

    pub fn invalid_credentials() -> Self {
        Self::new(
            ErrorKind::InvalidCredentials,
            anyhow::anyhow!("Invalid credentials"),
        )
    }

    pub fn email_not_verified() -> Self {
        Self::new(
            ErrorKind::EmailNotVerified,
            anyhow::anyhow!("Please verify your email before logging in"),
        )
    }

    pub fn rate_limited() -> Self {
        Self::new(
            ErrorKind::RateLimited,
            anyhow::anyhow!("Too many requests, please slow down"),
        )
    }

    /// Flattens `validator` field errors into one message.
    pub fn validation(errors: &ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("{} is invalid", field))
                })
            })
            .collect();
        messages.sort();

        Self::bad_request(anyhow::anyhow!(messages.join(", ")))
    }

    pub fn is_server_error(&self) -> bool {
        self.kind == ErrorKind::ServerError
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = if self.is_server_error() {
            tracing::error!(error = ?self.error, "request failed with server error");
            "Internal server error".to_string()
        } else {
            self.error.to_string()
        };

        let body = Json(json!({
            "error": message,
            "code": self.kind.as_str(),
        }));

        (self.status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<Error>,
{
    fn from(err: E) -> Self {
        AppError::internal(err)
    }
}
