use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;
use tracing::instrument;
use utoipa::ToSchema;

use studyhub_core::AppError;
use studyhub_models::auth::{
    ForgotPasswordRequest, LoginRequest, LoginResponse, MessageResponse, RegisterRequest,
    ResetPasswordRequest, VerifyEmailRequest,
};

use crate::modules::auth::service::AuthService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// Body of every error response.
#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    /// Stable machine-readable kind, e.g. `INVALID_CREDENTIALS`.
    pub code: String,
}

/// Register a new account
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created, verification email sent", body = MessageResponse),
        (status = 400, description = "Validation error or email already in use", body = ErrorResponse),
        (status = 429, description = "Too many requests", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn register_user(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), AppError> {
    AuthService::register_user(&state.db, &state.email_config, dto).await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new(
            "Registration successful. Please check your email to verify your account.",
        )),
    ))
}

/// Confirm an email address
#[utoipa::path(
    post,
    path = "/api/auth/verify-email",
    request_body = VerifyEmailRequest,
    responses(
        (status = 200, description = "Email verified", body = MessageResponse),
        (status = 400, description = "Invalid or expired token", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn verify_email(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<VerifyEmailRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    AuthService::verify_email(&state.db, dto).await?;

    Ok(Json(MessageResponse::new(
        "Email verified successfully. You can now log in.",
    )))
}

/// Log in with email and password
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Invalid credentials or email not verified", body = ErrorResponse),
        (status = 429, description = "Too many requests", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn login_user(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let response = AuthService::login_user(&state.db, &state.jwt_config, dto).await?;
    Ok(Json(response))
}

/// Request a password reset link
#[utoipa::path(
    post,
    path = "/api/auth/forgot-password",
    request_body = ForgotPasswordRequest,
    responses(
        (status = 200, description = "Reset link sent if the account exists", body = MessageResponse),
        (status = 400, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn forgot_password(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<ForgotPasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    AuthService::forgot_password(&state.db, &state.email_config, dto).await?;

    Ok(Json(MessageResponse::new(
        "If an account exists with that email, a password reset link has been sent.",
    )))
}

/// Choose a new password using a reset token
#[utoipa::path(
    post,
    path = "/api/auth/reset-password",
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Password reset", body = MessageResponse),
        (status = 400, description = "Invalid or expired token, or weak password", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn reset_password(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<ResetPasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    AuthService::reset_password(&state.db, dto).await?;

    Ok(Json(MessageResponse::new(
        "Password has been reset successfully. You can now log in.",
    )))
}
