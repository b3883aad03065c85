use axum::{Json, extract::State};
use tracing::instrument;

use studyhub_core::AppError;
use studyhub_models::courses::SuccessResponse;
use studyhub_models::users::{
    ChangePasswordDto, ProfileResponse, ProfileUpdateResponse, UpdateProfileDto, UserResponse,
};

use crate::middleware::auth::CurrentUser;
use crate::modules::users::service::UserService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    get,
    path = "/api/user/profile",
    responses(
        (status = 200, description = "Current user's profile", body = ProfileResponse),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Users",
    security(("bearer_auth" = []))
)]
#[instrument(skip(current))]
pub async fn get_profile(current: CurrentUser) -> Result<Json<ProfileResponse>, AppError> {
    Ok(Json(ProfileResponse {
        success: true,
        user: UserResponse::from(current.0),
    }))
}

#[utoipa::path(
    put,
    path = "/api/user/profile",
    request_body = UpdateProfileDto,
    responses(
        (status = 200, description = "Profile updated", body = ProfileUpdateResponse),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Class representatives cannot change their cohort")
    ),
    tag = "Users",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, current))]
pub async fn update_profile(
    State(state): State<AppState>,
    current: CurrentUser,
    ValidatedJson(dto): ValidatedJson<UpdateProfileDto>,
) -> Result<Json<ProfileUpdateResponse>, AppError> {
    let user = UserService::update_profile(&state.db, &current.0, dto).await?;

    Ok(Json(ProfileUpdateResponse {
        success: true,
        message: "Profile updated successfully".to_string(),
        user: UserResponse::from(user),
    }))
}

#[utoipa::path(
    put,
    path = "/api/user/change-password",
    request_body = ChangePasswordDto,
    responses(
        (status = 200, description = "Password changed", body = SuccessResponse),
        (status = 400, description = "Invalid input or wrong current password"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Users",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, current, dto))]
pub async fn change_password(
    State(state): State<AppState>,
    current: CurrentUser,
    ValidatedJson(dto): ValidatedJson<ChangePasswordDto>,
) -> Result<Json<SuccessResponse>, AppError> {
    UserService::change_password(&state.db, &current.0, dto).await?;

    Ok(Json(SuccessResponse::new("Password changed successfully")))
}
