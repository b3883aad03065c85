use anyhow::anyhow;
use axum::{
    Json,
    extract::{Path, Query, State},
};
use tracing::instrument;

use studyhub_core::AppError;
use studyhub_models::admin::{
    AdminStatsResponse, AdminUpdateUserDto, SetResourceStatusDto, SetRoleDto, UserEmail,
    UserEmailsDto, UserFilterParams, UserListResponse,
};
use studyhub_models::courses::SuccessResponse;
use studyhub_models::ids::{ResourceId, UserId};
use studyhub_models::resources::{
    AdminResourceView, Resource, ResourceFilterParams, ResourceListResponse,
};
use studyhub_models::users::{ProfileUpdateResponse, UserResponse};

use crate::middleware::role::RequireAdmin;
use crate::modules::admin::service::AdminService;
use crate::modules::resources::service::{ResourceQuery, ResourceService};
use crate::modules::users::service::UserService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    get,
    path = "/api/admin/stats",
    responses(
        (status = 200, description = "Dashboard totals and recent activity", body = AdminStatsResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admins only")
    ),
    tag = "Admin",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_stats(State(state): State<AppState>) -> Result<Json<AdminStatsResponse>, AppError> {
    let stats = AdminService::get_stats(&state.db).await?;
    Ok(Json(stats))
}

#[utoipa::path(
    get,
    path = "/api/admin/users",
    params(UserFilterParams),
    responses(
        (status = 200, description = "Page of users", body = UserListResponse),
        (status = 400, description = "Unknown role filter"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admins only")
    ),
    tag = "Admin",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn list_users(
    State(state): State<AppState>,
    Query(filters): Query<UserFilterParams>,
) -> Result<Json<UserListResponse>, AppError> {
    let users = AdminService::list_users(&state.db, filters).await?;
    Ok(Json(users))
}

#[utoipa::path(
    get,
    path = "/api/admin/users/{id}",
    params(
        ("id" = UserId, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User details", body = UserResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admins only"),
        (status = 404, description = "User not found")
    ),
    tag = "Admin",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<UserId>,
) -> Result<Json<UserResponse>, AppError> {
    let user = UserService::get_user(&state.db, id).await?;
    Ok(Json(UserResponse::from(user)))
}

#[utoipa::path(
    put,
    path = "/api/admin/users/{id}/role",
    params(
        ("id" = UserId, Path, description = "User ID")
    ),
    request_body = SetRoleDto,
    responses(
        (status = 200, description = "Role changed", body = ProfileUpdateResponse),
        (status = 400, description = "Cohort already has a class representative"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admins only, and never on themselves"),
        (status = 404, description = "User not found")
    ),
    tag = "Admin",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, admin))]
pub async fn set_user_role(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<UserId>,
    ValidatedJson(dto): ValidatedJson<SetRoleDto>,
) -> Result<Json<ProfileUpdateResponse>, AppError> {
    let user = AdminService::set_role(&state.db, &admin.0, id, dto.role).await?;

    Ok(Json(ProfileUpdateResponse {
        success: true,
        message: format!("Role updated to {}", user.role),
        user: UserResponse::from(user),
    }))
}

#[utoipa::path(
    put,
    path = "/api/admin/users/{id}",
    params(
        ("id" = UserId, Path, description = "User ID")
    ),
    request_body = AdminUpdateUserDto,
    responses(
        (status = 200, description = "User updated", body = ProfileUpdateResponse),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admins only"),
        (status = 404, description = "User not found")
    ),
    tag = "Admin",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<UserId>,
    ValidatedJson(dto): ValidatedJson<AdminUpdateUserDto>,
) -> Result<Json<ProfileUpdateResponse>, AppError> {
    let user = AdminService::update_user(&state.db, id, dto).await?;

    Ok(Json(ProfileUpdateResponse {
        success: true,
        message: "User updated successfully".to_string(),
        user: UserResponse::from(user),
    }))
}

#[utoipa::path(
    delete,
    path = "/api/admin/users/{id}",
    params(
        ("id" = UserId, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User deleted", body = SuccessResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admins only, and never on themselves"),
        (status = 404, description = "User not found")
    ),
    tag = "Admin",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, admin))]
pub async fn delete_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<UserId>,
) -> Result<Json<SuccessResponse>, AppError> {
    AdminService::delete_user(&state.db, &admin.0, id).await?;
    Ok(Json(SuccessResponse::new("User deleted successfully")))
}

#[utoipa::path(
    get,
    path = "/api/admin/resources",
    params(ResourceFilterParams),
    responses(
        (status = 200, description = "Page of resources in any status", body = ResourceListResponse),
        (status = 400, description = "Unknown status or subject filter"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admins only")
    ),
    tag = "Admin",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn list_resources(
    State(state): State<AppState>,
    Query(filters): Query<ResourceFilterParams>,
) -> Result<Json<ResourceListResponse>, AppError> {
    let status = filters
        .status_filter()
        .map_err(|e| AppError::bad_request(anyhow!(e)))?;
    let subject = filters
        .subject_filter()
        .map_err(|e| AppError::bad_request(anyhow!(e)))?;

    let resources = ResourceService::list_resources(
        &state.db,
        ResourceQuery {
            status,
            subject,
            search: filters.search.clone(),
            pagination: filters.pagination(),
        },
    )
    .await?;

    Ok(Json(resources))
}

#[utoipa::path(
    get,
    path = "/api/admin/resources/{id}",
    params(
        ("id" = ResourceId, Path, description = "Resource ID")
    ),
    responses(
        (status = 200, description = "Resource in any status, with the author's email", body = AdminResourceView),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admins only"),
        (status = 404, description = "Resource not found")
    ),
    tag = "Admin",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_resource(
    State(state): State<AppState>,
    Path(id): Path<ResourceId>,
) -> Result<Json<AdminResourceView>, AppError> {
    let resource = ResourceService::find_for_moderation(&state.db, id).await?;
    Ok(Json(resource))
}

#[utoipa::path(
    patch,
    path = "/api/admin/resources/{id}/status",
    params(
        ("id" = ResourceId, Path, description = "Resource ID")
    ),
    request_body = SetResourceStatusDto,
    responses(
        (status = 200, description = "Status changed", body = Resource),
        (status = 400, description = "Unknown status"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admins only"),
        (status = 404, description = "Resource not found")
    ),
    tag = "Admin",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn set_resource_status(
    State(state): State<AppState>,
    Path(id): Path<ResourceId>,
    ValidatedJson(dto): ValidatedJson<SetResourceStatusDto>,
) -> Result<Json<Resource>, AppError> {
    let resource = ResourceService::set_status(&state.db, id, dto.status).await?;
    Ok(Json(resource))
}

#[utoipa::path(
    post,
    path = "/api/admin/users/emails",
    request_body = UserEmailsDto,
    responses(
        (status = 200, description = "Emails of the users that exist", body = Vec<UserEmail>),
        (status = 400, description = "No user IDs or a malformed ID"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admins only")
    ),
    tag = "Admin",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn get_user_emails(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<UserEmailsDto>,
) -> Result<Json<Vec<UserEmail>>, AppError> {
    let emails = AdminService::user_emails(&state.db, &dto.user_ids).await?;
    Ok(Json(emails))
}
