use anyhow::anyhow;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::instrument;

use studyhub_core::AppError;
use studyhub_models::courses::SuccessResponse;
use studyhub_models::ids::ResourceId;
use studyhub_models::resources::{
    CreateResourceDto, Resource, ResourceFilterParams, ResourceListResponse, ResourceStatus,
    UpdateResourceDto,
};

use crate::middleware::auth::CurrentUser;
use crate::modules::resources::service::{ResourceQuery, ResourceService};
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    get,
    path = "/api/resources",
    params(ResourceFilterParams),
    responses(
        (status = 200, description = "Page of approved resources, newest first", body = ResourceListResponse),
        (status = 400, description = "Unknown subject")
    ),
    tag = "Resources"
)]
#[instrument(skip(state))]
pub async fn list_resources(
    State(state): State<AppState>,
    Query(filters): Query<ResourceFilterParams>,
) -> Result<Json<ResourceListResponse>, AppError> {
    let subject = filters
        .subject_filter()
        .map_err(|e| AppError::bad_request(anyhow!(e)))?;

    let resources = ResourceService::list_resources(
        &state.db,
        ResourceQuery {
            status: Some(ResourceStatus::Approved),
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
    path = "/api/resources/{id}",
    params(
        ("id" = ResourceId, Path, description = "Resource ID")
    ),
    responses(
        (status = 200, description = "Resource details", body = Resource),
        (status = 404, description = "Resource not found")
    ),
    tag = "Resources"
)]
#[instrument(skip(state))]
pub async fn get_resource(
    State(state): State<AppState>,
    Path(id): Path<ResourceId>,
) -> Result<Json<Resource>, AppError> {
    let resource = ResourceService::get_approved_resource(&state.db, id).await?;
    Ok(Json(resource))
}

#[utoipa::path(
    post,
    path = "/api/resources",
    request_body = CreateResourceDto,
    responses(
        (status = 201, description = "Resource shared", body = Resource),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Resources",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, current))]
pub async fn create_resource(
    State(state): State<AppState>,
    current: CurrentUser,
    ValidatedJson(dto): ValidatedJson<CreateResourceDto>,
) -> Result<(StatusCode, Json<Resource>), AppError> {
    let resource = ResourceService::create_resource(&state.db, &current.0, dto).await?;
    Ok((StatusCode::CREATED, Json(resource)))
}

#[utoipa::path(
    put,
    path = "/api/resources/{id}",
    params(
        ("id" = ResourceId, Path, description = "Resource ID")
    ),
    request_body = UpdateResourceDto,
    responses(
        (status = 200, description = "Resource updated", body = Resource),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the author or an admin"),
        (status = 404, description = "Resource not found")
    ),
    tag = "Resources",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, current))]
pub async fn update_resource(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<ResourceId>,
    ValidatedJson(dto): ValidatedJson<UpdateResourceDto>,
) -> Result<Json<Resource>, AppError> {
    let resource = ResourceService::update_resource(&state.db, &current.0, id, dto).await?;
    Ok(Json(resource))
}

#[utoipa::path(
    delete,
    path = "/api/resources/{id}",
    params(
        ("id" = ResourceId, Path, description = "Resource ID")
    ),
    responses(
        (status = 200, description = "Resource deleted", body = SuccessResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the author or an admin"),
        (status = 404, description = "Resource not found")
    ),
    tag = "Resources",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, current))]
pub async fn delete_resource(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<ResourceId>,
) -> Result<Json<SuccessResponse>, AppError> {
    ResourceService::delete_resource(&state.db, &current.0, id).await?;
    Ok(Json(SuccessResponse::new("Resource deleted successfully")))
}
