use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::instrument;

use studyhub_core::AppError;
use studyhub_models::courses::{
    CourseFilterParams, CourseFiltersResponse, CourseListResponse, CourseMutationResponse,
    CourseResponse, CourseViewParams, CreateCourseDto, EnrollDto, SuccessResponse,
    UpdateCourseDto,
};
use studyhub_models::ids::CourseId;

use crate::middleware::auth::CurrentUser;
use crate::middleware::role::RequireCr;
use crate::modules::courses::service::CourseService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    get,
    path = "/api/user/courses",
    params(CourseFilterParams),
    responses(
        (status = 200, description = "Page of courses, newest first", body = CourseListResponse),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Courses",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, current))]
pub async fn list_courses(
    State(state): State<AppState>,
    current: CurrentUser,
    Query(filters): Query<CourseFilterParams>,
) -> Result<Json<CourseListResponse>, AppError> {
    let courses = CourseService::list_courses(&state.db, current.viewer(), filters).await?;
    Ok(Json(courses))
}

#[utoipa::path(
    get,
    path = "/api/user/courses/filters",
    responses(
        (status = 200, description = "Distinct semesters and batches", body = CourseFiltersResponse),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Courses",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _current))]
pub async fn get_course_filters(
    State(state): State<AppState>,
    _current: CurrentUser,
) -> Result<Json<CourseFiltersResponse>, AppError> {
    let filters = CourseService::get_filters(&state.db).await?;
    Ok(Json(filters))
}

#[utoipa::path(
    get,
    path = "/api/user/courses/{id}",
    params(
        ("id" = CourseId, Path, description = "Course ID"),
        CourseViewParams
    ),
    responses(
        (status = 200, description = "Course details", body = CourseResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Course not found")
    ),
    tag = "Courses",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, current))]
pub async fn get_course(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<CourseId>,
    Query(params): Query<CourseViewParams>,
) -> Result<Json<CourseResponse>, AppError> {
    let row = CourseService::get_course(&state.db, id, current.id()).await?;

    Ok(Json(CourseResponse {
        success: true,
        course: row.into_view(current.viewer(), params.include_password),
    }))
}

#[utoipa::path(
    post,
    path = "/api/user/courses",
    request_body = CreateCourseDto,
    responses(
        (status = 201, description = "Course created and creator enrolled", body = CourseMutationResponse),
        (status = 400, description = "Invalid input or incomplete profile"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Only class representatives can create courses")
    ),
    tag = "Courses",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, cr, dto))]
pub async fn create_course(
    State(state): State<AppState>,
    RequireCr(cr): RequireCr,
    ValidatedJson(dto): ValidatedJson<CreateCourseDto>,
) -> Result<(StatusCode, Json<CourseMutationResponse>), AppError> {
    let row = CourseService::create_course(&state.db, &cr.0, dto).await?;

    Ok((
        StatusCode::CREATED,
        Json(CourseMutationResponse {
            success: true,
            message: "Course created successfully".to_string(),
            course: row.into_view(cr.viewer(), false),
        }),
    ))
}

#[utoipa::path(
    put,
    path = "/api/user/courses/{id}",
    params(
        ("id" = CourseId, Path, description = "Course ID")
    ),
    request_body = UpdateCourseDto,
    responses(
        (status = 200, description = "Course updated", body = CourseMutationResponse),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the course creator"),
        (status = 404, description = "Course not found")
    ),
    tag = "Courses",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, cr, dto))]
pub async fn update_course(
    State(state): State<AppState>,
    RequireCr(cr): RequireCr,
    Path(id): Path<CourseId>,
    ValidatedJson(dto): ValidatedJson<UpdateCourseDto>,
) -> Result<Json<CourseMutationResponse>, AppError> {
    let row = CourseService::update_course(&state.db, &cr.0, id, dto).await?;

    Ok(Json(CourseMutationResponse {
        success: true,
        message: "Course updated successfully".to_string(),
        course: row.into_view(cr.viewer(), false),
    }))
}

#[utoipa::path(
    delete,
    path = "/api/user/courses/{id}",
    params(
        ("id" = CourseId, Path, description = "Course ID")
    ),
    responses(
        (status = 200, description = "Course deleted", body = SuccessResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the course creator"),
        (status = 404, description = "Course not found")
    ),
    tag = "Courses",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, cr))]
pub async fn delete_course(
    State(state): State<AppState>,
    RequireCr(cr): RequireCr,
    Path(id): Path<CourseId>,
) -> Result<Json<SuccessResponse>, AppError> {
    CourseService::delete_course(&state.db, &cr.0, id).await?;
    Ok(Json(SuccessResponse::new("Course deleted successfully")))
}

#[utoipa::path(
    post,
    path = "/api/user/courses/{id}/enroll",
    params(
        ("id" = CourseId, Path, description = "Course ID")
    ),
    request_body = EnrollDto,
    responses(
        (status = 200, description = "Enrolled", body = SuccessResponse),
        (status = 400, description = "Missing or incorrect password, or already enrolled"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Course not found")
    ),
    tag = "Courses",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, current, dto))]
pub async fn enroll_in_course(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<CourseId>,
    ValidatedJson(dto): ValidatedJson<EnrollDto>,
) -> Result<Json<SuccessResponse>, AppError> {
    CourseService::enroll(&state.db, current.id(), id, dto).await?;
    Ok(Json(SuccessResponse::new("Successfully enrolled in course")))
}
