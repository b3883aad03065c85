use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use studyhub_models::admin::{
    AdminStatsResponse, AdminUpdateUserDto, ResourceStats, SetResourceStatusDto, SetRoleDto,
    UserEmail, UserEmailsDto, UserListResponse, UserStats,
};
use studyhub_models::auth::{
    ForgotPasswordRequest, LoginRequest, LoginResponse, LoginUser, MessageResponse,
    RegisterRequest, ResetPasswordRequest, VerifyEmailRequest,
};
use studyhub_models::courses::{
    CourseFiltersResponse, CourseListResponse, CourseMutationResponse, CourseResponse,
    CourseView, CreateCourseDto, EnrollDto, SuccessResponse, UpdateCourseDto,
};
use studyhub_models::ids::{CourseId, ResourceId, UserId};
use studyhub_models::resources::{
    AdminResourceView, CreateResourceDto, Resource, ResourceListResponse, ResourceStatus, Subject,
    UpdateResourceDto,
};
use studyhub_models::users::{
    ChangePasswordDto, ProfileResponse, ProfileUpdateResponse, Role, UpdateProfileDto,
    UserResponse,
};

use crate::modules::auth::controller::ErrorResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::register_user,
        crate::modules::auth::controller::verify_email,
        crate::modules::auth::controller::login_user,
        crate::modules::auth::controller::forgot_password,
        crate::modules::auth::controller::reset_password,
        crate::modules::users::controller::get_profile,
        crate::modules::users::controller::update_profile,
        crate::modules::users::controller::change_password,
        crate::modules::courses::controller::list_courses,
        crate::modules::courses::controller::get_course_filters,
        crate::modules::courses::controller::get_course,
        crate::modules::courses::controller::create_course,
        crate::modules::courses::controller::update_course,
        crate::modules::courses::controller::delete_course,
        crate::modules::courses::controller::enroll_in_course,
        crate::modules::resources::controller::list_resources,
        crate::modules::resources::controller::get_resource,
        crate::modules::resources::controller::create_resource,
        crate::modules::resources::controller::update_resource,
        crate::modules::resources::controller::delete_resource,
        crate::modules::admin::controller::get_stats,
        crate::modules::admin::controller::list_users,
        crate::modules::admin::controller::get_user,
        crate::modules::admin::controller::set_user_role,
        crate::modules::admin::controller::update_user,
        crate::modules::admin::controller::delete_user,
        crate::modules::admin::controller::get_user_emails,
        crate::modules::admin::controller::list_resources,
        crate::modules::admin::controller::get_resource,
        crate::modules::admin::controller::set_resource_status,
    ),
    components(
        schemas(
            UserId,
            CourseId,
            ResourceId,
            Role,
            Subject,
            ResourceStatus,
            RegisterRequest,
            VerifyEmailRequest,
            LoginRequest,
            LoginUser,
            LoginResponse,
            ForgotPasswordRequest,
            ResetPasswordRequest,
            MessageResponse,
            UserResponse,
            UpdateProfileDto,
            ChangePasswordDto,
            ProfileResponse,
            ProfileUpdateResponse,
            CourseView,
            CreateCourseDto,
            UpdateCourseDto,
            EnrollDto,
            CourseListResponse,
            CourseResponse,
            CourseMutationResponse,
            CourseFiltersResponse,
            SuccessResponse,
            Resource,
            CreateResourceDto,
            UpdateResourceDto,
            ResourceListResponse,
            UserStats,
            ResourceStats,
            AdminStatsResponse,
            SetRoleDto,
            AdminUpdateUserDto,
            SetResourceStatusDto,
            UserEmailsDto,
            UserEmail,
            AdminResourceView,
            UserListResponse,
            ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Registration, login and token flows"),
        (name = "Users", description = "Profile self-service"),
        (name = "Courses", description = "Class representative courses and enrollment"),
        (name = "Resources", description = "Shared study resources"),
        (name = "Admin", description = "Admin console")
    ),
    info(
        title = "StudyHub API",
        version = "0.1.0",
        description = "Student resource-sharing portal: courses, enrollment and shared study material.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
