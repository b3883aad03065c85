//! # StudyHub Models
//!
//! Domain models and DTOs for the StudyHub API: database rows, request
//! bodies with their `validator` rules, and response shapes.
//!
//! # Modules
//!
//! - [`ids`]: typed IDs
//! - [`users`]: users, the [`Role`](users::Role) enum and profile DTOs
//! - [`auth`]: registration, login and token flows
//! - [`courses`]: courses, enrollment and the course view rules
//! - [`resources`]: shared resources and moderation status
//! - [`admin`]: admin console DTOs and statistics

pub mod admin;
pub mod auth;
pub mod courses;
pub mod ids;
pub mod resources;
pub mod users;
pub mod validation;

pub use auth::{
    ForgotPasswordRequest, LoginRequest, LoginResponse, LoginUser, MessageResponse,
    RegisterRequest, ResetPasswordRequest, VerifyEmailRequest,
};
pub use courses::{
    Course, CourseFilterParams, CourseFiltersResponse, CourseListResponse,
    CourseMutationResponse, CourseResponse, CourseRow, CourseView, CourseViewParams,
    CreateCourseDto, EnrollDto, SuccessResponse, UpdateCourseDto, Viewer,
};
pub use ids::{CourseId, ResourceId, UserId};
pub use resources::{
    CreateResourceDto, Resource, ResourceFilterParams, ResourceListResponse, ResourceStatus,
    Subject, UpdateResourceDto,
};
pub use users::{
    ChangePasswordDto, ProfileResponse, ProfileUpdateResponse, Role, UpdateProfileDto, User,
    UserResponse,
};
