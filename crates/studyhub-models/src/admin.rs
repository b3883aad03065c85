//! Admin console models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use studyhub_core::PaginationParams;
use studyhub_core::serde::{deserialize_optional_i64, deserialize_optional_string};

use crate::ids::UserId;
use crate::resources::{Resource, ResourceStatus};
use crate::users::{Role, UserResponse};

#[derive(Debug, Clone, Default, Serialize, Deserialize, FromRow, ToSchema)]
pub struct UserStats {
    pub total: i64,
    pub verified: i64,
    pub admins: i64,
    pub crs: i64,
    pub students: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ResourceStats {
    pub total: i64,
    pub pending: i64,
    pub approved: i64,
    pub rejected: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminStatsResponse {
    pub users: UserStats,
    pub resources: ResourceStats,
    pub total_courses: i64,
    pub recent_users: Vec<UserResponse>,
    pub recent_resources: Vec<Resource>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct SetRoleDto {
    pub role: Role,
}

/// Admin edit of a user. Bypasses the CR scope lock.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminUpdateUserDto {
    pub is_verified: Option<bool>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    #[validate(length(max = 50, message = "Section must be at most 50 characters"))]
    pub section: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    #[validate(length(max = 50, message = "Batch must be at most 50 characters"))]
    pub batch: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    #[validate(length(max = 50, message = "Semester must be at most 50 characters"))]
    pub semester: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct SetResourceStatusDto {
    pub status: ResourceStatus,
}

/// Bulk lookup of contact addresses, used to mail a set of users.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserEmailsDto {
    #[serde(default)]
    #[validate(length(min = 1, max = 500, message = "Provide between 1 and 500 user IDs"))]
    pub user_ids: Vec<UserId>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct UserEmail {
    pub id: UserId,
    pub email: String,
}

/// Query parameters of `GET /api/admin/users`.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UserFilterParams {
    /// `admin`, `cr`, `student` or `all`
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub role: Option<String>,
    /// Case-insensitive match on full name or email
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub search: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub page: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub limit: Option<i64>,
}

impl UserFilterParams {
    pub fn pagination(&self) -> PaginationParams {
        PaginationParams::new(self.page, self.limit)
    }

    pub fn role_filter(&self) -> Result<Option<Role>, String> {
        match self.role.as_deref() {
            None => Ok(None),
            Some(value) if value.eq_ignore_ascii_case("all") => Ok(None),
            Some(value) => value.parse().map(Some),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserListResponse {
    pub users: Vec<UserResponse>,
    pub current_page: i64,
    pub total_pages: i64,
    pub total: i64,
}
