//! User domain models and DTOs.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use studyhub_core::serde::deserialize_optional_string;

use crate::ids::UserId;
use crate::validation::not_blank;

/// The single role a user holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    /// Class representative.
    Cr,
    Student,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Cr => "cr",
            Role::Student => "student",
        }
    }

    pub fn is_admin(self) -> bool {
        self == Role::Admin
    }

    pub fn is_cr(self) -> bool {
        self == Role::Cr
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "cr" => Ok(Role::Cr),
            "student" => Ok(Role::Student),
            other => Err(format!("Unknown role '{}'", other)),
        }
    }
}

/// A row of the `users` table, minus the one-time token columns.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: UserId,
    pub full_name: String,
    pub email: String,
    /// bcrypt hash
    pub password: String,
    pub role: Role,
    pub section: Option<String>,
    pub batch: Option<String>,
    pub semester: Option<String>,
    pub is_verified: bool,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Column list matching [`User`], for `SELECT {USER_COLUMNS} FROM users`.
    pub const COLUMNS: &'static str = "id, full_name, email, password, role, section, batch, \
        semester, is_verified, last_login, created_at, updated_at";

    /// The cohort triple, only when all three parts are set.
    pub fn scope(&self) -> Option<(&str, &str, &str)> {
        match (&self.section, &self.batch, &self.semester) {
            (Some(section), Some(batch), Some(semester)) => {
                Some((section.as_str(), batch.as_str(), semester.as_str()))
            }
            _ => None,
        }
    }
}

/// Public representation of a user. Never carries the password hash.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: UserId,
    pub full_name: String,
    pub email: String,
    pub role: Role,
    pub is_admin: bool,
    #[serde(rename = "isCR")]
    pub is_cr: bool,
    pub section: Option<String>,
    pub batch: Option<String>,
    pub semester: Option<String>,
    pub is_verified: bool,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            full_name: user.full_name,
            email: user.email,
            role: user.role,
            is_admin: user.role.is_admin(),
            is_cr: user.role.is_cr(),
            section: user.section,
            batch: user.batch,
            semester: user.semester,
            is_verified: user.is_verified,
            last_login: user.last_login,
            created_at: user.created_at,
        }
    }
}

/// Self-service profile update. Blank values are treated as absent.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileDto {
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    #[validate(length(max = 100, message = "Full name must be at most 100 characters"))]
    pub full_name: Option<String>,
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

impl UpdateProfileDto {
    /// True when a supplied scope field differs from the user's stored value.
    pub fn changes_scope_of(&self, user: &User) -> bool {
        let differs = |new: &Option<String>, old: &Option<String>| match new {
            Some(value) => old.as_deref() != Some(value.trim()),
            None => false,
        };

        differs(&self.section, &user.section)
            || differs(&self.batch, &user.batch)
            || differs(&self.semester, &user.semester)
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordDto {
    #[serde(default)]
    #[validate(custom(function = "not_blank", message = "Current password is required"))]
    pub current_password: String,
    #[serde(default)]
    #[validate(length(min = 8, message = "New password must be at least 8 characters"))]
    pub new_password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProfileResponse {
    pub success: bool,
    pub user: UserResponse,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProfileUpdateResponse {
    pub success: bool,
    pub message: String,
    pub user: UserResponse,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cr_user() -> User {
        User {
            id: UserId::new(),
            full_name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            password: "hash".to_string(),
            role: Role::Cr,
            section: Some("A".to_string()),
            batch: Some("60".to_string()),
            semester: Some("Fall 2024".to_string()),
            is_verified: true,
            last_login: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_role_round_trips_through_str() {
        for role in [Role::Admin, Role::Cr, Role::Student] {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
        assert!("teacher".parse::<Role>().is_err());
        assert_eq!(serde_json::to_string(&Role::Cr).unwrap(), r#""cr""#);
    }

    #[test]
    fn test_user_response_exposes_role_flags() {
        let response = UserResponse::from(cr_user());
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["isCR"], true);
        assert_eq!(json["isAdmin"], false);
        assert_eq!(json["fullName"], "Alice");
        assert!(json.get("password").is_none());
    }

    #[test]
    fn test_scope_requires_all_parts() {
        let mut user = cr_user();
        assert_eq!(user.scope(), Some(("A", "60", "Fall 2024")));
        user.semester = None;
        assert!(user.scope().is_none());
    }

    #[test]
    fn test_changes_scope_of() {
        let user = cr_user();

        let same = UpdateProfileDto {
            section: Some("A".to_string()),
            batch: Some("60".to_string()),
            ..Default::default()
        };
        assert!(!same.changes_scope_of(&user));

        let name_only = UpdateProfileDto {
            full_name: Some("Alice B".to_string()),
            ..Default::default()
        };
        assert!(!name_only.changes_scope_of(&user));

        let moved = UpdateProfileDto {
            section: Some("B".to_string()),
            ..Default::default()
        };
        assert!(moved.changes_scope_of(&user));
    }

    #[test]
    fn test_blank_profile_fields_are_absent() {
        let dto: UpdateProfileDto =
            serde_json::from_str(r#"{"fullName":"  ","section":""}"#).unwrap();
        assert!(dto.full_name.is_none());
        assert!(dto.section.is_none());
    }

    #[test]
    fn test_change_password_validation() {
        let dto = ChangePasswordDto {
            current_password: "oldpassword".to_string(),
            new_password: "short".to_string(),
        };
        assert!(dto.validate().is_err());
    }
}
