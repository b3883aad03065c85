//! Request and response types for registration, login and token flows.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::ids::UserId;
use crate::users::{Role, User};
use crate::validation::not_blank;

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[serde(default)]
    #[validate(
        custom(function = "not_blank", message = "Full name is required"),
        length(max = 100, message = "Full name must be at most 100 characters")
    )]
    pub full_name: String,
    #[serde(default)]
    #[validate(
        email(message = "Please provide a valid email"),
        length(max = 255, message = "Email must be at most 255 characters")
    )]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct VerifyEmailRequest {
    #[serde(default)]
    #[validate(custom(function = "not_blank", message = "Token is required"))]
    pub token: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[serde(default)]
    #[validate(email(message = "Please provide a valid email"))]
    pub email: String,
    #[serde(default)]
    #[validate(custom(function = "not_blank", message = "Password is required"))]
    pub password: String,
}

/// The user summary returned next to a session token.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginUser {
    pub id: UserId,
    pub full_name: String,
    pub email: String,
    pub role: Role,
    pub is_admin: bool,
    #[serde(rename = "isCR")]
    pub is_cr: bool,
}

impl From<&User> for LoginUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            full_name: user.full_name.clone(),
            email: user.email.clone(),
            role: user.role,
            is_admin: user.role.is_admin(),
            is_cr: user.role.is_cr(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub user: LoginUser,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ForgotPasswordRequest {
    #[serde(default)]
    #[validate(email(message = "Please provide a valid email"))]
    pub email: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ResetPasswordRequest {
    #[serde(default)]
    #[validate(custom(function = "not_blank", message = "Token is required"))]
    pub token: String,
    #[serde(default)]
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
