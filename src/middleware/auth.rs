use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};

use studyhub_auth::{Claims, verify_token};
use studyhub_core::AppError;
use studyhub_models::courses::Viewer;
use studyhub_models::ids::UserId;
use studyhub_models::users::User;

use crate::modules::users::service::UserService;
use crate::state::AppState;

/// A caller with a valid session token. Does not touch the database.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    pub fn user_id(&self) -> Result<UserId, AppError> {
        self.0
            .sub
            .parse()
            .map_err(|_| AppError::unauthorized("Invalid user ID in token".to_string()))
    }

    pub fn email(&self) -> &str {
        &self.0.email
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|rejection| {
                    if rejection.is_missing() {
                        AppError::unauthorized("Missing authorization header".to_string())
                    } else {
                        AppError::unauthorized("Invalid authorization header format".to_string())
                    }
                })?;

        let claims = verify_token(bearer.token(), &state.jwt_config)?;

        Ok(AuthUser(claims))
    }
}

/// The caller's current user record.
///
/// Roles are read from this row rather than the token, so a role change or a
/// deleted account takes effect on the caller's next request.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl CurrentUser {
    pub fn id(&self) -> UserId {
        self.0.id
    }

    pub fn viewer(&self) -> Viewer {
        Viewer {
            id: self.0.id,
            role: self.0.role,
        }
    }
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(current) = parts.extensions.get::<CurrentUser>() {
            return Ok(current.clone());
        }

        let auth_user = AuthUser::from_request_parts(parts, state).await?;
        let user_id = auth_user.user_id()?;

        let user = UserService::find_by_id(&state.db, user_id)
            .await?
            .ok_or_else(|| AppError::unauthorized("User no longer exists".to_string()))?;

        let current = CurrentUser(user);
        parts.extensions.insert(current.clone());
        Ok(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use studyhub_models::users::Role;

    #[test]
    fn test_user_id_parses_subject() {
        let id = UserId::new();
        let auth_user = AuthUser(Claims {
            sub: id.to_string(),
            email: "test@example.com".to_string(),
            role: Role::Student,
            exp: 9999999999,
            iat: 1234567890,
        });
        assert_eq!(auth_user.user_id().unwrap(), id);
        assert_eq!(auth_user.email(), "test@example.com");
    }

    #[test]
    fn test_user_id_rejects_garbage_subject() {
        let auth_user = AuthUser(Claims {
            sub: "not-a-uuid".to_string(),
            email: "test@example.com".to_string(),
            role: Role::Student,
            exp: 9999999999,
            iat: 1234567890,
        });
        assert!(auth_user.user_id().is_err());
    }
}
