//! Role-based authorization.
//!
//! Two ways to gate a route on the caller's stored [`Role`]:
//!
//! 1. Extractors: [`RequireAdmin`] and [`RequireCr`] in a handler signature
//! 2. Router layer: [`require_admin`] with `middleware::from_fn_with_state`
//!
//! ```rust,ignore
//! let admin_routes = init_admin_router()
//!     .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));
//! ```

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Response},
};

use studyhub_core::AppError;
use studyhub_models::users::{Role, User};

use crate::middleware::auth::CurrentUser;
use crate::state::AppState;

/// Fails with 403 unless `user` holds one of `allowed`.
pub fn ensure_role(user: &User, allowed: &[Role]) -> Result<(), AppError> {
    if allowed.contains(&user.role) {
        return Ok(());
    }

    let required = allowed
        .iter()
        .map(|role| role.as_str())
        .collect::<Vec<_>>()
        .join(" or ");

    Err(AppError::forbidden(format!(
        "Access denied. Required role: {}",
        required
    )))
}

/// Router-level gate for admin-only routers. Leaves the loaded
/// [`CurrentUser`] in the request extensions for the handlers.
pub async fn require_admin(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let (mut parts, body) = req.into_parts();

    let current = match CurrentUser::from_request_parts(&mut parts, &state).await {
        Ok(current) => current,
        Err(err) => return err.into_response(),
    };

    if let Err(err) = ensure_role(&current.0, &[Role::Admin]) {
        return err.into_response();
    }

    next.run(Request::from_parts(parts, body)).await
}

/// Caller must be an admin.
#[derive(Debug, Clone)]
pub struct RequireAdmin(pub CurrentUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let current = CurrentUser::from_request_parts(parts, state).await?;
        ensure_role(&current.0, &[Role::Admin]).map_err(|_| {
            AppError::forbidden("Access denied. Administrator privileges required.".to_string())
        })?;
        Ok(RequireAdmin(current))
    }
}

/// Caller must be a class representative.
#[derive(Debug, Clone)]
pub struct RequireCr(pub CurrentUser);

impl FromRequestParts<AppState> for RequireCr {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let current = CurrentUser::from_request_parts(parts, state).await?;
        ensure_role(&current.0, &[Role::Cr]).map_err(|_| {
            AppError::forbidden(
                "Access denied. Only class representatives can manage courses.".to_string(),
            )
        })?;
        Ok(RequireCr(current))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use studyhub_core::ErrorKind;
    use studyhub_models::ids::UserId;

    fn user_with_role(role: Role) -> User {
        User {
            id: UserId::new(),
            full_name: "Test User".to_string(),
            email: "test@example.com".to_string(),
            password: "hash".to_string(),
            role,
            section: None,
            batch: None,
            semester: None,
            is_verified: true,
            last_login: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_ensure_role_allows_listed_roles() {
        let cr = user_with_role(Role::Cr);
        assert!(ensure_role(&cr, &[Role::Cr]).is_ok());
        assert!(ensure_role(&cr, &[Role::Admin, Role::Cr]).is_ok());
    }

    #[test]
    fn test_ensure_role_rejects_with_forbidden() {
        let student = user_with_role(Role::Student);
        let err = ensure_role(&student, &[Role::Admin, Role::Cr]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Forbidden);
        assert_eq!(
            err.error.to_string(),
            "Access denied. Required role: admin or cr"
        );
    }
}
