use anyhow::anyhow;
use sqlx::PgPool;
use tracing::instrument;

use studyhub_core::{AppError, hash_password, verify_password};
use studyhub_models::ids::UserId;
use studyhub_models::users::{ChangePasswordDto, UpdateProfileDto, User};

pub struct UserService;

impl UserService {
    #[instrument]
    pub async fn find_by_id(db: &PgPool, user_id: UserId) -> Result<Option<User>, AppError> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", User::COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(user_id)
            .fetch_optional(db)
            .await?;

        Ok(user)
    }

    /// Looks a user up by email, ignoring case and surrounding whitespace.
    #[instrument]
    pub async fn find_by_email(db: &PgPool, email: &str) -> Result<Option<User>, AppError> {
        let sql = format!("SELECT {} FROM users WHERE email = $1", User::COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(normalize_email(email))
            .fetch_optional(db)
            .await?;

        Ok(user)
    }

    #[instrument]
    pub async fn get_user(db: &PgPool, user_id: UserId) -> Result<User, AppError> {
        Self::find_by_id(db, user_id)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("User not found")))
    }

    /// Self-service profile edit. A class representative's cohort is frozen
    /// here; only an admin can move them.
    #[instrument(skip(user), fields(user_id = %user.id))]
    pub async fn update_profile(
        db: &PgPool,
        user: &User,
        dto: UpdateProfileDto,
    ) -> Result<User, AppError> {
        if user.role.is_cr() && dto.changes_scope_of(user) {
            return Err(AppError::forbidden(
                "Class representatives cannot change their section, batch or semester".to_string(),
            ));
        }

        let trim = |value: Option<String>| value.map(|v| v.trim().to_string());

        let sql = format!(
            r#"UPDATE users
               SET full_name = COALESCE($2, full_name),
                   section = COALESCE($3, section),
                   batch = COALESCE($4, batch),
                   semester = COALESCE($5, semester),
                   updated_at = NOW()
               WHERE id = $1
               RETURNING {}"#,
            User::COLUMNS
        );

        let updated = sqlx::query_as::<_, User>(&sql)
            .bind(user.id)
            .bind(trim(dto.full_name))
            .bind(trim(dto.section))
            .bind(trim(dto.batch))
            .bind(trim(dto.semester))
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("User not found")))?;

        Ok(updated)
    }

    #[instrument(skip(user, dto), fields(user_id = %user.id))]
    pub async fn change_password(
        db: &PgPool,
        user: &User,
        dto: ChangePasswordDto,
    ) -> Result<(), AppError> {
        if !verify_password(&dto.current_password, &user.password)? {
            return Err(AppError::bad_request(anyhow!(
                "Current password is incorrect"
            )));
        }

        let hashed = hash_password(&dto.new_password)?;

        sqlx::query("UPDATE users SET password = $1, updated_at = NOW() WHERE id = $2")
            .bind(hashed)
            .bind(user.id)
            .execute(db)
            .await?;

        Ok(())
    }
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Alice@Example.COM "), "alice@example.com");
    }
}
