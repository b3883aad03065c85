//! Admin account creation.

use sqlx::PgPool;

use studyhub_core::hash_password;
use studyhub_models::ids::UserId;

/// Creates a verified admin. Fails when the email is already registered.
pub async fn create_admin(
    db: &PgPool,
    full_name: &str,
    email: &str,
    password: &str,
) -> Result<UserId, Box<dyn std::error::Error>> {
    if password.len() < 8 {
        return Err("Password must be at least 8 characters".into());
    }

    let hashed_password =
        hash_password(password).map_err(|e| format!("Failed to hash password: {}", e.error))?;

    let user_id = sqlx::query_scalar::<_, UserId>(
        "INSERT INTO users (full_name, email, password, role, is_verified)
         VALUES ($1, $2, $3, 'admin', true)
         ON CONFLICT (email) DO NOTHING
         RETURNING id",
    )
    .bind(full_name.trim())
    .bind(email.trim().to_lowercase())
    .bind(&hashed_password)
    .fetch_optional(db)
    .await?;

    user_id.ok_or_else(|| "User with this email already exists".into())
}
