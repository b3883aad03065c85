use anyhow::anyhow;
use chrono::{Duration, Utc};
use sqlx::PgPool;
use tracing::instrument;

use studyhub_auth::create_access_token;
use studyhub_config::{EmailConfig, JwtConfig};
use studyhub_core::{
    AppError, generate_token, hash_password, hash_token, verify_dummy_password, verify_password,
};
use studyhub_models::auth::{
    ForgotPasswordRequest, LoginRequest, LoginResponse, LoginUser, RegisterRequest,
    ResetPasswordRequest, VerifyEmailRequest,
};
use studyhub_models::users::{Role, User};

use crate::metrics::{
    track_jwt_issued, track_user_login_failure, track_user_login_success, track_user_registered,
};
use crate::modules::users::service::{UserService, normalize_email};
use crate::utils::email::{
    EmailKind, RESET_TOKEN_TTL_MINUTES, VERIFICATION_TOKEN_TTL_HOURS, spawn_email,
};

pub struct AuthService;

impl AuthService {
    /// Creates an unverified student and mails the verification link in the
    /// background.
    #[instrument(skip(dto, email_config), fields(email = %dto.email))]
    pub async fn register_user(
        db: &PgPool,
        email_config: &EmailConfig,
        dto: RegisterRequest,
    ) -> Result<User, AppError> {
        let email = normalize_email(&dto.email);

        if UserService::find_by_email(db, &email).await?.is_some() {
            return Err(AppError::duplicate_email());
        }

        let hashed_password = hash_password(&dto.password)?;
        let token = generate_token();
        let expires_at = Utc::now() + Duration::hours(VERIFICATION_TOKEN_TTL_HOURS);

        let sql = format!(
            r#"INSERT INTO users (full_name, email, password, verification_token_hash, verification_token_expires_at)
               VALUES ($1, $2, $3, $4, $5)
               RETURNING {}"#,
            User::COLUMNS
        );

        let user = sqlx::query_as::<_, User>(&sql)
            .bind(dto.full_name.trim())
            .bind(&email)
            .bind(&hashed_password)
            .bind(&token.hash)
            .bind(expires_at)
            .fetch_one(db)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db_err) = &e
                    && db_err.is_unique_violation()
                {
                    return AppError::duplicate_email();
                }
                AppError::from(e)
            })?;

        spawn_email(
            email_config.clone(),
            EmailKind::Verification,
            user.email.clone(),
            user.full_name.clone(),
            token.raw,
        );
        track_user_registered();

        Ok(user)
    }

    #[instrument(skip(dto))]
    pub async fn verify_email(db: &PgPool, dto: VerifyEmailRequest) -> Result<(), AppError> {
        let verified = sqlx::query_scalar::<_, uuid::Uuid>(
            r#"UPDATE users
               SET is_verified = true,
                   verification_token_hash = NULL,
                   verification_token_expires_at = NULL,
                   updated_at = NOW()
               WHERE verification_token_hash = $1 AND verification_token_expires_at > NOW()
               RETURNING id"#,
        )
        .bind(hash_token(dto.token.trim()))
        .fetch_optional(db)
        .await?;

        if verified.is_none() {
            return Err(AppError::invalid_token("verification"));
        }

        Ok(())
    }

    /// Unknown email and wrong password fail identically. Verification is
    /// only checked once the password is known to be right.
    #[instrument(skip(dto, jwt_config), fields(email = %dto.email))]
    pub async fn login_user(
        db: &PgPool,
        jwt_config: &JwtConfig,
        dto: LoginRequest,
    ) -> Result<LoginResponse, AppError> {
        let Some(user) = UserService::find_by_email(db, &dto.email).await? else {
            verify_dummy_password(&dto.password);
            track_user_login_failure("unknown_email");
            return Err(AppError::invalid_credentials());
        };

        if !verify_password(&dto.password, &user.password)? {
            track_user_login_failure("wrong_password");
            return Err(AppError::invalid_credentials());
        }

        if !user.role.is_admin() && !user.is_verified {
            track_user_login_failure("unverified");
            return Err(AppError::email_not_verified());
        }

        sqlx::query("UPDATE users SET last_login = NOW() WHERE id = $1")
            .bind(user.id)
            .execute(db)
            .await?;

        let token = create_access_token(user.id.into_inner(), &user.email, user.role, jwt_config)?;

        track_jwt_issued();
        track_user_login_success(user.role.as_str());

        Ok(LoginResponse {
            token,
            user: LoginUser::from(&user),
        })
    }

    /// Issues a reset token when the account exists. Callers answer the same
    /// way either way.
    #[instrument(skip(dto, email_config), fields(email = %dto.email))]
    pub async fn forgot_password(
        db: &PgPool,
        email_config: &EmailConfig,
        dto: ForgotPasswordRequest,
    ) -> Result<(), AppError> {
        let Some(user) = UserService::find_by_email(db, &dto.email).await? else {
            tracing::debug!("password reset requested for unknown email");
            return Ok(());
        };

        let token = generate_token();
        let expires_at = Utc::now() + Duration::minutes(RESET_TOKEN_TTL_MINUTES);

        sqlx::query(
            r#"UPDATE users
               SET reset_token_hash = $1, reset_token_expires_at = $2, updated_at = NOW()
               WHERE id = $3"#,
        )
        .bind(&token.hash)
        .bind(expires_at)
        .bind(user.id)
        .execute(db)
        .await?;

        spawn_email(
            email_config.clone(),
            EmailKind::PasswordReset,
            user.email,
            user.full_name,
            token.raw,
        );

        Ok(())
    }

    #[instrument(skip(dto))]
    pub async fn reset_password(db: &PgPool, dto: ResetPasswordRequest) -> Result<(), AppError> {
        let hashed_password = hash_password(&dto.password)?;

        let reset = sqlx::query_scalar::<_, uuid::Uuid>(
            r#"UPDATE users
               SET password = $1,
                   reset_token_hash = NULL,
                   reset_token_expires_at = NULL,
                   updated_at = NOW()
               WHERE reset_token_hash = $2 AND reset_token_expires_at > NOW()
               RETURNING id"#,
        )
        .bind(&hashed_password)
        .bind(hash_token(dto.token.trim()))
        .fetch_optional(db)
        .await?;

        if reset.is_none() {
            return Err(AppError::invalid_token("reset"));
        }

        Ok(())
    }

    /// Makes sure `email` is a verified admin, creating the account or
    /// promoting an existing one.
    #[instrument(skip(password))]
    pub async fn ensure_admin(
        db: &PgPool,
        full_name: &str,
        email: &str,
        password: &str,
    ) -> Result<User, AppError> {
        let email = normalize_email(email);

        if let Some(existing) = UserService::find_by_email(db, &email).await? {
            if existing.role == Role::Admin && existing.is_verified {
                return Ok(existing);
            }

            let sql = format!(
                r#"UPDATE users SET role = 'admin', is_verified = true, updated_at = NOW()
                   WHERE id = $1
                   RETURNING {}"#,
                User::COLUMNS
            );
            let promoted = sqlx::query_as::<_, User>(&sql)
                .bind(existing.id)
                .fetch_one(db)
                .await?;

            tracing::info!(user_id = %promoted.id, "promoted existing account to admin");
            return Ok(promoted);
        }

        if password.len() < 8 {
            return Err(AppError::bad_request(anyhow!(
                "Admin password must be at least 8 characters"
            )));
        }

        let hashed_password = hash_password(password)?;
        let sql = format!(
            r#"INSERT INTO users (full_name, email, password, role, is_verified)
               VALUES ($1, $2, $3, 'admin', true)
               RETURNING {}"#,
            User::COLUMNS
        );
        let admin = sqlx::query_as::<_, User>(&sql)
            .bind(full_name)
            .bind(&email)
            .bind(&hashed_password)
            .fetch_one(db)
            .await?;

        tracing::info!(user_id = %admin.id, "created admin account");
        Ok(admin)
    }
}
