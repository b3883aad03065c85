use anyhow::anyhow;
use sqlx::PgPool;
use tracing::instrument;

use studyhub_core::{AppError, PaginationParams, like_pattern, total_pages};
use studyhub_models::admin::{
    AdminStatsResponse, AdminUpdateUserDto, ResourceStats, UserEmail, UserFilterParams,
    UserListResponse, UserStats,
};
use studyhub_models::ids::UserId;
use studyhub_models::users::{Role, User, UserResponse};

use crate::metrics::track_role_changed;
use crate::modules::resources::service::{ResourceQuery, ResourceService};
use crate::modules::users::service::UserService;

const RECENT_LIMIT: i64 = 5;

pub struct AdminService;

impl AdminService {
    #[instrument]
    pub async fn get_stats(db: &PgPool) -> Result<AdminStatsResponse, AppError> {
        let users = sqlx::query_as::<_, UserStats>(
            r#"SELECT
                COUNT(*) AS total,
                COUNT(*) FILTER (WHERE is_verified) AS verified,
                COUNT(*) FILTER (WHERE role = 'admin') AS admins,
                COUNT(*) FILTER (WHERE role = 'cr') AS crs,
                COUNT(*) FILTER (WHERE role = 'student') AS students
               FROM users"#,
        )
        .fetch_one(db)
        .await?;

        let resources = sqlx::query_as::<_, ResourceStats>(
            r#"SELECT
                COUNT(*) AS total,
                COUNT(*) FILTER (WHERE status = 'pending') AS pending,
                COUNT(*) FILTER (WHERE status = 'approved') AS approved,
                COUNT(*) FILTER (WHERE status = 'rejected') AS rejected
               FROM resources"#,
        )
        .fetch_one(db)
        .await?;

        let total_courses = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM courses")
            .fetch_one(db)
            .await?;

        let sql = format!(
            "SELECT {} FROM users ORDER BY created_at DESC LIMIT $1",
            User::COLUMNS
        );
        let recent_users = sqlx::query_as::<_, User>(&sql)
            .bind(RECENT_LIMIT)
            .fetch_all(db)
            .await?
            .into_iter()
            .map(UserResponse::from)
            .collect();

        let recent_resources = ResourceService::list_resources(
            db,
            ResourceQuery {
                pagination: PaginationParams::new(Some(1), Some(RECENT_LIMIT)),
                ..Default::default()
            },
        )
        .await?
        .resources;

        Ok(AdminStatsResponse {
            users,
            resources,
            total_courses,
            recent_users,
            recent_resources,
        })
    }

    #[instrument]
    pub async fn list_users(
        db: &PgPool,
        filters: UserFilterParams,
    ) -> Result<UserListResponse, AppError> {
        let role = filters
            .role_filter()
            .map_err(|e| AppError::bad_request(anyhow!(e)))?;
        let pagination = filters.pagination();
        let limit = pagination.limit();
        let offset = pagination.offset_for(limit);
        let search = filters.search.as_deref().map(like_pattern);

        let where_clause = r#"($1::user_role IS NULL OR role = $1)
            AND ($2::text IS NULL OR full_name ILIKE $2 OR email ILIKE $2)"#;

        let count_sql = format!("SELECT COUNT(*) FROM users WHERE {}", where_clause);
        let total = sqlx::query_scalar::<_, i64>(&count_sql)
            .bind(role)
            .bind(&search)
            .fetch_one(db)
            .await?;

        let data_sql = format!(
            r#"SELECT {} FROM users
               WHERE {}
               ORDER BY created_at DESC, id
               LIMIT $3 OFFSET $4"#,
            User::COLUMNS,
            where_clause
        );
        let users = sqlx::query_as::<_, User>(&data_sql)
            .bind(role)
            .bind(&search)
            .bind(limit)
            .bind(offset)
            .fetch_all(db)
            .await?
            .into_iter()
            .map(UserResponse::from)
            .collect();

        Ok(UserListResponse {
            users,
            current_page: pagination.page(),
            total_pages: total_pages(total, limit),
            total,
        })
    }

    /// Changes a user's role. Promotion to CR requires the user's
    /// `(section, batch)` to have no other CR.
    #[instrument(skip(admin), fields(admin_id = %admin.id))]
    pub async fn set_role(
        db: &PgPool,
        admin: &User,
        user_id: UserId,
        role: Role,
    ) -> Result<User, AppError> {
        if user_id == admin.id {
            return Err(AppError::forbidden(
                "You cannot change your own role".to_string(),
            ));
        }

        let target = UserService::get_user(db, user_id).await?;

        if role == Role::Cr
            && let (Some(section), Some(batch)) = (&target.section, &target.batch)
        {
            let taken = sqlx::query_scalar::<_, bool>(
                r#"SELECT EXISTS(
                    SELECT 1 FROM users
                    WHERE role = 'cr' AND section = $1 AND batch = $2 AND id <> $3
                )"#,
            )
            .bind(section)
            .bind(batch)
            .bind(target.id)
            .fetch_one(db)
            .await?;

            if taken {
                return Err(cohort_taken());
            }
        }

        let sql = format!(
            "UPDATE users SET role = $2, updated_at = NOW() WHERE id = $1 RETURNING {}",
            User::COLUMNS
        );
        let updated = sqlx::query_as::<_, User>(&sql)
            .bind(user_id)
            .bind(role)
            .fetch_optional(db)
            .await
            .map_err(map_cohort_violation)?
            .ok_or_else(|| AppError::not_found(anyhow!("User not found")))?;

        track_role_changed(role.as_str());
        tracing::info!(user_id = %updated.id, role = %role, "role changed");

        Ok(updated)
    }

    /// Admin edit of verification and cohort. Not subject to the CR lock.
    #[instrument]
    pub async fn update_user(
        db: &PgPool,
        user_id: UserId,
        dto: AdminUpdateUserDto,
    ) -> Result<User, AppError> {
        let trim = |value: Option<String>| value.map(|v| v.trim().to_string());

        let sql = format!(
            r#"UPDATE users
               SET is_verified = COALESCE($2, is_verified),
                   section = COALESCE($3, section),
                   batch = COALESCE($4, batch),
                   semester = COALESCE($5, semester),
                   updated_at = NOW()
               WHERE id = $1
               RETURNING {}"#,
            User::COLUMNS
        );

        sqlx::query_as::<_, User>(&sql)
            .bind(user_id)
            .bind(dto.is_verified)
            .bind(trim(dto.section))
            .bind(trim(dto.batch))
            .bind(trim(dto.semester))
            .fetch_optional(db)
            .await
            .map_err(map_cohort_violation)?
            .ok_or_else(|| AppError::not_found(anyhow!("User not found")))
    }

    /// Ids and emails of the given users. Unknown ids are skipped.
    #[instrument(skip(user_ids), fields(requested = user_ids.len()))]
    pub async fn user_emails(db: &PgPool, user_ids: &[UserId]) -> Result<Vec<UserEmail>, AppError> {
        let emails = sqlx::query_as::<_, UserEmail>(
            "SELECT id, email FROM users WHERE id = ANY($1) ORDER BY email",
        )
        .bind(user_ids)
        .fetch_all(db)
        .await?;

        Ok(emails)
    }

    /// Removes the account along with its courses, enrollments and resources.
    #[instrument(skip(admin), fields(admin_id = %admin.id))]
    pub async fn delete_user(db: &PgPool, admin: &User, user_id: UserId) -> Result<(), AppError> {
        if user_id == admin.id {
            return Err(AppError::forbidden(
                "You cannot delete your own account".to_string(),
            ));
        }

        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("User not found")));
        }

        tracing::info!(user_id = %user_id, "user deleted");
        Ok(())
    }
}

fn cohort_taken() -> AppError {
    AppError::bad_request(anyhow!(
        "This section and batch already has a class representative"
    ))
}

fn map_cohort_violation(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &e
        && db_err.is_unique_violation()
    {
        return cohort_taken();
    }
    AppError::from(e)
}
