use anyhow::anyhow;
use sqlx::PgPool;
use tracing::instrument;

use studyhub_core::{AppError, PaginationParams, like_pattern, total_pages};
use studyhub_models::ids::ResourceId;
use studyhub_models::resources::{
    AdminResourceView, CreateResourceDto, Resource, ResourceListResponse, ResourceStatus, Subject,
    UpdateResourceDto,
};
use studyhub_models::users::User;

use crate::metrics::track_resource_created;

const RESOURCE_COLUMNS: &str = "id, title, link, description, subject, author_id, author_name, \
    status, created_at, updated_at";

/// Filters shared by the public listing and the moderation queue.
#[derive(Debug, Default)]
pub struct ResourceQuery {
    pub status: Option<ResourceStatus>,
    pub subject: Option<Subject>,
    pub search: Option<String>,
    pub pagination: PaginationParams,
}

pub struct ResourceService;

impl ResourceService {
    #[instrument]
    pub async fn list_resources(
        db: &PgPool,
        query: ResourceQuery,
    ) -> Result<ResourceListResponse, AppError> {
        let limit = query.pagination.limit();
        let offset = query.pagination.offset_for(limit);
        let search = query.search.as_deref().map(like_pattern);

        let filters = r#"($1::resource_status IS NULL OR status = $1)
            AND ($2::resource_subject IS NULL OR subject = $2)
            AND ($3::text IS NULL OR title ILIKE $3 OR description ILIKE $3 OR author_name ILIKE $3)"#;

        let count_sql = format!("SELECT COUNT(*) FROM resources WHERE {}", filters);
        let total = sqlx::query_scalar::<_, i64>(&count_sql)
            .bind(query.status)
            .bind(query.subject)
            .bind(&search)
            .fetch_one(db)
            .await?;

        let data_sql = format!(
            r#"SELECT {} FROM resources
               WHERE {}
               ORDER BY created_at DESC, id
               LIMIT $4 OFFSET $5"#,
            RESOURCE_COLUMNS, filters
        );
        let resources = sqlx::query_as::<_, Resource>(&data_sql)
            .bind(query.status)
            .bind(query.subject)
            .bind(&search)
            .bind(limit)
            .bind(offset)
            .fetch_all(db)
            .await?;

        Ok(ResourceListResponse {
            resources,
            current_page: query.pagination.page(),
            total_pages: total_pages(total, limit),
            total,
        })
    }

    #[instrument]
    pub async fn find_resource(
        db: &PgPool,
        resource_id: ResourceId,
    ) -> Result<Resource, AppError> {
        let sql = format!("SELECT {} FROM resources WHERE id = $1", RESOURCE_COLUMNS);

        sqlx::query_as::<_, Resource>(&sql)
            .bind(resource_id)
            .fetch_optional(db)
            .await?
            .ok_or_else(resource_not_found)
    }

    /// Moderation lookup: any status, with the author's email.
    #[instrument]
    pub async fn find_for_moderation(
        db: &PgPool,
        resource_id: ResourceId,
    ) -> Result<AdminResourceView, AppError> {
        sqlx::query_as::<_, AdminResourceView>(
            r#"SELECT r.id, r.title, r.link, r.description, r.subject, r.author_id, r.author_name,
                      r.status, r.created_at, r.updated_at, u.email AS author_email
               FROM resources r
               JOIN users u ON u.id = r.author_id
               WHERE r.id = $1"#,
        )
        .bind(resource_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(resource_not_found)
    }

    /// Public lookup: resources held back by moderation read as missing.
    #[instrument]
    pub async fn get_approved_resource(
        db: &PgPool,
        resource_id: ResourceId,
    ) -> Result<Resource, AppError> {
        let resource = Self::find_resource(db, resource_id).await?;

        if resource.status != ResourceStatus::Approved {
            return Err(resource_not_found());
        }

        Ok(resource)
    }

    #[instrument(skip(author), fields(author_id = %author.id))]
    pub async fn create_resource(
        db: &PgPool,
        author: &User,
        dto: CreateResourceDto,
    ) -> Result<Resource, AppError> {
        let sql = format!(
            r#"INSERT INTO resources (title, link, description, subject, author_id, author_name)
               VALUES ($1, $2, $3, $4, $5, $6)
               RETURNING {}"#,
            RESOURCE_COLUMNS
        );

        let resource = sqlx::query_as::<_, Resource>(&sql)
            .bind(dto.title.trim())
            .bind(dto.link.trim())
            .bind(dto.description.as_deref().map(str::trim))
            .bind(dto.subject)
            .bind(author.id)
            .bind(&author.full_name)
            .fetch_one(db)
            .await?;

        track_resource_created(resource.subject.as_str());

        Ok(resource)
    }

    /// Author or admin may edit; only an admin may touch `status`.
    #[instrument(skip(caller), fields(caller_id = %caller.id))]
    pub async fn update_resource(
        db: &PgPool,
        caller: &User,
        resource_id: ResourceId,
        dto: UpdateResourceDto,
    ) -> Result<Resource, AppError> {
        let existing = Self::find_resource(db, resource_id).await?;
        ensure_can_modify(&existing, caller)?;

        if dto.status.is_some() && !caller.role.is_admin() {
            return Err(AppError::forbidden(
                "Only admins can change a resource's status".to_string(),
            ));
        }

        let trim = |value: Option<String>| value.map(|v| v.trim().to_string());
        let (description_supplied, description) = match dto.description {
            Some(value) => (
                true,
                value
                    .map(|v| v.trim().to_string())
                    .filter(|v| !v.is_empty()),
            ),
            None => (false, None),
        };

        let sql = format!(
            r#"UPDATE resources
               SET title = COALESCE($2, title),
                   link = COALESCE($3, link),
                   description = CASE WHEN $4 THEN $5 ELSE description END,
                   subject = COALESCE($6, subject),
                   status = COALESCE($7, status),
                   updated_at = NOW()
               WHERE id = $1
               RETURNING {}"#,
            RESOURCE_COLUMNS
        );

        sqlx::query_as::<_, Resource>(&sql)
            .bind(resource_id)
            .bind(trim(dto.title))
            .bind(trim(dto.link))
            .bind(description_supplied)
            .bind(description)
            .bind(dto.subject)
            .bind(dto.status)
            .fetch_optional(db)
            .await?
            .ok_or_else(resource_not_found)
    }

    #[instrument(skip(caller), fields(caller_id = %caller.id))]
    pub async fn delete_resource(
        db: &PgPool,
        caller: &User,
        resource_id: ResourceId,
    ) -> Result<(), AppError> {
        let existing = Self::find_resource(db, resource_id).await?;
        ensure_can_modify(&existing, caller)?;

        sqlx::query("DELETE FROM resources WHERE id = $1")
            .bind(resource_id)
            .execute(db)
            .await?;

        Ok(())
    }

    #[instrument]
    pub async fn set_status(
        db: &PgPool,
        resource_id: ResourceId,
        status: ResourceStatus,
    ) -> Result<Resource, AppError> {
        let sql = format!(
            "UPDATE resources SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING {}",
            RESOURCE_COLUMNS
        );

        sqlx::query_as::<_, Resource>(&sql)
            .bind(resource_id)
            .bind(status)
            .fetch_optional(db)
            .await?
            .ok_or_else(resource_not_found)
    }
}

fn resource_not_found() -> AppError {
    AppError::not_found(anyhow!("Resource not found"))
}

fn ensure_can_modify(resource: &Resource, caller: &User) -> Result<(), AppError> {
    if resource.author_id == caller.id || caller.role.is_admin() {
        return Ok(());
    }
    Err(AppError::forbidden(
        "You can only modify resources you shared".to_string(),
    ))
}
