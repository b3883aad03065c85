//! Course lifecycle and enrollment.
//!
//! Every read is computed for a viewer: `enrolled_count` and `is_enrolled`
//! come from correlated subqueries so the roster itself never leaves the
//! database.

use anyhow::anyhow;
use sqlx::PgPool;
use tracing::instrument;

use studyhub_core::{AppError, like_pattern, total_pages};
use studyhub_models::courses::{
    Course, CourseFilterParams, CourseFiltersResponse, CourseListResponse, CourseRow,
    CreateCourseDto, DEFAULT_COURSE_PAGE_SIZE, DEFAULT_DEPARTMENT, EnrollDto, UpdateCourseDto,
    Viewer,
};
use studyhub_models::ids::{CourseId, UserId};
use studyhub_models::users::User;

use crate::metrics::{track_course_created, track_enrollment};

const COURSE_COLUMNS: &str = "c.id, c.course_name, c.teacher_name, c.course_password, \
    c.section, c.batch, c.semester, c.department, c.thumbnail, c.created_by, c.cr_name, \
    c.cr_email, c.created_at, c.updated_at";

const LIST_FILTERS: &str = r#"($1::text IS NULL OR c.course_name ILIKE $1 OR c.teacher_name ILIKE $1)
    AND ($2::text IS NULL OR c.semester = $2)
    AND ($3::text IS NULL OR c.batch = $3)
    AND ($4::uuid IS NULL OR c.created_by = $4)"#;

/// Roster size and the viewer's membership, with the viewer bound at `$n`.
fn membership_columns(viewer_param: usize) -> String {
    format!(
        "(SELECT COUNT(*) FROM course_enrollments e WHERE e.course_id = c.id) AS enrolled_count, \
         EXISTS(SELECT 1 FROM course_enrollments e WHERE e.course_id = c.id AND e.user_id = ${}) AS is_enrolled",
        viewer_param
    )
}

pub struct CourseService;

impl CourseService {
    #[instrument]
    pub async fn list_courses(
        db: &PgPool,
        viewer: Viewer,
        filters: CourseFilterParams,
    ) -> Result<CourseListResponse, AppError> {
        let pagination = filters.pagination();
        let limit = pagination.limit_or(DEFAULT_COURSE_PAGE_SIZE);
        let offset = pagination.offset_for(limit);
        let search = filters.search.as_deref().map(like_pattern);

        let count_sql = format!("SELECT COUNT(*) FROM courses c WHERE {}", LIST_FILTERS);
        let total = sqlx::query_scalar::<_, i64>(&count_sql)
            .bind(&search)
            .bind(&filters.semester)
            .bind(&filters.batch)
            .bind(filters.created_by)
            .fetch_one(db)
            .await?;

        let data_sql = format!(
            r#"SELECT {}, {}
               FROM courses c
               WHERE {}
               ORDER BY c.created_at DESC, c.id
               LIMIT $6 OFFSET $7"#,
            COURSE_COLUMNS,
            membership_columns(5),
            LIST_FILTERS
        );
        let rows = sqlx::query_as::<_, CourseRow>(&data_sql)
            .bind(&search)
            .bind(&filters.semester)
            .bind(&filters.batch)
            .bind(filters.created_by)
            .bind(viewer.id)
            .bind(limit)
            .bind(offset)
            .fetch_all(db)
            .await?;

        let courses = rows
            .into_iter()
            .map(|row| row.into_view(viewer, filters.include_password))
            .collect();

        Ok(CourseListResponse {
            success: true,
            courses,
            current_page: pagination.page(),
            total_pages: total_pages(total, limit),
            total_courses: total,
        })
    }

    /// Distinct semesters and batches, for filter dropdowns.
    #[instrument]
    pub async fn get_filters(db: &PgPool) -> Result<CourseFiltersResponse, AppError> {
        let semesters = sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT semester FROM courses ORDER BY semester",
        )
        .fetch_all(db)
        .await?;

        let batches =
            sqlx::query_scalar::<_, String>("SELECT DISTINCT batch FROM courses ORDER BY batch")
                .fetch_all(db)
                .await?;

        Ok(CourseFiltersResponse {
            success: true,
            semesters,
            batches,
        })
    }

    #[instrument]
    pub async fn get_course(
        db: &PgPool,
        course_id: CourseId,
        viewer_id: UserId,
    ) -> Result<CourseRow, AppError> {
        let sql = format!(
            "SELECT {}, {} FROM courses c WHERE c.id = $2",
            COURSE_COLUMNS,
            membership_columns(1)
        );

        sqlx::query_as::<_, CourseRow>(&sql)
            .bind(viewer_id)
            .bind(course_id)
            .fetch_optional(db)
            .await?
            .ok_or_else(course_not_found)
    }

    /// Creates the course in the creator's cohort and enrolls the creator,
    /// atomically.
    #[instrument(skip(creator, dto), fields(creator_id = %creator.id))]
    pub async fn create_course(
        db: &PgPool,
        creator: &User,
        dto: CreateCourseDto,
    ) -> Result<CourseRow, AppError> {
        let inherit = |value: Option<String>, fallback: &Option<String>| {
            value
                .or_else(|| fallback.clone())
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let section = inherit(dto.section, &creator.section);
        let batch = inherit(dto.batch, &creator.batch);
        let semester = inherit(dto.semester, &creator.semester);

        let (Some(section), Some(batch), Some(semester)) = (section, batch, semester) else {
            return Err(AppError::profile_incomplete());
        };

        let department = dto
            .department
            .map(|d| d.trim().to_string())
            .unwrap_or_else(|| DEFAULT_DEPARTMENT.to_string());

        let mut tx = db.begin().await?;

        let course = sqlx::query_as::<_, Course>(
            r#"INSERT INTO courses (course_name, teacher_name, course_password, section, batch,
                                    semester, department, thumbnail, created_by, cr_name, cr_email)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
               RETURNING id, course_name, teacher_name, course_password, section, batch, semester,
                         department, thumbnail, created_by, cr_name, cr_email, created_at, updated_at"#,
        )
        .bind(dto.course_name.trim())
        .bind(dto.teacher_name.trim())
        .bind(&dto.course_password)
        .bind(&section)
        .bind(&batch)
        .bind(&semester)
        .bind(&department)
        .bind(&dto.thumbnail)
        .bind(creator.id)
        .bind(&creator.full_name)
        .bind(&creator.email)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("INSERT INTO course_enrollments (course_id, user_id) VALUES ($1, $2)")
            .bind(course.id)
            .bind(creator.id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        track_course_created();
        tracing::info!(course_id = %course.id, "course created");

        Ok(CourseRow {
            course,
            enrolled_count: 1,
            is_enrolled: true,
        })
    }

    /// Applies the supplied fields in one statement. Membership is untouched.
    #[instrument(skip(caller, dto), fields(caller_id = %caller.id))]
    pub async fn update_course(
        db: &PgPool,
        caller: &User,
        course_id: CourseId,
        dto: UpdateCourseDto,
    ) -> Result<CourseRow, AppError> {
        let existing = Self::find_course(db, course_id).await?;
        ensure_creator(&existing, caller, "update")?;

        let trim = |value: Option<String>| value.map(|v| v.trim().to_string());
        let (thumbnail_supplied, thumbnail) = match dto.thumbnail {
            Some(value) => (
                true,
                value
                    .map(|v| v.trim().to_string())
                    .filter(|v| !v.is_empty()),
            ),
            None => (false, None),
        };

        let updated = sqlx::query_scalar::<_, uuid::Uuid>(
            r#"UPDATE courses
               SET course_name = COALESCE($3, course_name),
                   teacher_name = COALESCE($4, teacher_name),
                   course_password = COALESCE($5, course_password),
                   thumbnail = CASE WHEN $6 THEN $7 ELSE thumbnail END,
                   section = COALESCE($8, section),
                   batch = COALESCE($9, batch),
                   semester = COALESCE($10, semester),
                   department = COALESCE($11, department),
                   updated_at = NOW()
               WHERE id = $1 AND created_by = $2
               RETURNING id"#,
        )
        .bind(course_id)
        .bind(caller.id)
        .bind(trim(dto.course_name))
        .bind(trim(dto.teacher_name))
        .bind(dto.course_password)
        .bind(thumbnail_supplied)
        .bind(thumbnail)
        .bind(trim(dto.section))
        .bind(trim(dto.batch))
        .bind(trim(dto.semester))
        .bind(trim(dto.department))
        .fetch_optional(db)
        .await?;

        if updated.is_none() {
            return Err(course_not_found());
        }

        Self::get_course(db, course_id, caller.id).await
    }

    /// Hard delete; enrollments go with it.
    #[instrument(skip(caller), fields(caller_id = %caller.id))]
    pub async fn delete_course(
        db: &PgPool,
        caller: &User,
        course_id: CourseId,
    ) -> Result<(), AppError> {
        let existing = Self::find_course(db, course_id).await?;
        ensure_creator(&existing, caller, "delete")?;

        let result = sqlx::query("DELETE FROM courses WHERE id = $1 AND created_by = $2")
            .bind(course_id)
            .bind(caller.id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(course_not_found());
        }

        tracing::info!(course_id = %course_id, "course deleted");
        Ok(())
    }

    /// Adds the caller to the course roster.
    ///
    /// Checks run in a fixed order: missing course, existing membership,
    /// then the password. The composite key settles concurrent attempts.
    #[instrument(skip(dto))]
    pub async fn enroll(
        db: &PgPool,
        user_id: UserId,
        course_id: CourseId,
        dto: EnrollDto,
    ) -> Result<(), AppError> {
        let course = Self::find_course(db, course_id).await?;

        let already_enrolled = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM course_enrollments WHERE course_id = $1 AND user_id = $2)",
        )
        .bind(course_id)
        .bind(user_id)
        .fetch_one(db)
        .await?;

        if already_enrolled {
            track_enrollment("already_enrolled");
            return Err(AppError::already_enrolled());
        }

        if course.course_password != dto.password {
            track_enrollment("incorrect_password");
            return Err(AppError::incorrect_password());
        }

        let result = sqlx::query(
            r#"INSERT INTO course_enrollments (course_id, user_id)
               VALUES ($1, $2)
               ON CONFLICT (course_id, user_id) DO NOTHING"#,
        )
        .bind(course_id)
        .bind(user_id)
        .execute(db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e
                && db_err.is_foreign_key_violation()
            {
                return course_not_found();
            }
            AppError::from(e)
        })?;

        if result.rows_affected() == 0 {
            track_enrollment("already_enrolled");
            return Err(AppError::already_enrolled());
        }

        track_enrollment("enrolled");
        Ok(())
    }

    #[instrument]
    pub async fn count_enrollments(db: &PgPool, course_id: CourseId) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM course_enrollments WHERE course_id = $1",
        )
        .bind(course_id)
        .fetch_one(db)
        .await?;

        Ok(count)
    }

    async fn find_course(db: &PgPool, course_id: CourseId) -> Result<Course, AppError> {
        sqlx::query_as::<_, Course>(
            r#"SELECT id, course_name, teacher_name, course_password, section, batch, semester,
                      department, thumbnail, created_by, cr_name, cr_email, created_at, updated_at
               FROM courses WHERE id = $1"#,
        )
        .bind(course_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(course_not_found)
    }
}

fn course_not_found() -> AppError {
    AppError::not_found(anyhow!("Course not found"))
}

fn ensure_creator(course: &Course, caller: &User, action: &str) -> Result<(), AppError> {
    if course.created_by != caller.id {
        return Err(AppError::forbidden(format!(
            "You can only {} courses you created",
            action
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_membership_columns_bind_viewer_param() {
        assert!(membership_columns(5).contains("e.user_id = $5"));
        assert!(membership_columns(1).contains("e.user_id = $1"));
    }
}
