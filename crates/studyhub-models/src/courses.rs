//! Course and enrollment models.
//!
//! A course row carries its password in clear so the creator can read it back.
//! The password only leaves the server through [`CourseRow::into_view`] when
//! the caller is the creating CR and asked for it explicitly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use studyhub_core::PaginationParams;
use studyhub_core::serde::{
    deserialize_double_option, deserialize_flag, deserialize_optional_i64,
    deserialize_optional_string, deserialize_optional_uuid,
};

use crate::ids::{CourseId, UserId};
use crate::users::Role;
use crate::validation::not_blank;

/// Department used when a course is created without one.
pub const DEFAULT_DEPARTMENT: &str = "CSE";

/// Page size of the course list when the client sends no `limit`.
pub const DEFAULT_COURSE_PAGE_SIZE: i64 = 8;

/// A row of the `courses` table.
#[derive(Debug, Clone, FromRow)]
pub struct Course {
    pub id: CourseId,
    pub course_name: String,
    pub teacher_name: String,
    pub course_password: String,
    pub section: String,
    pub batch: String,
    pub semester: String,
    pub department: String,
    pub thumbnail: Option<String>,
    pub created_by: UserId,
    pub cr_name: String,
    pub cr_email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A course joined with its member count and the caller's membership.
#[derive(Debug, Clone, FromRow)]
pub struct CourseRow {
    #[sqlx(flatten)]
    pub course: Course,
    pub enrolled_count: i64,
    pub is_enrolled: bool,
}

/// Who is looking at a course.
#[derive(Debug, Clone, Copy)]
pub struct Viewer {
    pub id: UserId,
    pub role: Role,
}

impl Viewer {
    /// Only the creating CR counts as creator; a demoted creator does not.
    pub fn is_creator_of(&self, course: &Course) -> bool {
        self.role.is_cr() && self.id == course.created_by
    }
}

impl CourseRow {
    pub fn into_view(self, viewer: Viewer, include_password: bool) -> CourseView {
        let is_creator = viewer.is_creator_of(&self.course);
        let course = self.course;

        CourseView {
            id: course.id,
            course_name: course.course_name,
            teacher_name: course.teacher_name,
            section: course.section,
            batch: course.batch,
            semester: course.semester,
            department: course.department,
            thumbnail: course.thumbnail,
            created_by: course.created_by,
            cr_name: course.cr_name,
            cr_email: course.cr_email,
            course_password: (include_password && is_creator).then_some(course.course_password),
            enrolled_count: self.enrolled_count,
            is_enrolled: self.is_enrolled,
            is_creator,
            created_at: course.created_at,
            updated_at: course.updated_at,
        }
    }
}

/// A course as returned by the API. Never carries the member roster.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CourseView {
    pub id: CourseId,
    pub course_name: String,
    pub teacher_name: String,
    pub section: String,
    pub batch: String,
    pub semester: String,
    pub department: String,
    pub thumbnail: Option<String>,
    pub created_by: UserId,
    pub cr_name: String,
    pub cr_email: String,
    /// Present only for the creator with `include_password=true`.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub course_password: Option<String>,
    pub enrolled_count: i64,
    pub is_enrolled: bool,
    pub is_creator: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCourseDto {
    #[serde(default)]
    #[validate(
        custom(function = "not_blank", message = "Course name is required"),
        length(max = 200, message = "Course name must be at most 200 characters")
    )]
    pub course_name: String,
    #[serde(default)]
    #[validate(
        custom(function = "not_blank", message = "Teacher name is required"),
        length(max = 100, message = "Teacher name must be at most 100 characters")
    )]
    pub teacher_name: String,
    #[serde(default)]
    #[validate(length(
        min = 4,
        max = 255,
        message = "Course password must be between 4 and 255 characters"
    ))]
    pub course_password: String,
    /// Defaults to the creator's section.
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    #[validate(length(max = 50, message = "Section must be at most 50 characters"))]
    pub section: Option<String>,
    /// Defaults to the creator's batch.
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    #[validate(length(max = 50, message = "Batch must be at most 50 characters"))]
    pub batch: Option<String>,
    /// Defaults to the creator's semester.
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    #[validate(length(max = 50, message = "Semester must be at most 50 characters"))]
    pub semester: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    #[validate(length(max = 50, message = "Department must be at most 50 characters"))]
    pub department: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    #[validate(url(message = "Thumbnail must be a valid URL"))]
    pub thumbnail: Option<String>,
}

/// Partial course update. Absent fields are left untouched; `thumbnail: null`
/// clears the thumbnail.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCourseDto {
    #[validate(
        custom(function = "not_blank", message = "Course name cannot be blank"),
        length(max = 200, message = "Course name must be at most 200 characters")
    )]
    pub course_name: Option<String>,
    #[validate(
        custom(function = "not_blank", message = "Teacher name cannot be blank"),
        length(max = 100, message = "Teacher name must be at most 100 characters")
    )]
    pub teacher_name: Option<String>,
    #[validate(length(
        min = 4,
        max = 255,
        message = "Course password must be between 4 and 255 characters"
    ))]
    pub course_password: Option<String>,
    #[serde(default, deserialize_with = "deserialize_double_option")]
    #[schema(value_type = Option<String>)]
    pub thumbnail: Option<Option<String>>,
    #[validate(
        custom(function = "not_blank", message = "Section cannot be blank"),
        length(max = 50, message = "Section must be at most 50 characters")
    )]
    pub section: Option<String>,
    #[validate(
        custom(function = "not_blank", message = "Batch cannot be blank"),
        length(max = 50, message = "Batch must be at most 50 characters")
    )]
    pub batch: Option<String>,
    #[validate(
        custom(function = "not_blank", message = "Semester cannot be blank"),
        length(max = 50, message = "Semester must be at most 50 characters")
    )]
    pub semester: Option<String>,
    #[validate(
        custom(function = "not_blank", message = "Department cannot be blank"),
        length(max = 50, message = "Department must be at most 50 characters")
    )]
    pub department: Option<String>,
}

/// The password is compared byte for byte, so whitespace is significant and
/// only an empty value is rejected.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct EnrollDto {
    #[serde(default)]
    #[validate(length(min = 1, message = "Course password is required"))]
    pub password: String,
}

/// Query parameters of `GET /api/user/courses`.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CourseFilterParams {
    /// Case-insensitive match on course or teacher name
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub search: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub semester: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub batch: Option<String>,
    /// Only courses created by this user
    #[serde(
        default,
        rename = "createdBy",
        alias = "created_by",
        deserialize_with = "deserialize_optional_uuid"
    )]
    pub created_by: Option<Uuid>,
    /// Page number (1-indexed, default: 1)
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub page: Option<i64>,
    /// Items per page (1-100, default: 8)
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub limit: Option<i64>,
    /// Return `coursePassword` on courses the caller created
    #[serde(default, alias = "includePassword", deserialize_with = "deserialize_flag")]
    pub include_password: bool,
}

impl CourseFilterParams {
    pub fn pagination(&self) -> PaginationParams {
        PaginationParams::new(self.page, self.limit)
    }
}

/// Query parameters of `GET /api/user/courses/{id}`.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CourseViewParams {
    #[serde(default, alias = "includePassword", deserialize_with = "deserialize_flag")]
    pub include_password: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CourseListResponse {
    pub success: bool,
    pub courses: Vec<CourseView>,
    pub current_page: i64,
    pub total_pages: i64,
    pub total_courses: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CourseResponse {
    pub success: bool,
    pub course: CourseView,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CourseMutationResponse {
    pub success: bool,
    pub message: String,
    pub course: CourseView,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SuccessResponse {
    pub success: bool,
    pub message: String,
}

impl SuccessResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

/// Distinct values available for the course list filters.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CourseFiltersResponse {
    pub success: bool,
    pub semesters: Vec<String>,
    pub batches: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(created_by: UserId) -> CourseRow {
        CourseRow {
            course: Course {
                id: CourseId::new(),
                course_name: "Algorithms".to_string(),
                teacher_name: "Dr. X".to_string(),
                course_password: "pass1".to_string(),
                section: "A".to_string(),
                batch: "60".to_string(),
                semester: "Fall 2024".to_string(),
                department: DEFAULT_DEPARTMENT.to_string(),
                thumbnail: None,
                created_by,
                cr_name: "Alice".to_string(),
                cr_email: "alice@example.com".to_string(),
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
            enrolled_count: 1,
            is_enrolled: true,
        }
    }

    #[test]
    fn test_creator_sees_password_only_on_request() {
        let alice = Viewer {
            id: UserId::new(),
            role: Role::Cr,
        };

        let hidden = row(alice.id).into_view(alice, false);
        assert!(hidden.is_creator);
        assert!(hidden.course_password.is_none());

        let shown = row(alice.id).into_view(alice, true);
        assert_eq!(shown.course_password.as_deref(), Some("pass1"));
    }

    #[test]
    fn test_password_key_is_absent_for_others() {
        let bob = Viewer {
            id: UserId::new(),
            role: Role::Student,
        };
        let view = row(UserId::new()).into_view(bob, true);
        assert!(!view.is_creator);

        let json = serde_json::to_value(&view).unwrap();
        assert!(json.get("coursePassword").is_none());
        assert!(json.get("enrolledStudents").is_none());
        assert_eq!(json["courseName"], "Algorithms");
    }

    #[test]
    fn test_demoted_creator_is_not_creator() {
        let former_cr = Viewer {
            id: UserId::new(),
            role: Role::Student,
        };
        let view = row(former_cr.id).into_view(former_cr, true);
        assert!(!view.is_creator);
        assert!(view.course_password.is_none());
    }

    #[test]
    fn test_create_course_validation() {
        let dto: CreateCourseDto =
            serde_json::from_str(r#"{"courseName":"Algorithms","teacherName":"Dr. X","coursePassword":"abc"}"#)
                .unwrap();
        let errors = dto.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("course_password"));

        let dto: CreateCourseDto = serde_json::from_str(r#"{"coursePassword":"pass1"}"#).unwrap();
        let errors = dto.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("course_name"));
        assert!(errors.field_errors().contains_key("teacher_name"));
    }

    #[test]
    fn test_course_fields_bounded_by_column_sizes() {
        let dto = CreateCourseDto {
            course_name: "Algorithms".to_string(),
            teacher_name: "Dr. X".to_string(),
            course_password: "p".repeat(256),
            section: Some("S".repeat(51)),
            department: Some("D".repeat(51)),
            ..Default::default()
        };
        let errors = dto.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("course_password"));
        assert!(fields.contains_key("section"));
        assert!(fields.contains_key("department"));
        assert!(!fields.contains_key("batch"));

        let dto = UpdateCourseDto {
            course_name: Some("C".repeat(201)),
            teacher_name: Some("T".repeat(101)),
            semester: Some("1".repeat(51)),
            ..Default::default()
        };
        let errors = dto.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("course_name"));
        assert!(fields.contains_key("teacher_name"));
        assert!(fields.contains_key("semester"));

        let at_limit = UpdateCourseDto {
            course_password: Some("p".repeat(255)),
            section: Some("S".repeat(50)),
            ..Default::default()
        };
        assert!(at_limit.validate().is_ok());
    }

    #[test]
    fn test_enroll_password_keeps_whitespace() {
        let spaces = EnrollDto {
            password: "    ".to_string(),
        };
        assert!(spaces.validate().is_ok());
        assert!(EnrollDto::default().validate().is_err());
    }

    #[test]
    fn test_update_course_thumbnail_states() {
        let untouched: UpdateCourseDto = serde_json::from_str(r#"{"teacherName":"Dr. Y"}"#).unwrap();
        assert!(untouched.thumbnail.is_none());
        assert!(untouched.validate().is_ok());

        let cleared: UpdateCourseDto = serde_json::from_str(r#"{"thumbnail":null}"#).unwrap();
        assert_eq!(cleared.thumbnail, Some(None));
    }

    #[test]
    fn test_filter_params_aliases() {
        let id = Uuid::new_v4();
        let json = format!(
            r#"{{"createdBy":"{}","include_password":"true","limit":"3"}}"#,
            id
        );
        let params: CourseFilterParams = serde_json::from_str(&json).unwrap();
        assert_eq!(params.created_by, Some(id));
        assert!(params.include_password);
        assert_eq!(params.pagination().limit_or(DEFAULT_COURSE_PAGE_SIZE), 3);

        let params: CourseFilterParams = serde_json::from_str("{}").unwrap();
        assert_eq!(params.pagination().limit_or(DEFAULT_COURSE_PAGE_SIZE), 8);
    }
}
