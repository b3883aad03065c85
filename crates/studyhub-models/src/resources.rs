//! Shared study resources.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use studyhub_core::PaginationParams;
use studyhub_core::serde::{
    deserialize_double_option, deserialize_optional_i64, deserialize_optional_string,
};

use crate::ids::{ResourceId, UserId};
use crate::validation::not_blank;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "resource_subject", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Subject {
    Computer,
    Math,
    Physics,
    Chemistry,
    English,
    Accounting,
    Statistic,
    Others,
}

impl Subject {
    pub const ALL: [Subject; 8] = [
        Subject::Computer,
        Subject::Math,
        Subject::Physics,
        Subject::Chemistry,
        Subject::English,
        Subject::Accounting,
        Subject::Statistic,
        Subject::Others,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Subject::Computer => "computer",
            Subject::Math => "math",
            Subject::Physics => "physics",
            Subject::Chemistry => "chemistry",
            Subject::English => "english",
            Subject::Accounting => "accounting",
            Subject::Statistic => "statistic",
            Subject::Others => "others",
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Subject {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Subject::ALL
            .into_iter()
            .find(|subject| subject.as_str() == wanted)
            .ok_or_else(|| format!("Unknown subject '{}'", s))
    }
}

/// Moderation state. Any state may be set by an admin; there are no guarded transitions.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "resource_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ResourceStatus {
    Pending,
    #[default]
    Approved,
    Rejected,
}

impl FromStr for ResourceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(ResourceStatus::Pending),
            "approved" => Ok(ResourceStatus::Approved),
            "rejected" => Ok(ResourceStatus::Rejected),
            _ => Err(format!("Unknown status '{}'", s)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub id: ResourceId,
    pub title: String,
    pub link: String,
    pub description: Option<String>,
    pub subject: Subject,
    pub author_id: UserId,
    pub author_name: String,
    pub status: ResourceStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A resource in any status together with its author's email, as the
/// moderation console shows it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminResourceView {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub resource: Resource,
    pub author_email: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateResourceDto {
    #[serde(default)]
    #[validate(
        custom(function = "not_blank", message = "Resource title is required"),
        length(max = 200, message = "Title must be at most 200 characters")
    )]
    pub title: String,
    #[serde(default)]
    #[validate(url(message = "Resource link must be a valid URL"))]
    pub link: String,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub description: Option<String>,
    pub subject: Subject,
}

/// Partial resource update. `status` is honoured for admins only.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateResourceDto {
    #[validate(
        custom(function = "not_blank", message = "Resource title cannot be blank"),
        length(max = 200, message = "Title must be at most 200 characters")
    )]
    pub title: Option<String>,
    #[validate(url(message = "Resource link must be a valid URL"))]
    pub link: Option<String>,
    /// `null` clears the description.
    #[serde(default, deserialize_with = "deserialize_double_option")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
    pub subject: Option<Subject>,
    pub status: Option<ResourceStatus>,
}

/// Query parameters of the resource lists.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ResourceFilterParams {
    /// Subject code, or `all`
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub subject: Option<String>,
    /// Moderation status, or `all` (admin list only)
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub status: Option<String>,
    /// Case-insensitive match on title, description or author name
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub search: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub page: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub limit: Option<i64>,
}

impl ResourceFilterParams {
    pub fn pagination(&self) -> PaginationParams {
        PaginationParams::new(self.page, self.limit)
    }

    /// `None` for no filter (absent or `all`).
    pub fn subject_filter(&self) -> Result<Option<Subject>, String> {
        parse_filter(self.subject.as_deref())
    }

    pub fn status_filter(&self) -> Result<Option<ResourceStatus>, String> {
        parse_filter(self.status.as_deref())
    }
}

fn parse_filter<T: FromStr<Err = String>>(raw: Option<&str>) -> Result<Option<T>, String> {
    match raw {
        None => Ok(None),
        Some(value) if value.eq_ignore_ascii_case("all") => Ok(None),
        Some(value) => value.parse().map(Some),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResourceListResponse {
    pub resources: Vec<Resource>,
    pub current_page: i64,
    pub total_pages: i64,
    pub total: i64,
}
