//! Pagination utilities for list endpoints.
//!
//! List endpoints are page-based: the client sends `page` (1-indexed) and
//! `limit`, the server answers with `currentPage`, `totalPages` and a total
//! count next to the items.
//!
//! # Example
//!
//! ```ignore
//! use studyhub_core::pagination::{PaginationParams, total_pages};
//!
//! async fn list_resources(
//!     Query(params): Query<PaginationParams>,
//! ) -> Result<Json<ResourceListResponse>, AppError> {
//!     let limit = params.limit();
//!     let offset = params.offset_for(limit);
//!
//!     let resources = fetch_resources(limit, offset).await?;
//!     let total = count_resources().await?;
//!
//!     Ok(Json(ResourceListResponse {
//!         resources,
//!         current_page: params.page(),
//!         total_pages: total_pages(total, limit),
//!         total,
//!     }))
//! }
//! ```

use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use crate::serde::deserialize_optional_i64;

/// Page size used when the client does not send `limit`.
pub const DEFAULT_LIMIT: i64 = 10;

/// Upper bound applied to any requested `limit`.
pub const MAX_LIMIT: i64 = 100;

/// Query parameters for page-based pagination.
///
/// # Limits
///
/// - `limit` is clamped to the range [1, 100]
/// - `page` is clamped to a minimum of 1
///
/// # Example
///
/// ```ignore
/// // GET /api/resources?limit=20&page=3
/// let params = PaginationParams { page: Some(3), limit: Some(20) };
///
/// assert_eq!(params.limit(), 20);
/// assert_eq!(params.offset_for(params.limit()), 40);
/// ```
#[derive(Debug, Clone, Default, Hash, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaginationParams {
    /// Page number (1-indexed, default: 1)
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub page: Option<i64>,
    /// Items per page (1-100, default: 10)
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub limit: Option<i64>,
}

impl PaginationParams {
    pub fn new(page: Option<i64>, limit: Option<i64>) -> Self {
        Self { page, limit }
    }

    /// Returns the effective page, never below 1.
    #[must_use]
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    /// Returns the effective limit, clamped to [1, 100], defaulting to 10.
    #[must_use]
    pub fn limit(&self) -> i64 {
        self.limit_or(DEFAULT_LIMIT)
    }

    /// Returns the effective limit with an endpoint-specific default.
    #[must_use]
    pub fn limit_or(&self, default: i64) -> i64 {
        self.limit.unwrap_or(default).clamp(1, MAX_LIMIT)
    }

    /// Rows to skip for the current page at the given page size. Saturates,
    /// so a page past the end yields an empty page rather than an overflow.
    #[must_use]
    pub fn offset_for(&self, limit: i64) -> i64 {
        self.page().saturating_sub(1).saturating_mul(limit)
    }
}

/// Number of pages needed to show `total` items, `0` when there are none.
#[must_use]
pub fn total_pages(total: i64, limit: i64) -> i64 {
    if total <= 0 || limit <= 0 {
        return 0;
    }
    (total + limit - 1) / limit
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_params_default() {
        let params = PaginationParams::default();
        assert_eq!(params.page(), 1);
        assert_eq!(params.limit(), 10);
        assert_eq!(params.offset_for(params.limit()), 0);
    }

    #[test]
    fn test_pagination_params_custom_values() {
        let params = PaginationParams::new(Some(3), Some(20));
        assert_eq!(params.limit(), 20);
        assert_eq!(params.offset_for(20), 40);
    }

    #[test]
    fn test_offset_saturates_for_huge_pages() {
        let params = PaginationParams::new(Some(i64::MAX), Some(100));
        assert_eq!(params.page(), i64::MAX);
        assert_eq!(params.offset_for(params.limit()), i64::MAX);

        let params = PaginationParams::new(Some(i64::MIN), None);
        assert_eq!(params.offset_for(params.limit()), 0);
    }

    #[test]
    fn test_limit_or_uses_endpoint_default() {
        let params = PaginationParams::default();
        assert_eq!(params.limit_or(8), 8);

        let params = PaginationParams::new(None, Some(5));
        assert_eq!(params.limit_or(8), 5);
    }

    #[test]
    fn test_pagination_params_limit_boundary_cases() {
        let test_cases = vec![
            (Some(1), 1),
            (Some(50), 50),
            (Some(100), 100),
            (Some(101), 100),
            (Some(0), 1),
            (Some(-1), 1),
        ];

        for (input, expected) in test_cases {
            let params = PaginationParams::new(None, input);
            assert_eq!(params.limit(), expected);
        }
    }

    #[test]
    fn test_pagination_params_page_negative() {
        let params = PaginationParams::new(Some(-4), Some(10));
        assert_eq!(params.page(), 1);
        assert_eq!(params.offset_for(10), 0);
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0, 8), 0);
        assert_eq!(total_pages(1, 8), 1);
        assert_eq!(total_pages(8, 8), 1);
        assert_eq!(total_pages(9, 8), 2);
        assert_eq!(total_pages(100, 10), 10);
    }

    #[test]
    fn test_pagination_params_deserialize_with_values() {
        let json = r#"{"page":"2","limit":"25"}"#;
        let params: PaginationParams = serde_json::from_str(json).unwrap();
        assert_eq!(params.limit(), 25);
        assert_eq!(params.page(), 2);
    }

    #[test]
    fn test_pagination_params_deserialize_empty_strings() {
        let json = r#"{"page":"","limit":""}"#;
        let params: PaginationParams = serde_json::from_str(json).unwrap();
        assert_eq!(params.limit(), 10);
        assert_eq!(params.page(), 1);
    }

    #[test]
    fn test_pagination_params_deserialize_missing_fields() {
        let params: PaginationParams = serde_json::from_str("{}").unwrap();
        assert_eq!(params.page, None);
        assert_eq!(params.limit, None);
    }
}
