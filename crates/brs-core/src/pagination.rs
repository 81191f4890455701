//! Pagination for list endpoints.
//!
//! Both offset-based (`limit` + `offset`) and page-based (`limit` + `page`)
//! pagination are accepted. When `page` is present it wins over `offset`.
//!
//! ```ignore
//! // GET /api/profiles?limit=20&page=3
//! let limit = params.limit();   // 20
//! let offset = params.offset(); // 40
//! let meta = PaginationMeta::new(&params, total);
//! ```

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::serde::deserialize_optional_i64;

pub const DEFAULT_LIMIT: i64 = 20;
pub const MAX_LIMIT: i64 = 100;

/// Metadata about a paginated response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PaginationMeta {
    /// Total number of items across all pages
    pub total: i64,
    /// Maximum items per page (the limit that was applied)
    pub limit: i64,
    /// Number of items skipped
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
    /// Current page number (only present if page-based pagination was used)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,
    /// Whether there are more items after this page
    pub has_more: bool,
}

impl PaginationMeta {
    pub fn new(params: &PaginationParams, total: i64) -> Self {
        let limit = params.limit();
        let offset = params.offset();
        Self {
            total,
            limit,
            offset: Some(offset),
            page: params.page(),
            has_more: offset + limit < total,
        }
    }
}

/// Query parameters for pagination.
///
/// `limit` is clamped to `[1, 100]`, `offset` to `>= 0` and `page` to `>= 1`.
#[derive(Debug, Clone, Default, Hash, Deserialize, ToSchema)]
pub struct PaginationParams {
    /// Maximum number of items to return (1-100, default: 20)
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub limit: Option<i64>,
    /// Number of items to skip (default: 0, ignored if `page` is set)
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub offset: Option<i64>,
    /// Page number (1-indexed)
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub page: Option<i64>,
}

impl PaginationParams {
    #[must_use]
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
    }

    #[must_use]
    pub fn offset(&self) -> i64 {
        if let Some(page) = self.page {
            (page.max(1) - 1) * self.limit()
        } else {
            self.offset.unwrap_or(0).max(0)
        }
    }

    #[must_use]
    pub fn page(&self) -> Option<i64> {
        self.page.map(|p| p.max(1))
    }
}
