//! Query parameters and pagination utilities

use serde::{Deserialize, Serialize};

/// Query parameters accepted by every list endpoint
///
/// # Example
/// ```rust,ignore
/// pub async fn list_donations(
///     Query(params): Query<QueryParams>,
/// ) -> Json<PaginatedResponse<Donation>> {
///     // params.page defaults to 1
///     // params.limit defaults to 20
/// }
///
/// // Usage:
/// GET /api/donations?page=2&limit=10
/// GET /api/donations?status=completed
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct QueryParams {
    /// Page number (starts at 1)
    pub page: usize,

    /// Number of items per page
    pub limit: usize,

    /// Exact match on the record's `status` field, where it has one
    pub status: Option<String>,
}

impl Default for QueryParams {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 20,
            status: None,
        }
    }
}

impl QueryParams {
    /// Get page number, ensuring minimum of 1
    pub fn page(&self) -> usize {
        self.page.max(1)
    }

    /// Get limit, clamped to 1..=100
    pub fn limit(&self) -> usize {
        self.limit.clamp(1, 100)
    }

    /// Status filter, ignoring empty values
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref().filter(|s| !s.is_empty())
    }

    /// Slice one page out of an already filtered and ordered list
    pub fn paginate<T>(&self, items: Vec<T>) -> PaginatedResponse<T> {
        let page = self.page();
        let limit = self.limit();
        let total = items.len();
        let data = items
            .into_iter()
            .skip((page - 1).saturating_mul(limit))
            .take(limit)
            .collect();

        PaginatedResponse {
            data,
            pagination: PaginationMeta::new(page, limit, total),
        }
    }
}

/// Paginated response structure
#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T> {
    /// The paginated data
    pub data: Vec<T>,

    /// Pagination metadata
    pub pagination: PaginationMeta,
}

/// Pagination metadata
#[derive(Debug, Serialize)]
pub struct PaginationMeta {
    /// Current page number (starts at 1)
    pub page: usize,

    /// Number of items per page
    pub limit: usize,

    /// Total number of items (after filters)
    pub total: usize,

    /// Total number of pages
    pub total_pages: usize,

    /// Whether there is a next page
    pub has_next: bool,

    /// Whether there is a previous page
    pub has_prev: bool,
}

impl PaginationMeta {
    /// Create pagination metadata from calculation
    pub fn new(page: usize, limit: usize, total: usize) -> Self {
        // Ensure limit is at least 1 to avoid division by zero
        let limit = limit.max(1);
        let page = page.max(1);
        let total_pages = if total == 0 { 0 } else { total.div_ceil(limit) };
        let start = (page - 1).saturating_mul(limit);

        Self {
            page,
            limit,
            total,
            total_pages,
            has_next: start.saturating_add(limit) < total,
            has_prev: page > 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_params_defaults() {
        let params = QueryParams::default();
        assert_eq!(params.page(), 1);
        assert_eq!(params.limit(), 20);
        assert!(params.status().is_none());
    }

    #[test]
    fn test_limit_is_clamped() {
        let params = QueryParams {
            page: 0,
            limit: 500,
            status: Some(String::new()),
        };
        assert_eq!(params.page(), 1);
        assert_eq!(params.limit(), 100);
        assert!(params.status().is_none());
    }

    #[test]
    fn test_pagination_meta() {
        let meta = PaginationMeta::new(1, 20, 145);
        assert_eq!(meta.total, 145);
        assert_eq!(meta.total_pages, 8);
        assert!(!meta.has_prev);
        assert!(meta.has_next);
    }

    #[test]
    fn test_paginate_second_page() {
        let params = QueryParams {
            page: 2,
            limit: 3,
            status: None,
        };
        let page = params.paginate((1..=7).collect::<Vec<i32>>());
        assert_eq!(page.data, vec![4, 5, 6]);
        assert_eq!(page.pagination.total, 7);
        assert_eq!(page.pagination.total_pages, 3);
        assert!(page.pagination.has_next);
        assert!(page.pagination.has_prev);
    }

    #[test]
    fn test_paginate_huge_page_is_empty() {
        let params = QueryParams {
            page: usize::MAX,
            limit: 100,
            status: None,
        };
        let page = params.paginate(vec![1, 2, 3]);
        assert!(page.data.is_empty());
        assert_eq!(page.pagination.page, usize::MAX);
        assert!(!page.pagination.has_next);
        assert!(page.pagination.has_prev);
    }

    #[test]
    fn test_paginate_past_the_end() {
        let params = QueryParams {
            page: 9,
            limit: 10,
            status: None,
        };
        let page = params.paginate(vec!["a", "b"]);
        assert!(page.data.is_empty());
        assert!(!page.pagination.has_next);
    }
}
