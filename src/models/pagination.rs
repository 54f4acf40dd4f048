//! Limit/offset pagination helpers

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const DEFAULT_LIMIT: i64 = 20;
pub const MAX_LIMIT: i64 = 100;

/// Common limit/offset query parameters
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PageQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl PageQuery {
    /// Effective limit, defaulted and capped
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
    }

    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }
}

/// Paginated response wrapper
#[derive(Debug, Serialize, ToSchema)]
pub struct Page<T>
where
    T: for<'a> ToSchema<'a>,
{
    pub items: Vec<T>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
    pub has_next: bool,
    pub has_previous: bool,
}

impl<T> Page<T>
where
    T: for<'a> ToSchema<'a>,
{
    pub fn new(items: Vec<T>, total: i64, limit: i64, offset: i64) -> Self {
        Self {
            items,
            total,
            limit,
            offset,
            has_next: offset + limit < total,
            has_previous: offset > 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_is_defaulted_and_capped() {
        let q = PageQuery { limit: None, offset: None };
        assert_eq!(q.limit(), DEFAULT_LIMIT);
        assert_eq!(q.offset(), 0);

        let q = PageQuery { limit: Some(500), offset: Some(-3) };
        assert_eq!(q.limit(), MAX_LIMIT);
        assert_eq!(q.offset(), 0);
    }

    #[test]
    fn page_flags_follow_offset_and_total() {
        let page: Page<crate::models::BookSummary> = Page::new(vec![], 45, 20, 0);
        assert!(page.has_next);
        assert!(!page.has_previous);

        let page: Page<crate::models::BookSummary> = Page::new(vec![], 45, 20, 40);
        assert!(!page.has_next);
        assert!(page.has_previous);
    }
}
