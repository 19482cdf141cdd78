use serde::Serialize;

use crate::shared::validations::validate_pagination;

/// A 1-based page window over a search result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub limit: u64,
}

impl PageRequest {
    /// Builds a page request, defaulting and clamping out-of-range values.
    pub fn new(page: Option<u64>, limit: Option<u64>) -> Self {
        let (page, limit) = validate_pagination(page, limit);
        Self { page, limit }
    }

    /// Rows to skip. Saturates, and never exceeds what SQL `OFFSET` can bind.
    pub fn offset(&self) -> u64 {
        self.page
            .saturating_sub(1)
            .saturating_mul(self.limit)
            .min(i64::MAX as u64)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// Paginated response wrapper
#[derive(Debug, Clone, Serialize)]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub limit: u64,
    pub total_pages: u64,
}

impl<T> PaginatedResult<T> {
    pub fn new(items: Vec<T>, total: u64, request: PageRequest) -> Self {
        let total_pages = total.div_ceil(request.limit);
        Self {
            items,
            total,
            page: request.page,
            limit: request.limit,
            total_pages,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PaginatedResult<U> {
        PaginatedResult {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            limit: self.limit,
            total_pages: self.total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_first_page_of_twenty() {
        let req = PageRequest::default();
        assert_eq!(req, PageRequest { page: 1, limit: 20 });
        assert_eq!(req.offset(), 0);
    }

    #[test]
    fn clamps_limit_and_page() {
        let req = PageRequest::new(Some(0), Some(1_000));
        assert_eq!(req, PageRequest { page: 1, limit: 100 });

        let req = PageRequest::new(Some(3), Some(10));
        assert_eq!(req.offset(), 20);

        let req = PageRequest::new(Some(u64::MAX), Some(20));
        assert_eq!(req.page, u64::MAX);
        assert_eq!(req.offset(), i64::MAX as u64);
    }

    #[test]
    fn total_pages_rounds_up() {
        let result = PaginatedResult::new(vec![1, 2], 21, PageRequest::new(Some(3), Some(10)));
        assert_eq!(result.total_pages, 3);

        let empty: PaginatedResult<u8> = PaginatedResult::new(vec![], 0, PageRequest::default());
        assert_eq!(empty.total_pages, 0);
    }
}
