use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

pub const DEFAULT_PAGE_SIZE: u64 = 10;
pub const MAX_PAGE_SIZE: u64 = 100;

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct Pagination {
    #[param(default = 1, minimum = 1)]
    pub page: Option<u64>,
    #[param(default = 10, minimum = 1, maximum = 100)]
    pub limit: Option<u64>,
}

impl Pagination {
    pub fn page(&self) -> u64 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn limit(&self) -> u64 {
        self.limit
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE)
    }

    /// Capped at `i64::MAX`, the largest offset Postgres accepts. A page past
    /// the end yields an empty result rather than an overflow.
    pub fn offset(&self) -> u64 {
        (self.page() - 1)
            .saturating_mul(self.limit())
            .min(i64::MAX as u64)
    }
}

#[derive(Serialize, ToSchema)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub total_items: u64,
    pub total_pages: u64,
    pub current_page: u64,
    pub page_size: u64,
}

impl<T> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, total_items: u64, page: u64, page_size: u64) -> Self {
        let total_pages = if page_size == 0 {
            0
        } else {
            total_items.div_ceil(page_size)
        };

        Self {
            data,
            total_items,
            total_pages,
            current_page: page,
            page_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_first_page_of_ten() {
        let p = Pagination::default();
        assert_eq!((p.page(), p.limit(), p.offset()), (1, 10, 0));
    }

    #[test]
    fn clamps_out_of_range_values() {
        let p = Pagination {
            page: Some(0),
            limit: Some(500),
        };
        assert_eq!((p.page(), p.limit(), p.offset()), (1, 100, 0));

        let p = Pagination {
            page: Some(3),
            limit: Some(0),
        };
        assert_eq!((p.limit(), p.offset()), (1, 2));
    }

    #[test]
    fn huge_page_saturates_offset() {
        let p = Pagination {
            page: Some(u64::MAX),
            limit: Some(50),
        };
        assert_eq!(p.offset(), i64::MAX as u64);

        let p = Pagination {
            page: Some(u64::MAX),
            limit: None,
        };
        assert_eq!(p.offset(), i64::MAX as u64);
    }

    #[test]
    fn total_pages_rounds_up() {
        let r = PaginatedResponse::new(vec![1, 2], 21, 1, 10);
        assert_eq!(r.total_pages, 3);
        let r: PaginatedResponse<u8> = PaginatedResponse::new(vec![], 0, 1, 10);
        assert_eq!(r.total_pages, 0);
    }
}
