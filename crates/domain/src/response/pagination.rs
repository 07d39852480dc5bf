//! Paginated list responses.

use serde::{Deserialize, Serialize};

/// Pagination metadata, camelCase on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    /// One-based page index.
    pub current_page: u32,
    /// Number of pages.
    pub total_pages: u32,
    /// Number of items across all pages.
    pub total_items: u64,
    /// Page size.
    pub per_page: u32,
    /// `current_page < total_pages`.
    pub has_next_page: bool,
    /// `current_page > 1`.
    pub has_prev_page: bool,
}

impl PaginationMeta {
    /// Computes consistent metadata for a page of a list.
    #[must_use]
    pub fn for_page(current_page: u32, per_page: u32, total_items: u64) -> Self {
        let total_pages = if per_page == 0 {
            0
        } else {
            u32::try_from(total_items.div_ceil(u64::from(per_page))).unwrap_or(u32::MAX)
        };
        Self {
            current_page,
            total_pages,
            total_items,
            per_page,
            has_next_page: current_page < total_pages,
            has_prev_page: current_page > 1,
        }
    }

    /// Checks the navigation invariants.
    ///
    /// Holds when the flags agree with the page numbers and, for non-empty
    /// lists, `current_page` lies in `[1, total_pages]`.
    #[must_use]
    pub const fn is_consistent(&self) -> bool {
        let flags = self.has_next_page == (self.current_page < self.total_pages)
            && self.has_prev_page == (self.current_page > 1);
        let in_range = self.total_items == 0
            || (self.current_page >= 1 && self.current_page <= self.total_pages);
        flags && in_range
    }
}

/// One page of a list endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    /// Items on this page, in server order.
    pub items: Vec<T>,
    /// Pagination metadata.
    pub meta: PaginationMeta,
}
