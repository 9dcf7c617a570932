use api_types::shipment::PageQuery;

/// Pagination counters of the displayed list. The page index is
/// zero-based and owned by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageState {
    pub current_page: u32,
    pub page_size: u32,
    pub total_pages: u32,
    pub total_elements: u64,
}

impl PageState {
    pub fn new(page_size: u32) -> Self {
        Self {
            current_page: 0,
            page_size: page_size.max(1),
            total_pages: 0,
            total_elements: 0,
        }
    }

    pub fn query(&self, page: u32) -> PageQuery {
        PageQuery::newest_first(page, self.page_size)
    }

    pub fn contains(&self, page: i64) -> bool {
        page >= 0 && page < i64::from(self.total_pages)
    }

    pub fn has_prev(&self) -> bool {
        self.current_page > 0
    }

    pub fn has_next(&self) -> bool {
        self.current_page + 1 < self.total_pages
    }

    /// One-based `(first, last)` positions of the current page within the
    /// whole result, `None` when there is nothing to show.
    pub fn showing_range(&self) -> Option<(u64, u64)> {
        if self.total_elements == 0 {
            return None;
        }
        let size = u64::from(self.page_size);
        let first = u64::from(self.current_page) * size + 1;
        let last = (u64::from(self.current_page) + 1) * size;
        (first <= self.total_elements).then(|| (first, last.min(self.total_elements)))
    }
}
