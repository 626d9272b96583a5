//! "Load more" pagination over a filtered view.
//!
//! Pages are 1-based and fixed size. The presentation layer shows pages
//! `1..=current_page` concatenated, so advancing never hides earlier results.

/// Default number of records per page.
pub const PAGE_SIZE: usize = 100;

/// One page of a sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page<'a, T> {
    pub items: &'a [T],
    /// True when records remain beyond this page.
    pub has_more: bool,
}

fn page_end(page_size: usize, current_page: usize) -> usize {
    current_page.max(1).saturating_mul(page_size)
}

/// Slice `[(current_page - 1) * page_size, current_page * page_size)` of
/// `items`, clipped to its bounds. A `current_page` of 0 is treated as 1 and
/// a `page_size` of 0 as 1, the same as [`PaginationCursor::new`].
pub fn page<T>(items: &[T], page_size: usize, current_page: usize) -> Page<'_, T> {
    let page_size = page_size.max(1);
    let end = page_end(page_size, current_page);
    let start = end.saturating_sub(page_size).min(items.len());

    Page {
        items: &items[start..end.min(items.len())],
        has_more: end < items.len(),
    }
}

/// Pages `1..=current_page` concatenated.
pub fn revealed<T>(items: &[T], page_size: usize, current_page: usize) -> Page<'_, T> {
    let page_size = page_size.max(1);
    let end = page_end(page_size, current_page);

    Page {
        items: &items[..end.min(items.len())],
        has_more: end < items.len(),
    }
}

/// Tracks the current page for one filtered view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationCursor {
    page_size: usize,
    current_page: usize,
}

impl Default for PaginationCursor {
    fn default() -> Self {
        Self::new(PAGE_SIZE)
    }
}

impl PaginationCursor {
    /// Cursor at page 1. A zero page size is bumped to 1.
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            current_page: 1,
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    /// Back to page 1. Called whenever the filtered view is recomputed.
    pub fn reset(&mut self) {
        self.current_page = 1;
    }

    /// Advance one page if `total` has records past the current page.
    /// Returns whether the cursor moved.
    pub fn load_more(&mut self, total: usize) -> bool {
        if page_end(self.page_size, self.current_page) < total {
            self.current_page += 1;
            true
        } else {
            false
        }
    }

    pub fn page<'a, T>(&self, items: &'a [T]) -> Page<'a, T> {
        page(items, self.page_size, self.current_page)
    }

    pub fn revealed<'a, T>(&self, items: &'a [T]) -> Page<'a, T> {
        revealed(items, self.page_size, self.current_page)
    }
}
