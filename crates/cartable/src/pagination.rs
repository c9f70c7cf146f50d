//! Page arithmetic for the car table.
//!
//! Pages are 1-indexed. Page `n` covers items `[(n - 1) * size, n * size)`.

/// Default number of rows per page.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Fixed-size pager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    page_size: usize,
}

impl Default for Pager {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Pager {
    /// Create a pager. A size of zero is treated as one.
    #[must_use]
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
        }
    }

    /// Rows per page.
    #[must_use]
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Number of pages needed for `len` items.
    #[must_use]
    pub fn page_count(&self, len: usize) -> usize {
        len.div_ceil(self.page_size)
    }

    /// Highest page number that can be selected for `len` items.
    ///
    /// This is at least 1, so an empty result still has a page to show.
    #[must_use]
    pub fn last_page(&self, len: usize) -> usize {
        self.page_count(len).max(1)
    }

    /// Check whether `page` can be selected for `len` items.
    #[must_use]
    pub fn contains(&self, page: usize, len: usize) -> bool {
        (1..=self.last_page(len)).contains(&page)
    }

    /// Clamp `page` into the selectable range for `len` items.
    #[must_use]
    pub fn clamp(&self, page: usize, len: usize) -> usize {
        page.clamp(1, self.last_page(len))
    }

    /// The slice of `items` shown on `page`.
    ///
    /// Pages past the end (and page 0) yield an empty slice.
    #[must_use]
    pub fn slice<'a, T>(&self, items: &'a [T], page: usize) -> &'a [T] {
        let Some(first) = page
            .checked_sub(1)
            .and_then(|p| p.checked_mul(self.page_size))
        else {
            return &[];
        };
        if first >= items.len() {
            return &[];
        }
        let last = (first + self.page_size).min(items.len());
        &items[first..last]
    }
}
