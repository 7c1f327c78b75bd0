use std::collections::BTreeSet;
use std::ops::Range;

/// One entry in the page-number bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageButton {
    Page(usize),
    /// Stands for one or more skipped page numbers.
    Ellipsis,
}

/// Outcome of [`Paginator::go_to_page`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageChange {
    Unchanged,
    /// The page moved; the view should return to the top.
    ScrollToTop,
}

/// Windowing for a list of known size shown `page_size` items at a time.
///
/// Pure computation, no I/O. The current page is 1-based and deliberately
/// not clamped: a page past the end yields empty bounds, and callers decide
/// whether to clamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    total_items: Option<usize>,
    total_pages: usize,
    page_size: usize,
    current_page: usize,
}

impl Paginator {
    /// Paginator over `total_items` items, positioned on page 1.
    pub fn new(total_items: usize, page_size: usize) -> Self {
        let page_size = page_size.max(1);
        Self {
            total_items: Some(total_items),
            total_pages: total_items.div_ceil(page_size).max(1),
            page_size,
            current_page: 1,
        }
    }

    /// Paginator for a server-paged listing where only the page count is
    /// known.
    pub fn with_page_count(total_pages: usize, page_size: usize) -> Self {
        Self {
            total_items: None,
            total_pages: total_pages.max(1),
            page_size: page_size.max(1),
            current_page: 1,
        }
    }

    /// Positions the paginator on `page` (values below 1 become 1).
    pub fn at_page(mut self, page: usize) -> Self {
        self.current_page = page.max(1);
        self
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn total_items(&self) -> Option<usize> {
        self.total_items
    }

    /// `max(1, ceil(total_items / page_size))`
    pub fn total_pages(&self) -> usize {
        self.total_pages
    }

    /// Half-open index range of the current page.
    ///
    /// Empty when the current page is past the last page.
    pub fn slice_bounds(&self) -> Range<usize> {
        let total = self
            .total_items
            .unwrap_or(self.total_pages.saturating_mul(self.page_size));
        if self.current_page > self.total_pages {
            return total..total;
        }
        let start = (self.current_page - 1)
            .saturating_mul(self.page_size)
            .min(total);
        let end = self.current_page.saturating_mul(self.page_size).min(total);
        start..end
    }

    /// The current page's items, clamped to `items.len()`.
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let bounds = self.slice_bounds();
        let start = bounds.start.min(items.len());
        let end = bounds.end.min(items.len());
        &items[start..end]
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    /// Page-number bar: the current page and its neighbours, the first and
    /// last pages, and an ellipsis for every gap.
    ///
    /// On pages 1–2 the first three pages are shown together, and likewise
    /// the last three pages near the end.
    ///
    /// ```
    /// use newsdesk::news::{PageButton::*, Paginator};
    ///
    /// let p = Paginator::new(100, 10).at_page(5);
    /// assert_eq!(
    ///     p.page_buttons(),
    ///     vec![Page(1), Ellipsis, Page(4), Page(5), Page(6), Ellipsis, Page(10)]
    /// );
    /// ```
    pub fn page_buttons(&self) -> Vec<PageButton> {
        let total = self.total_pages;
        let current = self.current_page;

        let mut pages = BTreeSet::new();
        pages.insert(1);
        pages.insert(total);
        if current <= 2 {
            pages.extend(1..=3.min(total));
        }
        if current.saturating_add(1) >= total {
            pages.extend(total.saturating_sub(2).max(1)..=total);
        }
        pages.extend(
            [current.saturating_sub(1), current, current.saturating_add(1)]
                .into_iter()
                .filter(|p| (1..=total).contains(p)),
        );

        let mut buttons = Vec::with_capacity(pages.len() + 2);
        let mut previous = 0;
        for page in pages {
            if page > previous + 1 {
                buttons.push(PageButton::Ellipsis);
            }
            buttons.push(PageButton::Page(page));
            previous = page;
        }
        buttons
    }

    /// Moves to page `n`.
    ///
    /// Out-of-range targets and the current page are no-ops.
    pub fn go_to_page(&mut self, n: usize) -> PageChange {
        if n < 1 || n > self.total_pages || n == self.current_page {
            return PageChange::Unchanged;
        }
        tracing::debug!(from = self.current_page, to = n, "Page change");
        self.current_page = n;
        PageChange::ScrollToTop
    }

    /// "Showing a-b of n articles", or `None` when the page is empty or the
    /// item count is unknown.
    pub fn range_summary(&self) -> Option<String> {
        let total = self.total_items?;
        let bounds = self.slice_bounds();
        if bounds.is_empty() {
            return None;
        }
        Some(format!(
            "Showing {}-{} of {} articles",
            bounds.start + 1,
            bounds.end,
            total
        ))
    }
}
