//! Page state for lead listings.
//!
//! `Pagination` only stores the current page and page size. Anything that
//! depends on how many leads matched takes the count as an argument so the
//! state can never disagree with the listing it pages over.

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::LeadError;

/// Page sizes a listing may use.
pub const PAGE_SIZES: [usize; 5] = [5, 10, 20, 50, 100];

/// Page size used when nothing else is configured.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Maximum number of page buttons shown at once.
pub const PAGE_WINDOW: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct PageSize(usize);

impl PageSize {
    pub fn new(size: usize) -> Result<Self, LeadError> {
        if PAGE_SIZES.contains(&size) {
            Ok(Self(size))
        } else {
            Err(LeadError::InvalidPageSize(size.to_string()))
        }
    }

    pub fn get(self) -> usize {
        self.0
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self(DEFAULT_PAGE_SIZE)
    }
}

impl TryFrom<usize> for PageSize {
    type Error = LeadError;

    fn try_from(size: usize) -> Result<Self, Self::Error> {
        PageSize::new(size)
    }
}

impl From<PageSize> for usize {
    fn from(size: PageSize) -> Self {
        size.0
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PageSize {
    type Err = LeadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let size: usize = s
            .trim()
            .parse()
            .map_err(|_| LeadError::InvalidPageSize(s.to_string()))?;
        PageSize::new(size)
    }
}

/// Number of pages needed for `total_items`; never less than one.
pub fn total_pages(total_items: usize, page_size: PageSize) -> usize {
    total_items.div_ceil(page_size.get()).max(1)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    current_page: usize,
    page_size: PageSize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(PageSize::default())
    }
}

impl Pagination {
    pub fn new(page_size: PageSize) -> Self {
        Self {
            current_page: 1,
            page_size,
        }
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn page_size(&self) -> PageSize {
        self.page_size
    }

    pub fn total_pages(&self, total_items: usize) -> usize {
        total_pages(total_items, self.page_size)
    }

    /// Jump to `page`, clamped into `[1, total_pages]`.
    ///
    /// Accepts any integer so callers can pass raw user input (0, negative
    /// or past the end) without checking it first.
    pub fn set_page(&mut self, page: i64, total_items: usize) -> usize {
        let last = self.total_pages(total_items) as i64;
        self.current_page = page.clamp(1, last) as usize;
        self.current_page
    }

    /// Change the page size and go back to the first page.
    pub fn set_page_size(&mut self, page_size: PageSize) {
        self.page_size = page_size;
        self.reset();
    }

    pub fn reset(&mut self) {
        self.current_page = 1;
    }

    pub fn first(&mut self, total_items: usize) -> usize {
        self.set_page(1, total_items)
    }

    pub fn previous(&mut self, total_items: usize) -> usize {
        self.set_page(self.current_page as i64 - 1, total_items)
    }

    pub fn next(&mut self, total_items: usize) -> usize {
        self.set_page(self.current_page as i64 + 1, total_items)
    }

    pub fn last(&mut self, total_items: usize) -> usize {
        self.set_page(self.total_pages(total_items) as i64, total_items)
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self, total_items: usize) -> bool {
        self.current_page < self.total_pages(total_items)
    }

    /// Up to five page numbers around the current page.
    ///
    /// Near the start the window is `1..=5`, near the end it is the last
    /// five pages, otherwise it is centred on the current page.
    pub fn window(&self, total_items: usize) -> RangeInclusive<usize> {
        let total = self.total_pages(total_items);
        let current = self.current_page;
        let half = PAGE_WINDOW / 2;

        if total <= PAGE_WINDOW || current <= half + 1 {
            1..=total.min(PAGE_WINDOW)
        } else if current + half >= total {
            (total + 1 - PAGE_WINDOW)..=total
        } else {
            (current - half)..=(current + half)
        }
    }

    /// Index range of the visible rows within the full listing.
    ///
    /// Pages past the end produce an empty range rather than an error.
    pub fn row_range(&self, total_items: usize) -> std::ops::Range<usize> {
        let size = self.page_size.get();
        let start = (self.current_page - 1).saturating_mul(size).min(total_items);
        let end = start.saturating_add(size).min(total_items);
        start..end
    }

    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        &items[self.row_range(items.len())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn size(n: usize) -> PageSize {
        PageSize::new(n).unwrap()
    }

    #[test]
    fn test_total_pages_minimum_one() {
        assert_eq!(total_pages(0, size(10)), 1);
        assert_eq!(total_pages(10, size(10)), 1);
        assert_eq!(total_pages(11, size(10)), 2);
        assert_eq!(total_pages(12, size(5)), 3);
    }

    #[test]
    fn test_set_page_clamps() {
        let mut p = Pagination::new(size(5));
        assert_eq!(p.set_page(5, 12), 3);
        assert_eq!(p.set_page(0, 12), 1);
        assert_eq!(p.set_page(-4, 12), 1);
        assert_eq!(p.set_page(2, 12), 2);
        assert_eq!(p.set_page(i64::MAX, 12), 3);
        assert_eq!(p.set_page(7, 0), 1);
    }

    #[test]
    fn test_set_page_size_resets_page() {
        let mut p = Pagination::new(size(5));
        p.set_page(3, 100);
        p.set_page_size(size(5));
        assert_eq!(p.current_page(), 1);
    }

    #[test]
    fn test_navigation_helpers_stay_in_range() {
        let mut p = Pagination::new(size(10));
        assert_eq!(p.previous(25), 1);
        assert!(!p.has_previous());
        assert_eq!(p.next(25), 2);
        assert_eq!(p.last(25), 3);
        assert_eq!(p.next(25), 3);
        assert!(!p.has_next(25));
        assert_eq!(p.first(25), 1);
    }

    #[test]
    fn test_window_slides_at_boundaries() {
        let mut p = Pagination::new(size(5));
        let total_items = 50; // 10 pages

        p.set_page(1, total_items);
        assert_eq!(p.window(total_items), 1..=5);
        p.set_page(3, total_items);
        assert_eq!(p.window(total_items), 1..=5);
        p.set_page(4, total_items);
        assert_eq!(p.window(total_items), 2..=6);
        p.set_page(8, total_items);
        assert_eq!(p.window(total_items), 6..=10);
        p.set_page(10, total_items);
        assert_eq!(p.window(total_items), 6..=10);
    }

    #[test]
    fn test_window_with_few_pages() {
        let mut p = Pagination::new(size(5));
        p.set_page(2, 12);
        assert_eq!(p.window(12), 1..=3);
        assert_eq!(p.window(0), 1..=1);
    }

    #[test]
    fn test_slice_bounds() {
        let items: Vec<usize> = (0..12).collect();
        let mut p = Pagination::new(size(5));
        assert_eq!(p.slice(&items), &[0, 1, 2, 3, 4]);
        p.set_page(3, items.len());
        assert_eq!(p.slice(&items), &[10, 11]);

        // The listing shrank underneath the page: empty, not a panic.
        assert!(p.slice(&items[..4]).is_empty());
    }

    #[test]
    fn test_page_size_validation() {
        assert!(PageSize::new(7).is_err());
        assert_eq!("20".parse::<PageSize>().unwrap().get(), 20);
        assert!("ten".parse::<PageSize>().is_err());
        let parsed: PageSize = serde_yaml_ng::from_str("50").unwrap();
        assert_eq!(parsed.get(), 50);
        assert!(serde_yaml_ng::from_str::<PageSize>("3").is_err());
    }
}
