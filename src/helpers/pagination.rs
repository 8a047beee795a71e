//! Page slicing for listings
//!
//! Page numbers are 1-based. A page outside `1..=total_pages` is not an
//! error and is not clamped: it yields an empty range, so callers can show
//! an empty state or a 404 as they see fit.

use serde::Serialize;
use std::ops::Range;

/// Position of one page inside a collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub start: usize,
    pub end: usize,
    pub page_number: usize,
    pub total_pages: usize,
}

impl PageWindow {
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Whether `page_number` names an existing page
    pub fn in_range(&self) -> bool {
        (1..=self.total_pages).contains(&self.page_number)
    }
}

/// Compute the half-open item range of `page` for `count` items split into
/// pages of `page_size`.
///
/// `total_pages` is `ceil(count / page_size)`; a zero `page_size` gives
/// zero pages.
pub fn paginate(count: usize, page: usize, page_size: usize) -> PageWindow {
    let total_pages = if page_size == 0 {
        0
    } else {
        count.div_ceil(page_size)
    };

    if page == 0 || page > total_pages {
        return PageWindow {
            start: 0,
            end: 0,
            page_number: page,
            total_pages,
        };
    }

    let start = (page - 1) * page_size;
    let end = start.saturating_add(page_size).min(count);

    PageWindow {
        start,
        end,
        page_number: page,
        total_pages,
    }
}

/// One materialized page of a listing
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub page_number: usize,
    pub total_pages: usize,
}

impl<T: Clone> Paginated<T> {
    /// Slice `items` to the requested page
    pub fn from_slice(items: &[T], page: usize, page_size: usize) -> Self {
        let window = paginate(items.len(), page, page_size);
        Self {
            items: items[window.range()].to_vec(),
            page_number: window.page_number,
            total_pages: window.total_pages,
        }
    }
}

impl<T> Paginated<T> {
    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Paginated<U> {
        Paginated {
            items: self.items.into_iter().map(f).collect(),
            page_number: self.page_number,
            total_pages: self.total_pages,
        }
    }

    pub fn has_prev(&self) -> bool {
        self.page_number > 1 && self.page_number <= self.total_pages
    }

    pub fn has_next(&self) -> bool {
        self.page_number >= 1 && self.page_number < self.total_pages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_middle_page() {
        let window = paginate(13, 2, 6);
        assert_eq!(window.range(), 6..12);
        assert_eq!(window.total_pages, 3);
        assert!(window.in_range());
    }

    #[test]
    fn test_last_partial_page() {
        let window = paginate(13, 3, 6);
        assert_eq!(window.range(), 12..13);
    }

    #[test]
    fn test_empty_collection() {
        let window = paginate(0, 1, 6);
        assert!(window.is_empty());
        assert_eq!(window.total_pages, 0);
        assert!(!window.in_range());
    }

    #[test]
    fn test_out_of_range_pages_are_empty() {
        let zero = paginate(13, 0, 6);
        assert!(zero.is_empty());
        assert_eq!(zero.page_number, 0);
        assert_eq!(zero.total_pages, 3);

        let past = paginate(13, 4, 6);
        assert!(past.is_empty());
        assert_eq!(past.page_number, 4);
        assert!(!past.in_range());

        let huge = paginate(13, usize::MAX, 6);
        assert!(huge.is_empty());
    }

    #[test]
    fn test_huge_page_size_does_not_overflow() {
        let page_size = usize::MAX / 2 + 1;
        let window = paginate(usize::MAX, 2, page_size);
        assert_eq!(window.total_pages, 2);
        assert_eq!(window.range(), page_size..usize::MAX);
    }

    #[test]
    fn test_zero_page_size() {
        let window = paginate(5, 1, 0);
        assert!(window.is_empty());
        assert_eq!(window.total_pages, 0);
    }

    #[test]
    fn test_exact_multiple() {
        assert_eq!(paginate(12, 2, 6).range(), 6..12);
        assert_eq!(paginate(12, 2, 6).total_pages, 2);
    }

    #[test]
    fn test_paginated_from_slice() {
        let items: Vec<u32> = (1..=13).collect();
        let page = Paginated::from_slice(&items, 3, 3);
        assert_eq!(page.items, vec![7, 8, 9]);
        assert_eq!(page.total_pages, 5);
        assert!(page.has_prev());
        assert!(page.has_next());

        let last = Paginated::from_slice(&items, 5, 3);
        assert_eq!(last.items, vec![13]);
        assert!(!last.has_next());

        let past = Paginated::from_slice(&items, 6, 3);
        assert!(past.items.is_empty());
        assert!(!past.has_prev());
        assert!(!past.has_next());
    }

    #[test]
    fn test_serialized_shape() {
        let page = Paginated::from_slice(&["a", "b"], 1, 1).map(str::to_uppercase);
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["items"], serde_json::json!(["A"]));
        assert_eq!(json["pageNumber"], 1);
        assert_eq!(json["totalPages"], 2);
    }
}
