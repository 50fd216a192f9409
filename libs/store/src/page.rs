//! Pagination primitives.

use crate::error::{StoreError, StoreResult};
use serde::Serialize;
use utoipa::ToSchema;

/// A validated 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    number: u32,
    size: u32,
}

impl Page {
    pub const DEFAULT_SIZE: u32 = 10;

    /// Build a page request. Both the page number and the page size are
    /// 1-based; zero is rejected.
    pub fn new(number: u32, size: u32) -> StoreResult<Self> {
        if number < 1 {
            return Err(StoreError::InvalidPaging(format!(
                "page must be >= 1, got {number}"
            )));
        }
        if size < 1 {
            return Err(StoreError::InvalidPaging(format!(
                "page size must be >= 1, got {size}"
            )));
        }
        Ok(Self { number, size })
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    /// Number of items skipped before this page starts.
    pub fn offset(&self) -> usize {
        (self.number as usize - 1) * self.size as usize
    }
}

impl Default for Page {
    fn default() -> Self {
        Self {
            number: 1,
            size: Self::DEFAULT_SIZE,
        }
    }
}

/// One page of results plus paging metadata.
///
/// `total_count` always reflects the full filtered result set, not just
/// the returned slice, so a page past the end still reports the real total.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PagedList<T> {
    pub items: Vec<T>,
    pub total_count: usize,
    pub page_number: u32,
    pub page_size: u32,
    pub total_pages: u32,
    pub has_previous_page: bool,
    pub has_next_page: bool,
}

impl<T> PagedList<T> {
    pub fn new(items: Vec<T>, total_count: usize, page: Page) -> Self {
        let total_pages = total_count.div_ceil(page.size() as usize) as u32;
        Self {
            items,
            total_count,
            page_number: page.number(),
            page_size: page.size(),
            total_pages,
            has_previous_page: page.number() > 1,
            has_next_page: page.number() < total_pages,
        }
    }

    pub fn empty(page: Page) -> Self {
        Self::new(Vec::new(), 0, page)
    }

    /// Convert the items while keeping the paging metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PagedList<U> {
        PagedList {
            items: self.items.into_iter().map(f).collect(),
            total_count: self.total_count,
            page_number: self.page_number,
            page_size: self.page_size,
            total_pages: self.total_pages,
            has_previous_page: self.has_previous_page,
            has_next_page: self.has_next_page,
        }
    }
}

/// Slice an already filtered and sorted collection into one page.
pub fn paginate<T>(items: Vec<T>, page: Page) -> PagedList<T> {
    let total_count = items.len();
    let items: Vec<T> = items
        .into_iter()
        .skip(page.offset())
        .take(page.size() as usize)
        .collect();
    PagedList::new(items, total_count, page)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_rejects_zero_number() {
        let err = Page::new(0, 10).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::InvalidPaging);
    }

    #[test]
    fn test_page_rejects_zero_size() {
        let err = Page::new(1, 0).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::InvalidPaging);
    }

    #[test]
    fn test_page_offset() {
        assert_eq!(Page::new(1, 10).unwrap().offset(), 0);
        assert_eq!(Page::new(3, 10).unwrap().offset(), 20);
    }

    #[test]
    fn test_total_pages_rounds_up() {
        let list = PagedList::new(vec![1, 2, 3], 25, Page::new(1, 10).unwrap());
        assert_eq!(list.total_pages, 3);
        assert!(!list.has_previous_page);
        assert!(list.has_next_page);
    }

    #[test]
    fn test_last_page_flags() {
        let list = PagedList::new(vec![1], 21, Page::new(3, 10).unwrap());
        assert_eq!(list.total_pages, 3);
        assert!(list.has_previous_page);
        assert!(!list.has_next_page);
    }

    #[test]
    fn test_paginate_slices_correct_window() {
        let items: Vec<i32> = (1..=25).collect();
        let page = paginate(items, Page::new(3, 10).unwrap());
        assert_eq!(page.items, vec![21, 22, 23, 24, 25]);
        assert_eq!(page.total_count, 25);
    }

    #[test]
    fn test_paginate_past_end_keeps_total() {
        let items: Vec<i32> = (1..=5).collect();
        let page = paginate(items, Page::new(4, 10).unwrap());
        assert!(page.items.is_empty());
        assert_eq!(page.total_count, 5);
        assert_eq!(page.total_pages, 1);
    }

    #[test]
    fn test_map_preserves_metadata() {
        let list = paginate((1..=25).collect::<Vec<i32>>(), Page::new(2, 10).unwrap());
        let mapped = list.map(|n| n.to_string());
        assert_eq!(mapped.total_count, 25);
        assert_eq!(mapped.page_number, 2);
        assert_eq!(mapped.items[0], "11");
    }

    #[test]
    fn test_empty_list() {
        let list = PagedList::<i32>::empty(Page::default());
        assert_eq!(list.total_count, 0);
        assert_eq!(list.total_pages, 0);
        assert!(!list.has_next_page);
    }
}
