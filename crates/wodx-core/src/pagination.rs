// ABOUTME: Page-based pagination over the reverse-chronological workout feed
// ABOUTME: Computes page counts and slices most-recent-first pages from an ascending collection
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};

/// Default number of records per feed page (one card at a time)
pub const DEFAULT_PAGE_SIZE: usize = 1;

/// Number of pages needed for `total` items, `ceil(total / page_size)`
///
/// A zero page size is treated as one.
#[must_use]
pub const fn page_count(total: usize, page_size: usize) -> usize {
    let size = if page_size == 0 { 1 } else { page_size };
    total.div_ceil(size)
}

/// One page of the feed plus navigation metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedPage<T> {
    /// Items on this page, most recent first
    pub items: Vec<T>,
    /// Zero-based page index (0 is the most recent page)
    pub page: usize,
    /// Page size used to build this page
    pub page_size: usize,
    /// Total number of pages
    pub total_pages: usize,
    /// Total number of items across all pages
    pub total_items: usize,
}

impl<T> FeedPage<T> {
    /// Create an empty page
    #[must_use]
    pub const fn empty(page_size: usize) -> Self {
        Self {
            items: Vec::new(),
            page: 0,
            page_size,
            total_pages: 0,
            total_items: 0,
        }
    }

    /// Whether a more recent page exists
    #[must_use]
    pub const fn has_newer(&self) -> bool {
        self.page > 0
    }

    /// Whether an older page exists
    #[must_use]
    pub const fn has_older(&self) -> bool {
        self.page + 1 < self.total_pages
    }
}

/// Slice page `page` of the most-recent-first view of `ascending`
///
/// `ascending` must be ordered oldest first, as the store returns it.
/// Requests past the last page are clamped to the last page.
#[must_use]
pub fn paginate_recent_first<T: Clone>(
    ascending: &[T],
    page: usize,
    page_size: usize,
) -> FeedPage<T> {
    let page_size = page_size.max(1);
    let total_items = ascending.len();
    let total_pages = page_count(total_items, page_size);
    if total_pages == 0 {
        return FeedPage::empty(page_size);
    }

    let page = page.min(total_pages - 1);
    let items = ascending
        .iter()
        .rev()
        .skip(page * page_size)
        .take(page_size)
        .cloned()
        .collect();

    FeedPage {
        items,
        page,
        page_size,
        total_pages,
        total_items,
    }
}
