//! Page resolution and the serialised page envelope.

use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

use crate::PageNumber;

/// Errors raised while configuring a [`Paginator`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PaginationError {
    /// A page must hold at least one item.
    #[error("page size must be greater than zero")]
    ZeroPageSize,
}

/// Splits an ordered listing into fixed-size pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    per_page: NonZeroUsize,
}

impl Paginator {
    /// Build a paginator holding `per_page` items per page.
    ///
    /// # Errors
    ///
    /// Returns [`PaginationError::ZeroPageSize`] when `per_page` is zero.
    pub fn new(per_page: usize) -> Result<Self, PaginationError> {
        NonZeroUsize::new(per_page)
            .map(|per_page| Self { per_page })
            .ok_or(PaginationError::ZeroPageSize)
    }

    /// Number of items per page.
    #[must_use]
    pub const fn per_page(&self) -> usize {
        self.per_page.get()
    }

    /// Number of pages needed for `count` items; never less than one.
    #[must_use]
    pub fn num_pages(&self, count: usize) -> usize {
        count.div_ceil(self.per_page.get()).max(1)
    }

    /// Resolve `requested` against `count` items.
    ///
    /// Unparseable requests land on the first page; numbers below one or
    /// past the end land on the last page.
    #[must_use]
    pub fn window(&self, requested: PageNumber, count: usize) -> PageWindow {
        let num_pages = self.num_pages(count);
        let number = match requested.requested() {
            None => 1,
            Some(raw) => usize::try_from(raw)
                .ok()
                .filter(|number| (1..=num_pages).contains(number))
                .unwrap_or(num_pages),
        };
        PageWindow {
            number,
            num_pages,
            per_page: self.per_page.get(),
            count,
        }
    }
}

/// A resolved page position within a listing of known size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    number: usize,
    num_pages: usize,
    per_page: usize,
    count: usize,
}

impl PageWindow {
    /// One-based page number.
    #[must_use]
    pub const fn number(&self) -> usize {
        self.number
    }

    /// Total number of pages in the listing.
    #[must_use]
    pub const fn num_pages(&self) -> usize {
        self.num_pages
    }

    /// Total number of items in the listing.
    #[must_use]
    pub const fn count(&self) -> usize {
        self.count
    }

    /// Number of items to skip before this page.
    #[must_use]
    pub const fn offset(&self) -> usize {
        (self.number - 1) * self.per_page
    }

    /// Number of items on this page.
    #[must_use]
    pub fn limit(&self) -> usize {
        self.count.saturating_sub(self.offset()).min(self.per_page)
    }

    /// Whether a later page exists.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.number < self.num_pages
    }

    /// Whether an earlier page exists.
    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.number > 1
    }

    /// The following page number, if any.
    #[must_use]
    pub const fn next_page_number(&self) -> Option<usize> {
        if self.has_next() {
            Some(self.number + 1)
        } else {
            None
        }
    }

    /// The preceding page number, if any.
    #[must_use]
    pub const fn previous_page_number(&self) -> Option<usize> {
        if self.has_previous() {
            Some(self.number - 1)
        } else {
            None
        }
    }
}

/// One page of items plus the navigation data clients need to render it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Items on this page, in listing order.
    pub items: Vec<T>,
    /// One-based page number.
    pub number: usize,
    /// Total number of pages.
    pub num_pages: usize,
    /// Total number of items across all pages.
    pub total_count: usize,
    /// Whether a later page exists.
    pub has_next: bool,
    /// Whether an earlier page exists.
    pub has_previous: bool,
    /// The following page number, if any.
    pub next_page_number: Option<usize>,
    /// The preceding page number, if any.
    pub previous_page_number: Option<usize>,
}

impl<T> Page<T> {
    /// Wrap the items fetched for `window`.
    #[must_use]
    pub fn new(items: Vec<T>, window: PageWindow) -> Self {
        Self {
            items,
            number: window.number(),
            num_pages: window.num_pages(),
            total_count: window.count(),
            has_next: window.has_next(),
            has_previous: window.has_previous(),
            next_page_number: window.next_page_number(),
            previous_page_number: window.previous_page_number(),
        }
    }

    /// The single empty page of an empty listing.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            number: 1,
            num_pages: 1,
            total_count: 0,
            has_next: false,
            has_previous: false,
            next_page_number: None,
            previous_page_number: None,
        }
    }

    /// Convert every item while keeping the navigation data.
    #[must_use]
    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            items: self.items.into_iter().map(f).collect(),
            number: self.number,
            num_pages: self.num_pages,
            total_count: self.total_count,
            has_next: self.has_next,
            has_previous: self.has_previous,
            next_page_number: self.next_page_number,
            previous_page_number: self.previous_page_number,
        }
    }
}
