//! Page-number pagination primitives for listing endpoints.
//!
//! The crate separates three concerns:
//!
//! - [`PageNumber`] captures what the caller asked for, tolerating missing or
//!   malformed input.
//! - [`Paginator`] resolves a request against a total item count, producing a
//!   [`PageWindow`] that adapters translate into `OFFSET`/`LIMIT` queries.
//! - [`Page`] is the serialisable envelope returned to clients.
//!
//! Resolution never fails: a missing or non-numeric page yields the first
//! page, and an out-of-range number yields the last page. A listing with no
//! items still has exactly one (empty) page.
//!
//! # Examples
//!
//! ```
//! use pagination::{Page, PageNumber, Paginator};
//!
//! let paginator = Paginator::new(10).expect("non-zero page size");
//! let window = paginator.window(PageNumber::parse(Some("2")), 13);
//! assert_eq!(window.offset(), 10);
//! assert_eq!(window.limit(), 3);
//!
//! let page = Page::new(vec!["a", "b", "c"], window);
//! assert!(!page.has_next);
//! assert!(page.has_previous);
//! ```

mod number;
mod paginator;

pub use number::PageNumber;
pub use paginator::{Page, PageWindow, PaginationError, Paginator};
