//! OpenAPI schema stand-ins for generic types.
//!
//! `pagination::Page<T>` lives in a framework-free crate, so the document
//! describes the post page through this mirror instead.

use utoipa::ToSchema;

use crate::domain::Post;

/// OpenAPI schema for [`crate::domain::FeedPage`].
#[derive(ToSchema)]
#[schema(as = FeedPage, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct FeedPageSchema {
    /// Posts on this page, newest first.
    items: Vec<Post>,
    /// One-based page number actually served.
    #[schema(example = 1)]
    number: usize,
    /// Total number of pages; at least one.
    #[schema(example = 3)]
    num_pages: usize,
    /// Posts across all pages.
    #[schema(example = 25)]
    total_count: usize,
    /// Whether a later page exists.
    has_next: bool,
    /// Whether an earlier page exists.
    has_previous: bool,
    /// The following page number.
    next_page_number: Option<usize>,
    /// The preceding page number.
    previous_page_number: Option<usize>,
}
