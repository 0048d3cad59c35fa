//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data` and only see driving ports, so
//! they can be exercised with mocks or the in-memory store.

use std::sync::Arc;

use crate::domain::ports::{AdminCommand, ContributionCommand, FeedCache, FeedQuery, LoginService};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Read side: feeds and post detail.
    pub feeds: Arc<dyn FeedQuery>,
    /// Authenticated mutations.
    pub contributions: Arc<dyn ContributionCommand>,
    /// Staff-only operations.
    pub admin: Arc<dyn AdminCommand>,
    /// Password login.
    pub login: Arc<dyn LoginService>,
    /// Rendered home-page cache.
    pub home_cache: Arc<dyn FeedCache>,
}
