//! Wiring domain services over a storage backend into [`HttpState`].

use std::sync::Arc;
use std::time::Duration;

use mockable::Clock;
use pagination::{PaginationError, Paginator};
use tracing::info;

use crate::domain::ports::{DisabledFeedCache, FeedCache, FeedCacheError, StorePorts};
use crate::domain::{
    AdminService, AuthorOnly, ContributionService, FeedService, PasswordLoginService,
};
use crate::inbound::http::state::HttpState;
use crate::outbound::cache::InMemoryFeedCache;

/// Tunables for the services behind the HTTP adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceOptions {
    /// Posts per feed page.
    pub page_size: usize,
    /// Home cache lifetime; `None` disables caching.
    pub home_cache_ttl: Option<Duration>,
}

/// Failures while assembling the services.
#[derive(Debug, thiserror::Error)]
pub enum StateBuildError {
    /// The page size was rejected.
    #[error(transparent)]
    Pagination(#[from] PaginationError),
    /// The cache could not be created.
    #[error(transparent)]
    Cache(#[from] FeedCacheError),
}

/// Build every driving port over `store`.
///
/// # Errors
///
/// Returns [`StateBuildError`] for a zero page size or an unrepresentable
/// cache TTL.
///
/// # Examples
/// ```
/// use std::sync::Arc;
///
/// use blog::domain::ports::StorePorts;
/// use blog::outbound::memory::InMemoryStore;
/// use blog::server::{ServiceOptions, build_http_state};
///
/// let store = StorePorts::from_shared(Arc::new(InMemoryStore::new()));
/// let options = ServiceOptions { page_size: 10, home_cache_ttl: None };
/// let state = build_http_state(store, options, Arc::new(mockable::DefaultClock));
/// assert!(state.is_ok());
/// ```
pub fn build_http_state(
    store: StorePorts,
    options: ServiceOptions,
    clock: Arc<dyn Clock>,
) -> Result<HttpState, StateBuildError> {
    let paginator = Paginator::new(options.page_size)?;
    let feeds = FeedService::new(store.clone(), paginator);
    let home_cache: Arc<dyn FeedCache> = match options.home_cache_ttl {
        Some(ttl) => {
            info!(ttl_secs = ttl.as_secs(), "home feed cache enabled");
            Arc::new(InMemoryFeedCache::new(ttl, Arc::clone(&clock))?)
        }
        None => Arc::new(DisabledFeedCache),
    };

    Ok(HttpState {
        feeds: Arc::new(feeds.clone()),
        contributions: Arc::new(ContributionService::new(
            store.clone(),
            Arc::new(AuthorOnly),
            clock,
        )),
        admin: Arc::new(AdminService::new(store.clone(), feeds)),
        login: Arc::new(PasswordLoginService::new(Arc::clone(&store.users))),
        home_cache,
    })
}
