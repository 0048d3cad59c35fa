//! Application settings loaded via OrthoConfig, and the server configuration
//! built from them.

use std::net::SocketAddr;
use std::time::Duration;

use actix_web::cookie::{Key, SameSite};
use ortho_config::OrthoConfig;
use serde::Deserialize;

#[cfg(feature = "metrics")]
use actix_web_prom::PrometheusMetrics;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Settings read from `BLOG_*` environment variables, config files, and the
/// command line.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "BLOG")]
pub struct BlogSettings {
    /// Listen address; defaults to `0.0.0.0:8080`.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL. Without one the server keeps everything in memory.
    pub database_url: Option<String>,
    /// Posts per feed page.
    #[ortho_config(default = 10)]
    pub page_size: usize,
    /// Seconds a rendered home page stays cached; `0` disables the cache.
    #[ortho_config(default = 20)]
    pub home_cache_ttl_secs: u64,
    /// Upper bound on pooled database connections.
    #[ortho_config(default = 10)]
    pub pool_max_size: u32,
    /// Staff account created at startup when absent.
    pub admin_username: Option<String>,
    /// Password for [`BlogSettings::admin_username`].
    pub admin_password: Option<String>,
}

impl BlogSettings {
    /// The configured listen address, falling back to the default.
    ///
    /// # Errors
    ///
    /// Returns the parse error for a malformed address.
    pub fn bind_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        self.bind_addr
            .as_deref()
            .unwrap_or(DEFAULT_BIND_ADDR)
            .parse()
    }

    /// Home cache lifetime, or `None` when caching is off.
    #[must_use]
    pub fn home_cache_ttl(&self) -> Option<Duration> {
        (self.home_cache_ttl_secs > 0).then(|| Duration::from_secs(self.home_cache_ttl_secs))
    }

    /// Staff credentials to provision, when both halves are configured.
    #[must_use]
    pub fn admin_account(&self) -> Option<(&str, &str)> {
        match (self.admin_username.as_deref(), self.admin_password.as_deref()) {
            (Some(username), Some(password)) if !username.trim().is_empty() => {
                Some((username, password))
            }
            _ => None,
        }
    }
}

/// Everything the HTTP server needs besides handler state.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    #[cfg(feature = "metrics")]
    pub(crate) prometheus: Option<PrometheusMetrics>,
}

impl ServerConfig {
    /// Construct a server configuration from session settings and an address.
    #[must_use]
    pub fn new(key: Key, cookie_secure: bool, same_site: SameSite, bind_addr: SocketAddr) -> Self {
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            #[cfg(feature = "metrics")]
            prometheus: None,
        }
    }

    /// The socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }

    #[cfg(feature = "metrics")]
    /// Attach Prometheus middleware to the configuration.
    #[must_use]
    pub fn with_metrics(mut self, prometheus: PrometheusMetrics) -> Self {
        self.prometheus = Some(prometheus);
        self
    }
}
