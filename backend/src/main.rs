//! Blog server entry-point: loads settings, picks storage, and serves HTTP.

use std::sync::Arc;

use actix_web::web;
#[cfg(feature = "metrics")]
use actix_web_prom::PrometheusMetricsBuilder;
use color_eyre::eyre::{Result, WrapErr, eyre};
use mockable::{DefaultClock, DefaultEnv};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use blog::domain::ensure_account;
use blog::domain::ports::StorePorts;
use blog::inbound::http::health::HealthState;
use blog::inbound::http::session_config::{BuildMode, key_fingerprint, session_settings_from_env};
use blog::outbound::memory::InMemoryStore;
use blog::outbound::persistence::{
    DbPool, PoolConfig, postgres_store_ports, run_pending_migrations,
};
use blog::server::{BlogSettings, ServerConfig, ServiceOptions, build_http_state, create_server};

#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = BlogSettings::load().wrap_err("load settings")?;
    let session = session_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .wrap_err("load session settings")?;
    info!(
        fingerprint = %key_fingerprint(&session.key),
        cookie_secure = session.cookie_secure,
        "session key loaded"
    );

    let store = store_ports(&settings).await?;
    if let Some((username, password)) = settings.admin_account() {
        ensure_account(store.users.as_ref(), username, password, true)
            .await
            .wrap_err("provision staff account")?;
    }

    let options = ServiceOptions {
        page_size: settings.page_size,
        home_cache_ttl: settings.home_cache_ttl(),
    };
    let http_state = build_http_state(store, options, Arc::new(DefaultClock))
        .wrap_err("assemble services")?;

    let bind_addr = settings.bind_addr().wrap_err("parse bind address")?;
    let config = ServerConfig::new(
        session.key,
        session.cookie_secure,
        session.same_site,
        bind_addr,
    );
    #[cfg(feature = "metrics")]
    let config = config.with_metrics(
        PrometheusMetricsBuilder::new("blog")
            .endpoint("/metrics")
            .build()
            .map_err(|e| eyre!("configure Prometheus metrics: {e}"))?,
    );

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), web::Data::new(http_state), config)
        .wrap_err_with(|| format!("bind {bind_addr}"))?;
    info!(%bind_addr, "listening");
    health_state.mark_ready();
    server.await.wrap_err("server stopped")
}

/// PostgreSQL when a database URL is configured, otherwise process memory.
async fn store_ports(settings: &BlogSettings) -> Result<StorePorts> {
    let Some(database_url) = settings.database_url.as_deref() else {
        warn!("no database configured; data lives in memory only");
        return Ok(StorePorts::from_shared(Arc::new(InMemoryStore::new())));
    };

    let applied = run_pending_migrations(database_url)
        .await
        .map_err(|e| eyre!("run migrations: {e}"))?;
    info!(applied, "migrations up to date");

    let pool = DbPool::new(PoolConfig::new(database_url).with_max_size(settings.pool_max_size))
        .await
        .map_err(|e| eyre!("connect to database: {e}"))?;
    Ok(postgres_store_ports(&pool))
}
