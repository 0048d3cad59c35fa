//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::{BlogSettings, ServerConfig};
pub use state_builders::{ServiceOptions, StateBuildError, build_http_state};

use actix_session::{
    SessionMiddleware,
    config::{CookieContentSecurity, PersistentSession},
    storage::CookieSessionStore,
};
use actix_web::cookie::{Key, SameSite};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

use crate::Trace;
#[cfg(debug_assertions)]
use crate::doc::ApiDoc;
use crate::inbound::http::health::{HealthState, live, ready};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::{admin, feeds, follows, posts, users};

/// Register every blog route.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(feeds::home)
        .service(feeds::group_list)
        .service(feeds::profile)
        .service(feeds::post_detail)
        .service(feeds::follow_index)
        .service(posts::create_form)
        .service(posts::create_post)
        .service(posts::edit_form)
        .service(posts::edit_post)
        .service(posts::add_comment)
        .service(follows::profile_follow)
        .service(follows::profile_unfollow)
        .service(users::login_form)
        .service(users::login)
        .service(users::logout)
        .service(admin::list_groups)
        .service(admin::create_group)
        .service(admin::update_group)
        .service(admin::delete_group)
        .service(admin::list_posts)
        .service(admin::set_post_group)
        .service(ready)
        .service(live);
}

/// Cookie session middleware with the production settings.
#[must_use]
pub fn session_middleware(
    key: Key,
    cookie_secure: bool,
    same_site: SameSite,
) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".into())
        .cookie_path("/".into())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(same_site)
        .session_lifecycle(
            PersistentSession::default().session_ttl(actix_web::cookie::time::Duration::weeks(2)),
        )
        .build()
}

/// Shared per-worker inputs for [`build_app`].
#[derive(Clone)]
pub struct AppDependencies {
    /// Probe flags.
    pub health_state: web::Data<HealthState>,
    /// Driving ports for handlers.
    pub http_state: web::Data<HttpState>,
    /// Session signing and encryption key.
    pub key: Key,
    /// Whether cookies carry `Secure`.
    pub cookie_secure: bool,
    /// Cookie `SameSite` policy.
    pub same_site: SameSite,
}

/// Assemble the application: tracing, sessions, routes, and (in debug
/// builds) Swagger UI at `/docs`.
pub fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl actix_web::body::MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        key,
        cookie_secure,
        same_site,
    } = deps;

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(session_middleware(key, cookie_secure, same_site))
        .wrap(Trace)
        .configure(routes);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Construct the HTTP server; it is not marked ready here.
///
/// With the `metrics` feature and a configured registry, every worker also
/// records request metrics and serves them at `/metrics`.
///
/// # Errors
///
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let ServerConfig {
        key,
        cookie_secure,
        same_site,
        bind_addr,
        #[cfg(feature = "metrics")]
        prometheus,
    } = config;
    let deps = AppDependencies {
        health_state,
        http_state,
        key,
        cookie_secure,
        same_site,
    };

    #[cfg(feature = "metrics")]
    if let Some(prometheus) = prometheus {
        let server =
            HttpServer::new(move || build_app(deps.clone()).wrap(prometheus.clone()))
                .bind(bind_addr)?
                .run();
        return Ok(server);
    }

    let server = HttpServer::new(move || build_app(deps.clone()))
        .bind(bind_addr)?
        .run();
    Ok(server)
}
