//! End-to-end behaviour of the wired application over the in-memory store.

use std::sync::Arc;

use actix_http::Request;
use actix_web::body::MessageBody;
use actix_web::cookie::{Cookie, Key, SameSite};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::{StatusCode, header};
use actix_web::test::{self, TestRequest};
use actix_web::web;
use blog::domain::ensure_account;
use blog::domain::ports::StorePorts;
use blog::inbound::http::health::HealthState;
use blog::outbound::memory::InMemoryStore;
use blog::server::{AppDependencies, ServiceOptions, build_app, build_http_state};
use blog::test_support::MutableClock;
use rstest::{fixture, rstest};
use serde_json::{Value, json};

const PASSWORD: &str = "war-and-peace";

/// Storage seeded with two writers and a staff account.
struct World {
    store: Arc<InMemoryStore>,
    clock: Arc<MutableClock>,
}

#[fixture]
fn world() -> World {
    let store = Arc::new(InMemoryStore::new());
    actix_rt::System::new().block_on({
        let store = Arc::clone(&store);
        async move {
            for (name, staff) in [("leo", false), ("anna", false), ("admin", true)] {
                ensure_account(store.as_ref(), name, PASSWORD, staff)
                    .await
                    .expect("seed account");
            }
        }
    });
    World {
        store,
        clock: Arc::new(MutableClock::fixed()),
    }
}

fn deps(world: &World, home_cache_ttl: Option<std::time::Duration>) -> AppDependencies {
    let store = StorePorts::from_shared(Arc::clone(&world.store));
    let options = ServiceOptions {
        page_size: 10,
        home_cache_ttl,
    };
    let http_state =
        build_http_state(store, options, world.clock.clone()).expect("services assemble");
    AppDependencies {
        health_state: web::Data::new(HealthState::new()),
        http_state: web::Data::new(http_state),
        key: Key::generate(),
        cookie_secure: false,
        same_site: SameSite::Lax,
    }
}

fn location<B>(response: &ServiceResponse<B>) -> Option<String> {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
}

async fn log_in<S, B>(app: &S, username: &str) -> Cookie<'static>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = TestRequest::post()
        .uri("/auth/login/")
        .set_json(json!({ "username": username, "password": PASSWORD }))
        .to_request();
    let res = test::call_service(app, req).await;
    assert_eq!(res.status(), StatusCode::FOUND, "login as {username}");
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie")
        .into_owned()
}

async fn get_json<S, B>(app: &S, uri: &str, cookie: Option<&Cookie<'static>>) -> Value
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let mut req = TestRequest::get().uri(uri);
    if let Some(cookie) = cookie {
        req = req.cookie(cookie.clone());
    }
    let res = test::call_service(app, req.to_request()).await;
    assert_eq!(res.status(), StatusCode::OK, "GET {uri}");
    test::read_body_json(res).await
}

async fn publish<S, B>(app: &S, cookie: &Cookie<'static>, text: &str)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = TestRequest::post()
        .uri("/create/")
        .cookie(cookie.clone())
        .set_json(json!({ "text": text, "group": null, "image": null }))
        .to_request();
    let res = test::call_service(app, req).await;
    assert_eq!(res.status(), StatusCode::FOUND);
}

#[rstest]
fn anonymous_authors_are_sent_to_login(world: World) {
    actix_rt::System::new().block_on(async move {
        let app = test::init_service(build_app(deps(&world, None))).await;

        let req = TestRequest::get().uri("/create/").to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::FOUND);
        assert_eq!(
            location(&res).as_deref(),
            Some("/auth/login/?next=%2Fcreate%2F")
        );
    });
}

#[rstest]
fn anonymous_writes_without_json_are_sent_to_login(world: World) {
    actix_rt::System::new().block_on(async move {
        let app = test::init_service(build_app(deps(&world, None))).await;

        for (uri, body) in [
            ("/create/", ""),
            ("/create/", "text=hello"),
            ("/posts/1/comment/", ""),
            ("/posts/1/comment/", "text=hi"),
        ] {
            let req = TestRequest::post()
                .uri(uri)
                .insert_header((header::CONTENT_TYPE, "application/x-www-form-urlencoded"))
                .set_payload(body)
                .to_request();
            let res = test::call_service(&app, req).await;
            assert_eq!(res.status(), StatusCode::FOUND, "POST {uri} {body:?}");
            let expected = format!("/auth/login/?next={}", uri.replace('/', "%2F"));
            assert_eq!(location(&res), Some(expected), "POST {uri} {body:?}");
        }
    });
}

#[rstest]
fn wrong_passwords_are_unauthorised(world: World) {
    actix_rt::System::new().block_on(async move {
        let app = test::init_service(build_app(deps(&world, None))).await;

        let req = TestRequest::post()
            .uri("/auth/login/")
            .set_json(json!({ "username": "leo", "password": "nope" }))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["code"], "unauthorized");
    });
}

#[rstest]
fn login_returns_to_a_local_next(world: World) {
    actix_rt::System::new().block_on(async move {
        let app = test::init_service(build_app(deps(&world, None))).await;

        let req = TestRequest::post()
            .uri("/auth/login/?next=%2Ffollow%2F")
            .set_json(json!({ "username": "leo", "password": PASSWORD }))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::FOUND);
        assert_eq!(location(&res).as_deref(), Some("/follow/"));
    });
}

#[rstest]
fn published_posts_reach_every_feed(world: World) {
    actix_rt::System::new().block_on(async move {
        let app = test::init_service(build_app(deps(&world, None))).await;
        let leo = log_in(&app, "leo").await;

        let req = TestRequest::post()
            .uri("/create/")
            .cookie(leo.clone())
            .set_json(json!({ "text": "Happy families", "group": null, "image": null }))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::FOUND);
        assert_eq!(location(&res).as_deref(), Some("/profile/leo/"));

        let home = get_json(&app, "/", None).await;
        assert_eq!(home["totalCount"], 1);
        assert_eq!(home["items"][0]["text"], "Happy families");
        let post_id = home["items"][0]["id"].as_i64().expect("numeric id");

        let profile = get_json(&app, "/profile/leo/", None).await;
        assert_eq!(profile["page"]["totalCount"], 1);
        assert_eq!(profile["following"], false);

        let detail = get_json(&app, &format!("/posts/{post_id}/"), None).await;
        assert_eq!(detail["post"]["author"]["username"], "leo");
        assert_eq!(detail["authorPostCount"], 1);
    });
}

#[rstest]
fn invalid_posts_echo_the_form_without_saving(world: World) {
    actix_rt::System::new().block_on(async move {
        let app = test::init_service(build_app(deps(&world, None))).await;
        let leo = log_in(&app, "leo").await;

        let req = TestRequest::post()
            .uri("/create/")
            .cookie(leo)
            .set_json(json!({ "text": "   ", "group": null, "image": null }))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["code"], "invalid_request");

        let home = get_json(&app, "/", None).await;
        assert_eq!(home["totalCount"], 0);
    });
}

#[rstest]
fn readers_comment_and_follow(world: World) {
    actix_rt::System::new().block_on(async move {
        let app = test::init_service(build_app(deps(&world, None))).await;
        let leo = log_in(&app, "leo").await;
        let anna = log_in(&app, "anna").await;
        publish(&app, &leo, "All happy families").await;
        let home = get_json(&app, "/", None).await;
        let post_id = home["items"][0]["id"].as_i64().expect("numeric id");

        let req = TestRequest::post()
            .uri(&format!("/posts/{post_id}/comment/"))
            .cookie(anna.clone())
            .set_json(json!({ "text": "Are alike" }))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::FOUND);
        assert_eq!(location(&res), Some(format!("/posts/{post_id}/")));
        let detail = get_json(&app, &format!("/posts/{post_id}/"), None).await;
        assert_eq!(detail["comments"][0]["text"], "Are alike");

        let before = get_json(&app, "/follow/", Some(&anna)).await;
        assert_eq!(before["totalCount"], 0);

        let req = TestRequest::post()
            .uri("/profile/leo/follow/")
            .cookie(anna.clone())
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(location(&res).as_deref(), Some("/profile/leo/"));

        let after = get_json(&app, "/follow/", Some(&anna)).await;
        assert_eq!(after["totalCount"], 1);

        let req = TestRequest::get()
            .uri("/profile/leo/unfollow/")
            .cookie(anna.clone())
            .to_request();
        let res = test::call_service(&app, req).await;
        assert!(res.status().is_client_error());
        let still = get_json(&app, "/follow/", Some(&anna)).await;
        assert_eq!(still["totalCount"], 1);
        let profile = get_json(&app, "/profile/leo/", Some(&anna)).await;
        assert_eq!(profile["following"], true);

        let req = TestRequest::post()
            .uri("/profile/leo/unfollow/")
            .cookie(anna.clone())
            .to_request();
        test::call_service(&app, req).await;
        let unfollowed = get_json(&app, "/follow/", Some(&anna)).await;
        assert_eq!(unfollowed["totalCount"], 0);
    });
}

#[rstest]
fn only_authors_edit_their_posts(world: World) {
    actix_rt::System::new().block_on(async move {
        let app = test::init_service(build_app(deps(&world, None))).await;
        let leo = log_in(&app, "leo").await;
        let anna = log_in(&app, "anna").await;
        publish(&app, &leo, "Original").await;
        let home = get_json(&app, "/", None).await;
        let post_id = home["items"][0]["id"].as_i64().expect("numeric id");
        let edit_uri = format!("/posts/{post_id}/edit/");

        let req = TestRequest::post()
            .uri(&edit_uri)
            .cookie(anna)
            .set_json(json!({ "text": "Vandalised", "group": null, "image": null }))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::FOUND);
        assert_eq!(location(&res), Some(format!("/posts/{post_id}/")));

        let form = get_json(&app, &edit_uri, Some(&leo)).await;
        assert_eq!(form["isEdit"], true);
        assert_eq!(form["form"]["text"], "Original");

        let req = TestRequest::post()
            .uri(&edit_uri)
            .cookie(leo)
            .set_json(json!({ "text": "Revised", "group": null, "image": null }))
            .to_request();
        test::call_service(&app, req).await;
        let detail = get_json(&app, &format!("/posts/{post_id}/"), None).await;
        assert_eq!(detail["post"]["text"], "Revised");
    });
}

#[rstest]
fn text_only_edits_keep_the_image(world: World) {
    actix_rt::System::new().block_on(async move {
        let app = test::init_service(build_app(deps(&world, None))).await;
        let leo = log_in(&app, "leo").await;
        let req = TestRequest::post()
            .uri("/create/")
            .cookie(leo.clone())
            .set_json(json!({ "text": "Illustrated", "image": "cat.png" }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FOUND);
        let home = get_json(&app, "/", None).await;
        let post_id = home["items"][0]["id"].as_i64().expect("numeric id");
        let edit_uri = format!("/posts/{post_id}/edit/");
        let detail_uri = format!("/posts/{post_id}/");

        let req = TestRequest::post()
            .uri(&edit_uri)
            .cookie(leo.clone())
            .set_json(json!({ "text": "Revised" }))
            .to_request();
        test::call_service(&app, req).await;
        let detail = get_json(&app, &detail_uri, None).await;
        assert_eq!(detail["post"]["text"], "Revised");
        assert_eq!(detail["post"]["image"], "posts/cat.png");

        let req = TestRequest::post()
            .uri(&edit_uri)
            .cookie(leo)
            .set_json(json!({ "text": "Plain", "clearImage": true }))
            .to_request();
        test::call_service(&app, req).await;
        let detail = get_json(&app, &detail_uri, None).await;
        assert_eq!(detail["post"]["image"], Value::Null);
    });
}

#[rstest]
fn staff_file_posts_into_groups(world: World) {
    actix_rt::System::new().block_on(async move {
        let app = test::init_service(build_app(deps(&world, None))).await;
        let leo = log_in(&app, "leo").await;
        let admin = log_in(&app, "admin").await;
        let group = json!({ "title": "Novels", "slug": "novels", "description": "" });

        let req = TestRequest::post()
            .uri("/admin/groups/")
            .cookie(leo.clone())
            .set_json(&group)
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::FORBIDDEN
        );

        let req = TestRequest::post()
            .uri("/admin/groups/")
            .cookie(admin.clone())
            .set_json(&group)
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::CREATED);
        let created: Value = test::read_body_json(res).await;
        let group_id = created["id"].as_i64().expect("numeric id");

        publish(&app, &leo, "Anna Karenina").await;
        let home = get_json(&app, "/", None).await;
        let post_id = home["items"][0]["id"].as_i64().expect("numeric id");

        let req = TestRequest::patch()
            .uri(&format!("/admin/posts/{post_id}/"))
            .cookie(admin)
            .set_json(json!({ "group": group_id }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let feed = get_json(&app, "/group/novels/", None).await;
        assert_eq!(feed["group"]["slug"], "novels");
        assert_eq!(feed["page"]["totalCount"], 1);
    });
}

#[rstest]
fn the_home_page_is_cached_until_expiry(world: World) {
    let clock = Arc::clone(&world.clock);
    actix_rt::System::new().block_on(async move {
        let ttl = std::time::Duration::from_secs(20);
        let app = test::init_service(build_app(deps(&world, Some(ttl)))).await;
        let leo = log_in(&app, "leo").await;

        publish(&app, &leo, "First").await;
        assert_eq!(get_json(&app, "/", None).await["totalCount"], 1);

        publish(&app, &leo, "Second").await;
        assert_eq!(get_json(&app, "/", None).await["totalCount"], 1);

        clock.advance_seconds(21);
        assert_eq!(get_json(&app, "/", None).await["totalCount"], 2);
    });
}

#[rstest]
fn missing_pages_are_not_found(world: World) {
    actix_rt::System::new().block_on(async move {
        let app = test::init_service(build_app(deps(&world, None))).await;

        for uri in ["/posts/999/", "/group/missing/", "/profile/nobody/"] {
            let req = TestRequest::get().uri(uri).to_request();
            let res = test::call_service(&app, req).await;
            assert_eq!(res.status(), StatusCode::NOT_FOUND, "GET {uri}");
        }
    });
}

#[rstest]
fn logout_clears_the_session_cookie(world: World) {
    actix_rt::System::new().block_on(async move {
        let app = test::init_service(build_app(deps(&world, None))).await;
        let leo = log_in(&app, "leo").await;

        let req = TestRequest::post()
            .uri("/auth/logout/")
            .cookie(leo)
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::FOUND);
        assert_eq!(location(&res).as_deref(), Some("/"));
        let cleared = res
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("removal cookie");
        assert!(cleared.value().is_empty());
    });
}
