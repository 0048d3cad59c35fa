//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] collects every HTTP handler under [`crate::inbound::http`] and
//! registers the session cookie security scheme. The document backs Swagger
//! UI in debug builds.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::ports::PostFormContext;
use crate::domain::{
    Comment, CommentForm, Error, ErrorCode, Group, GroupForm, GroupSummary, Post, PostForm,
    UserSummary,
};
use crate::inbound::http::admin::SetGroupRequest;
use crate::inbound::http::schemas::FeedPageSchema;
use crate::inbound::http::users::{LoginRequest, NextQuery};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /auth/login/.",
            ))),
        );
    }
}

/// OpenAPI document for the blog.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Blog API",
        description = "Posts, groups, comments, and follows with session login."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::feeds::home,
        crate::inbound::http::feeds::group_list,
        crate::inbound::http::feeds::profile,
        crate::inbound::http::feeds::post_detail,
        crate::inbound::http::feeds::follow_index,
        crate::inbound::http::posts::create_form,
        crate::inbound::http::posts::create_post,
        crate::inbound::http::posts::edit_form,
        crate::inbound::http::posts::edit_post,
        crate::inbound::http::posts::add_comment,
        crate::inbound::http::follows::profile_follow,
        crate::inbound::http::follows::profile_unfollow,
        crate::inbound::http::users::login_form,
        crate::inbound::http::users::login,
        crate::inbound::http::users::logout,
        crate::inbound::http::admin::list_groups,
        crate::inbound::http::admin::create_group,
        crate::inbound::http::admin::update_group,
        crate::inbound::http::admin::delete_group,
        crate::inbound::http::admin::list_posts,
        crate::inbound::http::admin::set_post_group,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        FeedPageSchema,
        Post,
        PostForm,
        PostFormContext,
        Comment,
        CommentForm,
        Group,
        GroupForm,
        GroupSummary,
        UserSummary,
        LoginRequest,
        NextQuery,
        SetGroupRequest,
    )),
    tags(
        (name = "feeds", description = "Paginated post listings and post pages"),
        (name = "posts", description = "Authoring posts and comments"),
        (name = "follows", description = "Following authors"),
        (name = "users", description = "Login and logout"),
        (name = "admin", description = "Staff-only moderation"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Tests verifying the generated document.

    use super::*;
    use rstest::rstest;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[rstest]
    #[case("Error", "code")]
    #[case("Error", "traceId")]
    #[case("FeedPage", "numPages")]
    #[case("FeedPage", "hasNext")]
    #[case("Post", "pubDate")]
    #[case("Group", "slug")]
    fn schemas_expose_wire_field_names(#[case] schema: &str, #[case] field: &str) {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let found = schemas.get(schema).expect("schema registered");
        assert_object_schema_has_field(found, field);
    }

    #[rstest]
    #[case("/")]
    #[case("/group/{slug}/")]
    #[case("/profile/{username}/")]
    #[case("/posts/{post_id}/")]
    #[case("/posts/{post_id}/edit/")]
    #[case("/posts/{post_id}/comment/")]
    #[case("/create/")]
    #[case("/follow/")]
    #[case("/profile/{username}/follow/")]
    #[case("/profile/{username}/unfollow/")]
    #[case("/auth/login/")]
    #[case("/auth/logout/")]
    #[case("/admin/groups/")]
    #[case("/admin/posts/{post_id}/")]
    #[case("/health/ready")]
    fn named_routes_are_documented(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "missing {path}");
    }

    #[rstest]
    fn session_cookie_scheme_is_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("SessionCookie"));
    }
}
