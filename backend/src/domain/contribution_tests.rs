//! Tests for the contribution workflow service.

use std::sync::Arc;

use mockall::predicate::{always, eq};
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::{
    MockCommentRepository, MockFollowRepository, MockGroupRepository, MockPostRepository,
    MockUserRepository,
};
use crate::domain::{
    AuthorOnly, Comment, ErrorCode, GroupId, ImagePath, MockEditPolicy, UserId,
};
use crate::test_support::{MutableClock, epoch, group, post, user};

#[derive(Default)]
struct Mocks {
    users: MockUserRepository,
    groups: MockGroupRepository,
    posts: MockPostRepository,
    comments: MockCommentRepository,
    follows: MockFollowRepository,
}

impl Mocks {
    fn into_service(self) -> ContributionService {
        self.into_service_with(Arc::new(AuthorOnly))
    }

    fn into_service_with(self, policy: Arc<dyn EditPolicy>) -> ContributionService {
        let store = StorePorts {
            users: Arc::new(self.users),
            groups: Arc::new(self.groups),
            posts: Arc::new(self.posts),
            comments: Arc::new(self.comments),
            follows: Arc::new(self.follows),
        };
        ContributionService::new(store, policy, Arc::new(MutableClock::fixed()))
    }

    fn knows_user(&mut self, known: &User) {
        let id = known.id();
        let by_id = known.clone();
        self.users
            .expect_find_by_id()
            .with(eq(id))
            .returning(move |_| Ok(Some(by_id.clone())));
        let by_name = known.clone();
        self.users
            .expect_find_by_username()
            .with(eq(known.username().clone()))
            .returning(move |_| Ok(Some(by_name.clone())));
    }
}

#[fixture]
fn mocks() -> Mocks {
    Mocks::default()
}

fn text_form(text: &str) -> PostForm {
    PostForm {
        text: text.to_owned(),
        ..PostForm::default()
    }
}

#[rstest]
#[tokio::test]
async fn anonymous_create_is_unauthorized(mut mocks: Mocks) {
    mocks.posts.expect_insert().never();
    let err = mocks
        .into_service()
        .create_post(Viewer::Anonymous, text_form("hello"))
        .await
        .expect_err("anonymous");
    assert_eq!(err.code(), ErrorCode::Unauthorized);
}

#[rstest]
#[tokio::test]
async fn create_stamps_author_and_time_then_redirects_to_profile(mut mocks: Mocks) {
    let author = user("leo");
    mocks.knows_user(&author);
    let author_id = author.id();
    let stored = post(1, &author, 0);
    mocks
        .posts
        .expect_insert()
        .withf(move |new| {
            new.author == author_id && new.pub_date == epoch() && new.content.text == "hello"
        })
        .times(1)
        .return_once(move |_| Ok(stored));

    let outcome = mocks
        .into_service()
        .create_post(Viewer::Authenticated(author.id()), text_form("  hello  "))
        .await
        .expect("create");

    assert_eq!(
        outcome,
        Outcome::Redirect(RouteTarget::profile(author.username()))
    );
}

#[rstest]
#[tokio::test]
async fn blank_text_is_echoed_without_writing(mut mocks: Mocks) {
    let author = user("leo");
    mocks.knows_user(&author);
    mocks.posts.expect_insert().never();

    let outcome = mocks
        .into_service()
        .create_post(Viewer::Authenticated(author.id()), text_form("   "))
        .await
        .expect("validation outcome");

    let Outcome::Invalid(invalid) = outcome else {
        panic!("expected invalid form, got {outcome:?}");
    };
    assert_eq!(invalid.form.text, "   ");
    assert!(invalid.errors.contains("text"));
}

#[rstest]
#[tokio::test]
async fn unknown_group_is_a_field_error(mut mocks: Mocks) {
    let author = user("leo");
    mocks.knows_user(&author);
    mocks
        .groups
        .expect_find_by_id()
        .with(eq(GroupId::new(9)))
        .return_once(|_| Ok(None));
    mocks.posts.expect_insert().never();

    let form = PostForm {
        text: "hello".to_owned(),
        group: Some(9),
        ..PostForm::default()
    };
    let outcome = mocks
        .into_service()
        .create_post(Viewer::Authenticated(author.id()), form)
        .await
        .expect("validation outcome");
    let Outcome::Invalid(invalid) = outcome else {
        panic!("expected invalid form, got {outcome:?}");
    };
    assert!(invalid.errors.contains("group"));
}

#[rstest]
#[tokio::test]
async fn non_author_edit_redirects_without_mutation(mut mocks: Mocks) {
    let author = user("leo");
    let target = post(3, &author, 0);
    mocks
        .posts
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(target)));
    mocks.posts.expect_update().never();

    let outcome = mocks
        .into_service()
        .edit_post(
            Viewer::Authenticated(UserId::random()),
            PostId::new(3),
            text_form("hijacked"),
        )
        .await
        .expect("silent refusal");
    assert_eq!(
        outcome,
        Outcome::Redirect(RouteTarget::post_detail(PostId::new(3)))
    );
}

#[rstest]
#[tokio::test]
async fn author_edit_updates_in_place(mut mocks: Mocks) {
    let author = user("leo");
    let original = post(3, &author, 0);
    let updated = Post {
        text: "revised".to_owned(),
        ..original.clone()
    };
    mocks
        .posts
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(original)));
    mocks
        .groups
        .expect_find_by_id()
        .returning(|id| Ok(Some(group(id.get(), "cats"))));
    mocks
        .posts
        .expect_update()
        .withf(|id, content| {
            *id == PostId::new(3) && content.text == "revised" && content.group == Some(GroupId::new(1))
        })
        .times(1)
        .return_once(move |_, _| Ok(Some(updated)));

    let form = PostForm {
        text: "revised".to_owned(),
        group: Some(1),
        ..PostForm::default()
    };
    let outcome = mocks
        .into_service()
        .edit_post(Viewer::Authenticated(author.id()), PostId::new(3), form)
        .await
        .expect("edit");
    assert_eq!(
        outcome,
        Outcome::Redirect(RouteTarget::post_detail(PostId::new(3)))
    );
}

fn illustrated(id: i32, author: &User) -> Post {
    Post {
        image: Some(ImagePath::new("cat.png").expect("image path")),
        ..post(id, author, 0)
    }
}

#[rstest]
#[case::omitted(text_form("revised"), Some("posts/cat.png"))]
#[case::cleared(PostForm { clear_image: true, ..text_form("revised") }, None)]
#[case::replaced(
    PostForm { image: Some("dog.jpg".to_owned()), clear_image: true, ..text_form("revised") },
    Some("posts/dog.jpg")
)]
#[tokio::test]
async fn edit_keeps_the_image_unless_told_otherwise(
    mut mocks: Mocks,
    #[case] form: PostForm,
    #[case] expected: Option<&'static str>,
) {
    let author = user("leo");
    let original = illustrated(3, &author);
    let updated = original.clone();
    mocks
        .posts
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(original)));
    mocks
        .posts
        .expect_update()
        .withf(move |_, content| content.image.as_ref().map(ImagePath::as_str) == expected)
        .times(1)
        .return_once(move |_, _| Ok(Some(updated)));

    mocks
        .into_service()
        .edit_post(Viewer::Authenticated(author.id()), PostId::new(3), form)
        .await
        .expect("edit");
}

#[rstest]
#[tokio::test]
async fn edit_form_uses_the_configured_policy(mut mocks: Mocks) {
    let author = user("leo");
    let target = post(3, &author, 0);
    mocks
        .posts
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(target)));
    mocks.groups.expect_list().return_once(|_| Ok(Vec::new()));
    let mut policy = MockEditPolicy::new();
    policy.expect_can_edit().times(1).return_const(true);

    let page = mocks
        .into_service_with(Arc::new(policy))
        .edit_post_form(Viewer::Authenticated(UserId::random()), PostId::new(3))
        .await
        .expect("form page");
    let FormPage::Show(context) = page else {
        panic!("expected form, got {page:?}");
    };
    assert!(context.is_edit);
    assert_eq!(context.form.text, "post 3");
}

#[rstest]
#[tokio::test]
async fn editing_a_missing_post_is_not_found(mut mocks: Mocks) {
    mocks.posts.expect_find_by_id().return_once(|_| Ok(None));
    let err = mocks
        .into_service()
        .edit_post_form(Viewer::Authenticated(UserId::random()), PostId::new(8))
        .await
        .expect_err("missing");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn comment_on_missing_post_is_not_found(mut mocks: Mocks) {
    let commenter = user("anna");
    mocks.knows_user(&commenter);
    mocks.posts.expect_find_by_id().return_once(|_| Ok(None));
    mocks.comments.expect_insert().never();
    let err = mocks
        .into_service()
        .add_comment(
            Viewer::Authenticated(commenter.id()),
            PostId::new(8),
            CommentForm {
                text: "hi".to_owned(),
            },
        )
        .await
        .expect_err("missing");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn comment_is_stored_and_redirects_to_detail(mut mocks: Mocks) {
    let author = user("leo");
    let commenter = user("anna");
    let target = post(5, &author, 0);
    let commenter_id = commenter.id();
    mocks.knows_user(&commenter);
    mocks
        .posts
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(target)));
    mocks
        .comments
        .expect_insert()
        .withf(move |new| new.author == commenter_id && new.text == "nice")
        .times(1)
        .returning(move |new| {
            Ok(Comment {
                id: 1,
                post_id: new.post_id,
                author: commenter.summary(),
                text: new.text.clone(),
                created: new.created,
            })
        });

    let outcome = mocks
        .into_service()
        .add_comment(
            Viewer::Authenticated(commenter_id),
            PostId::new(5),
            CommentForm {
                text: " nice ".to_owned(),
            },
        )
        .await
        .expect("comment");
    assert_eq!(
        outcome,
        Outcome::Redirect(RouteTarget::post_detail(PostId::new(5)))
    );
}

#[rstest]
#[tokio::test]
async fn comment_from_a_deleted_account_is_unauthorized(mut mocks: Mocks) {
    mocks.users.expect_find_by_id().return_once(|_| Ok(None));
    mocks.posts.expect_find_by_id().never();
    mocks.comments.expect_insert().never();

    let err = mocks
        .into_service()
        .add_comment(
            Viewer::Authenticated(UserId::random()),
            PostId::new(5),
            CommentForm {
                text: "hi".to_owned(),
            },
        )
        .await
        .expect_err("stale session");
    assert_eq!(err.code(), ErrorCode::Unauthorized);
}

#[rstest]
#[tokio::test]
async fn blank_comment_is_echoed(mut mocks: Mocks) {
    let author = user("leo");
    mocks.knows_user(&author);
    let target = post(5, &author, 0);
    mocks
        .posts
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(target)));
    mocks.comments.expect_insert().never();

    let outcome = mocks
        .into_service()
        .add_comment(
            Viewer::Authenticated(author.id()),
            PostId::new(5),
            CommentForm::default(),
        )
        .await
        .expect("validation outcome");
    assert!(matches!(outcome, Outcome::Invalid(ref invalid) if invalid.errors.contains("text")));
}

#[rstest]
#[tokio::test]
async fn follow_creates_edge_and_redirects_to_profile(mut mocks: Mocks) {
    let author = user("leo");
    mocks.knows_user(&author);
    mocks
        .follows
        .expect_insert_if_absent()
        .with(always(), eq(author.id()))
        .times(1)
        .return_once(|_, _| Ok(true));

    let target = mocks
        .into_service()
        .follow(Viewer::Authenticated(UserId::random()), "leo")
        .await
        .expect("follow");
    assert_eq!(target, RouteTarget::profile(author.username()));
}

#[rstest]
#[tokio::test]
async fn self_follow_still_redirects(mut mocks: Mocks) {
    let me = user("leo");
    mocks.knows_user(&me);
    mocks.follows.expect_insert_if_absent().never();

    let target = mocks
        .into_service()
        .follow(Viewer::Authenticated(me.id()), "leo")
        .await
        .expect("self-follow is a no-op");
    assert_eq!(target, RouteTarget::profile(me.username()));
}

#[rstest]
#[tokio::test]
async fn following_unknown_author_is_not_found(mut mocks: Mocks) {
    mocks
        .users
        .expect_find_by_username()
        .return_once(|_| Ok(None));
    let err = mocks
        .into_service()
        .unfollow(Viewer::Authenticated(UserId::random()), "ghost")
        .await
        .expect_err("unknown author");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn anonymous_follow_is_unauthorized(mocks: Mocks) {
    let err = mocks
        .into_service()
        .follow(Viewer::Anonymous, "leo")
        .await
        .expect_err("anonymous");
    assert_eq!(err.code(), ErrorCode::Unauthorized);
}
