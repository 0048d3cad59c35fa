//! Regression coverage for the port error types and the port bundle.

use super::*;
use crate::domain::{UserId, Username};
use rstest::rstest;

#[rstest]
#[case(PostRepositoryError::connection("refused").to_string(), "post repository connection failed: refused")]
#[case(GroupRepositoryError::conflict("cats").to_string(), "group slug already in use: cats")]
#[case(CommentRepositoryError::missing_reference("post 9").to_string(), "comment references a missing row: post 9")]
#[case(FollowRepositoryError::query("timeout").to_string(), "follow repository query failed: timeout")]
#[case(FeedCacheError::backend("gone").to_string(), "feed cache backend failure: gone")]
fn port_errors_render_their_context(#[case] rendered: String, #[case] expected: &str) {
    assert_eq!(rendered, expected);
}

#[tokio::test]
async fn bundle_dispatches_to_the_supplied_adapters() {
    let author = UserId::random();
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_username()
        .times(1)
        .return_once(move |_| {
            Ok(Some(crate::domain::User::new(
                author,
                Username::new("leo").expect("valid username"),
                false,
            )))
        });
    let mut follows = MockFollowRepository::new();
    follows
        .expect_followed_author_ids()
        .times(1)
        .return_once(move |_| Ok(vec![author]));

    let ports = StorePorts {
        users: Arc::new(users),
        groups: Arc::new(MockGroupRepository::new()),
        posts: Arc::new(MockPostRepository::new()),
        comments: Arc::new(MockCommentRepository::new()),
        follows: Arc::new(follows),
    };

    let found = ports
        .users
        .find_by_username(&Username::new("leo").expect("valid username"))
        .await
        .expect("lookup succeeds");
    assert_eq!(found.map(|user| user.id()), Some(author));
    let followed = ports
        .follows
        .followed_author_ids(UserId::random())
        .await
        .expect("list succeeds");
    assert_eq!(followed, vec![author]);
}
