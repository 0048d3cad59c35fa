//! `DieselCommentRepository` against embedded PostgreSQL.

use blog::domain::ports::CommentRepositoryError;
use blog::domain::{NewComment, PostId, UserId};
use blog::test_support::epoch;
use chrono::TimeDelta;
use rstest::rstest;

mod support;

use support::seed::{add_post, add_user};
use support::{DieselWorld, diesel_world};

#[rstest]
fn comments_list_oldest_first_with_authors(diesel_world: Option<DieselWorld>) {
    let Some(world) = diesel_world else {
        eprintln!("SKIP-TEST-CLUSTER: comments_list_oldest_first_with_authors skipped");
        return;
    };
    world.run(async {
        let ports = &world.ports;
        let leo = add_user(ports, "leo").await;
        let anna = add_user(ports, "anna").await;
        let post = add_post(ports, &leo, 0, None).await;
        let other = add_post(ports, &leo, 1, None).await;

        for (author, text, minutes) in [(&anna, "later", 20), (&leo, "earlier", 5)] {
            ports
                .comments
                .insert(&NewComment {
                    post_id: post.id,
                    author: author.id(),
                    text: text.to_owned(),
                    created: epoch() + TimeDelta::minutes(minutes),
                })
                .await
                .expect("insert comment");
        }

        let listed = ports.comments.list_for_post(post.id).await.expect("list");
        let texts: Vec<&str> = listed.iter().map(|comment| comment.text.as_str()).collect();
        assert_eq!(texts, vec!["earlier", "later"]);
        assert_eq!(listed[1].author.username, *anna.username());
        assert!(listed.iter().all(|comment| comment.post_id == post.id));
        assert!(
            ports
                .comments
                .list_for_post(other.id)
                .await
                .expect("list")
                .is_empty()
        );
    });
}

#[rstest]
fn comments_on_missing_rows_are_missing_references(diesel_world: Option<DieselWorld>) {
    let Some(world) = diesel_world else {
        eprintln!("SKIP-TEST-CLUSTER: comments_on_missing_rows_are_missing_references skipped");
        return;
    };
    world.run(async {
        let ports = &world.ports;
        let leo = add_user(ports, "leo").await;
        let post = add_post(ports, &leo, 0, None).await;

        for (post_id, author) in [
            (PostId::new(9_999), leo.id()),
            (post.id, UserId::random()),
        ] {
            let err = ports
                .comments
                .insert(&NewComment {
                    post_id,
                    author,
                    text: "hello".to_owned(),
                    created: epoch(),
                })
                .await
                .expect_err("foreign key violation");
            assert!(
                matches!(err, CommentRepositoryError::MissingReference { .. }),
                "unexpected error: {err:?}"
            );
        }
    });
}
