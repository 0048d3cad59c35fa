//! Row seeding through the repository ports.

use blog::domain::ports::StorePorts;
use blog::domain::{
    Group, GroupDraft, GroupId, GroupSlug, NewPost, NewUser, Post, PostDraft, User, UserId,
};
use blog::test_support::{epoch, username};
use chrono::TimeDelta;

/// Store a non-staff account.
pub async fn add_user(ports: &StorePorts, name: &str) -> User {
    ports
        .users
        .insert(&NewUser {
            id: UserId::random(),
            username: username(name),
            password_hash: "$argon2id$stub".to_owned(),
            is_staff: false,
        })
        .await
        .expect("insert user")
}

/// Store a group titled after its slug.
pub async fn add_group(ports: &StorePorts, slug: &str) -> Group {
    ports
        .groups
        .insert(&GroupDraft {
            title: slug.to_uppercase(),
            slug: GroupSlug::new(slug).expect("valid slug"),
            description: String::new(),
        })
        .await
        .expect("insert group")
}

/// Store a post by `author` published `minutes` after the fixture epoch.
pub async fn add_post(
    ports: &StorePorts,
    author: &User,
    minutes: i64,
    group: Option<GroupId>,
) -> Post {
    ports
        .posts
        .insert(&NewPost {
            author: author.id(),
            pub_date: epoch() + TimeDelta::minutes(minutes),
            content: PostDraft {
                text: format!("written at {minutes}"),
                group,
                image: None,
            },
        })
        .await
        .expect("insert post")
}
