//! Diesel table definitions for the blog schema.
//!
//! Kept in sync with `backend/migrations` by hand.

diesel::table! {
    /// Registered accounts.
    users (id) {
        /// Account identifier.
        id -> Uuid,
        /// Unique login and profile name.
        #[max_length = 150]
        username -> Varchar,
        /// Argon2 PHC string.
        password_hash -> Text,
        /// Grants the admin surface.
        is_staff -> Bool,
    }
}

diesel::table! {
    /// Topical communities posts may belong to.
    groups (id) {
        /// Serial identifier.
        id -> Int4,
        /// Display title.
        #[max_length = 200]
        title -> Varchar,
        /// Unique URL key.
        #[max_length = 50]
        slug -> Varchar,
        /// Free-form description.
        description -> Text,
    }
}

diesel::table! {
    /// Published posts.
    posts (id) {
        /// Serial identifier.
        id -> Int4,
        /// Body text.
        text -> Text,
        /// Publication instant, set once on creation.
        pub_date -> Timestamptz,
        /// Author; posts are removed with their author.
        author_id -> Uuid,
        /// Optional group; cleared when the group is deleted.
        group_id -> Nullable<Int4>,
        /// Optional image path under `posts/`.
        #[max_length = 255]
        image -> Nullable<Varchar>,
    }
}

diesel::table! {
    /// Comments attached to posts.
    comments (id) {
        /// Serial identifier.
        id -> Int4,
        /// Commented post.
        post_id -> Int4,
        /// Comment author.
        author_id -> Uuid,
        /// Body text.
        text -> Text,
        /// Creation instant.
        created -> Timestamptz,
    }
}

diesel::table! {
    /// Follow edges; one row per (follower, author) pair.
    follows (user_id, author_id) {
        /// Follower.
        user_id -> Uuid,
        /// Followed author.
        author_id -> Uuid,
    }
}

diesel::joinable!(posts -> groups (group_id));
diesel::joinable!(posts -> users (author_id));
diesel::joinable!(comments -> posts (post_id));

diesel::allow_tables_to_appear_in_same_query!(users, groups, posts, comments, follows);
