//! In-process store implementing every repository port.
//!
//! Used when no database URL is configured and by tests. It keeps the same
//! integrity rules as the PostgreSQL schema: unique usernames and slugs,
//! one follow edge per pair, posts and comments must reference existing rows,
//! and deleting a group clears it from its posts.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::ports::{
    CommentRepository, CommentRepositoryError, FollowRepository, FollowRepositoryError,
    GroupRepository, GroupRepositoryError, PostFilter, PostRepository, PostRepositoryError,
    UserRepository, UserRepositoryError,
};
use crate::domain::{
    Comment, Group, GroupDraft, GroupId, GroupSlug, ImagePath, NewComment, NewPost, NewUser, Post,
    PostDraft, PostId, StoredCredentials, User, UserId, Username,
};

#[derive(Debug, Clone)]
struct UserRow {
    user: User,
    password_hash: String,
}

#[derive(Debug, Clone)]
struct PostRow {
    id: PostId,
    text: String,
    pub_date: DateTime<Utc>,
    author: UserId,
    group: Option<GroupId>,
    image: Option<ImagePath>,
}

#[derive(Debug, Clone)]
struct CommentRow {
    id: i32,
    post_id: PostId,
    author: UserId,
    text: String,
    created: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct State {
    users: BTreeMap<UserId, UserRow>,
    groups: BTreeMap<GroupId, Group>,
    posts: BTreeMap<PostId, PostRow>,
    comments: Vec<CommentRow>,
    follows: BTreeSet<(UserId, UserId)>,
    last_group_id: i32,
    last_post_id: i32,
    last_comment_id: i32,
}

impl State {
    fn next_id(counter: &mut i32) -> Result<i32, String> {
        *counter = counter
            .checked_add(1)
            .ok_or_else(|| "identifier space exhausted".to_owned())?;
        Ok(*counter)
    }

    fn resolve_post(&self, row: &PostRow) -> Result<Post, String> {
        let author = self
            .users
            .get(&row.author)
            .ok_or_else(|| format!("post {} has no author row", row.id))?;
        Ok(Post {
            id: row.id,
            text: row.text.clone(),
            pub_date: row.pub_date,
            author: author.user.summary(),
            group: row
                .group
                .and_then(|id| self.groups.get(&id))
                .map(Group::summary),
            image: row.image.clone(),
        })
    }

    fn matching_posts(&self, filter: &PostFilter) -> Vec<&PostRow> {
        let mut rows: Vec<&PostRow> = self
            .posts
            .values()
            .filter(|row| filter_accepts(filter, row))
            .collect();
        rows.sort_by(|a, b| (b.pub_date, b.id).cmp(&(a.pub_date, a.id)));
        rows
    }

    fn slug_taken(&self, slug: &GroupSlug, except: Option<GroupId>) -> bool {
        self.groups
            .values()
            .any(|group| &group.slug == slug && Some(group.id) != except)
    }
}

fn filter_accepts(filter: &PostFilter, row: &PostRow) -> bool {
    match filter {
        PostFilter::All => true,
        PostFilter::Group(id) => row.group == Some(*id),
        PostFilter::Author(id) => row.author == *id,
        PostFilter::Authors(ids) => ids.contains(&row.author),
        PostFilter::Search(search) => {
            let text_ok = search.text.as_ref().is_none_or(|needle| {
                row.text
                    .to_lowercase()
                    .contains(needle.to_lowercase().as_str())
            });
            let date_ok = search
                .published_on
                .is_none_or(|day| row.pub_date.date_naive() == day);
            text_ok && date_ok
        }
    }
}

/// Mutex-guarded store shared by all repository ports.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
}

impl InMemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>, String> {
        self.state
            .lock()
            .map_err(|_| "in-memory store lock poisoned".to_owned())
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError> {
        let state = self.lock().map_err(UserRepositoryError::query)?;
        Ok(state.users.get(id).map(|row| row.user.clone()))
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, UserRepositoryError> {
        let state = self.lock().map_err(UserRepositoryError::query)?;
        Ok(state
            .users
            .values()
            .find(|row| row.user.username() == username)
            .map(|row| row.user.clone()))
    }

    async fn find_credentials(
        &self,
        username: &str,
    ) -> Result<Option<StoredCredentials>, UserRepositoryError> {
        let state = self.lock().map_err(UserRepositoryError::query)?;
        Ok(state
            .users
            .values()
            .find(|row| row.user.username().as_str() == username)
            .map(|row| StoredCredentials {
                user_id: row.user.id(),
                password_hash: row.password_hash.clone(),
            }))
    }

    async fn insert(&self, user: &NewUser) -> Result<User, UserRepositoryError> {
        let mut state = self.lock().map_err(UserRepositoryError::query)?;
        let taken = state
            .users
            .values()
            .any(|row| row.user.username() == &user.username || row.user.id() == user.id);
        if taken {
            return Err(UserRepositoryError::conflict(user.username.as_str()));
        }
        let stored = User::new(user.id, user.username.clone(), user.is_staff);
        state.users.insert(
            user.id,
            UserRow {
                user: stored.clone(),
                password_hash: user.password_hash.clone(),
            },
        );
        Ok(stored)
    }
}

#[async_trait]
impl GroupRepository for InMemoryStore {
    async fn find_by_slug(&self, slug: &GroupSlug) -> Result<Option<Group>, GroupRepositoryError> {
        let state = self.lock().map_err(GroupRepositoryError::query)?;
        Ok(state
            .groups
            .values()
            .find(|group| &group.slug == slug)
            .cloned())
    }

    async fn find_by_id(&self, id: GroupId) -> Result<Option<Group>, GroupRepositoryError> {
        let state = self.lock().map_err(GroupRepositoryError::query)?;
        Ok(state.groups.get(&id).cloned())
    }

    async fn list(&self, search: Option<String>) -> Result<Vec<Group>, GroupRepositoryError> {
        let state = self.lock().map_err(GroupRepositoryError::query)?;
        let needle = search.map(|term| term.to_lowercase());
        Ok(state
            .groups
            .values()
            .filter(|group| {
                needle
                    .as_deref()
                    .is_none_or(|term| group.title.to_lowercase().contains(term))
            })
            .cloned()
            .collect())
    }

    async fn insert(&self, draft: &GroupDraft) -> Result<Group, GroupRepositoryError> {
        let mut state = self.lock().map_err(GroupRepositoryError::query)?;
        if state.slug_taken(&draft.slug, None) {
            return Err(GroupRepositoryError::conflict(draft.slug.as_str()));
        }
        let id = GroupId::new(
            State::next_id(&mut state.last_group_id).map_err(GroupRepositoryError::query)?,
        );
        let group = Group {
            id,
            title: draft.title.clone(),
            slug: draft.slug.clone(),
            description: draft.description.clone(),
        };
        state.groups.insert(id, group.clone());
        Ok(group)
    }

    async fn update(
        &self,
        id: GroupId,
        draft: &GroupDraft,
    ) -> Result<Option<Group>, GroupRepositoryError> {
        let mut state = self.lock().map_err(GroupRepositoryError::query)?;
        if state.slug_taken(&draft.slug, Some(id)) {
            return Err(GroupRepositoryError::conflict(draft.slug.as_str()));
        }
        Ok(state.groups.get_mut(&id).map(|group| {
            group.title.clone_from(&draft.title);
            group.slug = draft.slug.clone();
            group.description.clone_from(&draft.description);
            group.clone()
        }))
    }

    async fn delete(&self, id: GroupId) -> Result<bool, GroupRepositoryError> {
        let mut state = self.lock().map_err(GroupRepositoryError::query)?;
        if state.groups.remove(&id).is_none() {
            return Ok(false);
        }
        for post in state.posts.values_mut() {
            if post.group == Some(id) {
                post.group = None;
            }
        }
        Ok(true)
    }
}

#[async_trait]
impl PostRepository for InMemoryStore {
    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, PostRepositoryError> {
        let state = self.lock().map_err(PostRepositoryError::query)?;
        state
            .posts
            .get(&id)
            .map(|row| state.resolve_post(row))
            .transpose()
            .map_err(PostRepositoryError::query)
    }

    async fn insert(&self, post: &NewPost) -> Result<Post, PostRepositoryError> {
        let mut state = self.lock().map_err(PostRepositoryError::query)?;
        if !state.users.contains_key(&post.author) {
            return Err(PostRepositoryError::missing_reference(format!(
                "author {}",
                post.author
            )));
        }
        if let Some(group) = post.content.group
            && !state.groups.contains_key(&group)
        {
            return Err(PostRepositoryError::missing_reference(format!(
                "group {group}"
            )));
        }
        let id = PostId::new(
            State::next_id(&mut state.last_post_id).map_err(PostRepositoryError::query)?,
        );
        let row = PostRow {
            id,
            text: post.content.text.clone(),
            pub_date: post.pub_date,
            author: post.author,
            group: post.content.group,
            image: post.content.image.clone(),
        };
        let resolved = state.resolve_post(&row).map_err(PostRepositoryError::query)?;
        state.posts.insert(id, row);
        Ok(resolved)
    }

    async fn update(
        &self,
        id: PostId,
        content: &PostDraft,
    ) -> Result<Option<Post>, PostRepositoryError> {
        let mut state = self.lock().map_err(PostRepositoryError::query)?;
        if let Some(group) = content.group
            && !state.groups.contains_key(&group)
        {
            return Err(PostRepositoryError::missing_reference(format!(
                "group {group}"
            )));
        }
        let Some(row) = state.posts.get_mut(&id) else {
            return Ok(None);
        };
        row.text.clone_from(&content.text);
        row.group = content.group;
        row.image.clone_from(&content.image);
        let row = row.clone();
        state
            .resolve_post(&row)
            .map(Some)
            .map_err(PostRepositoryError::query)
    }

    async fn set_group(
        &self,
        id: PostId,
        group: Option<GroupId>,
    ) -> Result<Option<Post>, PostRepositoryError> {
        let mut state = self.lock().map_err(PostRepositoryError::query)?;
        if let Some(group_id) = group
            && !state.groups.contains_key(&group_id)
        {
            return Err(PostRepositoryError::missing_reference(format!(
                "group {group_id}"
            )));
        }
        let Some(row) = state.posts.get_mut(&id) else {
            return Ok(None);
        };
        row.group = group;
        let row = row.clone();
        state
            .resolve_post(&row)
            .map(Some)
            .map_err(PostRepositoryError::query)
    }

    async fn count(&self, filter: &PostFilter) -> Result<usize, PostRepositoryError> {
        let state = self.lock().map_err(PostRepositoryError::query)?;
        Ok(state.matching_posts(filter).len())
    }

    async fn page(
        &self,
        filter: &PostFilter,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<Post>, PostRepositoryError> {
        let state = self.lock().map_err(PostRepositoryError::query)?;
        state
            .matching_posts(filter)
            .into_iter()
            .skip(offset)
            .take(limit)
            .map(|row| state.resolve_post(row))
            .collect::<Result<Vec<_>, _>>()
            .map_err(PostRepositoryError::query)
    }
}

#[async_trait]
impl CommentRepository for InMemoryStore {
    async fn insert(&self, comment: &NewComment) -> Result<Comment, CommentRepositoryError> {
        let mut state = self.lock().map_err(CommentRepositoryError::query)?;
        if !state.posts.contains_key(&comment.post_id) {
            return Err(CommentRepositoryError::missing_reference(format!(
                "post {}",
                comment.post_id
            )));
        }
        let author = state
            .users
            .get(&comment.author)
            .map(|row| row.user.summary())
            .ok_or_else(|| {
                CommentRepositoryError::missing_reference(format!("author {}", comment.author))
            })?;
        let id =
            State::next_id(&mut state.last_comment_id).map_err(CommentRepositoryError::query)?;
        state.comments.push(CommentRow {
            id,
            post_id: comment.post_id,
            author: comment.author,
            text: comment.text.clone(),
            created: comment.created,
        });
        Ok(Comment {
            id,
            post_id: comment.post_id,
            author,
            text: comment.text.clone(),
            created: comment.created,
        })
    }

    async fn list_for_post(&self, post_id: PostId) -> Result<Vec<Comment>, CommentRepositoryError> {
        let state = self.lock().map_err(CommentRepositoryError::query)?;
        let mut rows: Vec<&CommentRow> = state
            .comments
            .iter()
            .filter(|row| row.post_id == post_id)
            .collect();
        rows.sort_by_key(|row| (row.created, row.id));
        rows.into_iter()
            .map(|row| {
                let author = state.users.get(&row.author).ok_or_else(|| {
                    CommentRepositoryError::query(format!("comment {} has no author row", row.id))
                })?;
                Ok(Comment {
                    id: row.id,
                    post_id: row.post_id,
                    author: author.user.summary(),
                    text: row.text.clone(),
                    created: row.created,
                })
            })
            .collect()
    }
}

#[async_trait]
impl FollowRepository for InMemoryStore {
    async fn insert_if_absent(
        &self,
        follower: UserId,
        author: UserId,
    ) -> Result<bool, FollowRepositoryError> {
        let mut state = self.lock().map_err(FollowRepositoryError::query)?;
        for id in [follower, author] {
            if !state.users.contains_key(&id) {
                return Err(FollowRepositoryError::missing_reference(format!("user {id}")));
            }
        }
        Ok(state.follows.insert((follower, author)))
    }

    async fn delete_if_present(
        &self,
        follower: UserId,
        author: UserId,
    ) -> Result<bool, FollowRepositoryError> {
        let mut state = self.lock().map_err(FollowRepositoryError::query)?;
        Ok(state.follows.remove(&(follower, author)))
    }

    async fn exists(&self, follower: UserId, author: UserId) -> Result<bool, FollowRepositoryError> {
        let state = self.lock().map_err(FollowRepositoryError::query)?;
        Ok(state.follows.contains(&(follower, author)))
    }

    async fn followed_author_ids(
        &self,
        follower: UserId,
    ) -> Result<Vec<UserId>, FollowRepositoryError> {
        let state = self.lock().map_err(FollowRepositoryError::query)?;
        Ok(state
            .follows
            .iter()
            .filter(|(who, _)| *who == follower)
            .map(|(_, author)| *author)
            .collect())
    }
}
