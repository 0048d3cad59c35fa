//! Authenticated mutations: posting, editing, commenting, following.
//!
//! Every operation receives the acting [`Viewer`] and answers with where to
//! go next, or with the rejected form. Refused edits are silent redirects.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;

use super::ports::{ContributionCommand, FormPage, Outcome, PostFormContext, StorePorts};
use super::{
    CommentForm, EditPolicy, Error, FieldErrors, FollowGraph, GroupSummary, InvalidForm,
    NewComment, NewPost, Post, PostDraft, PostForm, PostId, RouteTarget, User, Username, Viewer,
};

/// Write-side service implementing [`ContributionCommand`].
#[derive(Clone)]
pub struct ContributionService {
    store: StorePorts,
    graph: FollowGraph,
    policy: Arc<dyn EditPolicy>,
    clock: Arc<dyn Clock>,
}

impl ContributionService {
    /// Build the service.
    pub fn new(store: StorePorts, policy: Arc<dyn EditPolicy>, clock: Arc<dyn Clock>) -> Self {
        let graph = FollowGraph::new(Arc::clone(&store.follows));
        Self {
            store,
            graph,
            policy,
            clock,
        }
    }

    async fn acting_user(&self, viewer: Viewer) -> Result<User, Error> {
        let id = viewer.require()?;
        self.store
            .users
            .find_by_id(&id)
            .await?
            .ok_or_else(|| Error::unauthorized("session user no longer exists"))
    }

    async fn author_named(&self, username: &str) -> Result<User, Error> {
        let not_found = || Error::not_found(format!("author {username} not found"));
        let name = Username::new(username).map_err(|_| not_found())?;
        self.store
            .users
            .find_by_username(&name)
            .await?
            .ok_or_else(not_found)
    }

    async fn load_post(&self, post_id: PostId) -> Result<Post, Error> {
        self.store
            .posts
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| Error::not_found(format!("post {post_id} not found")))
    }

    async fn group_choices(&self) -> Result<Vec<GroupSummary>, Error> {
        let groups = self.store.groups.list(None).await?;
        Ok(groups.iter().map(super::Group::summary).collect())
    }

    /// Validate field shapes, then check the chosen group exists.
    async fn validate_post(&self, form: &PostForm) -> Result<Result<PostDraft, FieldErrors>, Error> {
        let (draft, mut errors) = match form.validate() {
            Ok(draft) => (Some(draft), FieldErrors::default()),
            Err(errors) => (None, errors),
        };
        if let Some(group_id) = form.group.map(super::GroupId::new)
            && self.store.groups.find_by_id(group_id).await?.is_none()
        {
            errors.add(
                "group",
                "Select a valid choice. That choice is not one of the available choices.",
            );
        }
        Ok(match draft {
            Some(draft) if errors.is_empty() => Ok(draft),
            _ => Err(errors),
        })
    }
}

#[async_trait]
impl ContributionCommand for ContributionService {
    async fn new_post_form(&self, viewer: Viewer) -> Result<PostFormContext, Error> {
        self.acting_user(viewer).await?;
        Ok(PostFormContext {
            form: PostForm::default(),
            groups: self.group_choices().await?,
            is_edit: false,
            post_id: None,
        })
    }

    async fn create_post(&self, viewer: Viewer, form: PostForm) -> Result<Outcome<PostForm>, Error> {
        let author = self.acting_user(viewer).await?;
        let content = match self.validate_post(&form).await? {
            Ok(content) => content,
            Err(errors) => return Ok(Outcome::Invalid(InvalidForm { form, errors })),
        };
        let post = self
            .store
            .posts
            .insert(&NewPost {
                author: author.id(),
                pub_date: self.clock.utc(),
                content,
            })
            .await?;
        info!(post_id = %post.id, author = %author.username(), "post created");
        Ok(Outcome::Redirect(RouteTarget::profile(author.username())))
    }

    async fn edit_post_form(&self, viewer: Viewer, post_id: PostId) -> Result<FormPage, Error> {
        viewer.require()?;
        let post = self.load_post(post_id).await?;
        if !self.policy.can_edit(&viewer, &post) {
            return Ok(FormPage::Redirect(RouteTarget::post_detail(post_id)));
        }
        Ok(FormPage::Show(PostFormContext {
            form: post.to_form(),
            groups: self.group_choices().await?,
            is_edit: true,
            post_id: Some(post_id),
        }))
    }

    async fn edit_post(
        &self,
        viewer: Viewer,
        post_id: PostId,
        form: PostForm,
    ) -> Result<Outcome<PostForm>, Error> {
        viewer.require()?;
        let post = self.load_post(post_id).await?;
        let detail = RouteTarget::post_detail(post_id);
        if !self.policy.can_edit(&viewer, &post) {
            return Ok(Outcome::Redirect(detail));
        }
        let mut content = match self.validate_post(&form).await? {
            Ok(content) => content,
            Err(errors) => return Ok(Outcome::Invalid(InvalidForm { form, errors })),
        };
        if content.image.is_none() && !form.clear_image {
            content.image = post.image;
        }
        self.store
            .posts
            .update(post_id, &content)
            .await?
            .ok_or_else(|| Error::not_found(format!("post {post_id} not found")))?;
        info!(post_id = %post_id, "post edited");
        Ok(Outcome::Redirect(detail))
    }

    async fn add_comment(
        &self,
        viewer: Viewer,
        post_id: PostId,
        form: CommentForm,
    ) -> Result<Outcome<CommentForm>, Error> {
        let author = self.acting_user(viewer).await?.id();
        self.load_post(post_id).await?;
        let text = match form.validate() {
            Ok(text) => text,
            Err(errors) => return Ok(Outcome::Invalid(InvalidForm { form, errors })),
        };
        let comment = self
            .store
            .comments
            .insert(&NewComment {
                post_id,
                author,
                text,
                created: self.clock.utc(),
            })
            .await?;
        info!(post_id = %post_id, comment_id = comment.id, "comment added");
        Ok(Outcome::Redirect(RouteTarget::post_detail(post_id)))
    }

    async fn follow(&self, viewer: Viewer, username: &str) -> Result<RouteTarget, Error> {
        let follower = viewer.require()?;
        let author = self.author_named(username).await?;
        if self.graph.follow(follower, author.id()).await? {
            info!(follower = %follower, author = %author.username(), "follow created");
        }
        Ok(RouteTarget::profile(author.username()))
    }

    async fn unfollow(&self, viewer: Viewer, username: &str) -> Result<RouteTarget, Error> {
        let follower = viewer.require()?;
        let author = self.author_named(username).await?;
        if self.graph.unfollow(follower, author.id()).await? {
            info!(follower = %follower, author = %author.username(), "follow removed");
        }
        Ok(RouteTarget::profile(author.username()))
    }
}

#[cfg(test)]
#[path = "contribution_tests.rs"]
mod tests;
