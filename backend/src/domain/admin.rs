//! Staff-only moderation of groups and posts.

use async_trait::async_trait;
use pagination::PageNumber;
use tracing::info;

use super::feed::FeedService;
use super::ports::{AdminCommand, PostFilter, PostSearch, StorePorts};
use super::{Error, ErrorCode, FeedPage, Group, GroupForm, GroupId, InvalidForm, Post, PostId, Viewer};

/// Service implementing [`AdminCommand`].
#[derive(Clone)]
pub struct AdminService {
    store: StorePorts,
    feeds: FeedService,
}

impl AdminService {
    /// Build the service; post listings reuse the feed pagination.
    pub fn new(store: StorePorts, feeds: FeedService) -> Self {
        Self { store, feeds }
    }

    async fn require_staff(&self, viewer: Viewer) -> Result<(), Error> {
        let id = viewer.require()?;
        let user = self
            .store
            .users
            .find_by_id(&id)
            .await?
            .ok_or_else(|| Error::unauthorized("session user no longer exists"))?;
        if user.is_staff() {
            Ok(())
        } else {
            Err(Error::forbidden("staff access required"))
        }
    }

    /// Turn a slug collision into the same field error as a bad slug.
    fn slug_taken(form: GroupForm, error: Error) -> Error {
        if error.code() != ErrorCode::Conflict {
            return error;
        }
        let mut errors = super::FieldErrors::default();
        errors.add("slug", "Group with this slug already exists.");
        InvalidForm { form, errors }.into_error()
    }
}

#[async_trait]
impl AdminCommand for AdminService {
    async fn list_groups(
        &self,
        viewer: Viewer,
        search: Option<String>,
    ) -> Result<Vec<Group>, Error> {
        self.require_staff(viewer).await?;
        let search = search
            .map(|term| term.trim().to_owned())
            .filter(|term| !term.is_empty());
        Ok(self.store.groups.list(search).await?)
    }

    async fn create_group(&self, viewer: Viewer, form: GroupForm) -> Result<Group, Error> {
        self.require_staff(viewer).await?;
        let draft = match form.validate() {
            Ok(draft) => draft,
            Err(errors) => return Err(InvalidForm { form, errors }.into_error()),
        };
        let group = self
            .store
            .groups
            .insert(&draft)
            .await
            .map_err(|err| Self::slug_taken(form, err.into()))?;
        info!(group_id = %group.id, slug = %group.slug, "group created");
        Ok(group)
    }

    async fn update_group(
        &self,
        viewer: Viewer,
        id: GroupId,
        form: GroupForm,
    ) -> Result<Group, Error> {
        self.require_staff(viewer).await?;
        let draft = match form.validate() {
            Ok(draft) => draft,
            Err(errors) => return Err(InvalidForm { form, errors }.into_error()),
        };
        let group = self
            .store
            .groups
            .update(id, &draft)
            .await
            .map_err(|err| Self::slug_taken(form, err.into()))?
            .ok_or_else(|| Error::not_found(format!("group {id} not found")))?;
        info!(group_id = %id, "group updated");
        Ok(group)
    }

    async fn delete_group(&self, viewer: Viewer, id: GroupId) -> Result<(), Error> {
        self.require_staff(viewer).await?;
        if !self.store.groups.delete(id).await? {
            return Err(Error::not_found(format!("group {id} not found")));
        }
        info!(group_id = %id, "group deleted");
        Ok(())
    }

    async fn list_posts(
        &self,
        viewer: Viewer,
        search: PostSearch,
        page: PageNumber,
    ) -> Result<FeedPage, Error> {
        self.require_staff(viewer).await?;
        let search = PostSearch {
            text: search
                .text
                .map(|text| text.trim().to_owned())
                .filter(|text| !text.is_empty()),
            published_on: search.published_on,
        };
        self.feeds.page_of(&PostFilter::Search(search), page).await
    }

    async fn set_post_group(
        &self,
        viewer: Viewer,
        post_id: PostId,
        group: Option<GroupId>,
    ) -> Result<Post, Error> {
        self.require_staff(viewer).await?;
        if let Some(group_id) = group
            && self.store.groups.find_by_id(group_id).await?.is_none()
        {
            return Err(Error::invalid_request(format!("group {group_id} not found")));
        }
        let post = self
            .store
            .posts
            .set_group(post_id, group)
            .await?
            .ok_or_else(|| Error::not_found(format!("post {post_id} not found")))?;
        info!(post_id = %post_id, "post group changed");
        Ok(post)
    }
}
