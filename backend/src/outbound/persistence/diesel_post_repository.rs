//! PostgreSQL-backed `PostRepository`.
//!
//! Post rows are loaded first and their authors and groups fetched in one
//! batch each, keeping the filtered query a plain boxed `posts` select.

use async_trait::async_trait;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};

use crate::domain::ports::{PostFilter, PostRepository, PostRepositoryError};
use crate::domain::{GroupId, NewPost, Post, PostDraft, PostId};

use super::diesel_error_mapping::{
    DieselFailure, LoadError, classify_diesel_error, map_load_error,
};
use super::diesel_helpers::{contains_pattern, day_bounds, load_authors, load_groups};
use super::models::{NewPostRow, PostChanges, PostRow};
use super::pool::{DbPool, PoolError};
use super::schema::posts;

/// Diesel-backed implementation of the [`PostRepository`] port.
#[derive(Clone)]
pub struct DieselPostRepository {
    pool: DbPool,
}

impl DieselPostRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> PostRepositoryError {
    PostRepositoryError::connection(error.into_message())
}

fn map_diesel_error(error: diesel::result::Error) -> PostRepositoryError {
    match classify_diesel_error(error) {
        DieselFailure::Connection(message) => PostRepositoryError::connection(message),
        DieselFailure::Query(message) => PostRepositoryError::query(message),
        DieselFailure::UniqueViolation => PostRepositoryError::query("constraint violation"),
        DieselFailure::ForeignKeyViolation => {
            PostRepositoryError::missing_reference("author or group does not exist")
        }
    }
}

fn map_hydrate_error(error: LoadError) -> PostRepositoryError {
    map_load_error(error, PostRepositoryError::query, PostRepositoryError::connection)
}

fn filtered(filter: &PostFilter) -> posts::BoxedQuery<'static, Pg> {
    let query = posts::table.into_boxed();
    match filter {
        PostFilter::All => query,
        PostFilter::Group(id) => query.filter(posts::group_id.eq(id.get())),
        PostFilter::Author(id) => query.filter(posts::author_id.eq(*id.as_uuid())),
        PostFilter::Authors(ids) => {
            let ids: Vec<uuid::Uuid> = ids.iter().map(|id| *id.as_uuid()).collect();
            query.filter(posts::author_id.eq_any(ids))
        }
        PostFilter::Search(search) => {
            let mut query = query;
            if let Some(text) = &search.text {
                query = query.filter(posts::text.ilike(contains_pattern(text)));
            }
            if let Some(day) = search.published_on {
                let (start, end) = day_bounds(day);
                query = query.filter(posts::pub_date.ge(start));
                if let Some(end) = end {
                    query = query.filter(posts::pub_date.lt(end));
                }
            }
            query
        }
    }
}

async fn hydrate(conn: &mut AsyncPgConnection, rows: Vec<PostRow>) -> Result<Vec<Post>, LoadError> {
    let authors = load_authors(conn, rows.iter().map(|row| row.author_id)).await?;
    let groups = load_groups(conn, rows.iter().filter_map(|row| row.group_id)).await?;
    rows.into_iter()
        .map(|row| {
            let image = row.image_path().map_err(LoadError::Corrupt)?;
            let author = authors
                .get(&row.author_id)
                .cloned()
                .ok_or_else(|| LoadError::Corrupt(format!("post {} has no author row", row.id)))?;
            Ok(Post {
                id: PostId::new(row.id),
                text: row.text,
                pub_date: row.pub_date,
                author,
                group: row.group_id.and_then(|id| groups.get(&id).cloned()),
                image,
            })
        })
        .collect()
}

async fn hydrate_one(
    conn: &mut AsyncPgConnection,
    row: Option<PostRow>,
) -> Result<Option<Post>, PostRepositoryError> {
    let Some(row) = row else {
        return Ok(None);
    };
    let mut posts = hydrate(conn, vec![row]).await.map_err(map_hydrate_error)?;
    Ok(posts.pop())
}

fn to_i64(value: usize) -> Result<i64, PostRepositoryError> {
    i64::try_from(value).map_err(|_| PostRepositoryError::query("page bounds out of range"))
}

#[async_trait]
impl PostRepository for DieselPostRepository {
    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, PostRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = posts::table
            .find(id.get())
            .select(PostRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        hydrate_one(&mut conn, row).await
    }

    async fn insert(&self, post: &NewPost) -> Result<Post, PostRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let values = NewPostRow {
            text: &post.content.text,
            pub_date: post.pub_date,
            author_id: *post.author.as_uuid(),
            group_id: post.content.group.map(GroupId::get),
            image: post.content.image.as_ref().map(|image| image.as_str()),
        };
        let row: PostRow = diesel::insert_into(posts::table)
            .values(&values)
            .returning(PostRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        hydrate_one(&mut conn, Some(row))
            .await?
            .ok_or_else(|| PostRepositoryError::query("inserted post vanished"))
    }

    async fn update(
        &self,
        id: PostId,
        content: &PostDraft,
    ) -> Result<Option<Post>, PostRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = diesel::update(posts::table.find(id.get()))
            .set(PostChanges::from(content))
            .returning(PostRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        hydrate_one(&mut conn, row).await
    }

    async fn set_group(
        &self,
        id: PostId,
        group: Option<GroupId>,
    ) -> Result<Option<Post>, PostRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = diesel::update(posts::table.find(id.get()))
            .set(posts::group_id.eq(group.map(GroupId::get)))
            .returning(PostRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        hydrate_one(&mut conn, row).await
    }

    async fn count(&self, filter: &PostFilter) -> Result<usize, PostRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let total: i64 = filtered(filter)
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        usize::try_from(total).map_err(|_| PostRepositoryError::query("negative post count"))
    }

    async fn page(
        &self,
        filter: &PostFilter,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<Post>, PostRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<PostRow> = filtered(filter)
            .order((posts::pub_date.desc(), posts::id.desc()))
            .offset(to_i64(offset)?)
            .limit(to_i64(limit)?)
            .select(PostRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        hydrate(&mut conn, rows).await.map_err(map_hydrate_error)
    }
}
