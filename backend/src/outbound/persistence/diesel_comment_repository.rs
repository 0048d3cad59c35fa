//! PostgreSQL-backed `CommentRepository`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{CommentRepository, CommentRepositoryError};
use crate::domain::{Comment, NewComment, PostId};

use super::diesel_error_mapping::{
    DieselFailure, LoadError, classify_diesel_error, map_load_error,
};
use super::diesel_helpers::load_authors;
use super::models::{CommentRow, NewCommentRow};
use super::pool::{DbPool, PoolError};
use super::schema::comments;

/// Diesel-backed implementation of the [`CommentRepository`] port.
#[derive(Clone)]
pub struct DieselCommentRepository {
    pool: DbPool,
}

impl DieselCommentRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> CommentRepositoryError {
    CommentRepositoryError::connection(error.into_message())
}

fn map_diesel_error(error: diesel::result::Error) -> CommentRepositoryError {
    match classify_diesel_error(error) {
        DieselFailure::Connection(message) => CommentRepositoryError::connection(message),
        DieselFailure::Query(message) => CommentRepositoryError::query(message),
        DieselFailure::UniqueViolation => CommentRepositoryError::query("constraint violation"),
        DieselFailure::ForeignKeyViolation => {
            CommentRepositoryError::missing_reference("post or author does not exist")
        }
    }
}

fn map_hydrate_error(error: LoadError) -> CommentRepositoryError {
    map_load_error(
        error,
        CommentRepositoryError::query,
        CommentRepositoryError::connection,
    )
}

#[async_trait]
impl CommentRepository for DieselCommentRepository {
    async fn insert(&self, comment: &NewComment) -> Result<Comment, CommentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let values = NewCommentRow {
            post_id: comment.post_id.get(),
            author_id: *comment.author.as_uuid(),
            text: &comment.text,
            created: comment.created,
        };
        let row: CommentRow = diesel::insert_into(comments::table)
            .values(&values)
            .returning(CommentRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let author = load_authors(&mut conn, [row.author_id])
            .await
            .map_err(map_hydrate_error)?
            .remove(&row.author_id)
            .ok_or_else(|| CommentRepositoryError::query("comment author vanished"))?;
        Ok(Comment {
            id: row.id,
            post_id: comment.post_id,
            author,
            text: row.text,
            created: row.created,
        })
    }

    async fn list_for_post(&self, post_id: PostId) -> Result<Vec<Comment>, CommentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<CommentRow> = comments::table
            .filter(comments::post_id.eq(post_id.get()))
            .order((comments::created.asc(), comments::id.asc()))
            .select(CommentRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let authors = load_authors(&mut conn, rows.iter().map(|row| row.author_id))
            .await
            .map_err(map_hydrate_error)?;
        rows.into_iter()
            .map(|row| {
                let author = authors.get(&row.author_id).cloned().ok_or_else(|| {
                    CommentRepositoryError::query(format!("comment {} has no author row", row.id))
                })?;
                Ok(Comment {
                    id: row.id,
                    post_id: PostId::new(row.post_id),
                    author,
                    text: row.text,
                    created: row.created,
                })
            })
            .collect()
    }
}
