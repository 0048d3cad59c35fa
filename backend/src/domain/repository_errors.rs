//! Conversions from driven-port errors into domain errors.
//!
//! Connection failures surface as `service_unavailable`; query failures are
//! internal and get redacted at the HTTP boundary.

use super::Error;
use super::ports::{
    CommentRepositoryError, FeedCacheError, FollowRepositoryError, GroupRepositoryError,
    PostRepositoryError, UserRepositoryError,
};

impl From<UserRepositoryError> for Error {
    fn from(error: UserRepositoryError) -> Self {
        match error {
            UserRepositoryError::Connection { message } => {
                Self::service_unavailable(format!("user repository unavailable: {message}"))
            }
            UserRepositoryError::Query { message } => {
                Self::internal(format!("user repository error: {message}"))
            }
            UserRepositoryError::Conflict { message } => {
                Self::conflict(format!("user already exists: {message}"))
            }
        }
    }
}

impl From<GroupRepositoryError> for Error {
    fn from(error: GroupRepositoryError) -> Self {
        match error {
            GroupRepositoryError::Connection { message } => {
                Self::service_unavailable(format!("group repository unavailable: {message}"))
            }
            GroupRepositoryError::Query { message } => {
                Self::internal(format!("group repository error: {message}"))
            }
            GroupRepositoryError::Conflict { slug } => {
                Self::conflict(format!("group slug already in use: {slug}"))
            }
        }
    }
}

impl From<PostRepositoryError> for Error {
    fn from(error: PostRepositoryError) -> Self {
        match error {
            PostRepositoryError::Connection { message } => {
                Self::service_unavailable(format!("post repository unavailable: {message}"))
            }
            PostRepositoryError::Query { message } => {
                Self::internal(format!("post repository error: {message}"))
            }
            PostRepositoryError::MissingReference { message } => {
                Self::invalid_request(format!("post references a missing row: {message}"))
            }
        }
    }
}

impl From<CommentRepositoryError> for Error {
    fn from(error: CommentRepositoryError) -> Self {
        match error {
            CommentRepositoryError::Connection { message } => {
                Self::service_unavailable(format!("comment repository unavailable: {message}"))
            }
            CommentRepositoryError::Query { message } => {
                Self::internal(format!("comment repository error: {message}"))
            }
            CommentRepositoryError::MissingReference { message } => {
                Self::not_found(format!("comment target is gone: {message}"))
            }
        }
    }
}

impl From<FollowRepositoryError> for Error {
    fn from(error: FollowRepositoryError) -> Self {
        match error {
            FollowRepositoryError::Connection { message } => {
                Self::service_unavailable(format!("follow repository unavailable: {message}"))
            }
            FollowRepositoryError::Query { message } => {
                Self::internal(format!("follow repository error: {message}"))
            }
            FollowRepositoryError::MissingReference { message } => {
                Self::not_found(format!("follow target is gone: {message}"))
            }
        }
    }
}

impl From<FeedCacheError> for Error {
    fn from(error: FeedCacheError) -> Self {
        match error {
            FeedCacheError::Backend { message } => {
                Self::service_unavailable(format!("feed cache unavailable: {message}"))
            }
        }
    }
}
